mod auth;
mod export;
mod output;
mod show;
mod source;
mod top;

pub use auth::{run_login, run_logout, run_whoami, LoginOptions};
pub use export::{run_export, ExportOptions};
pub use output::{open_output, write_table, OutputFormat};
pub use show::{build_view, run_show, ShowOptions};
pub use source::{load_reports, SourceOptions};
pub use top::{run_top, TopOptions};
