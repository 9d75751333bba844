mod model;
mod parser;

pub use model::{coerce_minutes, leaf_count, leaves, Browser, LeafRef, Report, User, VisitedSite};
pub use parser::{parse_report_date, parse_report_file, parse_reports, reports_from_value};
