//! Stable, supported API surface for embedding webtrack.
//!
//! Treat the contents of this module as SemVer-stable.

pub use crate::client::{
    ApiClient, Credentials, Endpoints, DEFAULT_LOGIN_URL, DEFAULT_REPORTS_URL, DEFAULT_USERS_URL,
};
pub use crate::commands::{
    build_view, load_reports, run_export, run_login, run_logout, run_show, run_top, run_whoami,
    ExportOptions, LoginOptions, OutputFormat, ShowOptions, SourceOptions, TopOptions,
};
pub use crate::error::{Result, WebtrackError};
pub use crate::pipeline::{
    flatten, paginate, parse_filter_date, regroup, sort_reports, to_csv_string, top_sites,
    write_csv, FilterOptions, FlatLeaf, Page, ReportFilter, ReportStore, SiteTotal,
    SortDirection, SortMode, SortState, CSV_HEADER, DEFAULT_CSV_FILENAME, DEFAULT_PAGE_SIZE,
    DEFAULT_TOP_LIMIT,
};
pub use crate::report::{
    coerce_minutes, leaf_count, leaves, parse_report_date, parse_report_file, parse_reports,
    reports_from_value, Browser, LeafRef, Report, User, VisitedSite,
};
pub use crate::session::{AuthState, Session, SessionStore};
