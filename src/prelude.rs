//! Convenience prelude for common webtrack embedding tasks.

pub use crate::api::{
    parse_reports, sort_reports, top_sites, write_csv, ReportFilter, ReportStore, Report,
    Result, SortDirection, SortMode, WebtrackError,
};
