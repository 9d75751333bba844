//! In-memory report pipeline: filter, sort, page, and project the view.
//!
//! Every stage is a pure function over already-loaded data; [`ReportStore`]
//! ties them together the way an interactive session uses them.

mod csv;
mod filter;
mod page;
mod sort;
mod store;
mod top;

pub use csv::{to_csv_string, write_csv, CSV_HEADER, DEFAULT_CSV_FILENAME};
pub(crate) use csv::write_csv_row;
pub use filter::{parse_filter_date, FilterOptions, ReportFilter};
pub use page::{paginate, Page, DEFAULT_PAGE_SIZE};
pub use sort::{flatten, regroup, sort_reports, FlatLeaf, SortDirection, SortMode, SortState};
pub use store::ReportStore;
pub use top::{top_sites, SiteTotal, DEFAULT_TOP_LIMIT};
