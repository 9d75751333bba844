use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::pipeline::{write_csv, FilterOptions, SortDirection, SortMode};

use super::output::open_output;
use super::show::build_view;
use super::source::{load_reports, SourceOptions};

pub struct ExportOptions {
    pub source: SourceOptions,
    pub filters: FilterOptions,
    pub sort: Option<SortDirection>,
    pub sort_mode: SortMode,
    /// Destination file; `-` writes to stdout.
    pub output: PathBuf,
}

/// Write the current view as CSV, one row per visited site.
pub fn run_export(options: &ExportOptions) -> Result<()> {
    let reports = load_reports(&options.source)?;
    let store = build_view(reports, &options.filters, options.sort, options.sort_mode);

    let mut writer = open_output(&options.output)?;
    let rows = write_csv(&mut writer, store.view())?;
    writer.flush()?;

    if options.output != Path::new("-") {
        println!("Exported {} rows to {}", rows, options.output.display());
    }
    tracing::info!(rows, output = %options.output.display(), "csv export complete");
    Ok(())
}
