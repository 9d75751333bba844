use std::io::{self, Write};

use crate::error::Result;
use crate::pipeline::{
    paginate, write_csv, FilterOptions, ReportFilter, ReportStore, SortDirection, SortMode,
};
use crate::report::{leaves, LeafRef, Report};

use super::output::{write_table, OutputFormat};
use super::source::{load_reports, SourceOptions};

pub struct ShowOptions {
    pub source: SourceOptions,
    pub filters: FilterOptions,
    pub sort: Option<SortDirection>,
    pub sort_mode: SortMode,
    pub format: OutputFormat,
    pub page: usize,
    pub page_size: usize,
    /// Print every row instead of a single page (table format only).
    pub all: bool,
    pub quiet: bool,
}

/// Build the filtered and sorted view shared by `show` and `export`.
pub fn build_view(
    reports: Vec<Report>,
    filters: &FilterOptions,
    sort: Option<SortDirection>,
    sort_mode: SortMode,
) -> ReportStore {
    let mut store = ReportStore::new(reports).with_sort_mode(sort_mode);
    let filter = ReportFilter::from_options(filters);
    if !filter.is_empty() {
        store.apply_filter(&filter);
    }
    if let Some(direction) = sort {
        store.sort(direction);
    }
    store
}

pub fn run_show(options: &ShowOptions) -> Result<()> {
    let reports = load_reports(&options.source)?;
    let store = build_view(reports, &options.filters, options.sort, options.sort_mode);

    let mut out = io::stdout().lock();
    match options.format {
        OutputFormat::Table => write_view_table(&mut out, &store, options),
        OutputFormat::Csv => write_csv(&mut out, store.view()).map(|_| ()),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, store.view())?;
            out.write_all(b"\n")?;
            Ok(())
        }
    }
}

fn write_view_table(out: &mut impl Write, store: &ReportStore, options: &ShowOptions) -> Result<()> {
    let columns = table_columns(options.sort.map(|_| store.sort_direction()));

    if options.all {
        let rows: Vec<Vec<String>> = leaves(store.view()).map(|l| leaf_row(&l)).collect();
        write_table(out, &columns, &rows, options.quiet)?;
        if !options.quiet {
            writeln!(out, "\n{} rows", rows.len())?;
        }
        return Ok(());
    }

    let page = paginate(store.view(), options.page, options.page_size);
    let rows: Vec<Vec<String>> = page.rows.iter().map(leaf_row).collect();
    write_table(out, &columns, &rows, options.quiet)?;
    if !options.quiet {
        writeln!(
            out,
            "\nPage {} of {} ({} rows)",
            page.number, page.total_pages, page.total_rows
        )?;
    }
    Ok(())
}

fn table_columns(direction: Option<SortDirection>) -> Vec<String> {
    let minutes = match direction {
        Some(d) => format!("Total Time Spent (Minutes) {}", d.arrow()),
        None => "Total Time Spent (Minutes)".to_string(),
    };
    vec![
        "Date".to_string(),
        "System Name".to_string(),
        "Username".to_string(),
        "Browser".to_string(),
        "Visited Sites".to_string(),
        minutes,
    ]
}

fn leaf_row(leaf: &LeafRef<'_>) -> Vec<String> {
    vec![
        leaf.report.date.clone(),
        leaf.report.system_name.clone(),
        leaf.user.user_name.clone(),
        leaf.browser.browser_name.clone(),
        leaf.site.title.clone().unwrap_or_default(),
        leaf.site
            .minutes()
            .map(|m| m.to_string())
            .unwrap_or_default(),
    ]
}
