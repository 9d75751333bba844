use std::io::{self, Write};

use crate::error::Result;
use crate::pipeline::{top_sites, write_csv_row, SiteTotal};

use super::output::{write_table, OutputFormat};
use super::source::{load_reports, SourceOptions};

pub struct TopOptions {
    pub source: SourceOptions,
    pub limit: usize,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Print the sites with the most time spent across the whole document.
/// Filters do not apply here; the ranking always covers every report.
pub fn run_top(options: &TopOptions) -> Result<()> {
    let reports = load_reports(&options.source)?;
    let top = top_sites(&reports, options.limit);
    let mut out = io::stdout().lock();
    write_top(&mut out, &top, options.format, options.quiet)
}

fn write_top(out: &mut impl Write, top: &[SiteTotal], format: OutputFormat, quiet: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, top)?;
            out.write_all(b"\n")?;
        }
        OutputFormat::Csv => {
            write_csv_row(out, ["SiteTitle", "TotalTimeSpentInMinutes"])?;
            for site in top {
                let minutes = site.total_minutes.to_string();
                write_csv_row(out, [site.title.as_str(), minutes.as_str()])?;
            }
        }
        OutputFormat::Table => {
            let columns = vec![
                "#".to_string(),
                "Site".to_string(),
                "Time Spent (Minutes)".to_string(),
            ];
            let rows: Vec<Vec<String>> = top
                .iter()
                .enumerate()
                .map(|(i, site)| {
                    vec![
                        (i + 1).to_string(),
                        site.title.clone(),
                        site.total_minutes.to_string(),
                    ]
                })
                .collect();
            write_table(out, &columns, &rows, quiet)?;
        }
    }
    Ok(())
}
