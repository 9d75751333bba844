use std::io::Write;

use crate::error::Result;
use crate::report::{leaves, LeafRef, Report};

pub const CSV_HEADER: &[&str] = &[
    "Date",
    "SystemName",
    "UserName",
    "Browser",
    "SiteTitle",
    "TotalTimeSpentInMinutes",
];

pub const DEFAULT_CSV_FILENAME: &str = "report.csv";

/// Write one row per leaf in document order, preceded by the header row.
/// Returns the number of data rows written.
pub fn write_csv(out: &mut impl Write, reports: &[Report]) -> Result<usize> {
    write_csv_row(out, CSV_HEADER.iter().copied())?;
    let mut rows = 0usize;
    for leaf in leaves(reports) {
        let row = leaf_to_csv_row(&leaf);
        write_csv_row(out, row.iter().map(|s| s.as_str()))?;
        rows += 1;
    }
    Ok(rows)
}

pub fn to_csv_string(reports: &[Report]) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_csv(&mut buf, reports)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn leaf_to_csv_row(leaf: &LeafRef<'_>) -> [String; 6] {
    [
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

pub(crate) fn write_csv_row<'a, I>(out: &mut impl Write, fields: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut first = true;
    for field in fields {
        if !first {
            out.write_all(b",")?;
        }
        first = false;
        write_csv_field(out, field)?;
    }
    out.write_all(b"\n")?;
    Ok(())
}

fn write_csv_field(out: &mut impl Write, field: &str) -> Result<()> {
    let needs_quotes = field.contains([',', '"', '\n', '\r']);
    if !needs_quotes {
        out.write_all(field.as_bytes())?;
        return Ok(());
    }

    out.write_all(b"\"")?;
    for b in field.as_bytes() {
        if *b == b'"' {
            out.write_all(b"\"\"")?;
        } else {
            out.write_all(&[*b])?;
        }
    }
    out.write_all(b"\"")?;
    Ok(())
}
