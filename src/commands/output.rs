use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;

use crate::error::Result;

#[derive(Clone, Copy, Debug, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

const TABLE_CELL_MIN_WIDTH: usize = 4;
const TABLE_CELL_MAX_WIDTH: usize = 48;

/// Open `path` for writing; `-` means stdout.
pub fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(io::stdout().lock()));
    }
    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

pub fn write_table(
    out: &mut impl Write,
    columns: &[String],
    rows: &[Vec<String>],
    quiet: bool,
) -> Result<()> {
    let widths = column_widths(columns, rows);

    write_table_row(out, columns.iter().map(|s| s.as_str()), &widths)?;
    if !quiet {
        write_table_sep(out, &widths)?;
    }
    for row in rows {
        write_table_row(out, row.iter().map(|s| s.as_str()), &widths)?;
    }
    Ok(())
}

fn column_widths(columns: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
                .max(TABLE_CELL_MIN_WIDTH)
                .min(TABLE_CELL_MAX_WIDTH)
        })
        .collect()
}

fn write_table_row<'a, I>(out: &mut impl Write, fields: I, widths: &[usize]) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.write_all(b" | ")?;
        }
        let width = widths.get(i).copied().unwrap_or(0);
        let field = truncate(&sanitize_table_text(field), width);
        out.write_all(field.as_bytes())?;
        let field_len = field.chars().count();
        if field_len < width {
            out.write_all(" ".repeat(width - field_len).as_bytes())?;
        }
    }
    out.write_all(b"\n")?;
    Ok(())
}

fn write_table_sep(out: &mut impl Write, widths: &[usize]) -> Result<()> {
    for (i, w) in widths.iter().copied().enumerate() {
        if i > 0 {
            out.write_all(b"-+-")?;
        }
        out.write_all("-".repeat(w).as_bytes())?;
    }
    out.write_all(b"\n")?;
    Ok(())
}

fn sanitize_table_text(s: &str) -> String {
    s.replace('\r', "\\r")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".to_string();
    }
    let mut out: String = s.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
