use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use serde_json::Value;

use super::model::{decode_elements, Report};
use crate::error::{Result, WebtrackError};

/// Parse a report document (a JSON array of reports) from a string.
pub fn parse_reports(json: &str) -> Result<Vec<Report>> {
    let value: Value = serde_json::from_str(json)?;
    reports_from_value(value)
}

/// Parse a report document from disk.
pub fn parse_report_file(path: &Path) -> Result<Vec<Report>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let value: Value = serde_json::from_reader(reader)?;
    reports_from_value(value)
}

pub fn reports_from_value(value: Value) -> Result<Vec<Report>> {
    match value {
        Value::Array(items) => Ok(decode_elements(items)),
        other => Err(WebtrackError::InvalidReport(format!(
            "expected a JSON array of reports, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a report date in `dd-MM-yyyy` form.
///
/// The string is split on `-` and reordered to `yyyy-MM-dd` before building the
/// date, so `"15-02-2025"` becomes 2025-02-15.
pub fn parse_report_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.trim().split('-');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{year}-{month}-{day}"), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{parse_report_date, parse_reports};

    #[test]
    fn parses_minimal_document() {
        let json = r#"
        [
          {
            "date": "01-01-2025",
            "systemName": "SYS1",
            "users": [
              {
                "userName": "alice",
                "browsers": [
                  {
                    "browserName": "Chrome",
                    "visitedSites": [
                      {"title": "x.com", "totalTimeSpentInMinutes": 10},
                      {"title": "y.com", "totalTimeSpentInMinutes": 5}
                    ]
                  }
                ]
              }
            ]
          }
        ]
        "#;

        let reports = parse_reports(json).expect("document should parse");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].system_name, "SYS1");
        assert_eq!(reports[0].leaf_count(), 2);
    }

    #[test]
    fn skips_malformed_reports() {
        let reports = parse_reports(r#"[null, {"systemName": "A"}, "junk"]"#).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].system_name, "A");
        assert!(reports[0].users.is_empty());
    }

    #[test]
    fn rejects_non_array_documents() {
        let err = parse_reports(r#"{"reports": []}"#).unwrap_err();
        assert!(err.to_string().contains("expected a JSON array"));
        assert!(parse_reports("not json").is_err());
    }

    #[test]
    fn reorders_day_month_year() {
        assert_eq!(
            parse_report_date("15-02-2025"),
            NaiveDate::from_ymd_opt(2025, 2, 15)
        );
        assert_eq!(
            parse_report_date("01-01-2025"),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_report_date(""), None);
        assert_eq!(parse_report_date("2025-01-01-01"), None);
        assert_eq!(parse_report_date("31-02-2025"), None);
        assert_eq!(parse_report_date("01/01/2025"), None);
    }
}
