use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One system's activity record for one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Calendar date as sent by the server, `dd-MM-yyyy`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub system_name: String,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub browsers: Vec<Browser>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Browser {
    #[serde(default, deserialize_with = "null_as_default")]
    pub browser_name: String,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub visited_sites: Vec<VisitedSite>,
}

/// A single site visit duration. Both fields are optional so that malformed
/// entries survive parsing and can be skipped by each consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitedSite {
    #[serde(
        default,
        deserialize_with = "lenient_title",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_minutes",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_time_spent_in_minutes: Option<u64>,
}

impl VisitedSite {
    pub fn new(title: impl Into<String>, minutes: u64) -> Self {
        Self {
            title: Some(title.into()),
            total_time_spent_in_minutes: Some(minutes),
        }
    }

    pub fn minutes(&self) -> Option<u64> {
        self.total_time_spent_in_minutes
    }
}

impl Report {
    /// Number of visited-site leaves below this report.
    pub fn leaf_count(&self) -> usize {
        self.users
            .iter()
            .flat_map(|u| u.browsers.iter())
            .map(|b| b.visited_sites.len())
            .sum()
    }

    pub fn sites(&self) -> impl Iterator<Item = &VisitedSite> {
        self.users
            .iter()
            .flat_map(|u| u.browsers.iter())
            .flat_map(|b| b.visited_sites.iter())
    }
}

/// A leaf together with its ancestry, borrowed from a report collection.
#[derive(Debug, Clone, Copy)]
pub struct LeafRef<'a> {
    pub report: &'a Report,
    pub user: &'a User,
    pub browser: &'a Browser,
    pub site: &'a VisitedSite,
}

/// Depth-first traversal of every leaf: report, user, browser, site.
pub fn leaves(reports: &[Report]) -> impl Iterator<Item = LeafRef<'_>> {
    reports.iter().flat_map(|report| {
        report.users.iter().flat_map(move |user| {
            user.browsers.iter().flat_map(move |browser| {
                browser.visited_sites.iter().map(move |site| LeafRef {
                    report,
                    user,
                    browser,
                    site,
                })
            })
        })
    })
}

pub fn leaf_count(reports: &[Report]) -> usize {
    reports.iter().map(Report::leaf_count).sum()
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes a sequence element by element, dropping elements that do not fit
/// the expected shape instead of rejecting the whole document.
fn lenient_seq<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(other) => {
            tracing::warn!(value = %other, "expected an array; treating as empty");
            return Ok(Vec::new());
        }
    };
    Ok(decode_elements(raw))
}

pub(crate) fn decode_elements<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(value) => out.push(value),
            Err(err) => tracing::warn!(index, error = %err, "skipping malformed entry"),
        }
    }
    out
}

fn lenient_title<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn lenient_minutes<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_minutes))
}

/// Accepts integers, non-negative floats (truncated) and numeric strings.
pub fn coerce_minutes(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(float_minutes)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_minutes))
        }
        _ => None,
    }
}

fn float_minutes(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 && f < u64::MAX as f64 {
        Some(f.trunc() as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn coerces_string_and_float_minutes() {
        assert_eq!(coerce_minutes(&json!(12)), Some(12));
        assert_eq!(coerce_minutes(&json!("15")), Some(15));
        assert_eq!(coerce_minutes(&json!(" 7 ")), Some(7));
        assert_eq!(coerce_minutes(&json!(4.9)), Some(4));
        assert_eq!(coerce_minutes(&json!("2.5")), Some(2));
        assert_eq!(coerce_minutes(&json!(-3)), None);
        assert_eq!(coerce_minutes(&json!("ten")), None);
        assert_eq!(coerce_minutes(&json!(true)), None);
    }

    #[test]
    fn tolerates_missing_and_null_fields() {
        let report: Report = serde_json::from_value(json!({
            "date": null,
            "systemName": "SYS1",
            "users": [
                {"userName": "alice", "browsers": null},
                {"browsers": [{"browserName": "Chrome"}]}
            ]
        }))
        .unwrap();

        assert_eq!(report.date, "");
        assert_eq!(report.users.len(), 2);
        assert!(report.users[0].browsers.is_empty());
        assert_eq!(report.users[1].user_name, "");
        assert!(report.users[1].browsers[0].visited_sites.is_empty());
        assert_eq!(report.leaf_count(), 0);
    }

    #[test]
    fn skips_undecodable_elements() {
        let browser: Browser = serde_json::from_value(json!({
            "browserName": "Firefox",
            "visitedSites": [
                null,
                {"title": "a.com", "totalTimeSpentInMinutes": "9"},
                42,
                {"title": 17, "totalTimeSpentInMinutes": "n/a"}
            ]
        }))
        .unwrap();

        assert_eq!(browser.visited_sites.len(), 2);
        assert_eq!(browser.visited_sites[0], VisitedSite::new("a.com", 9));
        assert_eq!(browser.visited_sites[1], VisitedSite::default());
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let site = VisitedSite::new("x.com", 10);
        let value = serde_json::to_value(&site).unwrap();
        assert_eq!(value, json!({"title": "x.com", "totalTimeSpentInMinutes": 10}));

        let empty = serde_json::to_value(VisitedSite::default()).unwrap();
        assert_eq!(empty, json!({}));
    }

    #[test]
    fn leaves_walk_depth_first() {
        let reports: Vec<Report> = serde_json::from_value(json!([
            {"date": "01-01-2025", "systemName": "A", "users": [
                {"userName": "u1", "browsers": [
                    {"browserName": "b1", "visitedSites": [{"title": "1"}, {"title": "2"}]},
                    {"browserName": "b2", "visitedSites": [{"title": "3"}]}
                ]}
            ]},
            {"date": "02-01-2025", "systemName": "B", "users": [
                {"userName": "u2", "browsers": [
                    {"browserName": "b1", "visitedSites": [{"title": "4"}]}
                ]}
            ]}
        ]))
        .unwrap();

        let titles: Vec<&str> = leaves(&reports)
            .filter_map(|leaf| leaf.site.title.as_deref())
            .collect();
        assert_eq!(titles, ["1", "2", "3", "4"]);
        assert_eq!(leaf_count(&reports), 4);

        let last = leaves(&reports).last().unwrap();
        assert_eq!(last.report.system_name, "B");
        assert_eq!(last.user.user_name, "u2");
        assert_eq!(last.browser.browser_name, "b1");
    }
}
