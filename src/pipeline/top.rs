use std::collections::HashMap;

use serde::Serialize;

use crate::report::{leaves, Report};

pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Total minutes spent on one site title across a whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteTotal {
    pub title: String,
    pub total_minutes: u64,
}

/// Sum minutes per site title over every leaf, regardless of which report,
/// user or browser it sits under, and return the `limit` largest totals.
///
/// Ties keep the order in which titles were first encountered. Leaves without
/// a title or without a positive time are skipped.
pub fn top_sites(reports: &[Report], limit: usize) -> Vec<SiteTotal> {
    let mut totals: Vec<SiteTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for leaf in leaves(reports) {
        let Some(title) = leaf.site.title.as_deref().filter(|t| !t.is_empty()) else {
            continue;
        };
        let Some(minutes) = leaf.site.minutes().filter(|m| *m > 0) else {
            continue;
        };

        match index.get(title) {
            Some(&i) => {
                totals[i].total_minutes = totals[i].total_minutes.saturating_add(minutes);
            }
            None => {
                index.insert(title, totals.len());
                totals.push(SiteTotal {
                    title: title.to_string(),
                    total_minutes: minutes,
                });
            }
        }
    }

    totals.sort_by(|a, b| b.total_minutes.cmp(&a.total_minutes));
    totals.truncate(limit);
    totals
}
