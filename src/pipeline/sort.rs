use std::cmp::Ordering;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::report::{leaves, Browser, Report, User, VisitedSite};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[value(alias = "asc")]
    Ascending,
    #[value(alias = "desc")]
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }

    fn order(self, a: Option<u64>, b: Option<u64>) -> Ordering {
        match self {
            SortDirection::Ascending => a.cmp(&b),
            SortDirection::Descending => b.cmp(&a),
        }
    }
}

/// How a sort rearranges the report hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Flatten every leaf, sort globally, then rebuild the hierarchy in order
    /// of first appearance in the sorted sequence.
    Regroup,
    /// Sort the sites inside each browser and leave the hierarchy untouched.
    InPlace,
}

/// Direction toggle for the minutes column. Starts ascending; every toggle
/// flips first and sorts in the new direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortState {
    direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            direction: SortDirection::Ascending,
        }
    }
}

impl SortState {
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn set(&mut self, direction: SortDirection) {
        self.direction = direction;
    }

    pub fn toggle(&mut self) -> SortDirection {
        self.direction = self.direction.toggle();
        self.direction
    }
}

/// A leaf with its full ancestry key, as produced by flattening a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatLeaf {
    pub date: String,
    pub system_name: String,
    pub user_name: String,
    pub browser_name: String,
    pub site: VisitedSite,
}

pub fn flatten(reports: &[Report]) -> Vec<FlatLeaf> {
    leaves(reports)
        .map(|leaf| FlatLeaf {
            date: leaf.report.date.clone(),
            system_name: leaf.report.system_name.clone(),
            user_name: leaf.user.user_name.clone(),
            browser_name: leaf.browser.browser_name.clone(),
            site: leaf.site.clone(),
        })
        .collect()
}

/// Rebuild the hierarchy from a flat sequence. Reports are keyed by
/// (date, system), users by name within a report and browsers by name within
/// a user; siblings appear in the order their first leaf does.
pub fn regroup(rows: Vec<FlatLeaf>) -> Vec<Report> {
    let mut out: Vec<Report> = Vec::new();

    for row in rows {
        let report_idx = match out
            .iter()
            .position(|r| r.date == row.date && r.system_name == row.system_name)
        {
            Some(idx) => idx,
            None => {
                out.push(Report {
                    date: row.date,
                    system_name: row.system_name,
                    users: Vec::new(),
                });
                out.len() - 1
            }
        };
        let report = &mut out[report_idx];

        let user_idx = match report
            .users
            .iter()
            .position(|u| u.user_name == row.user_name)
        {
            Some(idx) => idx,
            None => {
                report.users.push(User {
                    user_name: row.user_name,
                    browsers: Vec::new(),
                });
                report.users.len() - 1
            }
        };
        let user = &mut report.users[user_idx];

        let browser_idx = match user
            .browsers
            .iter()
            .position(|b| b.browser_name == row.browser_name)
        {
            Some(idx) => idx,
            None => {
                user.browsers.push(Browser {
                    browser_name: row.browser_name,
                    visited_sites: Vec::new(),
                });
                user.browsers.len() - 1
            }
        };

        user.browsers[browser_idx].visited_sites.push(row.site);
    }

    out
}

/// Sort a view by minutes spent. Both modes are stable: equal times keep
/// their relative order from the input view.
///
/// `Regroup` drops containers that hold no leaves, since they have nothing
/// to contribute to the flattened sequence.
pub fn sort_reports(reports: &[Report], direction: SortDirection, mode: SortMode) -> Vec<Report> {
    match mode {
        SortMode::Regroup => {
            let mut rows = flatten(reports);
            rows.sort_by(|a, b| direction.order(a.site.minutes(), b.site.minutes()));
            regroup(rows)
        }
        SortMode::InPlace => {
            let mut out = reports.to_vec();
            for browser in out
                .iter_mut()
                .flat_map(|r| r.users.iter_mut())
                .flat_map(|u| u.browsers.iter_mut())
            {
                browser
                    .visited_sites
                    .sort_by(|a, b| direction.order(a.minutes(), b.minutes()));
            }
            out
        }
    }
}
