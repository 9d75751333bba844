use chrono::NaiveDate;

use crate::report::{parse_report_date, Report};

/// Filter values as the user typed them. Every field is optional and
/// malformed values are ignored rather than rejected.
#[derive(Debug, Default, Clone)]
pub struct FilterOptions {
    pub system_name: Option<String>,
    pub user_name: Option<String>,
    pub browser_name: Option<String>,
    pub min_minutes: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub prune_idle: bool,
}

/// Normalized report filter. All active predicates combine with AND at the
/// report level.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    system_name: Option<String>,
    user_name: Option<String>,
    browser_name: Option<String>,
    min_minutes: Option<u64>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    prune_idle: bool,
}

impl ReportFilter {
    pub fn from_options(options: &FilterOptions) -> Self {
        Self {
            system_name: needle(options.system_name.as_deref()),
            user_name: needle(options.user_name.as_deref()),
            browser_name: needle(options.browser_name.as_deref()),
            min_minutes: options.min_minutes.as_deref().and_then(parse_min_minutes),
            start: options.from.as_deref().and_then(|s| parse_bound(s, "from")),
            end: options.to.as_deref().and_then(|s| parse_bound(s, "to")),
            prune_idle: options.prune_idle,
        }
    }

    pub fn system_name(mut self, value: &str) -> Self {
        self.system_name = needle(Some(value));
        self
    }

    pub fn user_name(mut self, value: &str) -> Self {
        self.user_name = needle(Some(value));
        self
    }

    pub fn browser_name(mut self, value: &str) -> Self {
        self.browser_name = needle(Some(value));
        self
    }

    /// A minimum of zero is no constraint: every present time is `>= 0`.
    pub fn min_minutes(mut self, value: u64) -> Self {
        self.min_minutes = (value > 0).then_some(value);
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn prune_idle(mut self, prune: bool) -> Self {
        self.prune_idle = prune;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.system_name.is_none()
            && self.user_name.is_none()
            && self.browser_name.is_none()
            && self.min_minutes.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && !self.prune_idle
    }

    pub fn matches(&self, report: &Report) -> bool {
        if let Some(needle) = &self.system_name {
            if !contains_ignore_case(&report.system_name, needle) {
                return false;
            }
        }

        if let Some(needle) = &self.user_name {
            if !report
                .users
                .iter()
                .any(|u| contains_ignore_case(&u.user_name, needle))
            {
                return false;
            }
        }

        if let Some(needle) = &self.browser_name {
            if !report
                .users
                .iter()
                .flat_map(|u| u.browsers.iter())
                .any(|b| contains_ignore_case(&b.browser_name, needle))
            {
                return false;
            }
        }

        if let Some(min) = self.min_minutes {
            if !report.sites().any(|s| s.minutes().is_some_and(|m| m >= min)) {
                return false;
            }
        }

        if self.start.is_some() || self.end.is_some() {
            let Some(date) = parse_report_date(&report.date) else {
                return false;
            };
            if self.start.is_some_and(|start| date < start) {
                return false;
            }
            if self.end.is_some_and(|end| date > end) {
                return false;
            }
        }

        true
    }

    /// Select matching reports in their original order, then prune idle
    /// leaves when configured. Containers emptied by pruning are kept.
    pub fn apply(&self, reports: &[Report]) -> Vec<Report> {
        let mut out: Vec<Report> = reports
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();

        if self.prune_idle {
            for browser in out
                .iter_mut()
                .flat_map(|r| r.users.iter_mut())
                .flat_map(|u| u.browsers.iter_mut())
            {
                browser
                    .visited_sites
                    .retain(|s| s.minutes().is_some_and(|m| m > 0));
            }
        }

        tracing::debug!(
            input = reports.len(),
            output = out.len(),
            "applied report filter"
        );
        out
    }
}

fn needle(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_lowercase())
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

fn parse_min_minutes(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Some(value as u64),
        Ok(_) => None,
        Err(_) => {
            tracing::warn!(value = raw, "ignoring non-numeric minimum time filter");
            None
        }
    }
}

/// Accepts `yyyy-MM-dd`, `dd-MM-yyyy` and `dd/MM/yyyy`. The year must have
/// exactly four digits.
pub fn parse_filter_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    [("%Y-%m-%d", '-', true), ("%d-%m-%Y", '-', false), ("%d/%m/%Y", '/', false)]
        .iter()
        .filter(|(_, sep, year_first)| has_four_digit_year(raw, *sep, *year_first))
        .find_map(|(fmt, _, _)| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn has_four_digit_year(raw: &str, sep: char, year_first: bool) -> bool {
    let year = if year_first {
        raw.split(sep).next()
    } else {
        raw.rsplit(sep).next()
    };
    year.is_some_and(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_bound(raw: &str, which: &str) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        return None;
    }
    let date = parse_filter_date(raw);
    if date.is_none() {
        tracing::warn!(value = raw, bound = which, "ignoring unparseable date filter");
    }
    date
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{parse_filter_date, FilterOptions, ReportFilter};
    use crate::report::{leaf_count, parse_reports, Report};

    fn sample() -> Vec<Report> {
        parse_reports(
            r#"[
              {"date": "01-01-2025", "systemName": "SYS1", "users": [
                {"userName": "alice", "browsers": [
                  {"browserName": "Chrome", "visitedSites": [
                    {"title": "x.com", "totalTimeSpentInMinutes": 10},
                    {"title": "y.com", "totalTimeSpentInMinutes": 5}
                  ]}
                ]}
              ]},
              {"date": "15-02-2025", "systemName": "lab-02", "users": [
                {"userName": "Bob", "browsers": [
                  {"browserName": "Firefox", "visitedSites": [
                    {"title": "z.com", "totalTimeSpentInMinutes": 0},
                    {"title": "w.com", "totalTimeSpentInMinutes": "3"}
                  ]}
                ]}
              ]},
              {"date": "20-02-2025", "systemName": "SYS3", "users": []}
            ]"#,
        )
        .unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn empty_filter_is_identity() {
        let reports = sample();
        let filter = ReportFilter::from_options(&FilterOptions::default());
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&reports), reports);

        let blanks = FilterOptions {
            system_name: Some("  ".to_string()),
            user_name: Some(String::new()),
            min_minutes: Some(String::new()),
            from: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(ReportFilter::from_options(&blanks).apply(&reports), reports);
    }

    #[test]
    fn name_filters_are_case_insensitive_substrings() {
        let reports = sample();

        let out = ReportFilter::default().system_name("sys").apply(&reports);
        let names: Vec<&str> = out.iter().map(|r| r.system_name.as_str()).collect();
        assert_eq!(names, ["SYS1", "SYS3"]);

        let out = ReportFilter::default().user_name("BO").apply(&reports);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].system_name, "lab-02");

        let out = ReportFilter::default().browser_name("chrom").apply(&reports);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].system_name, "SYS1");
    }

    #[test]
    fn min_minutes_is_a_report_level_existence_test() {
        let reports = sample();
        let out = ReportFilter::default().min_minutes(6).apply(&reports);
        assert_eq!(out.len(), 1);
        // the passing report keeps its 5-minute leaf
        assert_eq!(out[0].leaf_count(), 2);
    }

    #[test]
    fn min_minutes_of_zero_matches_no_filter() {
        let reports = sample();
        let unfiltered = ReportFilter::default();
        let zero = ReportFilter::from_options(&FilterOptions {
            min_minutes: Some("0".to_string()),
            ..Default::default()
        });
        for report in &reports {
            assert_eq!(zero.matches(report), unfiltered.matches(report));
        }
    }

    #[test]
    fn malformed_inputs_are_no_constraint() {
        let reports = sample();
        let filter = ReportFilter::from_options(&FilterOptions {
            min_minutes: Some("lots".to_string()),
            from: Some("yesterday".to_string()),
            to: Some("31-31-2025".to_string()),
            ..Default::default()
        });
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&reports).len(), reports.len());
    }

    #[test]
    fn pruning_drops_idle_leaves_but_keeps_containers() {
        let reports = sample();
        let out = ReportFilter::default()
            .min_minutes(6)
            .prune_idle(true)
            .apply(&reports);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].leaf_count(), 2);

        let out = ReportFilter::default().prune_idle(true).apply(&reports);
        assert_eq!(out.len(), 3);
        assert_eq!(leaf_count(&out), 3);
        let lab = &out[1].users[0].browsers[0];
        assert_eq!(lab.visited_sites.len(), 1);
        assert_eq!(lab.visited_sites[0].title.as_deref(), Some("w.com"));
    }

    #[test]
    fn date_range_is_inclusive_and_bounds_are_independent() {
        let reports: Vec<Report> = sample().into_iter().take(2).collect();

        let out = ReportFilter::default()
            .date_range(ymd(2025, 1, 10), ymd(2025, 1, 31))
            .apply(&reports);
        assert!(out.is_empty());

        let out = ReportFilter::default()
            .date_range(ymd(2025, 1, 1), ymd(2025, 1, 1))
            .apply(&reports);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, "01-01-2025");

        let out = ReportFilter::default()
            .date_range(None, ymd(2025, 2, 15))
            .apply(&reports);
        assert_eq!(out.len(), 2);

        let out = ReportFilter::default()
            .date_range(ymd(2025, 2, 1), None)
            .apply(&reports);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, "15-02-2025");
    }

    #[test]
    fn undated_reports_fail_only_when_a_bound_is_set() {
        let reports = parse_reports(r#"[{"date": "sometime", "systemName": "X"}]"#).unwrap();
        assert_eq!(ReportFilter::default().apply(&reports).len(), 1);
        let bounded = ReportFilter::default().date_range(ymd(2020, 1, 1), None);
        assert!(bounded.apply(&reports).is_empty());
    }

    #[test]
    fn predicates_combine_with_and() {
        let reports = sample();
        let out = ReportFilter::default()
            .system_name("sys")
            .user_name("bob")
            .apply(&reports);
        assert!(out.is_empty());
    }

    #[test]
    fn accepts_several_date_spellings() {
        let expected = ymd(2025, 1, 10);
        assert_eq!(parse_filter_date("2025-01-10"), expected);
        assert_eq!(parse_filter_date("10-01-2025"), expected);
        assert_eq!(parse_filter_date("10/01/2025"), expected);
        assert_eq!(parse_filter_date("Jan 10"), None);
    }

    #[test]
    fn short_years_are_rejected() {
        assert_eq!(parse_filter_date("01-01-20"), None);
        assert_eq!(parse_filter_date("01/01/20"), None);
        assert_eq!(parse_filter_date("20-01-01"), None);
        assert_eq!(parse_filter_date("02025-01-10"), None);

        let filter = ReportFilter::from_options(&FilterOptions {
            from: Some("01-01-20".to_string()),
            ..Default::default()
        });
        assert!(filter.is_empty());
    }
}
