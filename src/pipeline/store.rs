use crate::report::Report;

use super::filter::ReportFilter;
use super::sort::{sort_reports, SortDirection, SortMode, SortState};
use super::top::{top_sites, SiteTotal};

/// The fetched document plus the view derived from it.
///
/// The document is never modified; every filter or sort replaces the view
/// wholesale. Filters recompute from the document, sorts from the current
/// view.
#[derive(Debug, Clone)]
pub struct ReportStore {
    reports: Vec<Report>,
    view: Vec<Report>,
    sort: SortState,
    mode: SortMode,
}

impl Default for ReportStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ReportStore {
    pub fn new(reports: Vec<Report>) -> Self {
        Self {
            view: reports.clone(),
            reports,
            sort: SortState::default(),
            mode: SortMode::Regroup,
        }
    }

    pub fn with_sort_mode(mut self, mode: SortMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn view(&self) -> &[Report] {
        &self.view
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort.direction()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.mode
    }

    /// Swap in a freshly fetched document and reset the view to it.
    pub fn replace(&mut self, reports: Vec<Report>) {
        self.view = reports.clone();
        self.reports = reports;
    }

    pub fn apply_filter(&mut self, filter: &ReportFilter) -> &[Report] {
        self.view = filter.apply(&self.reports);
        &self.view
    }

    /// Flip the sort direction and re-sort the current view.
    pub fn toggle_sort(&mut self) -> SortDirection {
        let direction = self.sort.toggle();
        self.view = sort_reports(&self.view, direction, self.mode);
        direction
    }

    /// Sort the current view in an explicit direction.
    pub fn sort(&mut self, direction: SortDirection) -> &[Report] {
        self.sort.set(direction);
        self.view = sort_reports(&self.view, direction, self.mode);
        &self.view
    }

    /// Top sites over the whole document, independent of the current view.
    pub fn top_sites(&self, limit: usize) -> Vec<SiteTotal> {
        top_sites(&self.reports, limit)
    }
}
