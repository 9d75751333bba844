use crate::report::{leaves, LeafRef, Report};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A window of flattened leaf rows.
#[derive(Debug)]
pub struct Page<'a> {
    pub rows: Vec<LeafRef<'a>>,
    /// 1-based page number actually shown.
    pub number: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

impl Page<'_> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Slice page `number` (1-based; 0 is treated as 1) out of the view's leaves.
/// `total_pages` is never less than 1 so an empty view still reads
/// "page 1 of 1".
pub fn paginate(reports: &[Report], number: usize, page_size: usize) -> Page<'_> {
    let page_size = page_size.max(1);
    let number = number.max(1);
    let total_rows = crate::report::leaf_count(reports);
    let total_pages = total_rows.div_ceil(page_size).max(1);

    let rows = leaves(reports)
        .skip((number - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();

    Page {
        rows,
        number,
        total_pages,
        total_rows,
    }
}
