//! Page math for the review table.

/// Page buttons shown around the current page.
pub const WINDOW_SIZE: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageButton {
    Page(u32),
    Ellipsis,
}

/// Clamp `page` into `1..=num_pages` (with at least one page).
#[must_use]
pub fn clamp_page(page: u32, num_pages: u32) -> u32 {
    page.clamp(1, num_pages.max(1))
}

/// Pages needed for `total` rows at `per_page` rows each; never zero.
#[must_use]
pub fn num_pages(total: usize, per_page: usize) -> u32 {
    if per_page == 0 {
        return 1;
    }
    u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX).max(1)
}

/// Rows on 1-indexed `page`. Out-of-range pages are empty.
#[must_use]
pub fn paginate<T>(rows: &[T], page: u32, per_page: usize) -> &[T] {
    let Some(index) = usize::try_from(page).ok().and_then(|p| p.checked_sub(1)) else {
        return &[];
    };
    let start = index.saturating_mul(per_page).min(rows.len());
    let end = start.saturating_add(per_page).min(rows.len());
    &rows[start..end]
}

/// Consecutive page numbers centred on `current`, two on each side, shifted
/// at the edges so the window keeps [`WINDOW_SIZE`] entries when possible.
#[must_use]
pub fn page_window(current: u32, num_pages: u32) -> Vec<u32> {
    let num_pages = num_pages.max(1);
    let current = clamp_page(current, num_pages);
    if num_pages <= WINDOW_SIZE {
        return (1..=num_pages).collect();
    }
    let half = WINDOW_SIZE / 2;
    let mut start = current.saturating_sub(half).max(1);
    let mut end = start + WINDOW_SIZE - 1;
    if end > num_pages {
        end = num_pages;
        start = end + 1 - WINDOW_SIZE;
    }
    (start..=end).collect()
}

/// Full button row: the window plus first/last pages, with an ellipsis
/// wherever pages are skipped.
#[must_use]
pub fn page_buttons(current: u32, num_pages: u32) -> Vec<PageButton> {
    let num_pages = num_pages.max(1);
    let window = page_window(current, num_pages);
    let (Some(&first), Some(&last)) = (window.first(), window.last()) else {
        return Vec::new();
    };

    let mut buttons = Vec::with_capacity(window.len() + 4);
    if first > 1 {
        buttons.push(PageButton::Page(1));
        if first > 2 {
            buttons.push(PageButton::Ellipsis);
        }
    }
    buttons.extend(window.into_iter().map(PageButton::Page));
    if last < num_pages {
        if last + 1 < num_pages {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.push(PageButton::Page(num_pages));
    }
    buttons
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
