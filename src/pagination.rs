//! This modules defines the common functionality for paging data.

use maud::{Markup, html};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of rows to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_pages: 5,
        }
    }
}

/// One page of a list of `row_count` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The 1-based page number, clamped to the pages that exist.
    pub number: u64,
    /// The maximum number of rows on a page, at least one.
    pub size: u64,
    /// The total number of rows over all pages.
    pub row_count: u64,
}

impl Page {
    /// Select page `number` of `row_count` rows split into pages of `size`.
    ///
    /// Out of range page numbers are clamped to the first or last page and a
    /// page size of zero is treated as one.
    pub fn new(number: u64, size: u64, row_count: u64) -> Self {
        let size = size.max(1);
        let page_count = row_count.div_ceil(size).max(1);

        Self {
            number: number.clamp(1, page_count),
            size,
            row_count,
        }
    }

    /// The number of pages, at least one even when there are no rows.
    pub fn page_count(&self) -> u64 {
        self.row_count.div_ceil(self.size).max(1)
    }

    /// The index of the first row on this page.
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }

    /// The rows of `rows` that are on this page.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset())
            .unwrap_or(usize::MAX)
            .min(rows.len());
        let end = usize::try_from(self.size)
            .map(|size| start.saturating_add(size))
            .unwrap_or(usize::MAX)
            .min(rows.len());

        &rows[start..end]
    }

    /// A label such as "rows 11-20 / 42" describing the rows on this page.
    pub fn rows_label(&self) -> String {
        if self.row_count == 0 {
            return "rows 0-0 / 0".to_owned();
        }

        let first = self.offset() + 1;
        let last = (self.offset() + self.size).min(self.row_count);

        format!("rows {first}-{last} / {}", self.row_count)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };
    let half = max_pages / 2;

    let visible = if page_count <= max_pages {
        1..=page_count
    } else if curr_page <= half {
        1..=max_pages
    } else if curr_page > page_count - half {
        (page_count - max_pages + 1)..=page_count
    } else {
        (curr_page - half)..=(curr_page + half)
    };

    let mut indicators = Vec::new();

    if curr_page > 1 {
        indicators.push(PaginationIndicator::BackButton(curr_page - 1));
    }

    if page_count > max_pages && curr_page > half + 1 {
        indicators.push(PaginationIndicator::Page(1));
        indicators.push(PaginationIndicator::Ellipsis);
    }

    indicators.extend(visible.map(map_page));

    if page_count > max_pages && curr_page < page_count - half {
        indicators.push(PaginationIndicator::Ellipsis);
        indicators.push(PaginationIndicator::Page(page_count));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

/// Render the pagination indicators as links, where `page_url` gives the URL
/// for a page number.
pub fn pagination_view(
    page: &Page,
    max_pages: u64,
    page_url: impl Fn(u64) -> String,
) -> Markup {
    let indicators = create_pagination_indicators(page.number, page.page_count(), max_pages);

    html! {
        nav class="pagination flex flex-col items-center gap-2 my-4" aria-label="Pagination"
        {
            span class="text-sm text-gray-600 dark:text-gray-400" data-rows-label="true"
            {
                (page.rows_label())
            }

            ul class="flex items-center -space-x-px h-8 text-sm"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::CurrPage(number) => {
                                span
                                    aria-current="page"
                                    class="block px-3 py-2 rounded-sm font-bold text-black dark:text-white"
                                { (number) }
                            }
                            PaginationIndicator::Page(number) => {
                                a
                                    href=(page_url(number))
                                    class="block px-3 py-2 rounded-sm text-blue-600 hover:underline"
                                { (number) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="px-3 py-2" { "..." }
                            }
                            PaginationIndicator::BackButton(number) => {
                                a
                                    href=(page_url(number))
                                    role="button"
                                    class="block px-3 py-2 rounded-sm text-blue-600 hover:underline"
                                { "Back" }
                            }
                            PaginationIndicator::NextButton(number) => {
                                a
                                    href=(page_url(number))
                                    role="button"
                                    class="block px-3 py-2 rounded-sm text-blue-600 hover:underline"
                                { "Next" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::pagination::{Page, PaginationIndicator, create_pagination_indicators};

    #[test]
    fn page_is_clamped_to_existing_pages() {
        assert_eq!(Page::new(0, 10, 42).number, 1);
        assert_eq!(Page::new(9, 10, 42).number, 5);
        assert_eq!(Page::new(3, 10, 0).number, 1);
        assert_eq!(Page::new(1, 0, 3).size, 1);
    }

    #[test]
    fn rows_label_describes_page() {
        assert_eq!(Page::new(1, 10, 42).rows_label(), "rows 1-10 / 42");
        assert_eq!(Page::new(5, 10, 42).rows_label(), "rows 41-42 / 42");
        assert_eq!(Page::new(1, 10, 0).rows_label(), "rows 0-0 / 0");
    }

    #[test]
    fn slice_returns_rows_on_page() {
        let rows: Vec<u32> = (1..=25).collect();

        assert_eq!(Page::new(3, 10, 25).slice(&rows), &[21, 22, 23, 24, 25]);
        assert_eq!(Page::new(1, 10, 25).slice(&rows).len(), 10);
    }

    #[test]
    fn shows_all_pages() {
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(1, 5, 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn single_page_has_no_buttons() {
        let got = create_pagination_indicators(1, 1, 5);

        assert_eq!([PaginationIndicator::CurrPage(1)], got.as_slice());
    }

    #[test]
    fn shows_both_buttons_and_trailing_ellipsis() {
        let want = [
            PaginationIndicator::BackButton(2),
            PaginationIndicator::Page(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::CurrPage(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(4),
        ];

        let got = create_pagination_indicators(3, 10, 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_on_right() {
        let want = [
            PaginationIndicator::BackButton(9),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Page(8),
            PaginationIndicator::Page(9),
            PaginationIndicator::CurrPage(10),
        ];

        let got = create_pagination_indicators(10, 10, 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_in_center() {
        let want = [
            PaginationIndicator::BackButton(4),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::CurrPage(5),
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(6),
        ];

        let got = create_pagination_indicators(5, 10, 5);

        assert_eq!(want, got.as_slice());
    }
}
