use std::ops::Range;

/// Page count for `len` rows at `per_page` rows a page. An empty view has
/// zero pages.
pub fn total_pages(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    if len % per_page == 0 {
        len / per_page
    } else {
        len / per_page + 1
    }
}

/// Clamps a requested page into `[1, max(total, 1)]`.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Row range of a 1-based page, cut at `len`.
pub fn page_bounds(page: usize, per_page: usize, len: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(per_page).min(len);
    let end = page.saturating_mul(per_page).min(len);
    start..end
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Prev { target: usize, disabled: bool },
    Page { number: usize, active: bool },
    Ellipsis,
    Next { target: usize, disabled: bool },
}

/// Layout of the pagination bar: previous/next arrows around page numbers.
/// `boundary` pages are always shown at both ends, `siblings` pages on each
/// side of the active one, and gaps collapse into an ellipsis unless the gap
/// is a single page.
pub fn page_items(active: usize, total: usize, boundary: usize, siblings: usize) -> Vec<PageItem> {
    let active = clamp_page(active, total);
    let mut items = vec![PageItem::Prev {
        target: active.saturating_sub(1).max(1),
        disabled: active <= 1,
    }];

    if total > 0 {
        let mut numbers: Vec<usize> = Vec::new();
        let first_end = boundary.min(total);
        let last_start = total.saturating_sub(boundary) + 1;
        let inner_start = active.saturating_sub(siblings).max(1);
        let inner_end = (active + siblings).min(total);

        numbers.extend(1..=first_end);
        numbers.extend(inner_start..=inner_end);
        numbers.extend(last_start.max(1)..=total);
        numbers.sort_unstable();
        numbers.dedup();

        let mut prev: Option<usize> = None;
        for n in numbers {
            if let Some(p) = prev {
                match n - p {
                    1 => {}
                    2 => items.push(PageItem::Page {
                        number: p + 1,
                        active: p + 1 == active,
                    }),
                    _ => items.push(PageItem::Ellipsis),
                }
            }
            items.push(PageItem::Page {
                number: n,
                active: n == active,
            });
            prev = Some(n);
        }
    }

    items.push(PageItem::Next {
        target: (active + 1).min(total.max(1)),
        disabled: active >= total,
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(items: &[PageItem]) -> String {
        items
            .iter()
            .filter_map(|i| match i {
                PageItem::Page { number, active } if *active => Some(format!("[{number}]")),
                PageItem::Page { number, .. } => Some(number.to_string()),
                PageItem::Ellipsis => Some("..".to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        for k in 1..=7 {
            for n in 0..=30 {
                assert_eq!(total_pages(n, k), (n + k - 1) / k, "n={n} k={k}");
            }
        }
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(12, 5), 3);
    }

    #[test]
    fn clamp_keeps_page_one_for_empty_views() {
        assert_eq!(clamp_page(0, 0), 1);
        assert_eq!(clamp_page(9, 0), 1);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(0, 3), 1);
    }

    #[test]
    fn bounds_cut_last_page() {
        assert_eq!(page_bounds(3, 5, 12), 10..12);
        assert_eq!(page_bounds(1, 5, 0), 0..0);
        assert_eq!(page_bounds(usize::MAX, 5, 12), 12..12);
    }

    #[test]
    fn short_bars_show_every_page() {
        assert_eq!(numbers(&page_items(2, 3, 1, 1)), "1 [2] 3");
    }

    #[test]
    fn long_bars_collapse_gaps() {
        assert_eq!(numbers(&page_items(6, 12, 1, 1)), "1 .. 5 [6] 7 .. 12");
        assert_eq!(numbers(&page_items(1, 12, 1, 1)), "[1] 2 .. 12");
    }

    #[test]
    fn single_page_gap_is_filled_instead_of_ellipsis() {
        assert_eq!(numbers(&page_items(4, 12, 1, 1)), "1 2 3 [4] 5 .. 12");
    }

    #[test]
    fn arrows_disable_at_edges() {
        let items = page_items(1, 3, 1, 1);
        assert_eq!(items.first(), Some(&PageItem::Prev { target: 1, disabled: true }));
        assert_eq!(items.last(), Some(&PageItem::Next { target: 2, disabled: false }));
        let empty = page_items(1, 0, 1, 1);
        assert_eq!(empty.len(), 2);
        assert_eq!(empty.last(), Some(&PageItem::Next { target: 1, disabled: true }));
    }
}
