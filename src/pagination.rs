//! Page button layout for list views.

/// Pages always shown at the start of the list.
pub const LEFT_EDGE: u32 = 2;
/// Pages shown before the current one.
pub const LEFT_CURRENT: u32 = 2;
/// Pages shown after the current one.
pub const RIGHT_CURRENT: u32 = 4;
/// Pages always shown at the end of the list.
pub const RIGHT_EDGE: u32 = 2;

/// Returns the page buttons to render for `current_page` out of
/// `last_page`. `None` marks a gap between runs of pages.
pub fn page_window(last_page: u32, current_page: u32) -> Vec<Option<u32>> {
    get_pages(
        last_page,
        current_page.max(1),
        LEFT_EDGE,
        LEFT_CURRENT,
        RIGHT_CURRENT,
        RIGHT_EDGE,
    )
}

fn get_pages(
    last_page: u32,
    current_page: u32,
    left_edge: u32,
    left_current: u32,
    right_current: u32,
    right_edge: u32,
) -> Vec<Option<u32>> {
    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    // `last_page` comes from the server and may be as large as `u32::MAX`.
    let past_last = last_page.saturating_add(1);
    let left_end = (1 + left_edge).min(past_last);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current + 1)
        .min(past_last);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_has_no_buttons() {
        assert!(page_window(0, 1).is_empty());
    }

    #[test]
    fn short_collection_lists_every_page() {
        assert_eq!(page_window(3, 2), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn long_collection_has_gaps_around_the_current_page() {
        assert_eq!(
            page_window(20, 10),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20),
            ]
        );
    }

    #[test]
    fn window_never_exceeds_last_page() {
        let pages = page_window(5, 5);
        assert_eq!(pages.last(), Some(&Some(5)));
        assert!(pages.iter().flatten().all(|p| *p <= 5));
    }

    #[test]
    fn largest_page_count_does_not_overflow() {
        let max = u32::MAX;
        assert_eq!(
            page_window(max, max),
            vec![Some(1), Some(2), None, Some(max - 2), Some(max - 1), Some(max)]
        );
        assert_eq!(page_window(max, 1)[..3], [Some(1), Some(2), Some(3)]);
        assert_eq!(page_window(max, 1).last(), Some(&Some(max)));
    }
}
