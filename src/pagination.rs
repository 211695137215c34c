pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const NARROW_PAGE_SIZE: usize = 5;
pub const PAGE_SIZE_OPTIONS: &[usize] = &[5, 10, 20, 50];

/// Slice `[(page-1)*size, page*size)` of `items`, clamped to its length.
/// Page 0 is read as page 1; a zero size yields nothing.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Narrow terminals get the small page size, like a phone-width viewport;
/// wider ones use `wide_size`.
pub fn page_size_for_width(width: u16, narrow_width: u16, wide_size: usize) -> usize {
    if width <= narrow_width {
        NARROW_PAGE_SIZE
    } else {
        wide_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_partial_last_page() {
        let items: Vec<usize> = (0..25).collect();
        assert_eq!(paginate(&items, 1, 10), &items[0..10]);
        assert_eq!(paginate(&items, 2, 10), &items[10..20]);
        assert_eq!(paginate(&items, 3, 10), &items[20..25]);
        assert!(paginate(&items, 4, 10).is_empty());
    }

    #[test]
    fn test_paginate_edge_cases() {
        let items = vec!['a', 'b', 'c'];
        assert_eq!(paginate(&items, 0, 2), &['a', 'b']);
        assert!(paginate(&items, 1, 0).is_empty());
        assert!(paginate::<char>(&[], 1, 10).is_empty());
        assert!(paginate(&items, usize::MAX, usize::MAX).is_empty());
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(20, 10), 2);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_page_size_for_width() {
        assert_eq!(page_size_for_width(60, 80, DEFAULT_PAGE_SIZE), NARROW_PAGE_SIZE);
        assert_eq!(page_size_for_width(80, 80, DEFAULT_PAGE_SIZE), NARROW_PAGE_SIZE);
        assert_eq!(page_size_for_width(120, 80, DEFAULT_PAGE_SIZE), DEFAULT_PAGE_SIZE);
        assert_eq!(page_size_for_width(120, 80, 20), 20);
        assert_eq!(page_size_for_width(120, 80, 0), 1);
        assert!(PAGE_SIZE_OPTIONS.contains(&DEFAULT_PAGE_SIZE));
    }
}
