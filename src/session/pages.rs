//! Local re-pagination of the aggregated record set.
//!
//! "Local" pages are display pages sized by the user, unrelated to the
//! fixed page size of the upstream API. The aggregated set is sliced
//! fresh on every view change; nothing here touches the network.

use crate::api::Character;

/// Records-per-page choices offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    Size20,
    Size50,
    Size100,
    Size200,
    #[default]
    Size250,
}

impl PageSize {
    /// All sizes, in ascending order.
    pub const ALL: [PageSize; 5] = [
        PageSize::Size20,
        PageSize::Size50,
        PageSize::Size100,
        PageSize::Size200,
        PageSize::Size250,
    ];

    /// The numeric page size.
    pub fn get(self) -> usize {
        match self {
            PageSize::Size20 => 20,
            PageSize::Size50 => 50,
            PageSize::Size100 => 100,
            PageSize::Size200 => 200,
            PageSize::Size250 => 250,
        }
    }

    /// Cycles to the next larger size, wrapping around.
    pub fn next(self) -> Self {
        match self {
            PageSize::Size20 => PageSize::Size50,
            PageSize::Size50 => PageSize::Size100,
            PageSize::Size100 => PageSize::Size200,
            PageSize::Size200 => PageSize::Size250,
            PageSize::Size250 => PageSize::Size20,
        }
    }

    /// Cycles to the next smaller size, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            PageSize::Size20 => PageSize::Size250,
            PageSize::Size50 => PageSize::Size20,
            PageSize::Size100 => PageSize::Size50,
            PageSize::Size200 => PageSize::Size100,
            PageSize::Size250 => PageSize::Size200,
        }
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl std::str::FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "20" => Ok(PageSize::Size20),
            "50" => Ok(PageSize::Size50),
            "100" => Ok(PageSize::Size100),
            "200" => Ok(PageSize::Size200),
            "250" => Ok(PageSize::Size250),
            other => Err(format!(
                "invalid page size '{}' (expected 20, 50, 100, 200 or 250)",
                other
            )),
        }
    }
}

/// One local page of the aggregated set plus its totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    /// Records of the requested local page, in upstream order.
    pub records: Vec<Character>,
    /// Size of the full aggregated set.
    pub total_count: usize,
    /// Number of local pages at the current page size.
    pub total_local_pages: usize,
}

/// `ceil(total_count / page_size)`; zero for an empty set.
pub fn total_local_pages(total_count: usize, page_size: PageSize) -> usize {
    total_count.div_ceil(page_size.get())
}

/// Slices one local page out of the aggregated set.
///
/// `local_page` is 1-based and not validated against the page count: a
/// page past the end yields an empty slice, not an error.
pub fn slice_local_page(records: &[Character], local_page: usize, page_size: PageSize) -> &[Character] {
    let size = page_size.get();
    let start = local_page.saturating_sub(1).saturating_mul(size);
    if local_page == 0 || start >= records.len() {
        return &[];
    }
    let end = (start + size).min(records.len());
    &records[start..end]
}

/// Builds the [`AggregationResult`] for one local page.
pub fn paginate(records: &[Character], local_page: usize, page_size: PageSize) -> AggregationResult {
    AggregationResult {
        records: slice_local_page(records, local_page, page_size).to_vec(),
        total_count: records.len(),
        total_local_pages: total_local_pages(records.len(), page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<Character> {
        (0..n)
            .map(|i| Character {
                id: i as u64 + 1,
                name: format!("c{}", i + 1),
                ..Character::default()
            })
            .collect()
    }

    #[test]
    fn test_total_local_pages_is_ceiling() {
        assert_eq!(total_local_pages(0, PageSize::Size20), 0);
        assert_eq!(total_local_pages(1, PageSize::Size20), 1);
        assert_eq!(total_local_pages(20, PageSize::Size20), 1);
        assert_eq!(total_local_pages(21, PageSize::Size20), 2);
        assert_eq!(total_local_pages(826, PageSize::Size250), 4);
    }

    #[test]
    fn test_full_pages_then_short_last_page() {
        let all = records(45);
        for page in 1..=2 {
            let result = paginate(&all, page, PageSize::Size20);
            assert_eq!(result.records.len(), 20);
            assert_eq!(result.total_count, 45);
            assert_eq!(result.total_local_pages, 3);
        }
        let last = paginate(&all, 3, PageSize::Size20);
        assert_eq!(last.records.len(), 5);
        assert_eq!(last.records[0].id, 41);
    }

    #[test]
    fn test_page_past_the_end_is_empty_not_an_error() {
        let all = records(45);
        let past = paginate(&all, 4, PageSize::Size20);
        assert!(past.records.is_empty());
        assert_eq!(past.total_count, 45);
        assert_eq!(past.total_local_pages, 3);
    }

    #[test]
    fn test_empty_set_yields_zero_pages() {
        let result = paginate(&[], 1, PageSize::Size250);
        assert!(result.records.is_empty());
        assert_eq!(result.total_count, 0);
        assert_eq!(result.total_local_pages, 0);
    }

    #[test]
    fn test_slice_preserves_upstream_order() {
        let all = records(30);
        let page2 = slice_local_page(&all, 2, PageSize::Size20);
        let ids: Vec<u64> = page2.iter().map(|c| c.id).collect();
        assert_eq!(ids, (21..=30).collect::<Vec<u64>>());
    }

    #[test]
    fn test_page_size_cycling_and_parsing() {
        assert_eq!(PageSize::Size250.next(), PageSize::Size20);
        assert_eq!(PageSize::Size20.prev(), PageSize::Size250);
        assert_eq!("100".parse::<PageSize>().unwrap(), PageSize::Size100);
        assert!("33".parse::<PageSize>().is_err());

        // Cycling visits every size exactly once.
        let mut seen = Vec::new();
        let mut size = PageSize::default();
        for _ in 0..PageSize::ALL.len() {
            seen.push(size);
            size = size.next();
        }
        assert_eq!(size, PageSize::default());
        for expected in PageSize::ALL {
            assert!(seen.contains(&expected));
        }
    }
}
