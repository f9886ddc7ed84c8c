//! The aggregating fetcher.
//!
//! An aggregation downloads every upstream page matching a filter and
//! concatenates the results in upstream order; local re-pagination then
//! slices the set for display. The first request discovers the upstream
//! page count from the response envelope; the remaining pages are
//! fetched by a small bounded pool and reassembled in ascending page
//! order. Any failure aborts the whole aggregation and discards what
//! was already accumulated.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crate::api::{ApiError, Character, CharacterSource, FilterSet};

use super::pages::{AggregationResult, PageSize, paginate};

/// Default number of concurrent upstream page fetches. A pool of 1
/// reproduces the strictly sequential request order.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Outcome of a cancellable aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// The full matching record set, in upstream order.
    Complete(Vec<Character>),
    /// Abandoned because a newer request superseded this one.
    Superseded,
}

/// Fetches and concatenates every upstream page matching a filter.
pub struct Aggregator {
    source: Arc<dyn CharacterSource>,
    concurrency: usize,
}

impl Aggregator {
    /// Creates an aggregator over `source` with the default pool size.
    pub fn new(source: Arc<dyn CharacterSource>) -> Self {
        Self::with_concurrency(source, DEFAULT_CONCURRENCY)
    }

    /// Creates an aggregator with an explicit pool size (minimum 1).
    pub fn with_concurrency(source: Arc<dyn CharacterSource>, concurrency: usize) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetches one local page: aggregate everything, then slice.
    ///
    /// Stateless in its three inputs; the session layer adds caching on
    /// top so that page and page-size changes do not refetch.
    pub fn fetch(
        &self,
        filters: &FilterSet,
        local_page: usize,
        page_size: PageSize,
    ) -> Result<AggregationResult, ApiError> {
        match self.fetch_all(filters, &|| false)? {
            Aggregation::Complete(records) => Ok(paginate(&records, local_page, page_size)),
            // Unreachable: the staleness check above never reports stale.
            Aggregation::Superseded => Ok(AggregationResult::default()),
        }
    }

    /// Fetches the full matching record set.
    ///
    /// `is_stale` is consulted between upstream requests; once it
    /// reports true the aggregation stops issuing requests and returns
    /// [`Aggregation::Superseded`].
    ///
    /// A not-found answer to the first request means "no matches for
    /// this filter" and yields an empty set. The upstream uses 404 for
    /// an empty result, so only the first page gets this reading; a 404
    /// on any later page is a failure like any other.
    pub fn fetch_all(
        &self,
        filters: &FilterSet,
        is_stale: &(dyn Fn() -> bool + Sync),
    ) -> Result<Aggregation, ApiError> {
        let started = Instant::now();
        if is_stale() {
            return Ok(Aggregation::Superseded);
        }

        let first = match self.source.fetch_page(filters, 1) {
            Ok(page) => page,
            Err(ApiError::NotFound) => {
                tracing::debug!(?filters, "no matching records");
                return Ok(Aggregation::Complete(Vec::new()));
            }
            Err(e) => return Err(e),
        };
        if first.results.is_empty() {
            return Ok(Aggregation::Complete(Vec::new()));
        }

        let upstream_pages = first.info.pages;
        let mut all = first.results;

        if upstream_pages > 1 {
            let rest = self.fetch_remaining(filters, upstream_pages, is_stale)?;
            match rest {
                Some(mut tail) => all.append(&mut tail),
                None => return Ok(Aggregation::Superseded),
            }
        }

        tracing::info!(
            upstream_pages,
            total = all.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aggregation complete"
        );
        Ok(Aggregation::Complete(all))
    }

    /// Fetches pages `2..=upstream_pages` on a bounded pool and returns
    /// them flattened in ascending page order, or `None` when the
    /// aggregation went stale mid-flight.
    fn fetch_remaining(
        &self,
        filters: &FilterSet,
        upstream_pages: u32,
        is_stale: &(dyn Fn() -> bool + Sync),
    ) -> Result<Option<Vec<Character>>, ApiError> {
        let pages: Vec<u32> = (2..=upstream_pages).collect();
        let next_index = AtomicUsize::new(0);
        let superseded = AtomicBool::new(false);
        let failure: Mutex<Option<ApiError>> = Mutex::new(None);
        let fetched: Mutex<Vec<(u32, Vec<Character>)>> = Mutex::new(Vec::new());

        let workers = self.concurrency.min(pages.len());
        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    loop {
                        if superseded.load(Ordering::SeqCst)
                            || failure.lock().expect("failure slot poisoned").is_some()
                        {
                            return;
                        }
                        if is_stale() {
                            superseded.store(true, Ordering::SeqCst);
                            return;
                        }
                        let index = next_index.fetch_add(1, Ordering::SeqCst);
                        let Some(&page) = pages.get(index) else {
                            return;
                        };
                        match self.source.fetch_page(filters, page) {
                            Ok(envelope) => {
                                fetched
                                    .lock()
                                    .expect("fetched pages poisoned")
                                    .push((page, envelope.results));
                            }
                            Err(e) => {
                                let mut slot = failure.lock().expect("failure slot poisoned");
                                if slot.is_none() {
                                    *slot = Some(e);
                                }
                                return;
                            }
                        }
                    }
                });
            }
        });

        // Partial accumulation is discarded on failure.
        if let Some(e) = failure.into_inner().expect("failure slot poisoned") {
            tracing::warn!(error = %e, "aggregation aborted");
            return Err(e);
        }
        if superseded.into_inner() {
            tracing::debug!("aggregation superseded mid-flight");
            return Ok(None);
        }

        let mut fetched = fetched.into_inner().expect("fetched pages poisoned");
        fetched.sort_by_key(|(page, _)| *page);
        Ok(Some(
            fetched.into_iter().flat_map(|(_, results)| results).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::api::mock::{MockFailure, MockSource};
    use crate::api::{NamedRef, StatusFilter};

    fn universe(n: usize) -> Vec<Character> {
        (1..=n as u64)
            .map(|id| Character {
                id,
                name: format!("Citizen {:03}", id),
                status: "Alive".to_string(),
                species: "Human".to_string(),
                gender: "Male".to_string(),
                origin: NamedRef {
                    name: "Earth".to_string(),
                },
                ..Character::default()
            })
            .collect()
    }

    fn aggregator(source: MockSource, concurrency: usize) -> Aggregator {
        Aggregator::with_concurrency(Arc::new(source), concurrency)
    }

    #[test]
    fn test_aggregates_all_upstream_pages_in_order() {
        // 95 records at upstream size 20 -> 5 upstream pages.
        let agg = aggregator(MockSource::new(universe(95)), 3);
        let result = agg
            .fetch_all(&FilterSet::default(), &|| false)
            .unwrap();
        let Aggregation::Complete(records) = result else {
            panic!("expected complete aggregation");
        };
        assert_eq!(records.len(), 95);
        let ids: Vec<u64> = records.iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=95).collect::<Vec<u64>>());
    }

    #[test]
    fn test_sequential_pool_matches_request_order() {
        let agg = aggregator(MockSource::new(universe(50)), 1);
        let Aggregation::Complete(records) =
            agg.fetch_all(&FilterSet::default(), &|| false).unwrap()
        else {
            panic!("expected complete aggregation");
        };
        assert_eq!(records.len(), 50);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[49].id, 50);
    }

    #[test]
    fn test_not_found_on_first_page_is_an_empty_result() {
        let agg = aggregator(MockSource::new(universe(30)), 2);
        let filters = FilterSet {
            name: "nobody".to_string(),
            ..FilterSet::default()
        };
        let result = agg.fetch_all(&filters, &|| false).unwrap();
        assert_eq!(result, Aggregation::Complete(Vec::new()));
    }

    #[test]
    fn test_failure_mid_aggregation_discards_partials() {
        // Page 3 of 5 fails; the whole aggregation fails.
        let source = MockSource::new(universe(95)).with_failure(3, MockFailure::Upstream(500));
        let agg = aggregator(source, 1);
        let err = agg.fetch_all(&FilterSet::default(), &|| false).unwrap_err();
        assert!(matches!(err, ApiError::Upstream(500)));
    }

    #[test]
    fn test_not_found_past_first_page_is_a_failure() {
        let source = MockSource::new(universe(95)).with_failure(4, MockFailure::NotFound);
        let agg = aggregator(source, 2);
        let err = agg.fetch_all(&FilterSet::default(), &|| false).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn test_malformed_envelope_is_a_failure() {
        let source = MockSource::new(universe(95)).with_failure(2, MockFailure::Malformed);
        let agg = aggregator(source, 2);
        assert!(matches!(
            agg.fetch_all(&FilterSet::default(), &|| false),
            Err(ApiError::Malformed(_))
        ));
    }

    #[test]
    fn test_staleness_abandons_the_aggregation() {
        let agg = aggregator(MockSource::new(universe(95)), 1);
        // Stale after the first couple of checks.
        let checks = AtomicUsize::new(0);
        let is_stale = move || checks.fetch_add(1, Ordering::SeqCst) >= 2;
        let result = agg.fetch_all(&FilterSet::default(), &is_stale).unwrap();
        assert_eq!(result, Aggregation::Superseded);
    }

    #[test]
    fn test_stale_before_start_issues_no_requests() {
        let source = Arc::new(MockSource::new(universe(10)));
        let agg = Aggregator::new(source.clone());
        let result = agg.fetch_all(&FilterSet::default(), &|| true).unwrap();
        assert_eq!(result, Aggregation::Superseded);
        assert_eq!(source.calls(), 0);
    }

    #[test]
    fn test_fetch_composes_aggregation_and_slicing() {
        let agg = aggregator(MockSource::new(universe(95)), 4);
        let result = agg
            .fetch(&FilterSet::default(), 2, PageSize::Size50)
            .unwrap();
        assert_eq!(result.total_count, 95);
        assert_eq!(result.total_local_pages, 2);
        assert_eq!(result.records.len(), 45);
        assert_eq!(result.records[0].id, 51);
    }

    #[test]
    fn test_filtered_fetch_only_aggregates_matches() {
        let mut records = universe(40);
        records[7].status = "Dead".to_string();
        records[23].status = "Dead".to_string();
        let agg = aggregator(MockSource::new(records), 2);
        let filters = FilterSet {
            status: StatusFilter::Dead,
            ..FilterSet::default()
        };
        let result = agg.fetch(&filters, 1, PageSize::Size20).unwrap();
        assert_eq!(result.total_count, 2);
        assert_eq!(result.total_local_pages, 1);
        assert_eq!(result.records.len(), 2);
    }
}
