//! Session state: the view over the aggregated character set.
//!
//! The session owns the fetch worker, the per-filter aggregation cache
//! and the current view. UI events come in through the `on_*` methods;
//! settled aggregations are applied in `poll`, newest generation wins.

use std::sync::Arc;

use crate::api::{Character, CharacterSource, FilterSet};

use super::aggregate::DEFAULT_CONCURRENCY;
use super::pages::{AggregationResult, PageSize, paginate};
use super::sort::{SortDirection, SortError, sort_records};
use super::worker::FetchHandle;

/// Message shown for any aggregation failure. The typed detail goes to
/// the log; the user gets one retryable message regardless of cause.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch characters. Please try again later.";

/// Lifecycle of the current aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// An aggregation is in flight.
    Loading,
    /// The view reflects a settled aggregation.
    Loaded,
    /// The last aggregation failed; the previous view was discarded.
    Failed,
}

/// Aggregated set cached for the current filter.
struct Roster {
    key: String,
    records: Vec<Character>,
}

/// The character-browsing session.
pub struct Session {
    fetcher: FetchHandle,
    filters: FilterSet,
    page_size: PageSize,
    local_page: usize,
    phase: Phase,
    roster: Option<Roster>,
    view: AggregationResult,
    error: Option<&'static str>,
    selected: Option<u64>,
}

impl Session {
    /// Creates an idle session over `source`. Call [`Session::start`]
    /// to issue the initial aggregation.
    pub fn new(source: Arc<dyn CharacterSource>, filters: FilterSet, page_size: PageSize) -> Self {
        Self::with_concurrency(source, filters, page_size, DEFAULT_CONCURRENCY)
    }

    /// Creates a session with an explicit fetch-pool size.
    pub fn with_concurrency(
        source: Arc<dyn CharacterSource>,
        filters: FilterSet,
        page_size: PageSize,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher: FetchHandle::spawn(source, concurrency),
            filters,
            page_size,
            local_page: 1,
            phase: Phase::Idle,
            roster: None,
            view: AggregationResult::default(),
            error: None,
            selected: None,
        }
    }

    /// Issues the initial aggregation for the starting filters.
    pub fn start(&mut self) {
        self.begin_fetch();
    }

    // -- UI-facing event surface --------------------------------------

    /// Replaces the filter set: back to page 1, and a new aggregation
    /// unless the cached set already answers the normalized filter.
    pub fn on_filter_change(&mut self, filters: FilterSet) {
        let cached = self
            .roster
            .as_ref()
            .is_some_and(|r| r.key == filters.cache_key());
        self.filters = filters;
        self.local_page = 1;
        if cached {
            self.reslice();
            return;
        }
        self.roster = None;
        self.begin_fetch();
    }

    /// Changes the display page size: back to page 1 and re-slice. No
    /// network traffic while the filter is unchanged.
    pub fn on_page_size_change(&mut self, page_size: PageSize) {
        if page_size == self.page_size {
            return;
        }
        self.page_size = page_size;
        self.local_page = 1;
        if self.roster.is_some() {
            self.reslice();
        } else if self.phase != Phase::Loading {
            // Nothing aggregated yet (failed or never started): fetch.
            self.begin_fetch();
        }
    }

    /// Moves to another local page of the cached set. A page past the
    /// end yields an empty view rather than an error.
    pub fn on_page_change(&mut self, local_page: usize) {
        self.local_page = local_page.max(1);
        if self.roster.is_some() {
            self.reslice();
        }
    }

    /// Reorders the records of the current page. The ordering lives
    /// only in the view; the next re-slice restores upstream order.
    pub fn on_sort(&mut self, field: &str, direction: SortDirection) -> Result<(), SortError> {
        sort_records(&mut self.view.records, field, direction)
    }

    /// Toggles the detail selection: selecting the selected record, or
    /// passing `None`, clears it.
    pub fn on_character_select(&mut self, id: Option<u64>) {
        self.selected = match id {
            Some(id) if self.selected == Some(id) => None,
            other => other,
        };
    }

    /// Drops the cache and refetches the current filter.
    pub fn refresh(&mut self) {
        self.roster = None;
        self.begin_fetch();
    }

    /// Applies settled aggregations. Outcomes that are no longer the
    /// latest generation are discarded unseen.
    pub fn poll(&mut self) {
        while let Some(outcome) = self.fetcher.try_recv() {
            if outcome.generation != self.fetcher.latest_generation() {
                tracing::debug!(
                    generation = outcome.generation,
                    "dropping stale aggregation outcome"
                );
                continue;
            }
            match outcome.result {
                Ok(records) => {
                    self.roster = Some(Roster {
                        key: outcome.filters.cache_key(),
                        records,
                    });
                    self.phase = Phase::Loaded;
                    self.error = None;
                    self.reslice();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "aggregation failed");
                    self.roster = None;
                    self.view = AggregationResult::default();
                    self.phase = Phase::Failed;
                    self.error = Some(FETCH_FAILED_MESSAGE);
                }
            }
        }
    }

    // -- Accessors ----------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view(&self) -> &AggregationResult {
        &self.view
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn local_page(&self) -> usize {
        self.local_page
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    /// Id of the record selected for the detail view, if any.
    pub fn selected_id(&self) -> Option<u64> {
        self.selected
    }

    /// The selected record, when it is on the current page.
    pub fn selected_record(&self) -> Option<&Character> {
        let id = self.selected?;
        self.view.records.iter().find(|c| c.id == id)
    }

    // -- Internals ----------------------------------------------------

    fn begin_fetch(&mut self) {
        self.phase = Phase::Loading;
        self.error = None;
        self.fetcher.submit(self.filters.clone());
    }

    fn reslice(&mut self) {
        if let Some(roster) = &self.roster {
            debug_assert_eq!(roster.key, self.filters.cache_key());
            self.view = paginate(&roster.records, self.local_page, self.page_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::api::mock::MockSource;
    use crate::api::StatusFilter;

    fn settled(session: &mut Session) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while session.phase() == Phase::Loading || session.phase() == Phase::Idle {
            session.poll();
            assert!(Instant::now() < deadline, "session never settled");
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn sample_session() -> (Arc<MockSource>, Session) {
        let source = Arc::new(MockSource::sample());
        let session = Session::with_concurrency(
            source.clone(),
            FilterSet::default(),
            PageSize::Size20,
            2,
        );
        (source, session)
    }

    #[test]
    fn test_initial_aggregation_loads_first_page() {
        let (_source, mut session) = sample_session();
        assert_eq!(session.phase(), Phase::Idle);
        session.start();
        assert_eq!(session.phase(), Phase::Loading);
        settled(&mut session);
        assert_eq!(session.phase(), Phase::Loaded);
        assert_eq!(session.view().total_count, 60);
        assert_eq!(session.view().total_local_pages, 3);
        assert_eq!(session.view().records.len(), 20);
    }

    #[test]
    fn test_page_and_size_changes_reslice_without_refetch() {
        let (source, mut session) = sample_session();
        session.start();
        settled(&mut session);
        let calls_after_load = source.calls();

        session.on_page_change(3);
        assert_eq!(session.view().records.len(), 20);
        session.on_page_size_change(PageSize::Size50);
        assert_eq!(session.local_page(), 1);
        assert_eq!(session.view().total_local_pages, 2);
        session.on_page_change(2);
        assert_eq!(session.view().records.len(), 10);

        assert_eq!(source.calls(), calls_after_load);
    }

    #[test]
    fn test_page_size_change_resets_to_first_page() {
        let (_source, mut session) = sample_session();
        session.start();
        settled(&mut session);
        session.on_page_change(3);
        assert_eq!(session.local_page(), 3);

        session.on_page_size_change(PageSize::Size250);
        assert_eq!(session.local_page(), 1);
        assert_eq!(session.view().total_local_pages, 1);
        assert_eq!(session.view().records.len(), 60);
    }

    #[test]
    fn test_shrinking_page_size_recomputes_page_count() {
        let source = Arc::new(MockSource::sample());
        let mut session =
            Session::with_concurrency(source, FilterSet::default(), PageSize::Size250, 2);
        session.start();
        settled(&mut session);
        assert_eq!(session.view().total_local_pages, 1);
        session.on_page_change(3);

        session.on_page_size_change(PageSize::Size20);
        assert_eq!(session.local_page(), 1);
        assert_eq!(session.view().total_local_pages, 3);
        assert_eq!(session.view().records.len(), 20);
    }

    #[test]
    fn test_page_past_the_end_yields_empty_view() {
        let (_source, mut session) = sample_session();
        session.start();
        settled(&mut session);
        session.on_page_change(99);
        assert!(session.view().records.is_empty());
        assert_eq!(session.view().total_count, 60);
        assert_eq!(session.phase(), Phase::Loaded);
    }

    #[test]
    fn test_filter_change_refetches_and_resets_page() {
        let (source, mut session) = sample_session();
        session.start();
        settled(&mut session);
        session.on_page_change(2);
        let calls_after_load = source.calls();

        session.on_filter_change(FilterSet {
            status: StatusFilter::Dead,
            ..FilterSet::default()
        });
        assert_eq!(session.phase(), Phase::Loading);
        assert_eq!(session.local_page(), 1);
        settled(&mut session);
        assert!(source.calls() > calls_after_load);
        assert!(session.view().records.iter().all(|c| c.status == "Dead"));
    }

    #[test]
    fn test_case_variant_filter_reuses_cached_set() {
        let (source, mut session) = sample_session();
        session.start();
        settled(&mut session);

        session.on_filter_change(FilterSet {
            name: "Smith".to_string(),
            ..FilterSet::default()
        });
        settled(&mut session);
        let calls_after_load = source.calls();

        // Same normalized filter, different spelling: cache hit.
        session.on_filter_change(FilterSet {
            name: "smith".to_string(),
            ..FilterSet::default()
        });
        assert_eq!(session.phase(), Phase::Loaded);
        assert_eq!(source.calls(), calls_after_load);
        assert_eq!(session.view().total_count, 4);
    }

    #[test]
    fn test_empty_result_is_loaded_not_failed() {
        let (_source, mut session) = sample_session();
        session.start();
        settled(&mut session);
        session.on_filter_change(FilterSet {
            name: "nobody anywhere".to_string(),
            ..FilterSet::default()
        });
        settled(&mut session);
        assert_eq!(session.phase(), Phase::Loaded);
        assert_eq!(session.view().total_count, 0);
        assert_eq!(session.view().total_local_pages, 0);
        assert!(session.error().is_none());
    }

    #[test]
    fn test_failure_surfaces_one_generic_message() {
        use crate::api::mock::MockFailure;
        let source = Arc::new(
            MockSource::sample().with_failure(2, MockFailure::Upstream(503)),
        );
        let mut session = Session::with_concurrency(
            source,
            FilterSet::default(),
            PageSize::Size20,
            1,
        );
        session.start();
        settled(&mut session);
        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(session.error(), Some(FETCH_FAILED_MESSAGE));
        assert!(session.view().records.is_empty());
    }

    #[test]
    fn test_latest_filter_wins_over_stale_outcome() {
        let (_source, mut session) = sample_session();
        session.start();
        // Supersede immediately, before polling anything.
        session.on_filter_change(FilterSet {
            name: "summer".to_string(),
            ..FilterSet::default()
        });
        settled(&mut session);
        assert_eq!(session.phase(), Phase::Loaded);
        assert_eq!(session.view().total_count, 1);
        assert_eq!(session.view().records[0].name, "Summer Smith");
    }

    #[test]
    fn test_sort_applies_to_current_page_only() {
        let (_source, mut session) = sample_session();
        session.start();
        settled(&mut session);

        session
            .on_sort("name", SortDirection::Descending)
            .unwrap();
        let first = session.view().records.first().map(|c| c.name.clone());
        let sorted_desc = {
            let mut names: Vec<String> = session
                .view()
                .records
                .iter()
                .map(|c| c.name.clone())
                .collect();
            let original = names.clone();
            names.sort();
            names.reverse();
            original == names
        };
        assert!(sorted_desc);
        assert!(first.is_some());

        // A page change restores upstream order.
        session.on_page_change(2);
        session.on_page_change(1);
        assert_eq!(session.view().records[0].id, 1);

        assert!(session.on_sort("id", SortDirection::Ascending).is_err());
    }

    #[test]
    fn test_selection_toggles_and_clears() {
        let (_source, mut session) = sample_session();
        session.start();
        settled(&mut session);

        session.on_character_select(Some(3));
        assert_eq!(session.selected_id(), Some(3));
        assert_eq!(session.selected_record().map(|c| c.id), Some(3));

        // Selecting the selected record clears it.
        session.on_character_select(Some(3));
        assert_eq!(session.selected_id(), None);

        session.on_character_select(Some(5));
        session.on_character_select(None);
        assert_eq!(session.selected_id(), None);
    }

    #[test]
    fn test_selection_survives_page_change_but_hides() {
        let (_source, mut session) = sample_session();
        session.start();
        settled(&mut session);

        session.on_character_select(Some(1));
        session.on_page_change(2);
        assert_eq!(session.selected_id(), Some(1));
        assert!(session.selected_record().is_none());

        session.on_page_change(1);
        assert_eq!(session.selected_record().map(|c| c.id), Some(1));
    }
}
