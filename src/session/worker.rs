//! Background fetch worker.
//!
//! One dedicated thread owns the character source and runs aggregations
//! off the UI loop, the same way the event thread feeds the TUI. Every
//! submitted request carries a generation from a shared monotonically
//! increasing counter; the worker abandons an aggregation as soon as a
//! newer generation exists, and callers apply an outcome only while its
//! generation is still the latest.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::api::{ApiError, Character, CharacterSource, FilterSet};

use super::aggregate::{Aggregation, Aggregator};

/// One aggregation request.
#[derive(Debug, Clone)]
struct FetchRequest {
    generation: u64,
    filters: FilterSet,
}

/// Result of one settled aggregation.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Generation of the request this outcome answers.
    pub generation: u64,
    /// Filters the aggregation ran with.
    pub filters: FilterSet,
    /// The full aggregated set, or the failure that aborted it.
    pub result: Result<Vec<Character>, ApiError>,
}

/// Handle to the background fetch thread.
pub struct FetchHandle {
    requests: Sender<FetchRequest>,
    outcomes: Receiver<FetchOutcome>,
    latest: Arc<AtomicU64>,
    // Held so the worker's lifetime is visible; the thread exits on its
    // own when the request channel closes.
    _worker: JoinHandle<()>,
}

impl FetchHandle {
    /// Spawns the fetch thread over `source`.
    pub fn spawn(source: Arc<dyn CharacterSource>, concurrency: usize) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<FetchOutcome>();
        let latest = Arc::new(AtomicU64::new(0));

        let worker_latest = Arc::clone(&latest);
        let worker = thread::spawn(move || {
            let aggregator = Aggregator::with_concurrency(source, concurrency);
            while let Ok(request) = request_rx.recv() {
                let generation = request.generation;
                if worker_latest.load(Ordering::SeqCst) != generation {
                    // Already superseded while queued.
                    continue;
                }
                let is_stale = || worker_latest.load(Ordering::SeqCst) != generation;
                let outcome = match aggregator.fetch_all(&request.filters, &is_stale) {
                    Ok(Aggregation::Complete(records)) => FetchOutcome {
                        generation,
                        filters: request.filters,
                        result: Ok(records),
                    },
                    Ok(Aggregation::Superseded) => continue,
                    Err(e) => FetchOutcome {
                        generation,
                        filters: request.filters,
                        result: Err(e),
                    },
                };
                if outcome_tx.send(outcome).is_err() {
                    return;
                }
            }
        });

        Self {
            requests: request_tx,
            outcomes: outcome_rx,
            latest,
            _worker: worker,
        }
    }

    /// Submits an aggregation for `filters`, superseding anything in
    /// flight. Returns the request's generation.
    pub fn submit(&self, filters: FilterSet) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(generation, ?filters, "submitting aggregation");
        // Send fails only when the worker thread is gone.
        if self.requests.send(FetchRequest { generation, filters }).is_err() {
            tracing::warn!(generation, "fetch worker is gone");
        }
        generation
    }

    /// Generation of the most recently submitted request.
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Non-blocking poll for a settled outcome.
    pub fn try_recv(&self) -> Option<FetchOutcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::api::mock::MockSource;
    use crate::api::StatusFilter;

    fn recv_outcome(handle: &FetchHandle) -> FetchOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = handle.try_recv() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "no outcome within deadline");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_submit_and_receive_outcome() {
        let handle = FetchHandle::spawn(Arc::new(MockSource::sample()), 2);
        let generation = handle.submit(FilterSet::default());
        let outcome = recv_outcome(&handle);
        assert_eq!(outcome.generation, generation);
        let records = outcome.result.unwrap();
        assert_eq!(records.len(), 60);
    }

    #[test]
    fn test_generations_increase_monotonically() {
        let handle = FetchHandle::spawn(Arc::new(MockSource::sample()), 1);
        let first = handle.submit(FilterSet::default());
        let second = handle.submit(FilterSet {
            status: StatusFilter::Dead,
            ..FilterSet::default()
        });
        assert!(second > first);
        assert_eq!(handle.latest_generation(), second);

        // Whatever settles, the latest generation keeps identifying the
        // authoritative request.
        let outcome = recv_outcome(&handle);
        assert!(outcome.generation <= second);
    }
}
