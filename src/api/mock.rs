//! In-memory character source for tests and demo mode.
//!
//! `MockSource` serves a fixed record set through the same paginated,
//! filtered surface as the real endpoint, including its habit of
//! answering 404 when nothing matches. Tests use it to script failures
//! and count requests without touching the network.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ApiError, Character, CharacterPage, CharacterSource, FilterSet, NamedRef, PageInfo};

/// Upstream page size mirrored by the mock (the remote service serves
/// fixed pages of 20).
pub const MOCK_UPSTREAM_PAGE_SIZE: usize = 20;

/// Scripted failure for a specific upstream page.
#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    /// Non-404 HTTP failure with the given status.
    Upstream(u16),
    /// A 404 answer.
    NotFound,
    /// Body that does not decode as the envelope.
    Malformed,
}

/// In-memory implementation of [`CharacterSource`].
pub struct MockSource {
    records: Vec<Character>,
    upstream_page_size: usize,
    failures: Mutex<Vec<(u32, MockFailure)>>,
    calls: AtomicUsize,
}

impl MockSource {
    /// Creates a mock serving `records` in upstream pages of
    /// [`MOCK_UPSTREAM_PAGE_SIZE`].
    pub fn new(records: Vec<Character>) -> Self {
        Self::with_page_size(records, MOCK_UPSTREAM_PAGE_SIZE)
    }

    /// Creates a mock with an explicit upstream page size.
    pub fn with_page_size(records: Vec<Character>, upstream_page_size: usize) -> Self {
        Self {
            records,
            upstream_page_size: upstream_page_size.max(1),
            failures: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Scripts a failure for one upstream page number.
    pub fn with_failure(self, page: u32, failure: MockFailure) -> Self {
        self.failures
            .lock()
            .expect("mock failure lock poisoned")
            .push((page, failure));
        self
    }

    /// Number of `fetch_page` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// A small demo universe, enough to span several upstream pages.
    pub fn sample() -> Self {
        let mut records = vec![
            sample_character(1, "Rick Sanchez", "Alive", "Human", "Male", "Earth (C-137)"),
            sample_character(2, "Morty Smith", "Alive", "Human", "Male", "unknown"),
            sample_character(3, "Summer Smith", "Alive", "Human", "Female", "Earth (Replacement Dimension)"),
            sample_character(4, "Beth Smith", "Alive", "Human", "Female", "Earth (Replacement Dimension)"),
            sample_character(5, "Jerry Smith", "Alive", "Human", "Male", "Earth (Replacement Dimension)"),
            sample_character(6, "Abadango Cluster Princess", "Alive", "Alien", "Female", "Abadango"),
            sample_character(7, "Abradolf Lincler", "unknown", "Humanoid", "Male", "Earth (Replacement Dimension)"),
            sample_character(8, "Adjudicator Rick", "Dead", "Human", "Male", "unknown"),
            sample_character(9, "Agency Director", "Dead", "Human", "Male", "Earth (Replacement Dimension)"),
            sample_character(10, "Alan Rails", "Dead", "Human", "Male", "unknown"),
            sample_character(11, "Albert Einstein", "Dead", "Human", "Male", "Earth (C-137)"),
            sample_character(12, "Alexander", "Dead", "Human", "Male", "Earth (C-137)"),
        ];
        // Pad with council clones so the demo spans multiple upstream pages.
        for n in 1..=48u64 {
            records.push(sample_character(
                100 + n,
                &format!("Council Rick {:02}", n),
                if n % 7 == 0 { "Dead" } else { "Alive" },
                "Human",
                "Male",
                "Citadel of Ricks",
            ));
        }
        Self::new(records)
    }

    fn matching(&self, filters: &FilterSet) -> Vec<Character> {
        let params = filters.query_params();
        self.records
            .iter()
            .filter(|c| {
                params.iter().all(|(key, value)| match *key {
                    "name" => c.name.to_lowercase().contains(value),
                    "status" => c.status.eq_ignore_ascii_case(value),
                    "species" => c.species.eq_ignore_ascii_case(value),
                    "gender" => c.gender.eq_ignore_ascii_case(value),
                    _ => true,
                })
            })
            .cloned()
            .collect()
    }
}

impl CharacterSource for MockSource {
    fn fetch_page(&self, filters: &FilterSet, page: u32) -> Result<CharacterPage, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self
            .failures
            .lock()
            .expect("mock failure lock poisoned")
            .iter()
            .find(|(p, _)| *p == page)
            .map(|(_, f)| *f);
        if let Some(failure) = scripted {
            return Err(match failure {
                MockFailure::Upstream(status) => ApiError::Upstream(status),
                MockFailure::NotFound => ApiError::NotFound,
                MockFailure::Malformed => {
                    ApiError::Malformed("expected envelope object".to_string())
                }
            });
        }

        let matching = self.matching(filters);
        let pages = matching.len().div_ceil(self.upstream_page_size);
        if matching.is_empty() || page == 0 || page as usize > pages {
            // The upstream answers 404 both for "no matches" and for a
            // page past the end.
            return Err(ApiError::NotFound);
        }

        let start = (page as usize - 1) * self.upstream_page_size;
        let end = (start + self.upstream_page_size).min(matching.len());
        Ok(CharacterPage {
            info: PageInfo {
                count: matching.len() as u32,
                pages: pages as u32,
                next: ((page as usize) < pages).then(|| format!("page={}", page + 1)),
                prev: (page > 1).then(|| format!("page={}", page - 1)),
            },
            results: matching[start..end].to_vec(),
        })
    }
}

fn sample_character(
    id: u64,
    name: &str,
    status: &str,
    species: &str,
    gender: &str,
    origin: &str,
) -> Character {
    Character {
        id,
        name: name.to_string(),
        status: status.to_string(),
        species: species.to_string(),
        gender: gender.to_string(),
        origin: NamedRef {
            name: origin.to_string(),
        },
        location: NamedRef {
            name: "Citadel of Ricks".to_string(),
        },
        image: format!("https://rickandmortyapi.com/api/character/avatar/{}.jpeg", id),
        created: "2017-11-04T18:48:46.250Z".to_string(),
    }
}
