//! Upstream data model and filter state.
//!
//! `Character` and the page envelope mirror the JSON shape of the
//! character endpoint. Records are carried around as opaque values;
//! apart from sorting on string fields, nothing here interprets them.

use serde::Deserialize;

/// A named reference embedded in a character record (origin, location).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// One character record as returned by the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub species: String,
    pub gender: String,
    #[serde(default)]
    pub origin: NamedRef,
    #[serde(default)]
    pub location: NamedRef,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub created: String,
}

/// Pagination metadata from the upstream response envelope.
///
/// The upstream page size is fixed by the remote service and opaque to
/// us except through `pages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One upstream page: envelope metadata plus the records on that page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CharacterPage {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

/// Status filter values accepted by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Any,
    Alive,
    Dead,
    Unknown,
}

impl StatusFilter {
    /// Query value transmitted upstream, `None` for no constraint.
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            StatusFilter::Any => None,
            StatusFilter::Alive => Some("alive"),
            StatusFilter::Dead => Some("dead"),
            StatusFilter::Unknown => Some("unknown"),
        }
    }

    /// Display label for the filter bar.
    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::Any => "All",
            StatusFilter::Alive => "Alive",
            StatusFilter::Dead => "Dead",
            StatusFilter::Unknown => "Unknown",
        }
    }

    /// Cycles to the next value (filter bar hotkey).
    pub fn next(self) -> Self {
        match self {
            StatusFilter::Any => StatusFilter::Alive,
            StatusFilter::Alive => StatusFilter::Dead,
            StatusFilter::Dead => StatusFilter::Unknown,
            StatusFilter::Unknown => StatusFilter::Any,
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "any" | "all" => Ok(StatusFilter::Any),
            "alive" => Ok(StatusFilter::Alive),
            "dead" => Ok(StatusFilter::Dead),
            "unknown" => Ok(StatusFilter::Unknown),
            other => Err(format!(
                "invalid status '{}' (expected alive, dead, unknown or all)",
                other
            )),
        }
    }
}

/// Gender filter values accepted by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenderFilter {
    #[default]
    Any,
    Female,
    Male,
    Genderless,
    Unknown,
}

impl GenderFilter {
    /// Query value transmitted upstream, `None` for no constraint.
    pub fn as_query(self) -> Option<&'static str> {
        match self {
            GenderFilter::Any => None,
            GenderFilter::Female => Some("female"),
            GenderFilter::Male => Some("male"),
            GenderFilter::Genderless => Some("genderless"),
            GenderFilter::Unknown => Some("unknown"),
        }
    }

    /// Display label for the filter bar.
    pub fn label(self) -> &'static str {
        match self {
            GenderFilter::Any => "All",
            GenderFilter::Female => "Female",
            GenderFilter::Male => "Male",
            GenderFilter::Genderless => "Genderless",
            GenderFilter::Unknown => "Unknown",
        }
    }

    /// Cycles to the next value (filter bar hotkey).
    pub fn next(self) -> Self {
        match self {
            GenderFilter::Any => GenderFilter::Female,
            GenderFilter::Female => GenderFilter::Male,
            GenderFilter::Male => GenderFilter::Genderless,
            GenderFilter::Genderless => GenderFilter::Unknown,
            GenderFilter::Unknown => GenderFilter::Any,
        }
    }
}

impl std::str::FromStr for GenderFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "any" | "all" => Ok(GenderFilter::Any),
            "female" => Ok(GenderFilter::Female),
            "male" => Ok(GenderFilter::Male),
            "genderless" => Ok(GenderFilter::Genderless),
            "unknown" => Ok(GenderFilter::Unknown),
            other => Err(format!(
                "invalid gender '{}' (expected female, male, genderless, unknown or all)",
                other
            )),
        }
    }
}

/// The full filter state, passed by value into every aggregation.
///
/// Empty strings and `Any` mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub name: String,
    pub status: StatusFilter,
    pub species: String,
    pub gender: GenderFilter,
}

impl FilterSet {
    /// Builds the query parameters transmitted upstream.
    ///
    /// Only constrained fields are included; free-text values are
    /// lower-cased before transmission (upstream matches
    /// case-insensitively) and a literal "all" counts as unconstrained.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(v) = normalize_text(&self.name) {
            params.push(("name", v));
        }
        if let Some(v) = self.status.as_query() {
            params.push(("status", v.to_string()));
        }
        if let Some(v) = normalize_text(&self.species) {
            params.push(("species", v));
        }
        if let Some(v) = self.gender.as_query() {
            params.push(("gender", v.to_string()));
        }
        params
    }

    /// Canonical key for the aggregation cache: the transmitted
    /// parameters, joined. Two filter sets that transmit the same
    /// parameters share one aggregated set.
    pub fn cache_key(&self) -> String {
        let mut key = String::new();
        for (k, v) in self.query_params() {
            key.push_str(k);
            key.push('=');
            key.push_str(&v);
            key.push('&');
        }
        key
    }

    /// True when no field constrains the result set.
    pub fn is_empty(&self) -> bool {
        self.query_params().is_empty()
    }
}

fn normalize_text(value: &str) -> Option<String> {
    if value.is_empty() || value == "all" {
        None
    } else {
        Some(value.to_lowercase())
    }
}
