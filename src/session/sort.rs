//! Client-side sorting of the displayed page.
//!
//! Sorting reorders only the records currently on screen; it never
//! refetches and the ordering does not survive a page or filter change.
//! Comparison is collation-based rather than code-point-based so that
//! accented names order next to their base letters.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::api::Character;

/// Sort direction for a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Flips the direction.
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Arrow glyph for the table header.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Error for a sort request on a field that is not string-valued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortError {
    pub field: String,
}

impl std::fmt::Display for SortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a sortable string field", self.field)
    }
}

impl std::error::Error for SortError {}

/// Looks up a string-valued field of a character by name.
fn string_field<'a>(character: &'a Character, field: &str) -> Option<&'a str> {
    match field {
        "name" => Some(&character.name),
        "status" => Some(&character.status),
        "species" => Some(&character.species),
        "gender" => Some(&character.gender),
        "origin" => Some(&character.origin.name),
        "location" => Some(&character.location.name),
        "image" => Some(&character.image),
        "created" => Some(&character.created),
        _ => None,
    }
}

/// Collation key: canonical decomposition with combining marks dropped,
/// case-folded per character.
fn collation_key(value: &str) -> String {
    value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Collation-aware comparison; the raw strings break ties so equal keys
/// still order deterministically.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Reorders `records` by the given string field.
///
/// Fails without touching the slice when `field` does not name a
/// string-valued field of [`Character`].
pub fn sort_records(
    records: &mut [Character],
    field: &str,
    direction: SortDirection,
) -> Result<(), SortError> {
    // Unknown fields are rejected even for an empty slice.
    if string_field(&Character::default(), field).is_none() {
        return Err(SortError {
            field: field.to_string(),
        });
    }

    records.sort_by(|a, b| {
        let va = string_field(a, field).unwrap_or_default();
        let vb = string_field(b, field).unwrap_or_default();
        let cmp = collate(va, vb);
        match direction {
            SortDirection::Ascending => cmp,
            SortDirection::Descending => cmp.reverse(),
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<Character> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Character {
                id: i as u64 + 1,
                name: n.to_string(),
                ..Character::default()
            })
            .collect()
    }

    fn names(records: &[Character]) -> Vec<&str> {
        records.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_name_ascending_and_descending() {
        let mut records = named(&["Rick", "Morty", "Summer"]);
        sort_records(&mut records, "name", SortDirection::Ascending).unwrap();
        assert_eq!(names(&records), vec!["Morty", "Rick", "Summer"]);

        sort_records(&mut records, "name", SortDirection::Descending).unwrap();
        assert_eq!(names(&records), vec!["Summer", "Rick", "Morty"]);
    }

    #[test]
    fn test_accented_names_order_next_to_base_letters() {
        // Code-point ordering would push "Álvarez" past "Zeep".
        let mut records = named(&["Zeep Xanflorp", "Álvarez", "Armagheadon"]);
        sort_records(&mut records, "name", SortDirection::Ascending).unwrap();
        assert_eq!(
            names(&records),
            vec!["Álvarez", "Armagheadon", "Zeep Xanflorp"]
        );
    }

    #[test]
    fn test_case_is_ignored_for_ordering() {
        let mut records = named(&["beth", "Alan", "MORTY"]);
        sort_records(&mut records, "name", SortDirection::Ascending).unwrap();
        assert_eq!(names(&records), vec!["Alan", "beth", "MORTY"]);
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let mut records = named(&["Rick"]);
        let err = sort_records(&mut records, "episode_count", SortDirection::Ascending)
            .unwrap_err();
        assert_eq!(err.field, "episode_count");

        let mut empty: Vec<Character> = Vec::new();
        assert!(sort_records(&mut empty, "nope", SortDirection::Ascending).is_err());
        assert!(sort_records(&mut empty, "name", SortDirection::Ascending).is_ok());
    }

    #[test]
    fn test_sort_is_general_over_string_fields() {
        let mut records = vec![
            Character {
                id: 1,
                name: "a".to_string(),
                species: "Humanoid".to_string(),
                ..Character::default()
            },
            Character {
                id: 2,
                name: "b".to_string(),
                species: "Alien".to_string(),
                ..Character::default()
            },
        ];
        sort_records(&mut records, "species", SortDirection::Ascending).unwrap();
        assert_eq!(records[0].species, "Alien");
    }
}
