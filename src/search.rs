//! Search resolution over the hydrated records and the full index

use crate::state::{CreatureRecord, IndexEntry};

/// What a submitted query turns into.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Empty query: hydrate the display window again.
    Reset,
    /// Positions of the hydrated records that match; no network needed.
    Filter(Vec<usize>),
    /// Nothing hydrated matches but this index entry does.
    Hydrate(IndexEntry),
    NoMatch,
}

pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Case-insensitive substring match. `query` must already be normalized.
pub fn name_matches(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(query)
}

pub fn filter_hydrated(query: &str, records: &[CreatureRecord]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| query.is_empty() || name_matches(&record.name, query))
        .map(|(idx, _)| idx)
        .collect()
}

pub fn find_in_index<'a>(query: &str, index: &'a [IndexEntry]) -> Option<&'a IndexEntry> {
    index.iter().find(|entry| name_matches(&entry.name, query))
}

pub fn resolve(query: &str, hydrated: &[CreatureRecord], index: &[IndexEntry]) -> Resolution {
    let query = normalize_query(query);
    if query.is_empty() {
        return Resolution::Reset;
    }

    let matches = filter_hydrated(&query, hydrated);
    if !matches.is_empty() {
        return Resolution::Filter(matches);
    }

    match find_in_index(&query, index) {
        Some(entry) => Resolution::Hydrate(entry.clone()),
        None => Resolution::NoMatch,
    }
}
