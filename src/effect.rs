use crate::state::IndexEntry;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadIndex { limit: usize },
    /// Hydrate `entries` as one batch; the result is tagged with `batch`.
    Hydrate { batch: u64, entries: Vec<IndexEntry> },
    /// Stop the running batch; its result is already stale.
    CancelHydrate,
}
