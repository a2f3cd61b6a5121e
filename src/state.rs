use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::config::{CatalogConfig, DEFAULT_INDEX_LIMIT, DEFAULT_WINDOW_SIZE};

/// Lightweight (name, detail URL) pair from the listing endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    pub name: String,
    pub url: String,
}

/// A fully hydrated creature, ready to be shown as a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub name: String,
    pub id: u32,
    pub image_url: Option<String>,
    pub types: Vec<TypeSlot>,
    pub weaknesses: BTreeSet<String>,
}

impl CreatureRecord {
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|slot| slot.name.as_str()).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    /// Text currently in the search bar.
    pub query: String,
    /// Last query that went through the resolver; empty means the display window.
    pub applied: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub index_limit: usize,
    pub window_size: usize,

    pub index: DataResource<Vec<IndexEntry>>,
    pub hydrated: Vec<CreatureRecord>,
    /// Positions into `hydrated`, in display order.
    pub visible: Vec<usize>,
    pub selected_index: usize,

    pub search: SearchState,

    /// Id of the latest hydration batch; results from any other batch are stale.
    pub batch: u64,
    pub hydrating: bool,
    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_LIMIT, DEFAULT_WINDOW_SIZE)
    }
}

impl AppState {
    pub fn new(index_limit: usize, window_size: usize) -> Self {
        Self {
            terminal_size: (80, 24),
            index_limit,
            window_size,
            index: DataResource::Empty,
            hydrated: Vec::new(),
            visible: Vec::new(),
            selected_index: 0,
            search: SearchState::default(),
            batch: 0,
            hydrating: false,
            message: None,
            tick: 0,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.limit, config.effective_window())
    }

    pub fn index_entries(&self) -> &[IndexEntry] {
        self.index.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The bounded prefix of the index hydrated before any search.
    pub fn display_window(&self) -> Vec<IndexEntry> {
        self.index_entries()
            .iter()
            .take(self.window_size)
            .cloned()
            .collect()
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &CreatureRecord> + '_ {
        self.visible.iter().filter_map(|idx| self.hydrated.get(*idx))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn selected_record(&self) -> Option<&CreatureRecord> {
        self.visible
            .get(self.selected_index)
            .and_then(|idx| self.hydrated.get(*idx))
    }

    pub fn show_all_hydrated(&mut self) {
        self.visible = (0..self.hydrated.len()).collect();
        self.clamp_selection();
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.visible.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.visible.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    pub fn clamp_selection(&mut self) {
        if self.selected_index >= self.visible.len() {
            self.selected_index = 0;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.index.is_loading() || self.hydrating
    }

    /// True once loading has settled and nothing is left to show.
    pub fn no_results(&self) -> bool {
        !self.is_loading() && self.index.is_loaded() && self.visible.is_empty()
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Catalog")
                .entry("index", ron_string(&self.index_entries().len()))
                .entry("index_limit", ron_string(&self.index_limit))
                .entry("window", ron_string(&self.window_size))
                .entry("hydrated", ron_string(&self.hydrated.len()))
                .entry("visible", ron_string(&self.visible.len()))
                .entry("selected", ron_string(&self.selected_index)),
            DebugSection::new("Search")
                .entry("query", ron_string(&self.search.query))
                .entry("applied", ron_string(&self.search.applied))
                .entry("active", ron_string(&self.search.active)),
            DebugSection::new("Status")
                .entry("index_loading", ron_string(&self.index.is_loading()))
                .entry("index_failed", ron_string(&self.index.is_failed()))
                .entry("batch", ron_string(&self.batch))
                .entry("hydrating", ron_string(&self.hydrating))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
