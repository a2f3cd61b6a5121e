use serde::{Deserialize, Serialize};

use crate::state::{CreatureRecord, IndexEntry};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    IndexDidLoad(Vec<IndexEntry>),
    IndexDidError(String),

    HydrateDidLoad { batch: u64, records: Vec<CreatureRecord> },
    HydrateDidCancel { batch: u64 },

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    SelectionMove(i16),
    CardSelect(usize),

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
