use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::search::{self, Resolution};
use crate::state::{AppState, IndexEntry};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.index = DataResource::Loading;
            state.message = None;
            DispatchResult::changed_with(Effect::LoadIndex {
                limit: state.index_limit,
            })
        }

        Action::IndexDidLoad(entries) => {
            state.index = DataResource::Loaded(entries);
            state.message = None;
            start_window(state)
        }

        Action::IndexDidError(error) => {
            state.index = DataResource::Failed(error.clone());
            state.hydrating = false;
            state.message = Some(format!("Index error: {error}"));
            DispatchResult::changed()
        }

        Action::HydrateDidLoad { batch, records } => {
            if batch != state.batch {
                return DispatchResult::unchanged();
            }
            state.hydrating = false;
            state.hydrated = records;
            state.selected_index = 0;
            state.show_all_hydrated();
            state.message = if !state.hydrated.is_empty() {
                None
            } else if state.search.applied.is_empty() {
                Some("No creatures could be loaded.".to_string())
            } else {
                Some(no_match_message(&state.search.applied))
            };
            DispatchResult::changed()
        }

        Action::HydrateDidCancel { batch } => {
            if batch != state.batch || !state.hydrating {
                return DispatchResult::unchanged();
            }
            state.hydrating = false;
            DispatchResult::changed()
        }

        Action::SearchStart => {
            state.search.active = true;
            state.search.query.clear();
            preview_search(state);
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active
                && state.search.query.is_empty()
                && state.search.applied.is_empty()
            {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            if state.search.applied.is_empty() {
                state.show_all_hydrated();
                return DispatchResult::changed();
            }
            submit_search(state, String::new())
        }

        Action::SearchSubmit => {
            state.search.active = false;
            let query = search::normalize_query(&state.search.query);
            state.search.query = query.clone();
            submit_search(state, query)
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            preview_search(state);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            preview_search(state);
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            let index = (state.selected_index as i64 + delta as i64).max(0) as usize;
            if !state.set_selected_index(index) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::CardSelect(index) => {
            if !state.set_selected_index(index) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            if !state.is_loading() {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Live filter while typing; only ever looks at hydrated records.
/// An empty input keeps showing the applied search.
fn preview_search(state: &mut AppState) {
    let mut query = search::normalize_query(&state.search.query);
    if query.is_empty() {
        query = state.search.applied.clone();
    }
    state.visible = search::filter_hydrated(&query, &state.hydrated);
    state.clamp_selection();
}

fn submit_search(state: &mut AppState, query: String) -> DispatchResult<Effect> {
    if !state.index.is_loaded() {
        // Nothing to search yet, or the session is over after an index failure.
        preview_search(state);
        return DispatchResult::changed();
    }

    state.search.applied = query.clone();
    state.selected_index = 0;
    state.message = None;

    match search::resolve(&query, &state.hydrated, state.index_entries()) {
        Resolution::Reset => start_window(state),
        Resolution::Filter(matches) => {
            state.visible = matches;
            supersede_batch(state)
        }
        Resolution::Hydrate(entry) => {
            state.visible.clear();
            DispatchResult::changed_with(begin_batch(state, vec![entry]))
        }
        Resolution::NoMatch => {
            state.visible.clear();
            state.message = Some(no_match_message(&query));
            supersede_batch(state)
        }
    }
}

/// A search settled without hydrating; any running batch must not land on top of it.
fn supersede_batch(state: &mut AppState) -> DispatchResult<Effect> {
    state.batch = state.batch.wrapping_add(1);
    if !state.hydrating {
        return DispatchResult::changed();
    }
    state.hydrating = false;
    DispatchResult::changed_with(Effect::CancelHydrate)
}

fn start_window(state: &mut AppState) -> DispatchResult<Effect> {
    let entries = state.display_window();
    if entries.is_empty() {
        state.hydrated.clear();
        state.visible.clear();
        state.selected_index = 0;
        state.hydrating = false;
        state.message = Some("The index is empty.".to_string());
        return DispatchResult::changed();
    }
    DispatchResult::changed_with(begin_batch(state, entries))
}

fn begin_batch(state: &mut AppState, entries: Vec<IndexEntry>) -> Effect {
    state.batch = state.batch.wrapping_add(1);
    state.hydrating = true;
    Effect::Hydrate {
        batch: state.batch,
        entries,
    }
}

fn no_match_message(query: &str) -> String {
    format!("No results for \"{query}\".")
}
