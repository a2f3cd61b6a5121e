//! Shared fixtures: an in-memory catalog and a driver that runs effects
//! through the real hydrator.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use pokedex::action::Action;
use pokedex::api::{ApiError, CatalogSource, CreatureDetail};
use pokedex::effect::Effect;
use pokedex::hydrate;
use pokedex::reducer::reducer;
use pokedex::state::{AppState, IndexEntry, TypeSlot};
use tokio_util::sync::CancellationToken;
use tui_dispatch::testing::*;

pub fn creature_url(name: &str) -> String {
    format!("https://pokeapi.co/api/v2/pokemon/{name}/")
}

pub fn type_url(name: &str) -> String {
    format!("https://pokeapi.co/api/v2/type/{name}/")
}

/// In-memory stand-in for PokeAPI.
#[derive(Default)]
pub struct FakeCatalog {
    index: Vec<IndexEntry>,
    creatures: HashMap<String, CreatureDetail>,
    weaknesses: HashMap<String, Vec<String>>,
    broken: HashSet<String>,
    index_down: bool,
}

impl FakeCatalog {
    pub fn creature(mut self, name: &str, id: u32, types: &[&str]) -> Self {
        self.index.push(IndexEntry {
            name: name.to_string(),
            url: creature_url(name),
        });
        self.creatures.insert(
            creature_url(name),
            CreatureDetail {
                name: name.to_string(),
                id,
                image_url: Some(format!("https://img/artwork/{id}.png")),
                types: types
                    .iter()
                    .enumerate()
                    .map(|(idx, type_name)| TypeSlot {
                        slot: idx as u8 + 1,
                        name: type_name.to_string(),
                        url: type_url(type_name),
                    })
                    .collect(),
            },
        );
        self
    }

    pub fn weak_to(mut self, type_name: &str, attackers: &[&str]) -> Self {
        self.weaknesses.insert(
            type_url(type_name),
            attackers.iter().map(|name| name.to_string()).collect(),
        );
        self
    }

    /// Detail requests for `name` answer HTTP 500.
    pub fn broken(mut self, name: &str) -> Self {
        self.broken.insert(creature_url(name));
        self
    }

    pub fn index_down(mut self) -> Self {
        self.index_down = true;
        self
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_index(&self, limit: usize) -> Result<Vec<IndexEntry>, ApiError> {
        if self.index_down {
            return Err(ApiError::Status {
                url: "https://pokeapi.co/api/v2/pokemon".into(),
                status: 503,
            });
        }
        Ok(self.index.iter().take(limit).cloned().collect())
    }

    async fn fetch_creature(&self, url: &str) -> Result<CreatureDetail, ApiError> {
        if self.broken.contains(url) {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: 500,
            });
        }
        self.creatures.get(url).cloned().ok_or(ApiError::Status {
            url: url.to_string(),
            status: 404,
        })
    }

    async fn fetch_weaknesses(&self, type_url: &str) -> Result<Vec<String>, ApiError> {
        self.weaknesses
            .get(type_url)
            .cloned()
            .ok_or_else(|| ApiError::Request(format!("unreachable: {type_url}")))
    }
}

/// Twelve creatures; `window` decides how many start hydrated.
pub fn kanto() -> FakeCatalog {
    FakeCatalog::default()
        .creature("bulbasaur", 1, &["grass", "poison"])
        .creature("ivysaur", 2, &["grass", "poison"])
        .creature("venusaur", 3, &["grass", "poison"])
        .creature("charmander", 4, &["fire"])
        .creature("charmeleon", 5, &["fire"])
        .creature("charizard", 6, &["fire", "flying"])
        .creature("squirtle", 7, &["water"])
        .creature("wartortle", 8, &["water"])
        .creature("blastoise", 9, &["water"])
        .creature("caterpie", 10, &["bug"])
        .creature("pikachu", 25, &["electric"])
        .creature("raichu", 26, &["electric"])
        .weak_to("grass", &["fire", "ice", "poison", "flying", "bug"])
        .weak_to("poison", &["ground", "psychic"])
        .weak_to("fire", &["water", "ground", "rock"])
        .weak_to("flying", &["electric", "ice", "rock"])
        .weak_to("water", &["electric", "grass"])
        .weak_to("bug", &["fire", "flying", "rock"])
        .weak_to("electric", &["ground"])
}

pub type Harness = EffectStoreTestHarness<AppState, Action, Effect>;

pub fn harness(index_limit: usize, window: usize) -> Harness {
    EffectStoreTestHarness::new(AppState::new(index_limit, window), reducer)
}

/// Run queued effects against `catalog` until the store settles.
pub async fn settle(harness: &mut Harness, catalog: &Arc<dyn CatalogSource>) {
    loop {
        let effects: Vec<Effect> = harness.drain_effects().into_iter().collect();
        if effects.is_empty() {
            return;
        }
        for effect in effects {
            if let Some(action) = run_effect(effect, catalog).await {
                harness.dispatch_collect(action);
            }
        }
    }
}

/// Run one effect to completion. Cancellation is a no-op here: every
/// batch runs to the end, so late results reach the reducer.
pub async fn run_effect(effect: Effect, catalog: &Arc<dyn CatalogSource>) -> Option<Action> {
    match effect {
        Effect::LoadIndex { limit } => Some(match catalog.fetch_index(limit).await {
            Ok(entries) => Action::IndexDidLoad(entries),
            Err(error) => Action::IndexDidError(error.to_string()),
        }),
        Effect::Hydrate { batch, entries } => Some(
            match hydrate::hydrate_batch(Arc::clone(catalog), entries, CancellationToken::new())
                .await
            {
                Some(records) => Action::HydrateDidLoad { batch, records },
                None => Action::HydrateDidCancel { batch },
            },
        ),
        Effect::CancelHydrate => None,
    }
}

/// Fresh harness that has gone through startup against `catalog`.
pub async fn started(
    catalog: FakeCatalog,
    index_limit: usize,
    window: usize,
) -> (Harness, Arc<dyn CatalogSource>) {
    let catalog: Arc<dyn CatalogSource> = Arc::new(catalog);
    let mut harness = harness(index_limit, window);
    harness.dispatch_collect(Action::Init);
    settle(&mut harness, &catalog).await;
    (harness, catalog)
}

pub fn type_query(harness: &mut Harness, query: &str) {
    harness.dispatch_collect(Action::SearchStart);
    for ch in query.chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
}
