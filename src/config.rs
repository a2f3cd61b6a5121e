//! Catalog settings shared by the CLI and the initial state

use clap::builder::TypedValueParser;
use clap::Args;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_INDEX_LIMIT: usize = 151;
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// Where the catalog comes from and how much of it is loaded.
#[derive(Args, Clone, Debug, PartialEq)]
pub struct CatalogConfig {
    /// Base URL of the PokeAPI-compatible server
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Number of index entries loaded at startup (minimum 1)
    #[arg(
        long,
        default_value_t = DEFAULT_INDEX_LIMIT,
        value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize)
    )]
    pub limit: usize,

    /// Number of index entries hydrated into cards before any search (minimum 1)
    #[arg(
        long,
        default_value_t = DEFAULT_WINDOW_SIZE,
        value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize)
    )]
    pub window: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            limit: DEFAULT_INDEX_LIMIT,
            window: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl CatalogConfig {
    /// The display window never exceeds the index it is cut from.
    pub fn effective_window(&self) -> usize {
        self.window.min(self.limit)
    }
}
