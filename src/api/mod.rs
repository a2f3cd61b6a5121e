mod pokeapi;

use async_trait::async_trait;

use crate::state::{IndexEntry, TypeSlot};

pub use pokeapi::PokeApiClient;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("response parse error: {0}")]
    Decode(String),
}

/// Detail record as served by the API, before weaknesses are attached.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatureDetail {
    pub name: String,
    pub id: u32,
    pub image_url: Option<String>,
    pub types: Vec<TypeSlot>,
}

/// Remote catalog the hydrator reads from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Up to `limit` (name, url) pairs from the listing endpoint.
    async fn fetch_index(&self, limit: usize) -> Result<Vec<IndexEntry>, ApiError>;

    async fn fetch_creature(&self, url: &str) -> Result<CreatureDetail, ApiError>;

    /// Names of the types that deal double damage to the type at `type_url`.
    async fn fetch_weaknesses(&self, type_url: &str) -> Result<Vec<String>, ApiError>;
}
