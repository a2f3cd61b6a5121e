use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::{ApiError, CatalogSource, CreatureDetail};
use crate::state::{IndexEntry, TypeSlot};

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    #[serde(default)]
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    #[serde(default)]
    sprites: serde_json::Value,
    types: Vec<PokemonTypeSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeResponse {
    damage_relations: DamageRelations,
}

#[derive(Clone, Debug, Deserialize)]
struct DamageRelations {
    #[serde(default)]
    double_damage_from: Vec<NamedResource>,
}

/// HTTP client for PokeAPI (or any server with the same schema).
pub struct PokeApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn index_url(&self, limit: usize) -> String {
        format!("{}/pokemon?limit={limit}", self.base_url.trim_end_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl CatalogSource for PokeApiClient {
    async fn fetch_index(&self, limit: usize) -> Result<Vec<IndexEntry>, ApiError> {
        let response: ListResponse = self.get_json(&self.index_url(limit)).await?;
        Ok(index_from_response(response, limit))
    }

    async fn fetch_creature(&self, url: &str) -> Result<CreatureDetail, ApiError> {
        let response: PokemonResponse = self.get_json(url).await?;
        Ok(creature_from_response(response))
    }

    async fn fetch_weaknesses(&self, type_url: &str) -> Result<Vec<String>, ApiError> {
        let response: TypeResponse = self.get_json(type_url).await?;
        Ok(response
            .damage_relations
            .double_damage_from
            .into_iter()
            .map(|entry| entry.name)
            .collect())
    }
}

fn index_from_response(response: ListResponse, limit: usize) -> Vec<IndexEntry> {
    response
        .results
        .into_iter()
        .take(limit)
        .map(|entry| IndexEntry {
            name: entry.name,
            url: entry.url,
        })
        .collect()
}

fn creature_from_response(response: PokemonResponse) -> CreatureDetail {
    let mut types: Vec<TypeSlot> = response
        .types
        .into_iter()
        .map(|slot| TypeSlot {
            slot: slot.slot,
            name: slot.type_info.name,
            url: slot.type_info.url,
        })
        .collect();
    types.sort_by_key(|slot| slot.slot);

    let image_url = pointer_string(
        &response.sprites,
        "/other/official-artwork/front_default",
    )
    .or_else(|| pointer_string(&response.sprites, "/front_default"));

    CreatureDetail {
        name: response.name,
        id: response.id,
        image_url,
        types,
    }
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
