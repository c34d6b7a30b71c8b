//! PokeAPI client behind the `CatalogSource` seam

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::state::{CatalogPage, EntryDetail, EntryStat, EntrySummary};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

/// Every way a remote read can fail. All of them abort a refresh cycle alike.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("fetch task failed: {0}")]
    Task(String),
}

/// Read-only view of the remote creature database.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// One listing page plus the provider's total entry count.
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<CatalogPage, FetchError>;

    async fn fetch_detail(&self, url: &str) -> Result<EntryDetail, FetchError>;

    /// Names of every species in `generation`.
    async fn fetch_generation_members(&self, generation: &str) -> Result<Vec<String>, FetchError>;

    async fn fetch_type_names(&self) -> Result<Vec<String>, FetchError>;

    async fn fetch_generation_names(&self) -> Result<Vec<String>, FetchError>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    count: u32,
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct GenerationResponse {
    pokemon_species: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    name: String,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

/// HTTP implementation of [`CatalogSource`] against a PokeAPI-compatible base URL.
#[derive(Clone, Debug)]
pub struct PokeApiClient {
    client: reqwest::Client,
    base: String,
}

impl PokeApiClient {
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let base = base.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::Request {
                url: base.clone(),
                message: err.to_string(),
            })?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn page_url(&self, offset: u32, limit: u32) -> String {
        format!("{}/pokemon?offset={offset}&limit={limit}", self.base)
    }

    pub fn generation_url(&self, generation: &str) -> String {
        format!("{}/generation/{generation}", self.base)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| request_error(url, err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| request_error(url, err))?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let bytes = self.get_bytes(url).await?;
        decode_json(url, &bytes)
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<CatalogPage, FetchError> {
        let url = self.page_url(offset, limit);
        let response: ListResponse = self.get_json(&url).await?;
        Ok(page_from_response(response))
    }

    async fn fetch_detail(&self, url: &str) -> Result<EntryDetail, FetchError> {
        let response: PokemonResponse = self.get_json(url).await?;
        Ok(detail_from_response(url, response))
    }

    async fn fetch_generation_members(&self, generation: &str) -> Result<Vec<String>, FetchError> {
        let url = self.generation_url(generation);
        let response: GenerationResponse = self.get_json(&url).await?;
        Ok(response
            .pokemon_species
            .into_iter()
            .map(|species| species.name)
            .collect())
    }

    async fn fetch_type_names(&self) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/type?limit=999", self.base);
        let response: ListResponse = self.get_json(&url).await?;
        Ok(type_names(response))
    }

    async fn fetch_generation_names(&self) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/generation?limit=100", self.base);
        let response: ListResponse = self.get_json(&url).await?;
        Ok(response.results.into_iter().map(|entry| entry.name).collect())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.get_bytes(url).await
    }
}

fn request_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

fn decode_json<T: DeserializeOwned>(url: &str, bytes: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(bytes).map_err(|err| FetchError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    })
}

fn page_from_response(response: ListResponse) -> CatalogPage {
    CatalogPage {
        total_count: response.count,
        results: response
            .results
            .into_iter()
            .map(|entry| EntrySummary {
                name: entry.name,
                url: entry.url,
            })
            .collect(),
    }
}

fn detail_from_response(url: &str, response: PokemonResponse) -> EntryDetail {
    EntryDetail {
        name: response.name,
        detail_url: url.to_string(),
        sprite_url: pointer_string(&response.sprites, "/front_default"),
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
        stats: response
            .stats
            .into_iter()
            .map(|slot| EntryStat {
                name: slot.stat.name,
                base_value: slot.base_stat,
            })
            .collect(),
    }
}

fn type_names(response: ListResponse) -> Vec<String> {
    let mut types: Vec<String> = response
        .results
        .into_iter()
        .map(|entry| entry.name)
        .filter(|name| name != "unknown" && name != "shadow")
        .collect();
    types.sort();
    types
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
