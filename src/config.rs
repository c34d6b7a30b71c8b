//! Validated runtime configuration

use std::time::Duration;

use crate::api::{FetchError, PokeApiClient, DEFAULT_API_BASE};
use crate::state::DEFAULT_PAGE_SIZE;

pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("page size must be between 1 and {MAX_PAGE_SIZE}, got {0}")]
    PageSize(u32),
    #[error("request timeout must be at least one second")]
    Timeout,
    #[error("API base must be an http(s) URL, got {0:?}")]
    ApiBase(String),
    #[error("could not build HTTP client: {0}")]
    Client(#[from] FetchError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatalogConfig {
    pub api_base: String,
    pub page_size: u32,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl CatalogConfig {
    pub fn new(api_base: impl Into<String>, page_size: u32, timeout_secs: u64) -> Result<Self, ConfigError> {
        let api_base = api_base.into().trim().to_string();
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ConfigError::ApiBase(api_base));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::PageSize(page_size));
        }
        if timeout_secs == 0 {
            return Err(ConfigError::Timeout);
        }
        Ok(Self {
            api_base,
            page_size,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn client(&self) -> Result<PokeApiClient, ConfigError> {
        Ok(PokeApiClient::new(self.api_base.clone(), self.timeout)?)
    }
}
