//! HTTP client for the volume-measurement backend.
//!
//! Read-only JSON API, consumed through its documented contract only:
//! - `GET /api/filter-options`: legal filter values + global age bound
//! - `GET /api/structures`: ordered list of selectable structures
//! - `GET /api/volume-data`: measurement rows for an applied filter record

mod error;
mod query;

pub use error::ApiError;
pub use query::build_volume_query;

use serde::de::DeserializeOwned;
use tracing::debug;
use voluma_types::{FilterOptions, MeasurementRow};

/// Query parameters as repeatable key/value pairs.
pub type QueryParams = Vec<(&'static str, String)>;

/// Thin reqwest wrapper around the backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the scheme/host/port prefix, e.g. `http://localhost:8000`;
    /// a trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        self.get_json("/api/filter-options", &[]).await
    }

    pub async fn structures(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("/api/structures", &[]).await
    }

    pub async fn volume_data(&self, params: &QueryParams) -> Result<Vec<MeasurementRow>, ApiError> {
        self.get_json("/api/volume-data", params).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, params = params.len(), "GET");

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { endpoint, status });
        }

        response
            .json()
            .await
            .map_err(|source| ApiError::Decode { endpoint, source })
    }
}
