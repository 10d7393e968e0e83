//! Remote document store client
//!
//! HTTP client for the managed backend holding per-user favourite
//! sub-collections and per-restaurant location records, with bounded
//! retries and tracing instrumentation.

use crate::config::StoreConfig;
use crate::models::{FavouriteSet, GeoPoint};
use crate::providers::{FavouriteStore, LocationStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client for the remote document store REST surface
pub struct DocumentStoreClient {
    /// HTTP client
    client: Client,
    /// Store configuration
    config: StoreConfig,
}

impl DocumentStoreClient {
    /// Create a new document store client
    pub fn new(config: StoreConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent("DineMap/0.1.0")
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Issue a GET request with bounded retries.
    ///
    /// Returns `Ok(None)` for HTTP 404 (document does not exist) and retries
    /// transport errors and 5xx responses up to `max_retries` times.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = Duration::from_millis(200 * u64::from(attempt));
                debug!("Retrying request (attempt {}) after {:?}", attempt, backoff);
                tokio::time::sleep(backoff).await;
            }

            let mut request = self.client.get(url);
            if let Some(api_key) = &self.config.api_key {
                request = request.header("x-api-key", api_key);
            }

            match request.send().await {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    debug!("Document not found: {}", url);
                    return Ok(None);
                }
                Ok(response) if response.status().is_server_error() => {
                    warn!("Server error {} from {}", response.status(), url);
                    last_error = Some(anyhow::anyhow!(
                        "Server error {} from document store",
                        response.status()
                    ));
                }
                Ok(response) => {
                    let response = response
                        .error_for_status()
                        .with_context(|| format!("Request to {url} failed"))?;
                    let value = response
                        .json::<T>()
                        .await
                        .with_context(|| "Failed to parse document store response")?;
                    return Ok(Some(value));
                }
                Err(e) => {
                    warn!("Request to {} failed: {}", url, e);
                    last_error = Some(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Request to {url} failed")))
    }
}

#[async_trait]
impl FavouriteStore for DocumentStoreClient {
    #[instrument(skip(self))]
    async fn list_favourite_ids(&self, user_id: &str) -> Result<FavouriteSet> {
        let url = format!("{}/users/{}/favourites", self.config.base_url, user_id);

        // A user who never favourited anything has no sub-collection at all
        let documents: Option<documents::DocumentList> = self.get_json(&url).await?;
        let ids: FavouriteSet = documents
            .map(|list| list.documents.into_iter().map(|doc| doc.id).collect())
            .unwrap_or_default();

        debug!("User {} has {} favourites", user_id, ids.len());
        Ok(ids)
    }
}

#[async_trait]
impl LocationStore for DocumentStoreClient {
    #[instrument(skip(self))]
    async fn restaurant_location(&self, restaurant_id: &str) -> Result<Option<GeoPoint>> {
        let url = format!(
            "{}/restaurants/{}/location",
            self.config.base_url, restaurant_id
        );

        let record: Option<documents::LocationRecord> = self.get_json(&url).await?;
        Ok(record.and_then(documents::location_from_record))
    }
}

/// Document store response structures and conversion utilities
mod documents {
    use crate::models::GeoPoint;
    use serde::Deserialize;

    /// Listing of a sub-collection; document IDs carry the membership
    #[derive(Debug, Deserialize)]
    pub struct DocumentList {
        pub documents: Vec<Document>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Document {
        pub id: String,
    }

    /// A restaurant's location sub-record
    #[derive(Debug, Deserialize)]
    pub struct LocationRecord {
        pub latitude: f64,
        pub longitude: f64,
    }

    /// Convert a raw location record into a coordinate.
    ///
    /// Out-of-range values are treated the same as a missing document.
    #[must_use]
    pub fn location_from_record(record: LocationRecord) -> Option<GeoPoint> {
        GeoPoint::checked(record.latitude, record.longitude)
    }
}
