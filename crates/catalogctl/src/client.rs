//! HTTP client for the Catalog product API.

use catalog::api::PRODUCTS_PATH;
use catalog::model::{Product, ProductInput};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors returned by [`ProductClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Client for `/api/v1/products`.
#[derive(Debug, Clone)]
pub struct ProductClient {
    http: Client,
    base_url: String,
}

impl ProductClient {
    /// Create a client for the server at `endpoint` (e.g. `http://localhost:8080`).
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: format!("{}{}", endpoint.trim_end_matches('/'), PRODUCTS_PATH),
        }
    }

    fn product_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    pub async fn list(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.http.get(&self.base_url).send().await?;
        decode(response).await
    }

    /// Fetch one product; `None` if the server has no such id.
    pub async fn get(&self, id: i64) -> Result<Option<Product>, ClientError> {
        let response = self.http.get(self.product_url(id)).send().await?;
        decode_optional(response).await
    }

    pub async fn create(&self, input: &ProductInput) -> Result<Product, ClientError> {
        let response = self.http.post(&self.base_url).json(input).send().await?;
        decode(response).await
    }

    /// Replace a product's fields; `None` if the server has no such id.
    pub async fn update(
        &self,
        id: i64,
        changes: &ProductInput,
    ) -> Result<Option<Product>, ClientError> {
        let response = self
            .http
            .put(self.product_url(id))
            .json(changes)
            .send()
            .await?;
        decode_optional(response).await
    }

    /// Delete a product; `false` if the server has no such id.
    pub async fn delete(&self, id: i64) -> Result<bool, ClientError> {
        let response = self.http.delete(self.product_url(id)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(unexpected(status, response).await),
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(unexpected(status, response).await);
    }
    Ok(response.json().await?)
}

async fn decode_optional<T: DeserializeOwned>(response: Response) -> Result<Option<T>, ClientError> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    decode(response).await.map(Some)
}

async fn unexpected(status: StatusCode, response: Response) -> ClientError {
    let body = response.text().await.unwrap_or_default();
    ClientError::Status { status, body }
}
