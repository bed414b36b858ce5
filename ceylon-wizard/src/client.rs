//! HTTP collaborators used by the wizard: the catalog listing and the
//! comprehensive booking endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ceylon_booking::{BookingStatus, ComprehensiveBookingRequest};
use ceylon_catalog::{CatalogItem, CatalogKind};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },
}

/// Confirmation returned after a comprehensive booking is stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingAck {
    pub reference: String,
    pub total_price: f64,
    pub status: BookingStatus,
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogItem>, ClientError>;
}

#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn submit(&self, request: &ComprehensiveBookingRequest) -> Result<BookingAck, ClientError>;
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    match response.status() {
        status if status.is_success() => response
            .json::<T>()
            .await
            .map_err(|e| ClientError::ResponseParseFailed(e.to_string())),
        status => {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::ApiError { status: status.as_u16(), message })
        }
    }
}

#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogItem>, ClientError> {
        let response = self
            .client
            .get(format!("{}/v1/{}", self.base_url, kind.resource()))
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        read_json(response).await
    }
}

#[derive(Clone)]
pub struct HttpBookingGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBookingGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sends the traveller's bearer token so the booking is tied to them.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[async_trait]
impl BookingGateway for HttpBookingGateway {
    async fn submit(&self, request: &ComprehensiveBookingRequest) -> Result<BookingAck, ClientError> {
        let mut builder = self
            .client
            .post(format!("{}/v1/bookings/comprehensive", self.base_url))
            .json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::ApiError {
                status: StatusCode::UNAUTHORIZED.as_u16(),
                message: "Session expired".to_string(),
            });
        }
        read_json(response).await
    }
}
