use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::{
    auth::ADMIN_SECRET_HEADER,
    error::RegistryError,
    models::{Card, CardInput, CreateCardResponse, DeleteCardRequest, ErrorBody},
    registry::CardRegistry,
};

/// ClientError
///
/// What a caller of the Card Registry Service can observe. `Network` covers every
/// transport failure; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Invalid password")]
    Unauthorized,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Card not found")]
    NotFound,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Unknown(String),
}

/// CardRegistryApi
///
/// The Card Registry Service as seen from the moderation panel.
#[async_trait]
pub trait CardRegistryApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Card>, ClientError>;
    async fn verify(&self, secret: &str) -> Result<(), ClientError>;
    async fn create(&self, secret: &str, input: CardInput) -> Result<Card, ClientError>;
    async fn delete(&self, secret: &str, id: &str) -> Result<(), ClientError>;
}

/// HttpCardRegistryClient
///
/// Talks to `/api/cards` over HTTP, sending the secret in the `x-admin-secret`
/// header rather than in the body.
#[derive(Clone)]
pub struct HttpCardRegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCardRegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a non-success response into the matching error, reading the `{error}`
/// body when there is one.
async fn error_from_response(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::BAD_REQUEST => ClientError::InvalidInput(message),
        _ => ClientError::Unknown(format!("{status}: {message}")),
    }
}

fn network(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

#[async_trait]
impl CardRegistryApi for HttpCardRegistryClient {
    async fn list(&self) -> Result<Vec<Card>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/cards"))
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        response
            .json::<Vec<Card>>()
            .await
            .map_err(|e| ClientError::Unknown(e.to_string()))
    }

    async fn verify(&self, secret: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url("/api/cards/verify"))
            .header(ADMIN_SECRET_HEADER, secret)
            .send()
            .await
            .map_err(network)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn create(&self, secret: &str, input: CardInput) -> Result<Card, ClientError> {
        let response = self
            .http
            .post(self.url("/api/cards"))
            .header(ADMIN_SECRET_HEADER, secret)
            .json(&CardInput {
                password: None,
                ..input
            })
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        response
            .json::<CreateCardResponse>()
            .await
            .map(|body| body.card)
            .map_err(|e| ClientError::Unknown(e.to_string()))
    }

    async fn delete(&self, secret: &str, id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url("/api/cards"))
            .header(ADMIN_SECRET_HEADER, secret)
            .json(&DeleteCardRequest {
                password: None,
                id: Some(id.to_string()),
            })
            .send()
            .await
            .map_err(network)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}

// --- In-Process Adapter ---

impl From<RegistryError> for ClientError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Unauthorized => ClientError::Unauthorized,
            RegistryError::NotFound => ClientError::NotFound,
            RegistryError::InvalidInput | RegistryError::MalformedRequest => {
                ClientError::InvalidInput(err.to_string())
            }
            RegistryError::Store(store) => ClientError::Unknown(store.to_string()),
        }
    }
}

/// Lets a panel drive a registry living in the same process, with no HTTP hop.
#[async_trait]
impl CardRegistryApi for CardRegistry {
    async fn list(&self) -> Result<Vec<Card>, ClientError> {
        Ok(CardRegistry::list(self).await?)
    }

    async fn verify(&self, secret: &str) -> Result<(), ClientError> {
        Ok(CardRegistry::verify(self, secret)?)
    }

    async fn create(&self, secret: &str, input: CardInput) -> Result<Card, ClientError> {
        Ok(CardRegistry::create(self, secret, input).await?)
    }

    async fn delete(&self, secret: &str, id: &str) -> Result<(), ClientError> {
        Ok(CardRegistry::delete(self, secret, id).await?)
    }
}
