//! Point ledger HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use point_core::{PointHistory, UserId, UserPoint};

use crate::error::ClientError;
use crate::types::{AmountRequest, ApiErrorResponse};

/// Point ledger API client.
///
/// Wraps the balance, history, charge and use endpoints.
#[derive(Debug, Clone)]
pub struct PointClient {
    client: Client,
    base_url: String,
}

impl PointClient {
    /// Create a new point client.
    ///
    /// `base_url` is the service root, e.g. `"http://point-ledger:8080"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new point client with custom options.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Get a user's current balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_user_point(&self, user_id: UserId) -> Result<UserPoint, ClientError> {
        let url = format!("{}/point/{user_id}", self.base_url);

        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List a user's history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_point_histories(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PointHistory>, ClientError> {
        let url = format!("{}/point/{user_id}/histories", self.base_url);

        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Charge points to a user.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidRequest`] if the amount breaks a charge
    /// rule, [`ClientError::PersistenceFailure`] if the service could not
    /// commit, or another error if the request fails.
    pub async fn charge_point(&self, user_id: UserId, amount: i64) -> Result<UserPoint, ClientError> {
        self.mutate(user_id, "charge", amount).await
    }

    /// Use points from a user's balance.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InsufficientBalance`] if the balance does not
    /// cover the amount, [`ClientError::InvalidRequest`] for other rejected
    /// amounts, [`ClientError::PersistenceFailure`] if the service could not
    /// commit, or another error if the request fails.
    pub async fn use_point(&self, user_id: UserId, amount: i64) -> Result<UserPoint, ClientError> {
        self.mutate(user_id, "use", amount).await
    }

    async fn mutate(
        &self,
        user_id: UserId,
        action: &str,
        amount: i64,
    ) -> Result<UserPoint, ClientError> {
        let url = format!("{}/point/{user_id}/{action}", self.base_url);
        tracing::debug!(%user_id, amount, action, "Sending point mutation");

        let response = self
            .client
            .patch(&url)
            .json(&AmountRequest { amount })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let body = api_error.error;
                match body.code.as_str() {
                    "invalid_request" => Err(
                        match (body.detail_i64("balance"), body.detail_i64("required")) {
                            (Some(balance), Some(required)) => {
                                ClientError::InsufficientBalance { balance, required }
                            }
                            _ => ClientError::InvalidRequest {
                                message: body.message,
                            },
                        },
                    ),
                    "persistence_failure" => Err(ClientError::PersistenceFailure {
                        message: body.message,
                    }),
                    _ => Err(ClientError::Api {
                        code: body.code,
                        message: body.message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

impl ClientOptions {
    /// Create options with a request timeout.
    #[must_use]
    pub fn with_timeout_seconds(timeout_seconds: u64) -> Self {
        Self { timeout_seconds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = PointClient::new("http://localhost:8080").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = PointClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_options() {
        let options = ClientOptions::with_timeout_seconds(5);
        assert_eq!(options.timeout_seconds, 5);
        assert!(PointClient::with_options("http://localhost:8080", options).is_ok());
    }
}
