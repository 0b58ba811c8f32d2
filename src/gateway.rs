//! Remote data gateway port and its hosted-backend implementation.
//!
//! The portal never talks to the backend directly; everything goes through
//! [`DataGateway`] so the query layer and login guard can be exercised
//! against fakes.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::PortalConfig;
use crate::error::GatewayError;
use crate::model::Session;

/// Sort direction for a `select`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: Direction,
}

/// A read against one backing collection.
#[derive(Debug, Clone)]
pub struct SelectRequest {
    pub collection: &'static str,
    pub columns: &'static str,
    /// Single equality filter, e.g. `("minggu", "ganjil")`.
    pub filter: Option<(&'static str, String)>,
    pub order: Option<OrderBy>,
}

impl SelectRequest {
    pub fn new(collection: &'static str) -> Self {
        Self {
            collection,
            columns: "*",
            filter: None,
            order: None,
        }
    }

    pub fn columns(mut self, columns: &'static str) -> Self {
        self.columns = columns;
        self
    }

    pub fn filter_eq(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.filter = Some((column, value.into()));
        self
    }

    pub fn order_by(mut self, column: &'static str, direction: Direction) -> Self {
        self.order = Some(OrderBy { column, direction });
        self
    }
}

/// Row-oriented read/mutate interface to the hosted backend, plus the
/// authentication call.
#[async_trait]
pub trait DataGateway: Send + Sync {
    async fn select(&self, request: SelectRequest) -> Result<Vec<Value>, GatewayError>;

    async fn insert(&self, collection: &str, record: Value) -> Result<(), GatewayError>;

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), GatewayError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), GatewayError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError>;
}

/// `reqwest`-backed gateway speaking the hosted backend's REST dialect:
/// PostgREST-style row endpoints under `/rest/v1` and a password-grant
/// token endpoint under `/auth/v1`.
pub struct SupabaseGateway {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_secs: u64,
}

impl SupabaseGateway {
    pub fn new(config: &PortalConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    fn rest_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    fn classify(&self, collection: &str, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout {
                collection: collection.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            GatewayError::Transport {
                collection: collection.to_string(),
                message: err.to_string(),
            }
        }
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check_status(
        &self,
        collection: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(GatewayError::Backend {
            collection: collection.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DataGateway for SupabaseGateway {
    async fn select(&self, request: SelectRequest) -> Result<Vec<Value>, GatewayError> {
        let collection = request.collection;
        let mut query: Vec<(String, String)> =
            vec![("select".to_string(), request.columns.to_string())];
        if let Some((column, value)) = &request.filter {
            query.push(((*column).to_string(), format!("eq.{value}")));
        }
        if let Some(order) = &request.order {
            let dir = match order.direction {
                Direction::Ascending => "asc",
                Direction::Descending => "desc",
            };
            query.push(("order".to_string(), format!("{}.{dir}", order.column)));
        }

        debug!(collection, "issuing select");
        let response = self
            .authed(self.http.get(self.rest_url(collection)).query(&query))
            .send()
            .await
            .map_err(|err| self.classify(collection, err))?;
        let response = self.check_status(collection, response).await?;
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|err| GatewayError::MalformedResponse {
                collection: collection.to_string(),
                message: err.to_string(),
            })
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<(), GatewayError> {
        let response = self
            .authed(self.http.post(self.rest_url(collection)))
            .header("Prefer", "return=minimal")
            .json(&record)
            .send()
            .await
            .map_err(|err| self.classify(collection, err))?;
        self.check_status(collection, response).await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), GatewayError> {
        let response = self
            .authed(
                self.http
                    .patch(self.rest_url(collection))
                    .query(&[("id", format!("eq.{id}"))]),
            )
            .header("Prefer", "return=minimal")
            .json(&patch)
            .send()
            .await
            .map_err(|err| self.classify(collection, err))?;
        self.check_status(collection, response).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), GatewayError> {
        let response = self
            .authed(
                self.http
                    .delete(self.rest_url(collection))
                    .query(&[("id", format!("eq.{id}"))]),
            )
            .send()
            .await
            .map_err(|err| self.classify(collection, err))?;
        self.check_status(collection, response).await?;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let response = self
            .authed(
                self.http
                    .post(url)
                    .query(&[("grant_type", "password")])
                    .json(&serde_json::json!({ "email": email, "password": password })),
            )
            .send()
            .await
            .map_err(|err| self.classify("auth", err))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("error_description")
                .or_else(|| body.get("msg"))
                .and_then(Value::as_str)
                .unwrap_or("invalid login credentials")
                .to_string();
            return Err(GatewayError::AuthRejected { message });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|err| GatewayError::MalformedResponse {
                    collection: "auth".to_string(),
                    message: err.to_string(),
                })?;
        Ok(Session {
            access_token: token.access_token,
            user_id: token.user.id,
            email: token.user.email,
            role: token.user.role,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    role: Option<String>,
}
