use crate::config::Config;
use crate::domain::capture::CaptureResult;
use crate::domain::order::{CreateOrder, OrderResult};
use crate::domain::ports::PaymentProvider;
use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

const TOKEN_PATH: &str = "/v1/oauth2/token";
const ORDERS_PATH: &str = "/v2/checkout/orders";
/// Tokens are refreshed this long before the provider expires them.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Orders API client authenticated with client credentials.
///
/// The bearer token is fetched on first use and reused until shortly before
/// it expires. Request bodies and response headers are logged at `info`.
pub struct PayPalClient {
    http: Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    token: RwLock<Option<AccessToken>>,
}

impl PayPalClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.environment.base_url().to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: RwLock::new(None),
        })
    }

    /// Points the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref()
            && token.is_fresh()
        {
            return Ok(token.value.clone());
        }

        debug!("requesting access token");
        let response = self
            .http
            .post(format!("{}{TOKEN_PATH}", self.base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;
        let token: TokenResponse = read_response(response).await?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *self.token.write().await = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentProvider for PayPalClient {
    async fn create_order(&self, request: &CreateOrder) -> Result<OrderResult> {
        let token = self.access_token().await?;
        let body = serde_json::to_string(&request.body)?;
        info!(%body, prefer = request.prefer.header_value(), "POST {ORDERS_PATH}");

        let response = self
            .http
            .post(format!("{}{ORDERS_PATH}", self.base_url))
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", request.prefer.header_value())
            .body(body)
            .send()
            .await?;
        read_response(response).await
    }

    async fn capture_order(&self, order_id: &str) -> Result<CaptureResult> {
        let token = self.access_token().await?;
        info!(order_id, "POST {ORDERS_PATH}/{{id}}/capture");

        let response = self
            .http
            .post(format!("{}{ORDERS_PATH}/{order_id}/capture", self.base_url))
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        read_response(response).await
    }
}

async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    info!(status = status.as_u16(), headers = ?response.headers(), "provider response");

    let body = response.text().await?;
    if !status.is_success() {
        return Err(provider_error(status.as_u16(), &body).into());
    }
    Ok(serde_json::from_str(&body)?)
}

fn provider_error(status: u16, body: &str) -> ProviderError {
    let payload = serde_json::from_str::<Value>(body).unwrap_or_else(|_| json!({ "message": body }));
    ProviderError::new(status, payload)
}
