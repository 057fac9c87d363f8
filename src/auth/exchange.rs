//! Client for the token-exchange relay

use reqwest::Url;
use serde::Deserialize;

use crate::error::AuthError;

#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    access_token: Option<String>,
    error: Option<serde_json::Value>,
    error_description: Option<String>,
}

impl ExchangeResponse {
    fn failure_reason(&self, status: reqwest::StatusCode) -> String {
        if let Some(description) = &self.error_description {
            return description.clone();
        }
        match &self.error {
            Some(serde_json::Value::String(error)) => error.clone(),
            Some(other) => other.to_string(),
            None => format!("relay responded with {status} and no access token"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExchangeClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ExchangeClient {
    /// `relay_url` is the relay's base URL; requests go to `<base>/exchange`
    pub fn new(relay_url: &Url) -> Result<Self, AuthError> {
        let mut base = relay_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join("exchange")
            .map_err(|e| AuthError::TokenExchange(format!("invalid relay URL: {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Trade an authorization code for an access token
    pub async fn exchange(&self, code: &str) -> Result<String, AuthError> {
        if code.is_empty() {
            return Err(AuthError::MissingAuthorizationCode);
        }

        tracing::debug!(endpoint = %self.endpoint, "Exchanging authorization code");
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("code", code)])
            .send()
            .await?;
        let status = response.status();
        let body: ExchangeResponse = response.json().await?;

        match body.access_token {
            Some(ref token) if !token.is_empty() => {
                tracing::info!("Token exchange succeeded");
                Ok(token.clone())
            }
            _ => {
                let reason = body.failure_reason(status);
                tracing::warn!(status = %status, reason = %reason, "Token exchange failed");
                Err(AuthError::TokenExchange(reason))
            }
        }
    }
}
