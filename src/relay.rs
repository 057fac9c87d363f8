//! Token-exchange relay
//!
//! Holds the confidential client credentials so the game never has to. One
//! real endpoint, `GET /exchange?code=...`, forwards the code to the
//! provider's token endpoint and relays the provider's JSON verbatim.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::friendly_network_error;

pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_url: Url,
}

#[derive(Clone)]
struct RelayState {
    config: Arc<RelayConfig>,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ExchangeQuery {
    code: Option<String>,
}

pub fn create_router(config: RelayConfig) -> Router {
    let state = RelayState {
        config: Arc::new(config),
        http: reqwest::Client::new(),
    };

    Router::new()
        .route("/exchange", get(exchange))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn exchange(State(state): State<RelayState>, Query(query): Query<ExchangeQuery>) -> Response {
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        tracing::debug!("Exchange request without code");
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Code is required" }))).into_response();
    };

    match forward_code(&state, &code).await {
        Ok((status, body)) => {
            tracing::info!(status = %status, "Relayed token response");
            (status, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %friendly_network_error(&e), "Error exchanging code for token");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}

async fn forward_code(state: &RelayState, code: &str) -> Result<(StatusCode, Value), reqwest::Error> {
    let config = &state.config;
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];

    let response = state
        .http
        .post(config.token_url.clone())
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&params)
        .send()
        .await?;

    let status = response.status();
    let body: Value = response.json().await?;
    Ok((status, body))
}
