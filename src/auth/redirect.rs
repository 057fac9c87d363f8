//! One-shot listener for the provider's redirect back to us

use std::future::IntoFuture;

use axum::{extract::Query, response::Html, routing::get, Router};
use reqwest::Url;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::error::AuthError;

use super::CallbackParams;

const RESPONSE: &str = r#"
<!doctype html>
<html>
<head><title>Song Guesser</title></head>
<body><h1>Authenticating with Spotify...</h1><p>You can close this window.</p><script>window.close();</script></body>
</html>
"#;

pub struct RedirectListener {
    listener: TcpListener,
    path: String,
}

impl RedirectListener {
    /// Bind the host and port named by `redirect_uri`
    pub async fn bind(redirect_uri: &Url) -> Result<Self, AuthError> {
        let host = redirect_uri
            .host_str()
            .ok_or_else(|| AuthError::Redirect(format!("redirect URI has no host: {redirect_uri}")))?;
        let port = redirect_uri
            .port_or_known_default()
            .ok_or_else(|| AuthError::Redirect(format!("redirect URI has no port: {redirect_uri}")))?;

        let listener = TcpListener::bind((host, port))
            .await
            .map_err(|e| AuthError::Redirect(format!("cannot listen on {host}:{port}: {e}")))?;

        let path = match redirect_uri.path() {
            "" => "/".to_string(),
            p => p.to_string(),
        };
        tracing::debug!(host, port, path = %path, "Redirect listener bound");

        Ok(Self { listener, path })
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until the first request on the redirect path arrives
    pub async fn wait(self) -> Result<CallbackParams, AuthError> {
        let (tx, mut rx) = mpsc::channel::<CallbackParams>(1);

        let app = Router::new().route(
            &self.path,
            get(move |Query(params): Query<CallbackParams>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(params).await;
                    Html(RESPONSE)
                }
            }),
        );

        let server = axum::serve(self.listener, app).into_future();
        tokio::select! {
            result = server => Err(AuthError::Redirect(match result {
                Ok(()) => "listener stopped".to_string(),
                Err(e) => e.to_string(),
            })),
            Some(params) = rx.recv() => Ok(params),
        }
    }
}
