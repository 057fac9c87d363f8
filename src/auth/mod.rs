//! Login flow
//!
//! Sends the user to the provider's authorize page, captures the redirect on
//! a local listener, trades the code for an access token through the relay
//! and stores the token in a [`SessionStore`].

mod exchange;
mod redirect;
mod session;

use reqwest::Url;
use serde::Deserialize;

use crate::error::AuthError;

pub use exchange::ExchangeClient;
pub use redirect::RedirectListener;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, DEFAULT_SESSION_FILE};

const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
pub const SCOPES: &str = "streaming user-read-email user-read-private user-library-read user-library-modify user-read-playback-state user-modify-playback-state";

/// Where to send the user and where the relay lives
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub client_id: String,
    pub redirect_uri: Url,
    pub relay_url: Url,
}

/// Query parameters of the provider's redirect
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CallbackParams {
    /// The authorization code, or the reason there is none
    pub fn into_code(self) -> Result<String, AuthError> {
        if let Some(error) = self.error {
            return Err(AuthError::AuthorizationDenied(error));
        }
        match self.code {
            Some(code) if !code.is_empty() => Ok(code),
            _ => Err(AuthError::MissingAuthorizationCode),
        }
    }
}

pub fn authorize_url(config: &AuthConfig) -> Url {
    let mut url = Url::parse(AUTHORIZE_URL).expect("authorize URL constant is valid");
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &config.client_id)
        .append_pair("scope", SCOPES)
        .append_pair("redirect_uri", config.redirect_uri.as_str())
        .append_pair("show_dialog", "true");
    url
}

/// Return the stored token, or run the browser login and store the result.
/// Nothing is stored when any step fails.
pub async fn login<S: SessionStore>(config: &AuthConfig, session: &S) -> Result<String, AuthError> {
    if let Some(token) = session.get_token()? {
        tracing::info!("Using stored session token");
        return Ok(token);
    }

    let listener = RedirectListener::bind(&config.redirect_uri).await?;
    let url = authorize_url(config);
    tracing::info!("Starting browser-based login");
    println!("Log in with Spotify by opening this URL in your browser:\n\n  {}\n", url);

    let code = listener.wait().await?.into_code()?;
    let token = ExchangeClient::new(&config.relay_url)?.exchange(&code).await?;
    session.set_token(&token)?;
    tracing::info!("Login completed");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            client_id: "client-123".to_string(),
            redirect_uri: Url::parse("http://127.0.0.1:8898/callback").unwrap(),
            relay_url: Url::parse("http://127.0.0.1:3001").unwrap(),
        }
    }

    #[test]
    fn authorize_url_carries_required_parameters() {
        let url = authorize_url(&config());
        let pairs: std::collections::HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["client_id"], "client-123");
        assert_eq!(pairs["redirect_uri"], "http://127.0.0.1:8898/callback");
        assert_eq!(pairs["show_dialog"], "true");
        assert!(pairs["scope"].split(' ').any(|s| s == "streaming"));
        assert!(pairs["scope"].split(' ').any(|s| s == "user-library-read"));
    }

    #[test]
    fn callback_with_code() {
        let params = CallbackParams {
            code: Some("AQB".into()),
            error: None,
        };
        assert_eq!(params.into_code().unwrap(), "AQB");
    }

    #[test]
    fn callback_with_error_is_denied() {
        let params = CallbackParams {
            code: None,
            error: Some("access_denied".into()),
        };
        assert!(matches!(params.into_code(), Err(AuthError::AuthorizationDenied(e)) if e == "access_denied"));
    }

    #[test]
    fn callback_without_code_or_error() {
        assert!(matches!(
            CallbackParams::default().into_code(),
            Err(AuthError::MissingAuthorizationCode)
        ));
        let empty = CallbackParams {
            code: Some(String::new()),
            error: None,
        };
        assert!(matches!(empty.into_code(), Err(AuthError::MissingAuthorizationCode)));
    }

    #[tokio::test]
    async fn login_uses_stored_token_without_network() {
        let session = MemorySessionStore::default();
        session.set_token("stored").unwrap();
        assert_eq!(login(&config(), &session).await.unwrap(), "stored");
    }
}
