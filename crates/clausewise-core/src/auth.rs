//! Signup and login against the remote auth endpoint.
//!
//! Every outcome, including transport failures, is folded into an
//! [`AuthResult`] so callers only ever render a message. A successful login
//! writes the returned identity to the session store before returning.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::Config;
use crate::session::{Identity, SessionStore};

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";
const SESSION_WRITE_ERROR_MESSAGE: &str = "Could not save your session. Please try again.";

/// Outcome of a signup or login attempt. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    /// For login, `identity` is the logged-in user; for signup, the account
    /// that was registered.
    Success { identity: Identity, message: String },
    Failure { message: String },
}

impl AuthResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthResult::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            AuthResult::Success { message, .. } | AuthResult::Failure { message } => message,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthResult::Success { identity, .. } => Some(identity),
            AuthResult::Failure { .. } => None,
        }
    }
}

/// Internal failure taxonomy, folded into [`AuthResult::Failure`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unreachable, timed out, or the body was not what the endpoint promises.
    #[error("auth transport error: {0}")]
    Transport(String),

    /// Non-2xx response.
    #[error("auth rejected (HTTP {status}): {message:?}")]
    Rejected { status: u16, message: Option<String> },
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Transport(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    #[serde(default)]
    message: Option<String>,
    user: Option<Identity>,
}

/// Client for `POST {base}/signup` and `POST {base}/login`.
#[derive(Clone)]
pub struct AuthGateway {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl AuthGateway {
    /// Creates a gateway rooted at `base_url` (e.g. `http://host/api/auth`).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build auth HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config, session: Arc<dyn SessionStore>) -> Result<Self> {
        Self::new(config.auth_url(), config.request_timeout(), session)
    }

    /// Registers a new account. Does not log in.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> AuthResult {
        let body = serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        });

        match self.post::<MessageBody>("signup", &body).await {
            Ok(data) => {
                tracing::info!(email, "signup accepted");
                AuthResult::Success {
                    identity: Identity::new(name, email),
                    message: data
                        .message
                        .unwrap_or_else(|| "Account created successfully".to_string()),
                }
            }
            Err(err) => fold_failure(err, "Signup failed"),
        }
    }

    /// Logs in and persists the returned identity before reporting success.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let data = match self.post::<LoginBody>("login", &body).await {
            Ok(data) => data,
            Err(err) => return fold_failure(err, "Login failed"),
        };

        let Some(identity) = data.user else {
            return fold_failure(
                AuthError::Transport("login response is missing `user`".to_string()),
                "Login failed",
            );
        };

        if let Err(err) = self.session.set(&identity) {
            tracing::warn!(error = %format!("{err:#}"), "failed to persist session after login");
            return AuthResult::Failure {
                message: SESSION_WRITE_ERROR_MESSAGE.to_string(),
            };
        }

        tracing::info!(email = %identity.email, "logged in");
        AuthResult::Success {
            identity,
            message: data.message.unwrap_or_else(|| "Login successful".to_string()),
        }
    }

    /// Posts JSON and decodes the body. The body must be JSON even on error
    /// statuses; anything else is a transport failure.
    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, AuthError> {
        let url = format!("{}/{endpoint}", self.base_url);
        tracing::debug!(%url, "auth request");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<MessageBody>(&bytes)
                .map_err(|e| AuthError::Transport(format!("undecodable error body: {e}")))?
                .message;
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::Transport(format!("undecodable response body: {e}")))
    }
}

fn fold_failure(err: AuthError, fallback: &str) -> AuthResult {
    tracing::warn!(error = %err, "auth request failed");
    let message = match err {
        AuthError::Transport(_) => NETWORK_ERROR_MESSAGE.to_string(),
        AuthError::Rejected { message, .. } => message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string()),
    };
    AuthResult::Failure { message }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::session::MemorySessionStore;

    fn gateway(server: &MockServer) -> (AuthGateway, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let gateway = AuthGateway::new(
            format!("{}/api/auth", server.uri()),
            Duration::from_secs(5),
            store.clone(),
        )
        .unwrap();
        (gateway, store)
    }

    #[tokio::test]
    async fn test_login_success_persists_identity_before_returning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(serde_json::json!({
                "email": "jane@x.com",
                "password": "hunter2",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": "Welcome back",
                "user": { "name": "Jane", "email": "jane@x.com", "role": "admin" },
            })))
            .expect(1)
            .mount(&server)
            .await;
        let (gateway, store) = gateway(&server);

        let result = gateway.login("jane@x.com", "hunter2").await;

        assert_eq!(
            result,
            AuthResult::Success {
                identity: Identity::new("Jane", "jane@x.com"),
                message: "Welcome back".to_string(),
            }
        );
        assert_eq!(store.get(), result.identity().cloned());
    }

    #[tokio::test]
    async fn test_login_default_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": { "name": "Jane", "email": "jane@x.com" },
            })))
            .mount(&server)
            .await;
        let (gateway, _) = gateway(&server);

        let result = gateway.login("jane@x.com", "pw").await;
        assert_eq!(result.message(), "Login successful");
    }

    #[tokio::test]
    async fn test_login_rejection_uses_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "message": "Invalid credentials" })),
            )
            .mount(&server)
            .await;
        let (gateway, store) = gateway(&server);

        let result = gateway.login("jane@x.com", "wrong").await;

        assert_eq!(
            result,
            AuthResult::Failure {
                message: "Invalid credentials".to_string()
            }
        );
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn test_login_rejection_without_message_uses_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        let (gateway, _) = gateway(&server);

        let result = gateway.login("jane@x.com", "pw").await;
        assert_eq!(result.message(), "Login failed");
    }

    #[tokio::test]
    async fn test_login_malformed_body_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;
        let (gateway, store) = gateway(&server);

        let result = gateway.login("jane@x.com", "pw").await;

        assert_eq!(result.message(), NETWORK_ERROR_MESSAGE);
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn test_login_without_user_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "message": "ok" })),
            )
            .mount(&server)
            .await;
        let (gateway, store) = gateway(&server);

        let result = gateway.login("jane@x.com", "pw").await;

        assert_eq!(result.message(), NETWORK_ERROR_MESSAGE);
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let store = Arc::new(MemorySessionStore::new());
        let gateway = AuthGateway::new(
            format!("http://127.0.0.1:{port}/api/auth"),
            Duration::from_secs(2),
            store.clone(),
        )
        .unwrap();

        assert_eq!(
            gateway.login("jane@x.com", "pw").await.message(),
            NETWORK_ERROR_MESSAGE
        );
        assert_eq!(
            gateway.signup("Jane", "jane@x.com", "pw").await.message(),
            NETWORK_ERROR_MESSAGE
        );
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn test_signup_success_does_not_touch_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup"))
            .and(body_json(serde_json::json!({
                "name": "Jane",
                "email": "jane@x.com",
                "password": "pw",
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "message": "User created" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        let store = Arc::new(MemorySessionStore::with_identity(Identity::new(
            "Sam",
            "sam@x.com",
        )));
        let gateway = AuthGateway::new(
            format!("{}/api/auth", server.uri()),
            Duration::from_secs(5),
            store.clone(),
        )
        .unwrap();

        let result = gateway.signup("Jane", "jane@x.com", "pw").await;

        assert!(result.is_success());
        assert_eq!(result.message(), "User created");
        assert_eq!(store.get(), Some(Identity::new("Sam", "sam@x.com")));
    }

    #[tokio::test]
    async fn test_signup_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(serde_json::json!({ "message": "Email already registered" })),
            )
            .mount(&server)
            .await;
        let (gateway, store) = gateway(&server);

        let result = gateway.signup("Jane", "jane@x.com", "pw").await;

        assert_eq!(result.message(), "Email already registered");
        assert!(!result.is_success());
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn test_signup_rejection_without_message_uses_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        let (gateway, _) = gateway(&server);

        assert_eq!(
            gateway.signup("Jane", "jane@x.com", "pw").await.message(),
            "Signup failed"
        );
    }
}
