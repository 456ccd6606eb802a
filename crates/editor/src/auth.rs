//! Account access for cloud storage.
//!
//! The interactive OAuth consent flow is not done here: a [`TokenAuth`] takes
//! an access token from a [`TokenSource`] (by default an environment variable)
//! and uses it for Drive and the People API.

use std::future::Future;
use std::sync::{Arc, Mutex};

use desk_core::EditorError;

/// Environment variable read by [`TokenSource::default`]
pub const TOKEN_ENV_VAR: &str = "DESK_EDITOR_ACCESS_TOKEN";

const PEOPLE_ME_URL: &str = "https://people.googleapis.com/v1/people/me";
const REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";

/// Called with the new signed-in state after every sign-in or sign-out
pub type StatusListener = Box<dyn Fn(bool) + Send + Sync>;

/// Sign-in state and credentials for storage backends that need an account
pub trait AuthProvider: Send + Sync {
    fn is_signed_in(&self) -> bool;

    /// Bearer token for API calls, if signed in
    fn access_token(&self) -> Option<String>;

    fn sign_in(&self) -> impl Future<Output = Result<(), EditorError>> + Send;

    fn sign_out(&self) -> impl Future<Output = ()> + Send;

    /// Display name of the signed-in user; `None` when signed out or on failure
    fn user_name(&self) -> impl Future<Output = Option<String>> + Send;

    /// Register a callback for sign-in state changes
    fn on_status_change(&self, listener: StatusListener);
}

/// Where [`TokenAuth`] gets its access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Read from this environment variable at sign-in
    Env(String),
    /// A fixed token
    Static(String),
}

impl Default for TokenSource {
    fn default() -> Self {
        TokenSource::Env(TOKEN_ENV_VAR.to_string())
    }
}

impl TokenSource {
    fn fetch(&self) -> Option<String> {
        let token = match self {
            TokenSource::Env(var) => std::env::var(var).ok()?,
            TokenSource::Static(token) => token.clone(),
        };
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}

/// Google account access from a pre-issued OAuth access token
pub struct TokenAuth {
    source: TokenSource,
    token: Mutex<Option<String>>,
    listeners: Mutex<Vec<Arc<dyn Fn(bool) + Send + Sync>>>,
    client: reqwest::Client,
    people_url: String,
    revoke_url: Option<String>,
}

impl TokenAuth {
    pub fn new(source: TokenSource) -> Self {
        Self {
            source,
            token: Mutex::new(None),
            listeners: Mutex::new(Vec::new()),
            client: reqwest::Client::new(),
            people_url: PEOPLE_ME_URL.to_string(),
            revoke_url: None,
        }
    }

    /// Token from [`TOKEN_ENV_VAR`]; revoked with Google on sign-out
    pub fn from_env() -> Self {
        Self::new(TokenSource::default()).revoke_at(REVOKE_URL)
    }

    /// Revoke the token at `url` when signing out
    pub fn revoke_at(mut self, url: &str) -> Self {
        self.revoke_url = Some(url.to_string());
        self
    }

    /// Fetch the user name from `url` instead of the People API
    pub fn people_url(mut self, url: &str) -> Self {
        self.people_url = url.to_string();
        self
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = token;
        }
    }

    /// Listeners run without the lock held, so they may register more listeners
    fn notify(&self, signed_in: bool) {
        let listeners = match self.listeners.lock() {
            Ok(listeners) => listeners.clone(),
            Err(_) => return,
        };
        for listener in &listeners {
            listener(signed_in);
        }
    }

    async fn revoke(&self, url: &str, token: &str) {
        let result = self
            .client
            .post(url)
            .query(&[("token", token)])
            .send()
            .await
            .and_then(|r| r.error_for_status());
        if let Err(e) = result {
            tracing::warn!("Token revoke failed: {e}");
        }
    }

    async fn fetch_user_name(&self, token: &str) -> Result<Option<String>, reqwest::Error> {
        let body: serde_json::Value = self
            .client
            .get(&self.people_url)
            .query(&[("personFields", "names")])
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(display_name(&body))
    }
}

/// `names[0].displayName` of a People API person
fn display_name(person: &serde_json::Value) -> Option<String> {
    person["names"]
        .get(0)?
        .get("displayName")?
        .as_str()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

impl AuthProvider for TokenAuth {
    fn is_signed_in(&self) -> bool {
        self.access_token().is_some()
    }

    fn access_token(&self) -> Option<String> {
        self.token.lock().ok()?.clone()
    }

    async fn sign_in(&self) -> Result<(), EditorError> {
        let token = self.source.fetch().ok_or_else(|| {
            EditorError::Transport(match &self.source {
                TokenSource::Env(var) => format!("no access token: set {var}"),
                TokenSource::Static(_) => "no access token".to_string(),
            })
        })?;
        self.set_token(Some(token));
        tracing::info!("Signed in");
        self.notify(true);
        Ok(())
    }

    async fn sign_out(&self) {
        let Some(token) = self.access_token() else {
            return;
        };
        if let Some(url) = &self.revoke_url {
            self.revoke(url, &token).await;
        }
        self.set_token(None);
        tracing::info!("Signed out");
        self.notify(false);
    }

    async fn user_name(&self) -> Option<String> {
        let token = self.access_token()?;
        match self.fetch_user_name(&token).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Error fetching user name: {e}");
                None
            }
        }
    }

    fn on_status_change(&self, listener: StatusListener) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(Arc::from(listener));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_static_token_sign_in_out() {
        let auth = TokenAuth::new(TokenSource::Static("abc".into()));
        let changes = Arc::new(AtomicUsize::new(0));
        let seen = changes.clone();
        auth.on_status_change(Box::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(!auth.is_signed_in());
        auth.sign_in().await.unwrap();
        assert_eq!(auth.access_token().as_deref(), Some("abc"));
        auth.sign_out().await;
        assert!(!auth.is_signed_in());
        assert_eq!(changes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_listener_can_register_listener() {
        let auth = Arc::new(TokenAuth::new(TokenSource::Static("abc".into())));
        let late_calls = Arc::new(AtomicUsize::new(0));
        let weak = Arc::downgrade(&auth);
        let counter = late_calls.clone();
        auth.on_status_change(Box::new(move |_| {
            let Some(auth) = weak.upgrade() else {
                return;
            };
            let counter = counter.clone();
            auth.on_status_change(Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }));

        auth.sign_in().await.unwrap();
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        auth.sign_out().await;
        // Registered during sign-in, so it hears the sign-out
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_env_token() {
        let auth = TokenAuth::new(TokenSource::Env("DESK_EDITOR_TEST_UNSET_TOKEN".into()));
        let err = auth.sign_in().await.unwrap_err();
        assert!(err.to_string().contains("DESK_EDITOR_TEST_UNSET_TOKEN"));
        assert!(!auth.is_signed_in());
    }

    #[tokio::test]
    async fn test_user_name_when_signed_out() {
        let auth = TokenAuth::new(TokenSource::Static("abc".into()));
        assert_eq!(auth.user_name().await, None);
    }

    #[test]
    fn test_blank_token_is_none() {
        assert_eq!(TokenSource::Static("  ".into()).fetch(), None);
    }

    #[test]
    fn test_display_name() {
        let person = serde_json::json!({"names": [{"displayName": "Kim Desk"}]});
        assert_eq!(display_name(&person).as_deref(), Some("Kim Desk"));
        assert_eq!(display_name(&serde_json::json!({})), None);
        assert_eq!(display_name(&serde_json::json!({"names": []})), None);
    }
}
