//! Shared base URL and authorization headers
//!
//! The public API lives under `{base}/public/v1/...` while the current-user
//! endpoint lives under `{base}/user/self`. Both are kept as the service
//! exposes them.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the API key is presented in the `Authorization` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// The key verbatim, as the public API expects
    #[default]
    Raw,
    /// `Bearer <key>`
    Bearer,
}

#[derive(Clone)]
pub struct Settings {
    base_url: String,
    token: SecretString,
}

impl Settings {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: SecretString::from(token.to_string()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/public/v1/{path}`
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/public/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn user_self_url(&self) -> String {
        format!("{}/user/self", self.base_url)
    }

    pub fn login_url(&self) -> String {
        format!("{}/auth/login", self.base_url)
    }

    /// Value of the `Authorization` header for the given scheme
    pub fn authorization(&self, scheme: AuthScheme) -> String {
        match scheme {
            AuthScheme::Raw => self.token.expose_secret().to_string(),
            AuthScheme::Bearer => format!("Bearer {}", self.token.expose_secret()),
        }
    }

    /// Header map in the bearer style
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert(
            "Authorization".to_string(),
            self.authorization(AuthScheme::Bearer),
        );
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let settings = Settings::new("https://postiz.local/api/", "tok");
        assert_eq!(settings.base_url(), "https://postiz.local/api");
        assert_eq!(
            settings.public_url("posts"),
            "https://postiz.local/api/public/v1/posts"
        );
        assert_eq!(
            settings.public_url("/integrations"),
            "https://postiz.local/api/public/v1/integrations"
        );
        assert_eq!(settings.user_self_url(), "https://postiz.local/api/user/self");
        assert_eq!(settings.login_url(), "https://postiz.local/api/auth/login");
    }

    #[test]
    fn test_headers_use_bearer() {
        let settings = Settings::new("https://postiz.local/api", "tok");
        let headers = settings.headers();
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer tok");
        assert_eq!(headers.get("Content-Type").unwrap(), "application/json");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_authorization_schemes() {
        let settings = Settings::new("https://postiz.local/api", "tok");
        assert_eq!(settings.authorization(AuthScheme::Raw), "tok");
        assert_eq!(settings.authorization(AuthScheme::Bearer), "Bearer tok");
    }

    #[test]
    fn test_debug_hides_token() {
        let settings = Settings::new("https://postiz.local/api", "hidden-token");
        assert!(!format!("{:?}", settings).contains("hidden-token"));
    }
}
