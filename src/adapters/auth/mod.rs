//! OAuth credential collaborator
//!
//! Loads the OAuth client secrets and the cached user token from disk,
//! refreshes the access token through the token endpoint when it has
//! expired, and rewrites the cache so the session survives across runs.
//! The interactive consent flow is out of scope for a non-interactive
//! CLI: a missing or refresh-less token cache is a configuration error.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CopyError, CopyResult};

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Refresh slightly before the recorded expiry to absorb clock skew
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth client ID JSON as downloaded from the Google Cloud console
#[derive(Debug, Deserialize)]
struct ClientSecrets {
    #[serde(alias = "web")]
    installed: ClientSecretEntry,
}

#[derive(Debug, Deserialize)]
struct ClientSecretEntry {
    client_id: String,
    client_secret: String,
}

/// Cached token file, shaped like what the stock Google client
/// libraries write. Unknown fields are preserved across rewrites.
#[derive(Debug, Serialize, Deserialize)]
struct TokenCache {
    token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiry: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Owns the token lifecycle for the Drive adapter
pub struct Authenticator {
    credentials_path: PathBuf,
    token_path: PathBuf,
    http: Client,
}

impl Authenticator {
    pub fn new(credentials_path: impl Into<PathBuf>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            token_path: token_path.into(),
            http: Client::new(),
        }
    }

    /// Return a usable access token, refreshing and rewriting the cache
    /// when the cached one has expired.
    pub async fn access_token(&self) -> CopyResult<String> {
        let mut cache = self.read_cache()?;
        if !is_expired(&cache) {
            debug!("using cached access token");
            return Ok(cache.token);
        }

        let refresh_token = cache.refresh_token.clone().ok_or_else(|| CopyError::Auth {
            message: format!(
                "cached token in '{}' is expired and has no refresh token; re-provision it",
                self.token_path.display()
            ),
        })?;
        let secrets = self.read_secrets()?;

        info!("refreshing expired access token");
        let resp = self
            .http
            .post(TOKEN_URI)
            .form(&[
                ("client_id", secrets.installed.client_id.as_str()),
                ("client_secret", secrets.installed.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CopyError::Auth {
                message: format!("token refresh failed ({status}): {body}"),
            });
        }
        let refreshed: RefreshResponse = resp.json().await?;

        cache.token = refreshed.access_token.clone();
        cache.expiry = refreshed
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));
        self.write_cache(&cache)?;
        Ok(refreshed.access_token)
    }

    fn read_cache(&self) -> CopyResult<TokenCache> {
        if !self.token_path.exists() {
            return Err(CopyError::Auth {
                message: format!(
                    "missing token cache at '{}'; run an OAuth consent flow once to create it",
                    self.token_path.display()
                ),
            });
        }
        let raw = std::fs::read_to_string(&self.token_path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn read_secrets(&self) -> CopyResult<ClientSecrets> {
        if !self.credentials_path.exists() {
            return Err(CopyError::Auth {
                message: format!(
                    "missing OAuth client secrets at '{}'; download the OAuth client ID JSON from the Google Cloud console",
                    self.credentials_path.display()
                ),
            });
        }
        let raw = std::fs::read_to_string(&self.credentials_path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_cache(&self, cache: &TokenCache) -> CopyResult<()> {
        std::fs::write(&self.token_path, serde_json::to_string_pretty(cache)?)?;
        Ok(())
    }
}

fn is_expired(cache: &TokenCache) -> bool {
    match cache.expiry {
        Some(expiry) => expiry <= Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(expiry: Option<DateTime<Utc>>, refresh_token: Option<&str>) -> TokenCache {
        TokenCache {
            token: "cached-token".to_string(),
            refresh_token: refresh_token.map(str::to_string),
            expiry,
            extra: serde_json::Map::new(),
        }
    }

    fn write_token(dir: &tempfile::TempDir, cache: &TokenCache) -> PathBuf {
        let path = dir.path().join("token.json");
        std::fs::write(&path, serde_json::to_string_pretty(cache).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_expiry_check() {
        assert!(!is_expired(&cache(None, None)));
        assert!(!is_expired(&cache(
            Some(Utc::now() + Duration::hours(1)),
            None
        )));
        assert!(is_expired(&cache(
            Some(Utc::now() - Duration::hours(1)),
            None
        )));
        // Inside the refresh margin counts as expired
        assert!(is_expired(&cache(
            Some(Utc::now() + Duration::seconds(10)),
            None
        )));
    }

    #[tokio::test]
    async fn test_valid_cached_token_is_returned_without_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = write_token(&dir, &cache(Some(Utc::now() + Duration::hours(1)), None));
        let auth = Authenticator::new(dir.path().join("credentials.json"), token_path);
        assert_eq!(auth.access_token().await.unwrap(), "cached-token");
    }

    #[tokio::test]
    async fn test_expired_token_without_refresh_token_fails() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = write_token(&dir, &cache(Some(Utc::now() - Duration::hours(1)), None));
        let auth = Authenticator::new(dir.path().join("credentials.json"), token_path);
        let err = auth.access_token().await.unwrap_err();
        assert!(matches!(err, CopyError::Auth { .. }));
    }

    #[tokio::test]
    async fn test_missing_token_cache_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let auth = Authenticator::new(
            dir.path().join("credentials.json"),
            dir.path().join("token.json"),
        );
        let err = auth.access_token().await.unwrap_err();
        assert!(err.to_string().contains("token.json"));
    }

    #[test]
    fn test_token_cache_preserves_unknown_fields() {
        let raw = r#"{
            "token": "t",
            "refresh_token": "r",
            "scopes": ["https://www.googleapis.com/auth/drive"],
            "client_id": "abc"
        }"#;
        let parsed: TokenCache = serde_json::from_str(raw).unwrap();
        let rewritten = serde_json::to_string(&parsed).unwrap();
        assert!(rewritten.contains("scopes"));
        assert!(rewritten.contains("client_id"));
    }
}
