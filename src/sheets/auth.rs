use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{RemoteFailure, Result, SyncError};

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the recorded expiry.
const EXPIRY_SLACK_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(EXPIRY_SLACK_SECS) > now
    }
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

/// Credential handle for the spreadsheet APIs.
///
/// Clients borrow it; the cached token is refreshed in place and written
/// back to the cache file whenever it changes.
#[derive(Debug)]
pub struct GoogleAuth {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cache_path: PathBuf,
    token: Mutex<CachedToken>,
}

pub fn load_token_cache(path: &Path) -> Result<CachedToken> {
    if !path.exists() {
        return Err(SyncError::ConfigurationMissing("token_cache"));
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_token_cache(path: &Path, token: &CachedToken) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(token)?)?;
    Ok(())
}

impl GoogleAuth {
    pub fn new(
        token_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        cache_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let cache_path = cache_path.into();
        let token = load_token_cache(&cache_path)?;
        Ok(GoogleAuth {
            http: Client::new(),
            token_url: token_url.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cache_path,
            token: Mutex::new(token),
        })
    }

    /// A valid access token, refreshing it first if it is about to expire.
    pub async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if token.is_fresh(Utc::now()) {
            return Ok(token.access_token.clone());
        }
        let refreshed = self.refresh(&token.refresh_token).await?;
        token.access_token = refreshed.access_token;
        token.expires_at = Utc::now() + Duration::seconds(refreshed.expires_in);
        if let Some(rt) = refreshed.refresh_token {
            token.refresh_token = rt;
        }
        save_token_cache(&self.cache_path, &token)?;
        info!(expires_at = %token.expires_at, "refreshed access token");
        Ok(token.access_token.clone())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse> {
        let resp = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| SyncError::remote("refresh_token", &self.token_url, e))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::remote(
                "refresh_token",
                &self.token_url,
                RemoteFailure::Status {
                    status: status.as_u16(),
                    body,
                },
            ));
        }
        resp.json::<RefreshResponse>()
            .await
            .map_err(|e| SyncError::remote("refresh_token", &self.token_url, e))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use tempfile::NamedTempFile;

    use super::*;

    fn cache_file(token: &CachedToken) -> NamedTempFile {
        let file = NamedTempFile::new().expect("tmp file");
        save_token_cache(file.path(), token).expect("write cache");
        file
    }

    fn token(expires_in_secs: i64) -> CachedToken {
        CachedToken {
            access_token: "old-access".into(),
            refresh_token: "refresh-1".into(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    #[tokio::test]
    async fn fresh_token_used_without_refresh() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST").path("/token");
            then.status(500);
        });
        let file = cache_file(&token(3600));
        let auth = GoogleAuth::new(&server.url("/token"), "id", "secret", file.path()).unwrap();

        assert_eq!(auth.access_token().await.unwrap(), "old-access");
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn expired_token_refreshed_and_cached() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST").path("/token");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"new-access","expires_in":3599,"token_type":"Bearer"}"#);
        });
        let file = cache_file(&token(10));
        let auth = GoogleAuth::new(&server.url("/token"), "id", "secret", file.path()).unwrap();

        assert_eq!(auth.access_token().await.unwrap(), "new-access");
        // second call is served from the refreshed token
        assert_eq!(auth.access_token().await.unwrap(), "new-access");
        mock.assert_hits(1);

        let saved = load_token_cache(file.path()).unwrap();
        assert_eq!(saved.access_token, "new-access");
        assert_eq!(saved.refresh_token, "refresh-1");
        assert!(saved.expires_at > Utc::now() + Duration::seconds(3000));
    }

    #[tokio::test]
    async fn refresh_failure_is_remote_call_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path("/token");
            then.status(400).body(r#"{"error":"invalid_grant"}"#);
        });
        let file = cache_file(&token(-5));
        let auth = GoogleAuth::new(&server.url("/token"), "id", "secret", file.path()).unwrap();

        let err = auth.access_token().await.unwrap_err();
        assert!(matches!(err, SyncError::RemoteCall { operation: "refresh_token", .. }));
    }

    #[test]
    fn missing_cache_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GoogleAuth::new(DEFAULT_TOKEN_URL, "id", "s", dir.path().join("none.json"))
            .unwrap_err();
        assert!(matches!(err, SyncError::ConfigurationMissing("token_cache")));
    }
}
