//! Catalog gateway for a hosted REST backend
//!
//! Talks to a PostgREST-style table API (`/rest/v1/<table>`) and an object
//! storage API (`/storage/v1/object/<bucket>/<path>`), which is the shape
//! exposed by Supabase-like hosted backends.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    gateway::{AssetKind, CatalogGateway, NewTrackRecord, PlaylistRecord, TrackRecord},
};
use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

const TRACKS_TABLE: &str = "songs";
const PLAYLISTS_TABLE: &str = "playlists";

/// Connection settings for [`RestCatalogGateway`]
#[derive(Clone)]
pub struct RestGatewayConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Public (anon) API key sent with every request
    pub api_key: String,
    /// Session token of the signed-in user, if any
    pub access_token: Option<String>,
    pub timeout: Duration,
    /// Attempts for idempotent reads hitting 429/5xx
    pub max_attempts: u32,
    /// Backoff before the second attempt, doubled after each retry
    pub initial_backoff: Duration,
}

impl RestGatewayConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token: None,
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, max_attempts: u32, initial_backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.initial_backoff = initial_backoff;
        self
    }
}

impl std::fmt::Debug for RestGatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestGatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("has_access_token", &self.access_token.is_some())
            .field("timeout", &self.timeout)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Reqwest-based [`CatalogGateway`]
pub struct RestCatalogGateway {
    client: Client,
    config: RestGatewayConfig,
}

impl RestCatalogGateway {
    pub fn new(config: RestGatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("cadence-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BridgeError::NotAvailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: RestGatewayConfig) -> Self {
        Self { client, config }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", base(&self.config.base_url), table)
    }

    fn object_url(&self, kind: AssetKind, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            base(&self.config.base_url),
            kind.bucket(),
            path.trim_start_matches('/')
        )
    }

    /// Public URI of a stored asset
    pub fn public_url(&self, kind: AssetKind, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            base(&self.config.base_url),
            kind.bucket(),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let bearer = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.api_key);

        self.client
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(bearer)
    }

    /// Send a request built by `build`, retrying on 429/5xx and transport
    /// errors when `idempotent`.
    async fn send<F>(&self, idempotent: bool, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let attempts = if idempotent {
            self.config.max_attempts.max(1)
        } else {
            1
        };
        let mut backoff = self.config.initial_backoff;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let outcome = build().send().await;

            let retryable = match &outcome {
                Ok(response) => is_retryable(response.status()),
                Err(e) => e.is_timeout() || e.is_connect(),
            };

            if !retryable || attempt >= attempts {
                return match outcome {
                    Ok(response) => check_status(response).await,
                    Err(e) => Err(transport_error(e)),
                };
            }

            warn!(attempt, max_attempts = attempts, "Request failed, retrying");
            sleep(backoff).await;
            backoff *= 2;
        }
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = self.table_url(table);
        let response = self
            .send(true, || self.request(Method::GET, &url).query(query))
            .await?;
        decode(response).await
    }
}

fn base(url: &str) -> &str {
    url.trim_end_matches('/')
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn transport_error(err: reqwest::Error) -> BridgeError {
    if err.is_timeout() {
        BridgeError::OperationFailed("Request timed out".to_string())
    } else {
        BridgeError::OperationFailed(format!("Request failed: {}", err))
    }
}

/// Map a non-success status to the bridge error taxonomy
fn status_error(status: StatusCode, body: &str) -> BridgeError {
    let detail = format!("HTTP {}: {}", status.as_u16(), body.trim());
    match status {
        StatusCode::NOT_FOUND => BridgeError::NotFound(detail),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::CONFLICT => {
            BridgeError::Rejected(detail)
        }
        _ => BridgeError::OperationFailed(detail),
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| BridgeError::OperationFailed(format!("Malformed response body: {}", e)))
}

/// PostgREST `eq` filter value
fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

/// PostgREST `in` filter value with each id double-quoted
fn in_list(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

fn single<T>(rows: Vec<T>, what: impl FnOnce() -> String) -> Result<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| BridgeError::NotFound(what()))
}

#[async_trait]
impl CatalogGateway for RestCatalogGateway {
    #[instrument(skip(self))]
    async fn fetch_tracks(&self) -> Result<Vec<TrackRecord>> {
        self.get_rows(
            TRACKS_TABLE,
            &[
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn fetch_tracks_by_ids(&self, ids: &[String]) -> Result<Vec<TrackRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.get_rows(
            TRACKS_TABLE,
            &[("select", "*".to_string()), ("id", in_list(ids))],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<Option<PlaylistRecord>> {
        let rows: Vec<PlaylistRecord> = self
            .get_rows(
                PLAYLISTS_TABLE,
                &[("select", "*".to_string()), ("id", eq(playlist_id))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn fetch_playlists(&self, owner_id: &str) -> Result<Vec<PlaylistRecord>> {
        self.get_rows(
            PLAYLISTS_TABLE,
            &[
                ("select", "*".to_string()),
                ("user_id", eq(owner_id)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn create_playlist(&self, owner_id: &str, name: &str) -> Result<PlaylistRecord> {
        let url = self.table_url(PLAYLISTS_TABLE);
        let body = json!({ "name": name, "user_id": owner_id, "song_ids": [] });

        let response = self
            .send(false, || {
                self.request(Method::POST, &url)
                    .header("Prefer", "return=representation")
                    .json(&body)
            })
            .await?;

        single(decode(response).await?, || {
            "backend returned no playlist row".to_string()
        })
    }

    #[instrument(skip(self, track_ids), fields(len = track_ids.len()))]
    async fn update_playlist_track_ids(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<()> {
        let url = self.table_url(PLAYLISTS_TABLE);
        let body = json!({ "song_ids": track_ids });

        let response = self
            .send(true, || {
                self.request(Method::PATCH, &url)
                    .query(&[("id", eq(playlist_id))])
                    .header("Prefer", "return=representation")
                    .json(&body)
            })
            .await?;

        let rows: Vec<PlaylistRecord> = decode(response).await?;
        single(rows, || format!("playlist {}", playlist_id))?;
        debug!("Updated playlist track ids");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_track(&self, track_id: &str) -> Result<()> {
        let url = self.table_url(TRACKS_TABLE);

        let response = self
            .send(true, || {
                self.request(Method::DELETE, &url)
                    .query(&[("id", eq(track_id))])
                    .header("Prefer", "return=representation")
            })
            .await?;

        let rows: Vec<TrackRecord> = decode(response).await?;
        single(rows, || format!("track {}", track_id))?;
        Ok(())
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn upload_asset(&self, kind: AssetKind, path: &str, data: Bytes) -> Result<String> {
        let url = self.object_url(kind, path);

        self.send(false, || {
            self.request(Method::POST, &url)
                .header("Content-Type", "application/octet-stream")
                .header("x-upsert", "false")
                .body(data.clone())
        })
        .await?;

        debug!("Uploaded asset");
        Ok(self.public_url(kind, path))
    }

    #[instrument(skip(self, record), fields(title = %record.song_name))]
    async fn create_track_record(&self, record: NewTrackRecord) -> Result<TrackRecord> {
        let url = self.table_url(TRACKS_TABLE);

        let response = self
            .send(false, || {
                self.request(Method::POST, &url)
                    .header("Prefer", "return=representation")
                    .json(&record)
            })
            .await?;

        single(decode(response).await?, || {
            "backend returned no track row".to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base_url: &str) -> RestCatalogGateway {
        RestCatalogGateway::new(RestGatewayConfig::new(base_url, "anon-key")).unwrap()
    }

    #[test]
    fn test_urls_ignore_trailing_slashes() {
        let gateway = gateway("https://demo.supabase.co/");

        assert_eq!(
            gateway.table_url("songs"),
            "https://demo.supabase.co/rest/v1/songs"
        );
        assert_eq!(
            gateway.object_url(AssetKind::Audio, "/u1/abc.mp3"),
            "https://demo.supabase.co/storage/v1/object/song-audio/u1/abc.mp3"
        );
        assert_eq!(
            gateway.public_url(AssetKind::Image, "u1/abc.png"),
            "https://demo.supabase.co/storage/v1/object/public/song-images/u1/abc.png"
        );
    }

    #[test]
    fn test_filter_values() {
        assert_eq!(eq("p1"), "eq.p1");
        assert_eq!(
            in_list(&["a".to_string(), "b,c".to_string()]),
            "in.(\"a\",\"b,c\")"
        );
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(status_error(StatusCode::NOT_FOUND, "").is_not_found());
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "row level security"),
            BridgeError::Rejected(_)
        ));

        let err = status_error(StatusCode::BAD_GATEWAY, " upstream ");
        assert_eq!(err.to_string(), "Bridge operation failed: HTTP 502: upstream");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_single_reports_missing_row() {
        let err = single(Vec::<u8>::new(), || "playlist p1".to_string()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(single(vec![7u8], String::new).unwrap(), 7);
    }

    #[test]
    fn test_config_debug_hides_secrets() {
        let config = RestGatewayConfig::new("https://demo", "anon-key").with_access_token("jwt");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("anon-key"));
        assert!(!debug.contains("jwt"));
        assert!(debug.contains("has_access_token: true"));
    }
}
