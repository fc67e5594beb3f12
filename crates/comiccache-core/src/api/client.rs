//! HTTP client for the xkcd JSON API.
//!
//! `GET {base}/info.0.json` returns the latest comic and
//! `GET {base}/{num}/info.0.json` returns comic `num`.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::models::ComicDto;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the public xkcd archive
pub const DEFAULT_BASE_URL: &str = "https://xkcd.com";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Boxed future returned by [`ComicSource`] methods.
pub type SourceFuture<'a> = Pin<Box<dyn Future<Output = Result<ComicDto, ApiError>> + Send + 'a>>;

/// Something that can hand out comic records by number.
///
/// The access layer only talks to the network through this trait, which keeps
/// it testable with an in-process source.
pub trait ComicSource: Send + Sync {
    /// Fetch the highest-numbered comic.
    fn fetch_latest(&self) -> SourceFuture<'_>;

    /// Fetch comic `num`. Numbers past the latest come back as
    /// [`ApiError::NotFound`].
    fn fetch_comic(&self, num: u32) -> SourceFuture<'_>;
}

/// API client for the xkcd archive.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct XkcdClient {
    client: Client,
    base_url: String,
}

impl XkcdClient {
    /// Create a client against another host (mirrors, local test servers)
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn latest_url(&self) -> String {
        format!("{}/info.0.json", self.base_url)
    }

    fn comic_url(&self, num: u32) -> String {
        format!("{}/{}/info.0.json", self.base_url, num)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get_comic(&self, url: String) -> Result<ComicDto, ApiError> {
        debug!(url = %url, "Fetching comic");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Comic request failed");
            ApiError::NetworkError(e)
        })?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;

        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse comic from {}: {}", url, e)))
    }
}

impl ComicSource for XkcdClient {
    fn fetch_latest(&self) -> SourceFuture<'_> {
        Box::pin(self.get_comic(self.latest_url()))
    }

    fn fetch_comic(&self, num: u32) -> SourceFuture<'_> {
        Box::pin(self.get_comic(self.comic_url(num)))
    }
}
