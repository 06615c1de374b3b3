//! Upstream client for the static front-end bundle.

use std::time::Duration;

use reqwest::Client;

/// Timeout for a single upstream fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for upstream fetches.
#[derive(Debug, thiserror::Error)]
pub enum AssetsError {
    /// Failed to build the HTTP client.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// The upstream could not be reached or the body could not be read.
    #[error("asset upstream unreachable: {0}")]
    Unreachable(String),
}

/// A fetched asset.
#[derive(Debug, Clone)]
pub struct Asset {
    /// Raw body bytes.
    pub body: Vec<u8>,
    /// Content type derived from the path extension.
    pub content_type: &'static str,
}

/// Fetches static files from `{base_url}{path}`.
#[derive(Debug, Clone)]
pub struct AssetsClient {
    client: Client,
    base_url: String,
}

impl AssetsClient {
    /// Create a new client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, AssetsError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AssetsError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The upstream base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch `path` (starting with `/`). `Ok(None)` when the upstream answers
    /// with a non-success status.
    ///
    /// # Errors
    ///
    /// Returns `AssetsError::Unreachable` on connection or body read failure.
    pub async fn fetch(&self, path: &str) -> Result<Option<Asset>, AssetsError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Fetching static asset");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AssetsError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), url = %url, "Asset not found upstream");
            return Ok(None);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AssetsError::Unreachable(e.to_string()))?;

        Ok(Some(Asset {
            body: body.to_vec(),
            content_type: content_type_for(path),
        }))
    }
}

/// Content type for a path, by extension.
#[must_use]
pub fn content_type_for(path: &str) -> &'static str {
    let ext = path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("webmanifest") => "application/manifest+json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        _ => "text/plain; charset=utf-8",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("/public/index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for("/css/site.CSS"), "text/css; charset=utf-8");
        assert_eq!(
            content_type_for("/public/app.js"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(content_type_for("/public/logo.svg"), "image/svg+xml");
        assert_eq!(content_type_for("/public/README"), "text/plain; charset=utf-8");
        assert_eq!(content_type_for("/public.dir/README"), "text/plain; charset=utf-8");
    }

    #[test]
    fn base_url_is_trimmed() {
        let client = AssetsClient::new("http://example.test/").unwrap();
        assert_eq!(client.base_url(), "http://example.test");
    }
}
