//! Source loading: HTTP fetch behind a small client trait, plus local files.
//!
//! Station metadata and trip records are both public documents reachable by
//! URL or checked into a local directory; either style of source goes
//! through [`load_source`].

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// HTTP abstraction so tests can substitute a canned client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response>;
}

/// Plain reqwest-backed client.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads a source from a local file path or fetches it over HTTP.
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        debug!(source, "Fetching source over HTTP");
        fetch_bytes(client, source).await?
    } else {
        debug!(source, "Reading local source file");
        tokio::fs::read(source).await?
    };
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_source_reads_local_file() {
        let path = format!(
            "{}/bike_traffic_test_source.csv",
            std::env::temp_dir().display()
        );
        std::fs::write(&path, b"hello").unwrap();

        let client = BasicClient::new();
        let bytes = load_source(&client, &path).await.unwrap();
        assert_eq!(bytes, b"hello");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_source_missing_file_is_an_error() {
        let client = BasicClient::new();
        let result = load_source(&client, "/definitely/not/here.json").await;
        assert!(result.is_err());
    }
}
