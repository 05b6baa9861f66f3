use std::time::Duration;

use crate::foundation::error::{ShapeError, ShapeResult};

/// Default per-request timeout for source downloads.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Retrieves raw source bytes for a URL.
///
/// Implementations must collapse every unsuccessful outcome (non-2xx status, connection
/// failure, timeout) into [`ShapeError::Transport`].
pub trait Fetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> ShapeResult<Vec<u8>>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str, timeout: Duration) -> ShapeResult<Vec<u8>> {
        (**self).fetch(url, timeout)
    }
}

/// Blocking HTTP(S) fetcher backed by a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> ShapeResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ShapeError::config(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> ShapeResult<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|e| transport_error(url, &e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ShapeError::transport(format!(
                "GET {url} returned status {status}"
            )));
        }

        let body = resp.bytes().map_err(|e| transport_error(url, &e))?;
        Ok(body.to_vec())
    }
}

fn transport_error(url: &str, e: &reqwest::Error) -> ShapeError {
    if e.is_timeout() {
        ShapeError::transport(format!("GET {url} timed out"))
    } else {
        ShapeError::transport(format!("GET {url} failed: {e}"))
    }
}

#[cfg(test)]
#[path = "../tests/unit/fetch.rs"]
mod tests;
