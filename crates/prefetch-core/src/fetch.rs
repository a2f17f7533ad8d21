//! Remote artifact retrieval.
//!
//! Downloads an HTTP(S) resource once and digests its body as it arrives.
//! The reported size is the number of body bytes actually received; any
//! `Content-Length` the server advertises is logged but never trusted. A body
//! that ends before the advertised length is digested as received.

use std::error::Error as _;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::FetchOptions;
use crate::digest::{DigestAccumulator, StreamDigest};
use crate::errors::{PrefetchError, PrefetchResult};

/// HTTP client wrapper used by the resolver for remote sources.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher honoring the configured timeout.
    pub fn new(opts: &FetchOptions) -> PrefetchResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PrefetchError::fetch("http client", describe(&e)))?;
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Stream `url` through the digest accumulators.
    ///
    /// Non-success HTTP statuses are failures; redirects are followed.
    pub async fn digest_url(&self, url: &str) -> PrefetchResult<StreamDigest> {
        let parsed = Url::parse(url).map_err(|e| PrefetchError::fetch(url, e))?;

        let mut resp = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| PrefetchError::fetch(url, describe(&e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PrefetchError::fetch(url, format!("HTTP status {status}")));
        }
        if let Some(len) = resp.content_length() {
            debug!(url, advertised = len, "server advertised content length");
        }

        let mut acc = DigestAccumulator::new();
        loop {
            match resp.chunk().await {
                Ok(Some(chunk)) => acc.update(&chunk),
                Ok(None) => break,
                Err(e) if is_short_body(&e, acc.bytes_read()) => {
                    warn!(url, bytes = acc.bytes_read(), "body ended early: {}", describe(&e));
                    break;
                }
                Err(e) => return Err(PrefetchError::fetch(url, describe(&e))),
            }
        }
        debug!(url, bytes = acc.bytes_read(), "remote body consumed");

        Ok(acc.finish())
    }
}

/// A body cut short after some bytes arrived. Timeouts stay fatal.
fn is_short_body(err: &reqwest::Error, received: u64) -> bool {
    received > 0 && !err.is_timeout() && (err.is_body() || err.is_decode())
}

/// Flatten a reqwest error and its causes into one line.
fn describe(err: &reqwest::Error) -> String {
    let mut msg = err.to_string();
    let mut cause = err.source();
    while let Some(c) = cause {
        msg.push_str(": ");
        msg.push_str(&c.to_string());
        cause = c.source();
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unparseable_url_is_a_fetch_failure() {
        let fetcher = Fetcher::new(&FetchOptions::default()).unwrap();
        let err = fetcher.digest_url("http://").await.unwrap_err();
        assert!(matches!(err, PrefetchError::Fetch { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn unsupported_scheme_is_a_fetch_failure() {
        let fetcher = Fetcher::new(&FetchOptions::default()).unwrap();
        let err = fetcher.digest_url("ftp://example.invalid/a.bin").await.unwrap_err();
        match err {
            PrefetchError::Fetch { artifact, .. } => assert_eq!(artifact, "ftp://example.invalid/a.bin"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
