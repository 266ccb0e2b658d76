//! Short-link resolution.
//!
//! `b23.tv` links are pure indirection; classification needs the redirect
//! target before it can tell whether a short link points at a video.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::page::{browser_headers, PAGE_USER_AGENT};

/// Timeout for one resolution request.
const RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves shortened links to their redirect targets.
#[async_trait]
pub trait LinkResolver: Send + Sync {
    /// Resolve `url` to its final redirect target.
    ///
    /// Implementations degrade to returning `url` unchanged when
    /// resolution fails. Callers must re-validate the result against the
    /// known URL shapes instead of trusting it: an unresolved short link
    /// is "not a video reference", not an error.
    async fn resolve(&self, url: &str) -> String;
}

/// HEAD-first resolver with a single GET retry.
#[derive(Debug, Clone)]
pub struct HttpResolver {
    client: reqwest::Client,
}

impl Default for HttpResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LinkResolver for HttpResolver {
    async fn resolve(&self, url: &str) -> String {
        let headers = browser_headers(PAGE_USER_AGENT, None);

        let head = self
            .client
            .head(url)
            .headers(headers.clone())
            .timeout(RESOLVE_TIMEOUT)
            .send()
            .await;
        match head {
            // Redirects were already followed; the final URL is the answer
            // regardless of the terminal status code.
            Ok(response) => return response.url().to_string(),
            Err(e) => debug!(error = %e, url = url, "HEAD resolution failed, retrying with GET"),
        }

        // The body is never read; only the post-redirect URL matters.
        match self
            .client
            .get(url)
            .headers(headers)
            .timeout(RESOLVE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.url().to_string(),
            Err(e) => {
                debug!(error = %e, url = url, "short link resolution failed, returning original");
                url.to_string()
            }
        }
    }
}
