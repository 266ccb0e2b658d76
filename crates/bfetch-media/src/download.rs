//! Stream download to title-scoped temp files.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::MediaResult;
use crate::page::PAGE_USER_AGENT;

/// Timeout for one stream transfer, body included.
const STREAM_TIMEOUT: Duration = Duration::from_secs(60);

/// Download one media stream to `dest`.
///
/// Stream URLs are gated on UA and Referer, so the request carries the
/// same browser identity as the page fetch. The body is streamed straight
/// to disk; partial files are the caller's cleanup responsibility.
pub async fn download_stream(
    client: &reqwest::Client,
    url: &str,
    referer: &str,
    dest: &Path,
) -> MediaResult<()> {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(PAGE_USER_AGENT) {
        headers.insert(USER_AGENT, value);
    }
    if let Ok(value) = HeaderValue::from_str(referer) {
        headers.insert(REFERER, value);
    }

    let response = client
        .get(url)
        .headers(headers)
        .timeout(STREAM_TIMEOUT)
        .send()
        .await?
        .error_for_status()?;

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;

    debug!(dest = %dest.display(), "stream downloaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_stream_writes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stream.m4s"))
            .and(header("Referer", "https://www.bilibili.com/video/BV1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"media-bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("a_temp.mp3");
        download_stream(
            &reqwest::Client::new(),
            &format!("{}/stream.m4s", server.uri()),
            "https://www.bilibili.com/video/BV1",
            &dest,
        )
        .await
        .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"media-bytes");
    }

    #[tokio::test]
    async fn test_download_stream_propagates_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.m4s"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("a_temp.mp3");
        let err = download_stream(
            &reqwest::Client::new(),
            &format!("{}/gone.m4s", server.uri()),
            "https://www.bilibili.com/",
            &dest,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("network request failed"));
    }
}
