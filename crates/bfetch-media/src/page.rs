//! Page fetching with a realistic browser identity.
//!
//! The host serves different markup to unrecognized clients, so every
//! page request carries a full browser header set. Title and playinfo
//! extraction live here too; both work on raw markup because the
//! interesting payload is embedded in fixed, known shapes.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, IntoHeaderName, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE,
    CONNECTION, REFERER, USER_AGENT,
};

/// Browser identity used for page and stream requests.
pub const PAGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 Edg/91.0.864.67";

/// Timeout for one page GET.
const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

fn insert(headers: &mut HeaderMap, name: impl IntoHeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

/// Header set the host expects from a real browser.
pub fn browser_headers(user_agent: &str, referer: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, USER_AGENT, user_agent);
    insert(
        &mut headers,
        ACCEPT,
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    );
    insert(
        &mut headers,
        ACCEPT_LANGUAGE,
        "zh-CN,zh;q=0.8,zh-TW;q=0.7,zh-HK;q=0.5,en-US;q=0.3,en;q=0.2",
    );
    insert(&mut headers, ACCEPT_ENCODING, "identity");
    insert(&mut headers, CONNECTION, "keep-alive");
    insert(
        &mut headers,
        HeaderName::from_static("upgrade-insecure-requests"),
        "1",
    );
    if let Some(referer) = referer {
        insert(&mut headers, REFERER, referer);
    }
    headers
}

/// HTTP client for fetching platform pages.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: reqwest::Client,
    user_agent: String,
}

impl Default for PageClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PageClient {
    pub fn new() -> Self {
        Self::with_user_agent(PAGE_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_agent: user_agent.into(),
        }
    }

    /// Fetch a page as text, following redirects.
    pub async fn fetch(&self, url: &str, referer: &str) -> reqwest::Result<String> {
        let response = self
            .client
            .get(url)
            .headers(browser_headers(&self.user_agent, Some(referer)))
            .timeout(PAGE_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<h1[^>]*>(.*?)</h1>").expect("valid regex"))
}

fn playinfo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<script>window\.__playinfo__=(.*?)</script>").expect("valid regex")
    })
}

/// Text of the first `<h1>` element, trimmed. Empty titles count as missing.
pub fn extract_title(html: &str) -> Option<String> {
    title_re()
        .captures(html)
        .map(|caps| caps[1].trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Raw playinfo JSON embedded in the page's script marker.
pub fn extract_playinfo(html: &str) -> Option<&str> {
    playinfo_re()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
