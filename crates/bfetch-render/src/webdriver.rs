//! Browser-driver backend over the WebDriver protocol.
//!
//! Functionally identical to the headless-CDP backend (hide chrome,
//! scroll, screenshot) driven through a WebDriver endpoint such as
//! chromedriver. Availability is a configuration question: without a
//! configured endpoint the backend does not exist.

use std::path::Path;

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::backend::RenderBackend;
use crate::error::{RenderError, RenderResult};
use crate::style::{
    inject_style_script, BROWSER_USER_AGENT, CONTENT_HEIGHT_JS, CONTENT_SELECTOR, SCROLL_PAUSE,
    SCROLL_SETTLE, SCROLL_STEP, SELECTOR_POLL, SELECTOR_TIMEOUT, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};

const NAME: &str = "webdriver";

pub struct WebDriverBackend {
    endpoint: String,
}

impl WebDriverBackend {
    /// Available only when a WebDriver endpoint is configured.
    pub fn detect(endpoint: Option<&str>) -> Option<Self> {
        endpoint.map(|endpoint| Self {
            endpoint: endpoint.to_string(),
        })
    }

    async fn capture(&self, url: &str, output: &Path) -> RenderResult<()> {
        let mut caps = serde_json::map::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": [
                    "--headless",
                    "--no-sandbox",
                    "--disable-dev-shm-usage",
                    "--disable-gpu",
                    format!("--window-size={},{}", VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
                    format!("--user-agent={}", BROWSER_USER_AGENT),
                ],
            }),
        );

        let mut client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(&self.endpoint)
            .await
            .map_err(|e| RenderError::backend(NAME, e.to_string()))?;

        let result = drive(&mut client, url, output).await;

        if let Err(e) = client.close().await {
            debug!(error = %e, "webdriver session close failed");
        }
        result
    }
}

#[async_trait]
impl RenderBackend for WebDriverBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn render(&self, url: &str, output: &Path) -> RenderResult<()> {
        self.capture(url, output).await
    }
}

async fn drive(client: &mut Client, url: &str, output: &Path) -> RenderResult<()> {
    client.goto(url).await.map_err(cmd_err)?;

    let deadline = Instant::now() + SELECTOR_TIMEOUT;
    loop {
        if client.find(Locator::Css(CONTENT_SELECTOR)).await.is_ok() {
            break;
        }
        if Instant::now() >= deadline {
            return Err(RenderError::backend(NAME, "content selector did not appear"));
        }
        sleep(SELECTOR_POLL).await;
    }

    client
        .execute(&inject_style_script(), vec![])
        .await
        .map_err(cmd_err)?;

    let content_height = client
        .execute(&format!("return {};", CONTENT_HEIGHT_JS), vec![])
        .await
        .map_err(cmd_err)?
        .as_i64()
        .unwrap_or(VIEWPORT_HEIGHT as i64);

    let mut position: i64 = 0;
    while position < content_height {
        position += SCROLL_STEP;
        client
            .execute("window.scrollTo(0, arguments[0]);", vec![json!(position)])
            .await
            .map_err(cmd_err)?;
        sleep(SCROLL_PAUSE).await;
    }
    client
        .execute("window.scrollTo(0, 0);", vec![])
        .await
        .map_err(cmd_err)?;
    sleep(SCROLL_SETTLE).await;

    let png = match client.find(Locator::Css(CONTENT_SELECTOR)).await {
        Ok(mut element) => element.screenshot().await.map_err(cmd_err)?,
        Err(_) => client.screenshot().await.map_err(cmd_err)?,
    };

    tokio::fs::write(output, png).await?;
    Ok(())
}

fn cmd_err(e: fantoccini::error::CmdError) -> RenderError {
    RenderError::backend(NAME, e.to_string())
}
