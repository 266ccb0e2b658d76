//! Full headless-browser backend over the Chrome DevTools protocol.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::time::{sleep, timeout, Instant};
use tracing::debug;

use crate::backend::RenderBackend;
use crate::error::{RenderError, RenderResult};
use crate::style::{
    inject_style_script, BROWSER_USER_AGENT, CONTENT_HEIGHT_JS, CONTENT_SELECTOR,
    NAVIGATION_TIMEOUT, SCROLL_PAUSE, SCROLL_SETTLE, SCROLL_STEP, SELECTOR_POLL, SELECTOR_TIMEOUT,
    VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};

const NAME: &str = "chromium";

/// Chrome executables probed for, in order.
const CHROME_EXECUTABLES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

/// Headless Chrome automation: navigate, isolate the content region,
/// scroll lazy content into existence, screenshot.
pub struct ChromiumBackend {
    executable: PathBuf,
}

impl ChromiumBackend {
    /// Available when a chrome binary is on PATH.
    pub fn detect() -> Option<Self> {
        CHROME_EXECUTABLES
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(|executable| Self { executable })
    }

    async fn capture(&self, url: &str, output: &Path) -> RenderResult<()> {
        let config = BrowserConfig::builder()
            .chrome_executable(&self.executable)
            .no_sandbox()
            .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
            .args(vec![
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--disable-web-security",
            ])
            .build()
            .map_err(|e| RenderError::backend(NAME, e))?;

        let (mut browser, mut handler) = Browser::launch(config).await.map_err(cdp_err)?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = drive(&browser, url, output).await;

        if let Err(e) = browser.close().await {
            debug!(error = %e, "browser close failed");
        }
        handler_task.abort();

        result
    }
}

#[async_trait]
impl RenderBackend for ChromiumBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn render(&self, url: &str, output: &Path) -> RenderResult<()> {
        self.capture(url, output).await
    }
}

async fn drive(browser: &Browser, url: &str, output: &Path) -> RenderResult<()> {
    let page = browser.new_page("about:blank").await.map_err(cdp_err)?;
    page.set_user_agent(BROWSER_USER_AGENT)
        .await
        .map_err(cdp_err)?;

    timeout(NAVIGATION_TIMEOUT, async {
        page.goto(url).await?;
        page.wait_for_navigation().await?;
        Ok::<_, chromiumoxide::error::CdpError>(())
    })
    .await
    .map_err(|_| RenderError::backend(NAME, "page navigation timed out"))?
    .map_err(cdp_err)?;

    wait_for_selector(&page).await?;

    page.evaluate(inject_style_script()).await.map_err(cdp_err)?;

    let content_height = page
        .evaluate(CONTENT_HEIGHT_JS)
        .await
        .map_err(cdp_err)?
        .into_value::<i64>()
        .unwrap_or(VIEWPORT_HEIGHT as i64);

    // Scroll through the full content height so lazy-loaded images
    // materialize, then return to the top before capturing.
    let mut position: i64 = 0;
    while position < content_height {
        position += SCROLL_STEP;
        page.evaluate(format!("window.scrollTo(0, {position})"))
            .await
            .map_err(cdp_err)?;
        sleep(SCROLL_PAUSE).await;
    }
    page.evaluate("window.scrollTo(0, 0)").await.map_err(cdp_err)?;
    sleep(SCROLL_SETTLE).await;

    let png = match page.find_element(CONTENT_SELECTOR).await {
        Ok(element) => element
            .screenshot(CaptureScreenshotFormat::Png)
            .await
            .map_err(cdp_err)?,
        Err(_) => page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
            )
            .await
            .map_err(cdp_err)?,
    };

    tokio::fs::write(output, png).await?;
    Ok(())
}

async fn wait_for_selector(page: &Page) -> RenderResult<()> {
    let deadline = Instant::now() + SELECTOR_TIMEOUT;
    loop {
        if page.find_element(CONTENT_SELECTOR).await.is_ok() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(RenderError::backend(NAME, "content selector did not appear"));
        }
        sleep(SELECTOR_POLL).await;
    }
}

fn cdp_err(e: chromiumoxide::error::CdpError) -> RenderError {
    RenderError::backend(NAME, e.to_string())
}
