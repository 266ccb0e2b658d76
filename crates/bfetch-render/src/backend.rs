//! Rendering backend capability interface.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::chromium::ChromiumBackend;
use crate::error::RenderResult;
use crate::static_image::StaticBackend;
use crate::webdriver::WebDriverBackend;

/// One interchangeable strategy for screenshotting an opus page.
///
/// Implementations are constructed only when their underlying capability
/// (a chrome binary, a WebDriver endpoint, a rasterizer binary) was
/// detected at startup. An attempt is binary: it either produces the
/// output file or fails as a whole; there is no partial success.
#[async_trait]
pub trait RenderBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Render `url` into a PNG at `output`.
    async fn render(&self, url: &str, output: &Path) -> RenderResult<()>;
}

/// Detect available backends, strongest first.
///
/// Detection runs once; callers hold the returned list for the process
/// lifetime. An empty list is possible and makes every render fail with
/// the aggregate error.
pub fn available_backends(webdriver_url: Option<&str>) -> Vec<Box<dyn RenderBackend>> {
    let mut backends: Vec<Box<dyn RenderBackend>> = Vec::new();

    if let Some(backend) = ChromiumBackend::detect() {
        debug!(backend = backend.name(), "render backend available");
        backends.push(Box::new(backend));
    }
    if let Some(backend) = WebDriverBackend::detect(webdriver_url) {
        debug!(backend = backend.name(), "render backend available");
        backends.push(Box::new(backend));
    }
    if let Some(backend) = StaticBackend::detect() {
        debug!(backend = backend.name(), "render backend available");
        backends.push(Box::new(backend));
    }

    info!(count = backends.len(), "detected render backends");
    backends
}
