//! Opus render jobs: idempotent per title, cascade over backends.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use bfetch_media::PageClient;
use bfetch_models::{opus_file_name, sanitize_title};

use crate::backend::{available_backends, RenderBackend};
use crate::error::{RenderError, RenderResult};
use crate::page::{extract_opus_info, OPUS_REFERER};
use crate::style::BROWSER_USER_AGENT;

/// Subdirectory of the download dir holding rendered images.
const IMAGES_SUBDIR: &str = "images";

/// A completed opus render.
#[derive(Debug, Clone)]
pub struct RenderedOpus {
    pub title: String,
    pub author: Option<String>,
    pub path: PathBuf,
    /// True when the artifact already existed and no backend ran.
    pub cached: bool,
}

/// Screenshots opus pages via the first available backend that succeeds.
pub struct OpusRenderer {
    page: PageClient,
    backends: Vec<Box<dyn RenderBackend>>,
}

impl OpusRenderer {
    /// Detect backends once and build the renderer.
    pub fn new(webdriver_url: Option<&str>) -> Self {
        Self::with_backends(available_backends(webdriver_url))
    }

    /// Build from an explicit backend list.
    pub fn with_backends(backends: Vec<Box<dyn RenderBackend>>) -> Self {
        Self {
            page: PageClient::with_user_agent(BROWSER_USER_AGENT),
            backends,
        }
    }

    /// Render one opus page into a PNG under `<download_dir>/images/`.
    ///
    /// The output is keyed by sanitized title (and author when one was
    /// extractable); an existing file is returned as-is. Each backend
    /// failure is logged and the next backend tried; only exhaustion is
    /// reported, as a single aggregate error.
    pub async fn render(&self, url: &str, download_dir: &Path) -> RenderResult<RenderedOpus> {
        let images_dir = download_dir.join(IMAGES_SUBDIR);
        tokio::fs::create_dir_all(&images_dir).await?;

        let html = self.page.fetch(url, OPUS_REFERER).await?;
        let info = extract_opus_info(&html).ok_or(RenderError::TitleMissing)?;
        let title = sanitize_title(&info.title);
        let author = info.author;

        let output = images_dir.join(opus_file_name(&title, author.as_deref()));
        if output.exists() {
            info!(title = %title, "opus image already rendered");
            return Ok(RenderedOpus {
                title,
                author,
                path: output,
                cached: true,
            });
        }

        for backend in &self.backends {
            match backend.render(url, &output).await {
                Ok(()) if output.exists() => {
                    info!(backend = backend.name(), title = %title, "opus rendered");
                    return Ok(RenderedOpus {
                        title,
                        author,
                        path: output,
                        cached: false,
                    });
                }
                Ok(()) => {
                    warn!(
                        backend = backend.name(),
                        "backend reported success but wrote no output"
                    );
                }
                Err(e) => {
                    warn!(backend = backend.name(), error = %e, "render backend failed");
                }
            }
        }

        Err(RenderError::AllBackendsFailed)
    }
}
