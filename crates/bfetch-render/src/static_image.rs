//! Static HTML rasterization backend.
//!
//! Weakest fallback: fetches the raw markup, injects the hide/isolate
//! style block as a string, and rasterizes without any interactivity.
//! Content that only materializes on scroll will be missing.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use bfetch_media::PageClient;

use crate::backend::RenderBackend;
use crate::error::{RenderError, RenderResult};
use crate::page::OPUS_REFERER;
use crate::style::{BROWSER_USER_AGENT, HIDE_CHROME_CSS, VIEWPORT_WIDTH};

const NAME: &str = "static";

pub struct StaticBackend {
    executable: PathBuf,
    page: PageClient,
}

impl StaticBackend {
    /// Available when the rasterizer binary is on PATH.
    pub fn detect() -> Option<Self> {
        which::which("wkhtmltoimage").ok().map(|executable| Self {
            executable,
            page: PageClient::with_user_agent(BROWSER_USER_AGENT),
        })
    }
}

#[async_trait]
impl RenderBackend for StaticBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn render(&self, url: &str, output: &Path) -> RenderResult<()> {
        let html = self.page.fetch(url, OPUS_REFERER).await?;
        let styled = html.replacen(
            "</head>",
            &format!("<style>{}</style></head>", HIDE_CHROME_CSS),
            1,
        );

        let page_file = tempfile::Builder::new()
            .prefix("opus_page_")
            .suffix(".html")
            .tempfile()?;
        tokio::fs::write(page_file.path(), styled).await?;

        let result = Command::new(&self.executable)
            .arg("--quiet")
            .arg("--format")
            .arg("png")
            .arg("--width")
            .arg(VIEWPORT_WIDTH.to_string())
            .arg(page_file.path())
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RenderError::backend(
                NAME,
                stderr.lines().last().unwrap_or("unknown error").to_string(),
            ));
        }
        if !output.exists() {
            return Err(RenderError::backend(NAME, "rasterizer produced no output"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_injection_lands_inside_head() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        let styled = html.replacen(
            "</head>",
            &format!("<style>{}</style></head>", HIDE_CHROME_CSS),
            1,
        );
        assert!(styled.contains(".opus-detail"));
        let head_end = styled.find("</head>").unwrap();
        let style_start = styled.find("<style>").unwrap();
        assert!(style_start < head_end);
    }
}
