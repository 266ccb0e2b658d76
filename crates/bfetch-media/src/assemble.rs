//! Video assembly: fetch page, extract manifest, download streams, mux.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use bfetch_models::{sanitize_title, video_file_name, PlayInfo, StreamTrack};

use crate::download::download_stream;
use crate::error::{MediaError, MediaResult};
use crate::mux;
use crate::page::{extract_playinfo, extract_title, PageClient};

/// A completed video retrieval.
#[derive(Debug, Clone)]
pub struct AssembledVideo {
    pub title: String,
    pub path: PathBuf,
    /// True when the artifact already existed and no streams were fetched.
    pub cached: bool,
}

/// Downloads a video's separate audio/video streams and muxes them into
/// one MP4, idempotently per sanitized title.
#[derive(Debug, Clone, Default)]
pub struct VideoAssembler {
    page: PageClient,
    streams: reqwest::Client,
}

impl VideoAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the full retrieval for one video page URL.
    ///
    /// States: fetch page, extract title + manifest, short-circuit on an
    /// existing artifact, download audio then video sequentially, mux.
    /// Temp files are title-scoped and removed on every exit path once
    /// stream downloads begin; the final output only appears after a
    /// successful mux.
    pub async fn assemble(&self, url: &str, download_dir: &Path) -> MediaResult<AssembledVideo> {
        tokio::fs::create_dir_all(download_dir).await?;

        let html = self.page.fetch(url, url).await?;

        let title = sanitize_title(&extract_title(&html).ok_or(MediaError::TitleMissing)?);
        let playinfo_raw = extract_playinfo(&html).ok_or(MediaError::PlayInfoMissing)?;
        let playinfo: PlayInfo = serde_json::from_str(playinfo_raw)?;

        let output = download_dir.join(video_file_name(&title));
        if output.exists() {
            info!(title = %title, "video already downloaded");
            return Ok(AssembledVideo {
                title,
                path: output,
                cached: true,
            });
        }

        let audio_tmp = download_dir.join(format!("{}_temp.mp3", title));
        let video_tmp = download_dir.join(format!("{}_temp.mp4", title));

        let result = self
            .download_and_merge(url, &playinfo, &audio_tmp, &video_tmp, &output)
            .await;
        cleanup_temp_files(&video_tmp, &audio_tmp).await;
        result?;

        info!(title = %title, output = %output.display(), "video assembled");
        Ok(AssembledVideo {
            title,
            path: output,
            cached: false,
        })
    }

    async fn download_and_merge(
        &self,
        referer: &str,
        playinfo: &PlayInfo,
        audio_tmp: &Path,
        video_tmp: &Path,
        output: &Path,
    ) -> MediaResult<()> {
        let audio_url = playinfo
            .stream_url(StreamTrack::Audio)
            .ok_or(MediaError::missing_stream(StreamTrack::Audio))?;
        download_stream(&self.streams, audio_url, referer, audio_tmp).await?;

        let video_url = playinfo
            .stream_url(StreamTrack::Video)
            .ok_or(MediaError::missing_stream(StreamTrack::Video))?;
        download_stream(&self.streams, video_url, referer, video_tmp).await?;

        mux::merge_streams(video_tmp, audio_tmp, output).await
    }
}

/// Best-effort temp removal; never shadows the primary result.
async fn cleanup_temp_files(video_tmp: &Path, audio_tmp: &Path) {
    for path in [video_tmp, audio_tmp] {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to remove temp file");
            }
        }
    }
}
