//! Retrieval orchestration.
//!
//! The only component aware of both pipelines: classifies text,
//! dispatches to the assembler or renderer, and flattens every failure
//! into the uniform outcome. Nothing propagates past this layer, and no
//! retries happen here; retry policy lives inside the sub-pipelines.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tracing::{error, info};

use bfetch_media::{classify, HttpResolver, VideoAssembler};
use bfetch_models::{Reference, ReferenceKind, RetrievalOutcome};
use bfetch_render::OpusRenderer;

use crate::config::BotConfig;

/// Orchestrates one retrieval per incoming message.
pub struct Retriever {
    config: BotConfig,
    resolver: HttpResolver,
    assembler: VideoAssembler,
    renderer: OpusRenderer,
    inflight: Mutex<HashMap<String, Weak<tokio::sync::Mutex<()>>>>,
}

impl Retriever {
    /// Build the orchestrator. Render backends are detected here, once.
    pub fn new(config: BotConfig) -> Self {
        let renderer = OpusRenderer::new(config.webdriver_url.as_deref());
        Self {
            config,
            resolver: HttpResolver::new(),
            assembler: VideoAssembler::new(),
            renderer,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Run one retrieval for a piece of chat text.
    pub async fn retrieve(&self, text: &str) -> RetrievalOutcome {
        let Some(reference) = classify(text, &self.resolver).await else {
            return RetrievalOutcome::NotApplicable;
        };

        info!(kind = %reference.kind(), url = reference.url(), "reference classified");

        // Concurrent retrievals of the same canonical URL serialize here;
        // the second caller then observes the idempotent artifact cache.
        let guard = self.inflight_guard(reference.url());
        let _held = guard.lock().await;

        match reference.kind() {
            ReferenceKind::Video => self.retrieve_video(&reference).await,
            ReferenceKind::Opus => self.retrieve_opus(&reference).await,
        }
    }

    async fn retrieve_video(&self, reference: &Reference) -> RetrievalOutcome {
        match self
            .assembler
            .assemble(reference.url(), &self.config.download_dir)
            .await
        {
            Ok(video) if video.cached => RetrievalOutcome::success(
                format!("video already downloaded: {}", video.title),
                video.path,
            ),
            Ok(video) => RetrievalOutcome::success(
                format!("download complete: {}", video.title),
                video.path,
            ),
            Err(e) => {
                error!(url = reference.url(), error = %e, "video retrieval failed");
                RetrievalOutcome::failure(e.to_string())
            }
        }
    }

    async fn retrieve_opus(&self, reference: &Reference) -> RetrievalOutcome {
        match self
            .renderer
            .render(reference.url(), &self.config.download_dir)
            .await
        {
            Ok(opus) if opus.cached => RetrievalOutcome::success(
                format!("opus image already rendered: {}", opus.title),
                opus.path,
            ),
            Ok(opus) => {
                RetrievalOutcome::success(format!("opus rendered: {}", opus.title), opus.path)
            }
            Err(e) => {
                error!(url = reference.url(), error = %e, "opus rendering failed");
                RetrievalOutcome::failure(e.to_string())
            }
        }
    }

    /// Per-URL mutex collapsing duplicate in-flight retrievals. Entries
    /// are held weakly and pruned on access, so the map stays bounded by
    /// the number of retrievals actually running.
    fn inflight_guard(&self, url: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inflight.lock().expect("inflight map poisoned");
        map.retain(|_, weak| weak.strong_count() > 0);
        if let Some(existing) = map.get(url).and_then(Weak::upgrade) {
            return existing;
        }
        let guard = Arc::new(tokio::sync::Mutex::new(()));
        map.insert(url.to_string(), Arc::downgrade(&guard));
        guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text_is_not_applicable() {
        let retriever = Retriever::new(BotConfig::default());
        let outcome = retriever.retrieve("今天天气不错，出去走走吧").await;
        assert_eq!(outcome, RetrievalOutcome::NotApplicable);
    }

    #[tokio::test]
    async fn test_sticker_text_is_not_applicable() {
        let retriever = Retriever::new(BotConfig::default());
        let outcome = retriever.retrieve("😂🤣[doge]").await;
        assert_eq!(outcome, RetrievalOutcome::NotApplicable);
    }

    #[tokio::test]
    async fn test_inflight_guard_is_shared_per_url() {
        let retriever = Retriever::new(BotConfig::default());

        let first = retriever.inflight_guard("https://www.bilibili.com/video/BV1");
        let second = retriever.inflight_guard("https://www.bilibili.com/video/BV1");
        assert!(Arc::ptr_eq(&first, &second));

        let other = retriever.inflight_guard("https://www.bilibili.com/video/BV2");
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[tokio::test]
    async fn test_inflight_guard_entries_are_pruned() {
        let retriever = Retriever::new(BotConfig::default());

        let guard = retriever.inflight_guard("https://www.bilibili.com/video/BV1");
        drop(guard);

        // The dropped entry is gone; a fresh guard is created.
        let fresh = retriever.inflight_guard("https://www.bilibili.com/video/BV1");
        assert_eq!(Arc::strong_count(&fresh), 1);
    }

    #[tokio::test]
    async fn test_inflight_guard_serializes_holders() {
        let retriever = Arc::new(Retriever::new(BotConfig::default()));

        let guard = retriever.inflight_guard("https://www.bilibili.com/video/BV1");
        let held = guard.lock().await;

        let contender = retriever.inflight_guard("https://www.bilibili.com/video/BV1");
        assert!(contender.try_lock().is_err());

        drop(held);
        assert!(contender.try_lock().is_ok());
    }
}
