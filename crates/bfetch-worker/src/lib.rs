//! Retrieval worker.
//!
//! This crate provides:
//! - The retrieval orchestrator composing classifier, assembler and renderer
//! - A per-URL in-flight guard collapsing duplicate retrievals
//! - Env-based configuration

pub mod config;
pub mod retriever;

pub use config::BotConfig;
pub use retriever::Retriever;
