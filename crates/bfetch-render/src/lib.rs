//! Opus page rendering.
//!
//! Renders a post page into a static PNG using the first of three
//! independent backends that succeeds:
//! 1. Full headless-browser automation (Chrome DevTools protocol)
//! 2. Browser-driver automation (WebDriver)
//! 3. Static HTML rasterization (no interactivity, weakest fallback)
//!
//! Backends are detected once at startup; undetected ones are skipped
//! silently rather than counted as failures.

pub mod backend;
pub mod chromium;
pub mod error;
pub mod page;
pub mod render;
pub mod static_image;
mod style;
pub mod webdriver;

pub use backend::{available_backends, RenderBackend};
pub use error::{RenderError, RenderResult};
pub use page::{extract_opus_info, OpusInfo};
pub use render::{OpusRenderer, RenderedOpus};
