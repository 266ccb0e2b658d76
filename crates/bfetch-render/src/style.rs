//! Shared rendering constants: viewport, selectors, timing, and the style
//! block that hides site chrome and isolates the opus content region.

use std::time::Duration;

pub(crate) const VIEWPORT_WIDTH: u32 = 1200;
pub(crate) const VIEWPORT_HEIGHT: u32 = 800;

/// The content region to isolate and screenshot.
pub(crate) const CONTENT_SELECTOR: &str = ".opus-detail";

/// Scroll increment used to force lazy-loaded content to materialize.
pub(crate) const SCROLL_STEP: i64 = 800;
pub(crate) const SCROLL_PAUSE: Duration = Duration::from_millis(500);
pub(crate) const SCROLL_SETTLE: Duration = Duration::from_secs(1);

pub(crate) const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);
pub(crate) const SELECTOR_TIMEOUT: Duration = Duration::from_secs(20);
pub(crate) const SELECTOR_POLL: Duration = Duration::from_millis(500);

/// Browser identity presented by the rendering backends.
pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Hides navigation, comments, sidebars and ads, and flattens the opus
/// container so the screenshot holds only the post content.
pub(crate) const HIDE_CHROME_CSS: &str = "
.bili-header, .nav-bar, .fixed-sidenav-storage, .palette-button-wrap,
.opus-detail-footer, .comment-container, .right-sidebar-wrap,
.floating-header, .ad-banner, .login-tip { display: none !important; }

.opus-detail {
    margin: 0 !important;
    padding: 20px !important;
    box-shadow: none !important;
}

body {
    background: white !important;
    margin: 0 !important;
    padding: 0 !important;
}
";

/// JS that appends the hide/isolate style block to the document head.
pub(crate) fn inject_style_script() -> String {
    format!(
        "var style = document.createElement('style'); \
         style.innerHTML = `{}`; \
         document.head.appendChild(style);",
        HIDE_CHROME_CSS
    )
}

/// JS expression yielding the full content height, preferring the opus
/// container over the body.
pub(crate) const CONTENT_HEIGHT_JS: &str = "(() => { \
     const opus = document.querySelector('.opus-detail'); \
     return opus ? opus.scrollHeight : document.body.scrollHeight; \
 })()";
