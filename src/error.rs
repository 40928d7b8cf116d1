use std::time::Duration;

use thiserror::Error;

/// Fatal errors that abort the run before or between phases.
///
/// Per-page and per-asset failures never surface here; they are logged and
/// the run continues without them.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to start WebDriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A page that could not be rendered at all. The page is skipped, not
/// retried, and is absent from the final report.
#[derive(Debug, Error)]
#[error("failed to render {url}: {cause}")]
pub struct PageError {
    pub url: String,
    pub cause: RenderError,
}

/// Errors surfaced by the renderer adapter.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("webdriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
