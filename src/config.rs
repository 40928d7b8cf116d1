use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ScrapeError;

/// Browser viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Configuration for a scrape run, loaded from a JSON file.
///
/// All content-affecting fields are required; only ambient fields
/// (WebDriver endpoint, widget markers) carry defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// URL of the site to harvest
    pub site_url: String,

    /// Directory for the run-level report
    pub output_dir: PathBuf,

    /// Directory for desktop/mobile page captures
    pub screenshots_dir: PathBuf,

    /// Directory for downloaded media (images/ and documents/ buckets)
    pub media_dir: PathBuf,

    /// Directory for per-page HTML and JSON artifacts
    pub pages_dir: PathBuf,

    /// Desktop viewport used for rendering and the first capture
    pub viewport: Viewport,

    /// Mobile viewport used for the second capture
    pub mobile_viewport: Viewport,

    /// User-agent presented by both the browser and the raw fetcher
    pub user_agent: String,

    /// Extra settle delay in milliseconds after each navigation
    pub wait_time: u64,

    /// Whether to run the browser headless
    pub headless: bool,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Substrings identifying third-party embed iframes worth reporting
    #[serde(default = "default_widget_markers")]
    pub widget_markers: Vec<String>,
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default embed markers (mailing-list providers)
fn default_widget_markers() -> Vec<String> {
    vec!["mailchimp".to_string(), "list-manage".to_string()]
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let mut file = File::open(path.as_ref()).map_err(|e| {
            ScrapeError::Config(format!(
                "cannot open config file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ScrapeError::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields that serde cannot: URL shape and viewport sanity
    pub fn validate(&self) -> Result<(), ScrapeError> {
        let url = Url::parse(&self.site_url)
            .map_err(|e| ScrapeError::Config(format!("invalid site_url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScrapeError::Config(format!(
                "site_url must be http(s), got {}",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(ScrapeError::Config("site_url has no host".to_string()));
        }
        for vp in [&self.viewport, &self.mobile_viewport] {
            if vp.width == 0 || vp.height == 0 {
                return Err(ScrapeError::Config(
                    "viewport dimensions must be non-zero".to_string(),
                ));
            }
        }
        if self.widget_markers.is_empty() {
            return Err(ScrapeError::Config(
                "widget_markers must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Parsed form of `site_url`; only valid after `validate`
    pub fn site(&self) -> Result<Url, ScrapeError> {
        Url::parse(&self.site_url)
            .map_err(|e| ScrapeError::Config(format!("invalid site_url: {e}")))
    }

    /// Create the four output areas up front
    pub fn ensure_dirs(&self) -> Result<(), ScrapeError> {
        for dir in [
            &self.output_dir,
            &self.screenshots_dir,
            &self.media_dir,
            &self.pages_dir,
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
