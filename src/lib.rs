// Re-export modules
pub mod canonical;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extract;
pub mod media;
pub mod records;
pub mod renderer;
pub mod report;
pub mod scripts;
pub mod session;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScraperConfig;
pub use error::ScrapeError;
pub use records::PageRecord;
pub use report::ScrapeReport;

use crate::media::MediaSummary;
use crate::renderer::{Renderer, WebDriverRenderer};
use crate::session::CrawlSession;
use crate::store::ArtifactStore;

/// Top-level orchestrator for one scrape run: crawl phase, media pass,
/// report.
pub struct Scraper {
    config: ScraperConfig,
}

impl Scraper {
    /// Create a scraper from a validated configuration
    pub fn new(config: ScraperConfig) -> Result<Self, ScrapeError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Run the full workflow against a live WebDriver session
    pub async fn run(&self) -> Result<ScrapeReport, ScrapeError> {
        let mut renderer = WebDriverRenderer::connect(&self.config).await?;
        let result = self.run_with(&mut renderer).await;
        renderer.close().await;
        result
    }

    /// Run the full workflow against any renderer implementation
    pub async fn run_with(&self, renderer: &mut dyn Renderer) -> Result<ScrapeReport, ScrapeError> {
        self.config.ensure_dirs()?;

        let store = ArtifactStore::new(&self.config);
        let mut session = CrawlSession::new();

        crawler::discover_pages(renderer, &self.config, &mut session, &store).await?;

        let media = if session.media_count() > 0 {
            media::download_media(renderer, &self.config, session.media_urls()).await?
        } else {
            MediaSummary::default()
        };
        ::log::debug!("Media summary: {:?}", media);

        let report = report::build_report(&self.config, session.pages(), session.media_count());
        let path = report::write_report(&report, &self.config)?;
        ::log::info!("Report saved to {}", path.display());

        Ok(report)
    }
}
