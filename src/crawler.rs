use std::time::Duration;

use crate::canonical;
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::extract;
use crate::renderer::Renderer;
use crate::session::CrawlSession;
use crate::store::ArtifactStore;

/// Fixed pause after every page visit, regardless of outcome, to bound the
/// request rate against the target site
pub const POLITENESS_DELAY: Duration = Duration::from_secs(1);

/// Drive the breadth-first crawl from the site root until the frontier is
/// empty.
///
/// Each popped URL is terminal: a failed extraction is logged and never
/// re-queued. Newly discovered same-site links enter the frontier under the
/// query-dropping canonical form, which is what guarantees termination on
/// sites generating unbounded query-string variations.
pub async fn discover_pages(
    renderer: &mut dyn Renderer,
    config: &ScraperConfig,
    session: &mut CrawlSession,
    store: &ArtifactStore,
) -> Result<(), ScrapeError> {
    let site = config.site()?;
    let site_host = site.host_str().unwrap_or_default().to_string();

    let root = canonical::frontier_key(&config.site_url)
        .ok_or_else(|| ScrapeError::Config(format!("site_url is not crawlable: {}", config.site_url)))?;
    session.enqueue(root);

    ::log::info!("Discovering pages from {}", config.site_url);

    while let Some(url) = session.pop() {
        // the homepage is always the first pop
        let fallback = if session.visited_count() == 1 {
            Some("home")
        } else {
            None
        };

        ::log::info!("Scraping: {}", url);
        match extract::extract_page(renderer, &url, fallback, &site_host, config).await {
            Ok(page) => {
                store.persist(&page)?;

                for image in &page.record.images {
                    session.add_media(&image.src);
                }
                for link in &page.record.links {
                    if !canonical::same_site(&link.href, &site) {
                        continue;
                    }
                    if let Some(key) = canonical::frontier_key(&link.href) {
                        if session.enqueue(key.clone()) {
                            ::log::debug!("Queued for crawling: {}", key);
                        }
                    }
                }

                ::log::info!("Saved: {}", page.record.filename);
                session.push_page(page.record);
            }
            Err(e) => {
                ::log::error!("{}", e);
            }
        }

        tokio::time::sleep(POLITENESS_DELAY).await;
    }

    ::log::info!(
        "Crawl complete: {} URLs visited, {} pages extracted",
        session.visited_count(),
        session.pages().len()
    );
    Ok(())
}
