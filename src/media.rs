use std::time::Duration;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::renderer::Renderer;
use crate::utils::url_basename;

/// Per-asset fetch timeout, shorter than page navigation
pub const ASSET_TIMEOUT: Duration = Duration::from_secs(15);

/// Extensions routed to the images bucket; everything else lands in
/// documents. Classification is extension-based only, independent of the
/// actual payload.
const IMAGE_EXTS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];

#[derive(Debug, Default, Clone, Copy)]
pub struct MediaSummary {
    pub downloaded: usize,
    pub failed: usize,
}

/// Drain the accumulated media set, fetching each URL exactly once. URLs are
/// deduplicated upstream by exact string, so trivially-distinct URLs for the
/// same resource are fetched separately. Failures are logged and skipped; no
/// retries.
pub async fn download_media(
    renderer: &mut dyn Renderer,
    config: &ScraperConfig,
    urls: &[String],
) -> Result<MediaSummary, ScrapeError> {
    ::log::info!("Downloading {} media files", urls.len());
    let mut summary = MediaSummary::default();

    for (i, url) in urls.iter().enumerate() {
        let filename = url_basename(url).unwrap_or_else(|| format!("media_{i}.jpg"));
        let bucket = if is_image(&filename) { "images" } else { "documents" };

        let dir = config.media_dir.join(bucket);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(&filename);

        match renderer.fetch_raw(url, ASSET_TIMEOUT).await {
            Ok(fetched) if fetched.ok => {
                std::fs::write(&path, &fetched.body)?;
                summary.downloaded += 1;
            }
            Ok(fetched) => {
                ::log::warn!("Failed to download {} (status {})", url, fetched.status);
                summary.failed += 1;
            }
            Err(e) => {
                ::log::warn!("Failed to download {}: {}", url, e);
                summary.failed += 1;
            }
        }
    }

    ::log::info!(
        "Media pass complete: {} downloaded, {} failed",
        summary.downloaded,
        summary.failed
    );
    Ok(summary)
}

fn is_image(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    IMAGE_EXTS.iter().any(|ext| lower.ends_with(&format!(".{ext}")))
}
