use std::path::{Path, PathBuf};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::extract::ExtractedPage;

/// Writes per-page artifacts under the pages directory, keyed by the
/// title-derived slug. Slug collisions overwrite earlier artifacts.
pub struct ArtifactStore {
    pages_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            pages_dir: config.pages_dir.clone(),
        }
    }

    /// Write `{filename}.html` and `{filename}.json` for a page
    pub fn persist(&self, page: &ExtractedPage) -> Result<(), ScrapeError> {
        let filename = &page.record.filename;

        let html_path = self.pages_dir.join(format!("{filename}.html"));
        write_atomic(&html_path, page.html.as_bytes())?;

        let json_path = self.pages_dir.join(format!("{filename}.json"));
        let serialized = serde_json::to_vec_pretty(&page.record)?;
        write_atomic(&json_path, &serialized)?;

        Ok(())
    }
}

/// Whole-file write through a temp sibling, so a crash never leaves a
/// partially written artifact
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ScrapeError> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
