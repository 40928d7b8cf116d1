use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::records::{FormRecord, NavLink, PageRecord};

/// Run-level summary, written once at the end of the run. Derived purely
/// from the successful page records; failed pages are absent by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    pub scraped_at: String,
    pub site_url: String,
    pub total_pages: usize,
    pub total_media: usize,
    pub pages: Vec<PageSummary>,
    /// Navigation snapshot taken from the first successfully scraped page
    pub navigation_structure: Vec<NavLink>,
    /// Embedded mailing-list widgets found across all pages
    pub mailchimp_forms: Vec<WidgetHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: String,
    pub url: String,
    pub filename: String,
    pub image_count: usize,
    pub form_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetHit {
    /// Title of the page carrying the widget
    pub page: String,
    pub url: String,
    pub iframe_src: String,
}

/// Aggregate all page records into the run report
pub fn build_report(
    config: &ScraperConfig,
    pages: &[PageRecord],
    total_media: usize,
) -> ScrapeReport {
    let mut mailchimp_forms = Vec::new();
    for page in pages {
        for form in &page.forms {
            if let FormRecord::Widget { src, .. } = form {
                mailchimp_forms.push(WidgetHit {
                    page: page.title.clone(),
                    url: page.url.clone(),
                    iframe_src: src.clone(),
                });
            }
        }
    }

    ScrapeReport {
        scraped_at: Local::now().to_rfc3339(),
        site_url: config.site_url.clone(),
        total_pages: pages.len(),
        total_media,
        pages: pages
            .iter()
            .map(|page| PageSummary {
                title: page.title.clone(),
                url: page.url.clone(),
                filename: page.filename.clone(),
                image_count: page.images.len(),
                form_count: page.forms.len(),
            })
            .collect(),
        navigation_structure: pages
            .first()
            .map(|page| page.navigation.clone())
            .unwrap_or_default(),
        mailchimp_forms,
    }
}

/// Write the report to `scrape_report.json` under the output directory
pub fn write_report(report: &ScrapeReport, config: &ScraperConfig) -> Result<PathBuf, ScrapeError> {
    let path = config.output_dir.join("scrape_report.json");
    let serialized = serde_json::to_vec_pretty(report)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, serialized)?;
    std::fs::rename(&tmp, &path)?;
    Ok(path)
}
