use std::time::Duration;

use chrono::Local;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Value, json};
use url::Url;

use crate::config::ScraperConfig;
use crate::error::{PageError, RenderError};
use crate::records::{
    FormRecord, Heading, ImageRef, LinkRef, ListBlock, ListKind, NavLink, PageContent, PageMeta,
    PageRecord, Screenshots,
};
use crate::renderer::Renderer;
use crate::scripts;
use crate::utils::slugify;

/// Hard timeout for a single page navigation
pub const NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause after switching to the mobile viewport so the page can reflow
const REFLOW_PAUSE: Duration = Duration::from_millis(1000);

/// Subtrees ignored during content and image extraction
const STRIPPED_TAGS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// A successfully extracted page: the structured record plus the raw
/// rendered markup it was derived from.
pub struct ExtractedPage {
    pub record: PageRecord,
    pub html: String,
}

/// Render a URL and extract all facets into a [`PageRecord`].
///
/// A navigation or render failure aborts the whole page. Any individual
/// facet failing afterwards degrades to an empty result with a logged
/// warning; the page still succeeds.
pub async fn extract_page(
    renderer: &mut dyn Renderer,
    url: &str,
    fallback_name: Option<&str>,
    site_host: &str,
    config: &ScraperConfig,
) -> Result<ExtractedPage, PageError> {
    // render and evaluate at the desktop viewport; the previous page's
    // mobile capture leaves the browser at the mobile size otherwise
    if let Err(cause) = renderer.set_viewport(config.viewport).await {
        return Err(PageError {
            url: url.to_string(),
            cause,
        });
    }
    if let Err(cause) = renderer.navigate(url, NAV_TIMEOUT).await {
        return Err(PageError {
            url: url.to_string(),
            cause,
        });
    }
    if config.wait_time > 0 {
        tokio::time::sleep(Duration::from_millis(config.wait_time)).await;
    }

    let html = match renderer.current_html().await {
        Ok(html) => html,
        Err(cause) => {
            return Err(PageError {
                url: url.to_string(),
                cause,
            });
        }
    };

    let StaticFacets {
        title,
        filename,
        meta,
        content,
        images,
    } = parse_static(&html, url, fallback_name);

    let navigation: Vec<NavLink> = facet(
        renderer.evaluate(scripts::NAVIGATION, vec![]).await,
        "navigation",
        url,
    );
    let forms: Vec<FormRecord> = facet(
        renderer
            .evaluate(scripts::FORMS, vec![json!(config.widget_markers)])
            .await,
        "forms",
        url,
    );
    let links: Vec<LinkRef> = facet(
        renderer
            .evaluate(scripts::SITE_LINKS, vec![json!(site_host)])
            .await,
        "links",
        url,
    );
    let links = dedup_links(links);

    let screenshots = capture_screenshots(renderer, &filename, config).await;

    let record = PageRecord {
        url: url.to_string(),
        title,
        filename,
        scraped_at: Local::now().to_rfc3339(),
        meta,
        navigation,
        content,
        images,
        forms,
        links,
        screenshots,
    };

    Ok(ExtractedPage { record, html })
}

/// Decode one in-page facet, degrading to empty on any failure
fn facet<T: serde::de::DeserializeOwned>(
    result: Result<Value, RenderError>,
    name: &str,
    url: &str,
) -> Vec<T> {
    match result {
        Ok(value) => match serde_json::from_value(value) {
            Ok(items) => items,
            Err(e) => {
                ::log::warn!("Could not decode {} facet for {}: {}", name, url, e);
                Vec::new()
            }
        },
        Err(e) => {
            ::log::warn!("Could not extract {} facet for {}: {}", name, url, e);
            Vec::new()
        }
    }
}

/// Re-deduplicate the in-page link results by their fragment-stripped
/// canonical form, preserving first-seen order. Non-HTTP(S) entries are
/// dropped silently.
fn dedup_links(links: Vec<LinkRef>) -> Vec<LinkRef> {
    let mut seen = std::collections::HashSet::new();
    links
        .into_iter()
        .filter(|link| match crate::canonical::link_key(&link.href) {
            Some(key) => seen.insert(key),
            None => false,
        })
        .collect()
}

async fn capture_screenshots(
    renderer: &mut dyn Renderer,
    filename: &str,
    config: &ScraperConfig,
) -> Screenshots {
    let mut shots = Screenshots::default();

    let desktop = config.screenshots_dir.join(format!("{filename}_desktop.png"));
    match capture(renderer, config.viewport, &desktop, None).await {
        Ok(()) => shots.desktop = Some(desktop.to_string_lossy().into_owned()),
        Err(e) => ::log::warn!("Desktop capture failed for {}: {}", filename, e),
    }

    let mobile = config.screenshots_dir.join(format!("{filename}_mobile.png"));
    match capture(renderer, config.mobile_viewport, &mobile, Some(REFLOW_PAUSE)).await {
        Ok(()) => shots.mobile = Some(mobile.to_string_lossy().into_owned()),
        Err(e) => ::log::warn!("Mobile capture failed for {}: {}", filename, e),
    }

    shots
}

async fn capture(
    renderer: &mut dyn Renderer,
    viewport: crate::config::Viewport,
    path: &std::path::Path,
    pause: Option<Duration>,
) -> Result<(), RenderError> {
    renderer.set_viewport(viewport).await?;
    if let Some(pause) = pause {
        tokio::time::sleep(pause).await;
    }
    renderer.screenshot(path).await
}

struct StaticFacets {
    title: String,
    filename: String,
    meta: PageMeta,
    content: PageContent,
    images: Vec<ImageRef>,
}

/// Facets derivable from the final markup alone. Kept synchronous so the
/// non-Send parsed document never lives across an await point.
fn parse_static(html: &str, url: &str, fallback_name: Option<&str>) -> StaticFacets {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&sel("title"))
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback_name.unwrap_or("Untitled").to_string());

    StaticFacets {
        filename: slugify(&title),
        title,
        meta: extract_meta(&doc),
        content: extract_content(&doc),
        images: extract_images(&doc, url),
    }
}

fn sel(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector")
}

fn extract_meta(doc: &Html) -> PageMeta {
    let mut meta = PageMeta::default();

    if let Some(el) = doc.select(&sel(r#"meta[name="description"]"#)).next() {
        meta.description = el.value().attr("content").unwrap_or("").to_string();
    }
    if let Some(el) = doc.select(&sel(r#"meta[name="keywords"]"#)).next() {
        meta.keywords = el.value().attr("content").unwrap_or("").to_string();
    }
    for el in doc.select(&sel(r#"meta[property^="og:"]"#)) {
        let prop = el.value().attr("property").unwrap_or("");
        let suffix = prop.trim_start_matches("og:").to_string();
        let content = el.value().attr("content").unwrap_or("").to_string();
        meta.og_tags.insert(suffix, content);
    }

    meta
}

/// Extract headings, paragraphs, lists and flattened text from the primary
/// content region (first of: main, article, body), ignoring stripped
/// subtrees.
fn extract_content(doc: &Html) -> PageContent {
    let root = doc
        .select(&sel("main"))
        .next()
        .or_else(|| doc.select(&sel("article")).next())
        .or_else(|| doc.select(&sel("body")).next());
    let Some(root) = root else {
        return PageContent::default();
    };

    let mut headings = Vec::new();
    for level in 1..=6u8 {
        let selector = sel(&format!("h{level}"));
        for h in root.select(&selector) {
            if in_stripped(&h) {
                continue;
            }
            headings.push(Heading {
                level,
                text: normalized_text(h),
            });
        }
    }

    let paragraphs: Vec<String> = root
        .select(&sel("p"))
        .filter(|p| !in_stripped(p))
        .map(normalized_text)
        .filter(|text| !text.is_empty())
        .collect();

    let mut lists = Vec::new();
    for list in root.select(&sel("ul, ol")) {
        if in_stripped(&list) {
            continue;
        }
        let kind = if list.value().name() == "ol" {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        };
        let items = list.select(&sel("li")).map(normalized_text).collect();
        lists.push(ListBlock { kind, items });
    }

    let mut parts = Vec::new();
    collect_text(root, &mut parts);

    PageContent {
        headings,
        paragraphs,
        lists,
        text: parts.join("\n"),
    }
}

/// All images outside stripped subtrees, preferring an eager src over a
/// lazy-load attribute, resolved against the page URL.
fn extract_images(doc: &Html, base: &str) -> Vec<ImageRef> {
    let base_url = Url::parse(base).ok();

    doc.select(&sel("img"))
        .filter(|img| !in_stripped(img))
        .filter_map(|img| {
            let src = img
                .value()
                .attr("src")
                .filter(|s| !s.is_empty())
                .or_else(|| img.value().attr("data-src"))?;
            let resolved = match &base_url {
                Some(b) => b.join(src).ok()?.to_string(),
                None => src.to_string(),
            };
            Some(ImageRef {
                src: resolved,
                alt: img.value().attr("alt").unwrap_or("").to_string(),
                title: img.value().attr("title").unwrap_or("").to_string(),
            })
        })
        .collect()
}

fn in_stripped(el: &ElementRef) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| STRIPPED_TAGS.contains(&a.value().name()))
}

fn normalized_text(el: ElementRef) -> String {
    el.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(el: ElementRef, parts: &mut Vec<String>) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if STRIPPED_TAGS.contains(&child_el.value().name()) {
                continue;
            }
            collect_text(child_el, parts);
        } else if let scraper::Node::Text(text) = child.value() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
    }
}
