//! End-to-end crawl tests over a scripted renderer serving a small
//! synthetic site, covering traversal, facet isolation and the media pass.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use siteharvest::config::{ScraperConfig, Viewport};
use siteharvest::error::RenderError;
use siteharvest::renderer::{Fetched, Renderer};
use siteharvest::scripts;
use siteharvest::{Scraper, ScrapeReport};

#[derive(Clone)]
struct MockPage {
    html: String,
    nav: Value,
    forms: Value,
    links: Value,
}

impl MockPage {
    fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            nav: json!([]),
            forms: json!([]),
            links: json!([]),
        }
    }
}

/// Scripted stand-in for the WebDriver-backed renderer. Serves fixture
/// pages, answers the in-page queries from canned JSON, and records every
/// navigation, capture and raw fetch.
#[derive(Default)]
struct MockRenderer {
    pages: HashMap<String, MockPage>,
    current: Option<String>,
    forms_failures: HashSet<String>,
    navigations: Vec<String>,
    fetches: Vec<String>,
    failing_fetches: HashSet<String>,
    captures: Vec<PathBuf>,
    viewport: Option<Viewport>,
    navigate_widths: Vec<Option<u32>>,
    links_eval_widths: Vec<Option<u32>>,
}

impl MockRenderer {
    fn with_page(mut self, url: &str, page: MockPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    fn failing_forms_on(mut self, url: &str) -> Self {
        self.forms_failures.insert(url.to_string());
        self
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<(), RenderError> {
        self.navigations.push(url.to_string());
        self.navigate_widths.push(self.viewport.map(|v| v.width));
        if self.pages.contains_key(url) {
            self.current = Some(url.to_string());
            Ok(())
        } else {
            Err(RenderError::Other(format!("unreachable: {url}")))
        }
    }

    async fn current_html(&mut self) -> Result<String, RenderError> {
        let current = self.current.as_ref().ok_or_else(|| {
            RenderError::Other("no page loaded".to_string())
        })?;
        Ok(self.pages[current].html.clone())
    }

    async fn evaluate(&mut self, script: &str, _args: Vec<Value>) -> Result<Value, RenderError> {
        let current = self.current.clone().unwrap_or_default();
        let page = self
            .pages
            .get(&current)
            .ok_or_else(|| RenderError::Other("no page loaded".to_string()))?;

        if script == scripts::NAVIGATION {
            Ok(page.nav.clone())
        } else if script == scripts::FORMS {
            if self.forms_failures.contains(&current) {
                Err(RenderError::Other("script threw".to_string()))
            } else {
                Ok(page.forms.clone())
            }
        } else if script == scripts::SITE_LINKS {
            self.links_eval_widths.push(self.viewport.map(|v| v.width));
            Ok(page.links.clone())
        } else {
            Err(RenderError::Other("unknown script".to_string()))
        }
    }

    async fn set_viewport(&mut self, size: Viewport) -> Result<(), RenderError> {
        self.viewport = Some(size);
        Ok(())
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), RenderError> {
        std::fs::write(path, b"png")?;
        self.captures.push(path.to_path_buf());
        Ok(())
    }

    async fn fetch_raw(&mut self, url: &str, _timeout: Duration) -> Result<Fetched, RenderError> {
        self.fetches.push(url.to_string());
        if self.failing_fetches.contains(url) {
            return Ok(Fetched {
                status: 404,
                ok: false,
                body: Vec::new(),
            });
        }
        Ok(Fetched {
            status: 200,
            ok: true,
            body: b"bytes".to_vec(),
        })
    }
}

fn test_config(root: &Path) -> ScraperConfig {
    serde_json::from_value(json!({
        "site_url": "https://site.test",
        "output_dir": root.join("output"),
        "screenshots_dir": root.join("output/screenshots"),
        "media_dir": root.join("output/media"),
        "pages_dir": root.join("output/pages"),
        "viewport": {"width": 1920, "height": 1080},
        "mobile_viewport": {"width": 375, "height": 667},
        "user_agent": "siteharvest-tests",
        "wait_time": 0,
        "headless": true
    }))
    .unwrap()
}

fn link(text: &str, href: &str) -> Value {
    json!({"text": text, "href": href})
}

/// Homepage links to /about and /contact; /about links back home, to itself
/// and to an external host; /contact carries a native form and a
/// mailing-list iframe.
fn seed_site() -> MockRenderer {
    let home = MockPage {
        html: r#"<html><head><title>Home</title></head><body><main>
            <h1>Welcome</h1><p>Front page.</p>
            <img src="/media/shared.png" alt="shared">
        </main></body></html>"#
            .to_string(),
        nav: json!([
            {"text": "About", "href": "https://site.test/about", "parent": "site-nav"},
            {"text": "Contact", "href": "https://site.test/contact", "parent": "site-nav"}
        ]),
        forms: json!([]),
        links: json!([
            link("About", "https://site.test/about"),
            link("Contact", "https://site.test/contact"),
        ]),
    };

    let about = MockPage {
        html: r#"<html><head><title>About</title></head><body><main>
            <p>Who we are.</p>
            <img src="https://site.test/media/shared.png" alt="shared again">
            <img src="/media/board.jpg" alt="board">
        </main></body></html>"#
            .to_string(),
        nav: json!([]),
        forms: json!([]),
        links: json!([
            link("Home", "https://site.test/"),
            link("Self", "https://site.test/about"),
            link("Partner", "https://other.example/"),
        ]),
    };

    let contact = MockPage {
        html: r#"<html><head><title>Contact</title></head><body><main>
            <p>Reach us.</p>
        </main></body></html>"#
            .to_string(),
        nav: json!([]),
        forms: json!([
            {
                "type": "form",
                "action": "https://site.test/submit",
                "method": "post",
                "fields": [
                    {"type": "email", "name": "email", "id": "email",
                     "placeholder": "you@example.com", "required": true}
                ]
            },
            {
                "type": "embedded_widget",
                "src": "https://site.us1.list-manage.com/subscribe",
                "width": "600",
                "height": "400"
            }
        ]),
        links: json!([link("Home", "https://site.test/")]),
    };

    MockRenderer::default()
        .with_page("https://site.test/", home)
        .with_page("https://site.test/about", about)
        .with_page("https://site.test/contact", contact)
}

async fn run_seed_site() -> (ScrapeReport, MockRenderer, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let scraper = Scraper::new(config).unwrap();
    let mut renderer = seed_site();
    let report = scraper.run_with(&mut renderer).await.unwrap();
    (report, renderer, dir)
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let (report, renderer, dir) = run_seed_site().await;

    // three pages, each visited exactly once, in FIFO discovery order
    assert_eq!(report.total_pages, 3);
    assert_eq!(
        renderer.navigations,
        vec![
            "https://site.test/",
            "https://site.test/about",
            "https://site.test/contact",
        ]
    );

    // external host never entered the frontier
    assert!(!renderer.navigations.iter().any(|u| u.contains("other.example")));

    // per-page artifacts exist under the title slugs
    let pages_dir = dir.path().join("output/pages");
    for name in ["home", "about", "contact"] {
        assert!(pages_dir.join(format!("{name}.html")).exists());
        assert!(pages_dir.join(format!("{name}.json")).exists());
    }

    // homepage record links contain only the two same-site targets
    let home: siteharvest::PageRecord =
        serde_json::from_str(&std::fs::read_to_string(pages_dir.join("home.json")).unwrap())
            .unwrap();
    let hrefs: Vec<&str> = home.links.iter().map(|l| l.href.as_str()).collect();
    assert_eq!(
        hrefs,
        vec!["https://site.test/about", "https://site.test/contact"]
    );

    // exactly one mailing-list widget, sourced from the contact page
    assert_eq!(report.mailchimp_forms.len(), 1);
    assert_eq!(report.mailchimp_forms[0].url, "https://site.test/contact");
    assert!(report.mailchimp_forms[0].iframe_src.contains("list-manage"));

    // navigation snapshot comes from the first scraped page
    assert_eq!(report.navigation_structure.len(), 2);
    assert_eq!(report.navigation_structure[0].text, "About");

    // report on disk
    assert!(dir.path().join("output/scrape_report.json").exists());
}

#[tokio::test]
async fn test_media_dedup_boundary() {
    let (report, renderer, dir) = run_seed_site().await;

    // /media/shared.png is referenced by two pages under the same absolute
    // URL: one download attempt. board.jpg is a second distinct URL.
    assert_eq!(report.total_media, 2);
    assert_eq!(
        renderer.fetches,
        vec![
            "https://site.test/media/shared.png",
            "https://site.test/media/board.jpg",
        ]
    );

    let images = dir.path().join("output/media/images");
    assert!(images.join("shared.png").exists());
    assert!(images.join("board.jpg").exists());
}

#[tokio::test]
async fn test_screenshots_captured_per_page() {
    let (_report, renderer, dir) = run_seed_site().await;

    assert_eq!(renderer.captures.len(), 6);
    let shots = dir.path().join("output/screenshots");
    assert!(shots.join("home_desktop.png").exists());
    assert!(shots.join("home_mobile.png").exists());
    assert!(shots.join("contact_mobile.png").exists());
}

#[tokio::test]
async fn test_pages_rendered_and_evaluated_at_desktop_viewport() {
    let (_report, renderer, _dir) = run_seed_site().await;

    // every page navigates at the desktop viewport, including the first,
    // and the mobile viewport from the previous page's capture never leaks
    // into the next page's facet evaluation
    assert_eq!(renderer.navigate_widths, vec![Some(1920); 3]);
    assert_eq!(renderer.links_eval_widths, vec![Some(1920); 3]);
}

#[tokio::test]
async fn test_partial_failure_isolation() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let page = MockPage {
        html: r#"<html><head><title>Home</title></head><body><main>
            <p>Content survives.</p><img src="/a.png" alt="a">
        </main></body></html>"#
            .to_string(),
        nav: json!([]),
        forms: json!([]),
        links: json!([link("Self", "https://site.test/")]),
    };
    let mut renderer = MockRenderer::default()
        .with_page("https://site.test/", page)
        .failing_forms_on("https://site.test/");

    let scraper = Scraper::new(config).unwrap();
    let report = scraper.run_with(&mut renderer).await.unwrap();

    // the forms script threw, but the page still succeeded with the other
    // facets intact
    assert_eq!(report.total_pages, 1);
    let record: siteharvest::PageRecord = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("output/pages/home.json")).unwrap(),
    )
    .unwrap();
    assert!(record.forms.is_empty());
    assert_eq!(record.content.paragraphs, vec!["Content survives."]);
    assert_eq!(record.images.len(), 1);
    assert_eq!(record.links.len(), 1);
}

#[tokio::test]
async fn test_failed_page_skipped_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    // /broken is linked from the homepage but cannot be rendered
    let home = MockPage {
        html: "<html><head><title>Home</title></head><body><main><p>Hi.</p></main></body></html>"
            .to_string(),
        nav: json!([]),
        forms: json!([]),
        links: json!([
            link("Broken", "https://site.test/broken"),
            link("About", "https://site.test/about"),
        ]),
    };
    let about = MockPage::new(
        "<html><head><title>About</title></head><body><main><p>Us.</p></main></body></html>",
    );

    let mut renderer = MockRenderer::default()
        .with_page("https://site.test/", home)
        .with_page("https://site.test/about", about);

    let scraper = Scraper::new(config).unwrap();
    let report = scraper.run_with(&mut renderer).await.unwrap();

    // the broken page was attempted once, never retried, and is absent from
    // the report
    assert_eq!(report.total_pages, 2);
    assert_eq!(
        renderer
            .navigations
            .iter()
            .filter(|u| u.as_str() == "https://site.test/broken")
            .count(),
        1
    );
    assert!(!report.pages.iter().any(|p| p.url.contains("broken")));
    assert!(!dir.path().join("output/pages/untitled.json").exists());
}

#[tokio::test]
async fn test_cycles_and_query_variants_terminate() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    // a and b link to each other, to themselves, and to query variants of
    // the same paths
    let a = MockPage {
        html: "<html><head><title>A</title></head><body><main><p>a</p></main></body></html>"
            .to_string(),
        nav: json!([]),
        forms: json!([]),
        links: json!([
            link("b", "https://site.test/b"),
            link("b again", "https://site.test/b?page=2"),
            link("self", "https://site.test/a"),
        ]),
    };
    let b = MockPage {
        html: "<html><head><title>B</title></head><body><main><p>b</p></main></body></html>"
            .to_string(),
        nav: json!([]),
        forms: json!([]),
        links: json!([
            link("a", "https://site.test/a"),
            link("a again", "https://site.test/a?utm=1"),
        ]),
    };

    let home = MockPage {
        html: "<html><head><title>Home</title></head><body><main><p>h</p></main></body></html>"
            .to_string(),
        nav: json!([]),
        forms: json!([]),
        links: json!([link("a", "https://site.test/a")]),
    };

    let mut renderer = MockRenderer::default()
        .with_page("https://site.test/", home)
        .with_page("https://site.test/a", a)
        .with_page("https://site.test/b", b);

    let scraper = Scraper::new(config).unwrap();
    let report = scraper.run_with(&mut renderer).await.unwrap();

    // query variants collapse onto the path-only canonical form, so every
    // reachable page is visited exactly once and the crawl terminates
    assert_eq!(report.total_pages, 3);
    assert_eq!(renderer.navigations.len(), 3);
    let unique: HashSet<&String> = renderer.navigations.iter().collect();
    assert_eq!(unique.len(), 3);
}
