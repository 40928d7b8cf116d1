use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Value, json};
use tokio::time::timeout;

use crate::config::{ScraperConfig, Viewport};
use crate::error::{RenderError, ScrapeError};

/// Outcome of a raw resource fetch
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    pub ok: bool,
    pub body: Vec<u8>,
}

/// Contract over the external browser-rendering capability.
///
/// The production implementation drives a WebDriver session; tests substitute
/// a scripted implementation serving fixture pages.
#[async_trait]
pub trait Renderer: Send {
    /// Navigate to a URL and wait for the page to load
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), RenderError>;

    /// Final HTML of the current page after rendering
    async fn current_html(&mut self) -> Result<String, RenderError>;

    /// Execute a script in page context and return its JSON result
    async fn evaluate(&mut self, script: &str, args: Vec<Value>) -> Result<Value, RenderError>;

    /// Resize the browser viewport
    async fn set_viewport(&mut self, size: Viewport) -> Result<(), RenderError>;

    /// Capture the current page to a PNG file. Captures the full document
    /// height, not just the visible viewport.
    async fn screenshot(&mut self, path: &Path) -> Result<(), RenderError>;

    /// Fetch a raw resource outside the rendered page
    async fn fetch_raw(&mut self, url: &str, timeout: Duration) -> Result<Fetched, RenderError>;
}

const DOCUMENT_HEIGHT: &str = "return Math.max(\
    document.body ? document.body.scrollHeight : 0, \
    document.documentElement.scrollHeight);";

/// Renderer backed by a fantoccini WebDriver session plus a reqwest client
/// for raw asset fetches. Both present the configured user-agent.
pub struct WebDriverRenderer {
    client: Client,
    http: reqwest::Client,
}

impl WebDriverRenderer {
    /// Connect to the configured WebDriver instance
    pub async fn connect(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let mut args = vec![format!("--user-agent={}", config.user_agent)];
        if config.headless {
            args.push("--headless=new".to_string());
        }

        let mut caps = serde_json::map::Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        ::log::info!("Connecting to WebDriver at {}", config.webdriver_url);
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, http })
    }

    /// Close the WebDriver session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    async fn navigate(&mut self, url: &str, limit: Duration) -> Result<(), RenderError> {
        timeout(limit, self.client.goto(url))
            .await
            .map_err(|_| RenderError::Timeout(limit))??;
        Ok(())
    }

    async fn current_html(&mut self) -> Result<String, RenderError> {
        Ok(self.client.source().await?)
    }

    async fn evaluate(&mut self, script: &str, args: Vec<Value>) -> Result<Value, RenderError> {
        Ok(self.client.execute(script, args).await?)
    }

    async fn set_viewport(&mut self, size: Viewport) -> Result<(), RenderError> {
        self.client.set_window_size(size.width, size.height).await?;
        Ok(())
    }

    async fn screenshot(&mut self, path: &Path) -> Result<(), RenderError> {
        // WebDriver screenshots cover the viewport only, so grow the window
        // to the document height for the capture and restore it after
        let height = self
            .client
            .execute(DOCUMENT_HEIGHT, vec![])
            .await?
            .as_f64()
            .unwrap_or(0.0) as u64;
        let (width, viewport_height) = self.client.get_window_size().await?;

        let grown = height > viewport_height;
        if grown {
            self.client
                .set_window_size(width as u32, height.min(u32::MAX as u64) as u32)
                .await?;
        }

        let shot = self.client.screenshot().await;
        if grown {
            self.client
                .set_window_size(width as u32, viewport_height as u32)
                .await?;
        }

        tokio::fs::write(path, shot?).await?;
        Ok(())
    }

    async fn fetch_raw(&mut self, url: &str, limit: Duration) -> Result<Fetched, RenderError> {
        let response = timeout(limit, self.http.get(url).send())
            .await
            .map_err(|_| RenderError::Timeout(limit))??;

        let status = response.status();
        let body = timeout(limit, response.bytes())
            .await
            .map_err(|_| RenderError::Timeout(limit))??;

        Ok(Fetched {
            status: status.as_u16(),
            ok: status.is_success(),
            body: body.to_vec(),
        })
    }
}
