use clap::Parser;
use siteharvest::{Scraper, ScraperConfig};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut config = match ScraperConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Override the WebDriver URL with an environment variable if provided
    if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
        if !webdriver_url.is_empty() {
            config.webdriver_url = webdriver_url;
        }
    }

    println!("Note: scraping requires a WebDriver server (e.g. ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    let output_dir = config.output_dir.clone();
    ::log::info!("Starting scrape of {}", config.site_url);

    let scraper = match Scraper::new(config) {
        Ok(scraper) => scraper,
        Err(e) => {
            ::log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let start_time = std::time::Instant::now();
    match scraper.run().await {
        Ok(report) => {
            let duration = start_time.elapsed();
            println!();
            println!("{}", "=".repeat(60));
            println!("SCRAPING COMPLETE");
            println!("{}", "=".repeat(60));
            println!("Pages scraped: {}", report.total_pages);
            println!("Media files: {}", report.total_media);
            println!("Mailing-list forms found: {}", report.mailchimp_forms.len());
            println!("Output directory: {}", output_dir.display());
            println!("Elapsed: {:.2} seconds", duration.as_secs_f64());
            println!("{}", "=".repeat(60));
        }
        Err(e) => {
            ::log::error!("Scrape failed: {}", e);
            std::process::exit(1);
        }
    }
}
