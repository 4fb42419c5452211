use clap::Parser;
use lead_scraper::browser::ChromePage;
use lead_scraper::config::Config;
use lead_scraper::leads::{Extractor, LeadData};
use lead_scraper::session::StdinSignal;
use lead_scraper::{run_scraper, Bootstrapper, Collector, Sink};
use tracing::{info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "info,html5ever=error,selectors=error,chromiumoxide=warn,sqlx=warn".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let config = Config::parse();
    let locators = config.locator_set().await?;
    let extractor = Extractor::new(&locators)?;
    let page = ChromePage::launch(config.headless, config.navigation_timeout()).await?;

    let store = if config.no_store {
        None
    } else {
        match LeadData::new(&config.database).await {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("Lead store unavailable, saving to file only: {}", e);
                None
            }
        }
    };

    let bootstrapper = Bootstrapper::new(config.session_policy(), &locators)
        .with_login_predicate(config.login_predicate(&locators));
    let mut collector = Collector::new(extractor, &locators, config.collector_policy());
    let mut sink = Sink::new(&config.output_dir, store);

    let report = run_scraper(&page, &mut StdinSignal, &bootstrapper, &mut collector, &mut sink).await?;

    match report.snapshot {
        Some(path) => info!(
            "Scraping complete: {} profile(s) saved to {}",
            collector.records().len(),
            path.display()
        ),
        None => info!("Scraping complete: no profiles found"),
    }
    Ok(())
}
