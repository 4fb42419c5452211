use tracing::{error, info, warn};

pub mod browser;
pub mod collector;
pub mod config;
pub mod leads;
pub mod locators;
pub mod session;
pub mod sink;

mod data;
mod error;
mod utils;

#[cfg(test)]
mod testing;

pub use collector::{Collector, CollectorPolicy};
pub use data::Table;
pub use error::{CardParseError, ScraperError};
pub use leads::{Extractor, ProfileRecord};
pub use locators::{LocatorSet, LoginPredicate};
pub use session::{Bootstrapper, OperatorSignal, SessionPolicy};
pub use sink::{Sink, SinkReport};

/// The one browser tab a run drives. Every stage borrows the same handle in turn.
#[async_trait::async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), ScraperError>;
    async fn url(&self) -> Result<Option<String>, ScraperError>;
    async fn content(&self) -> Result<String, ScraperError>;
    async fn scroll_height(&self) -> Result<u64, ScraperError>;
    async fn scroll_by(&self, distance: u32) -> Result<(), ScraperError>;
    async fn has_element(&self, selector: &str) -> Result<bool, ScraperError>;

    /// Clicks the first element matching `selector`. `Ok(false)` when nothing matches.
    async fn click(&self, selector: &str) -> Result<bool, ScraperError>;

    async fn close(&self) -> Result<(), ScraperError>;
}

#[async_trait::async_trait]
pub trait LeadStore: Send + Sync {
    /// Inserts every record in one batch, returning how many were new.
    async fn insert_many(&self, records: &[ProfileRecord]) -> Result<u64, ScraperError>;
    async fn all(&self) -> Result<Vec<ProfileRecord>, ScraperError>;
    async fn close(&self);
}

/// Login, collection and persistence over one page, followed by cleanup that runs
/// on every exit path: emergency backup, store close, browser close.
pub async fn run_scraper<P, O, S>(
    page: &P,
    signal: &mut O,
    bootstrapper: &Bootstrapper,
    collector: &mut Collector,
    sink: &mut Sink<S>,
) -> Result<SinkReport, ScraperError>
where
    P: Page + ?Sized,
    O: OperatorSignal + ?Sized,
    S: LeadStore,
{
    let result: Result<SinkReport, ScraperError> = async {
        bootstrapper.bootstrap(page, signal).await?;
        let records = collector.collect(page).await?;
        info!("Collected {} profile(s)", records.len());
        sink.persist(records).await
    }
    .await;

    if let Err(e) = &result {
        error!("Run aborted: {}", e);
    }

    sink.finish(collector.records()).await;
    if let Err(e) = page.close().await {
        warn!("Closing browser failed: {}", e);
    }

    result
}
