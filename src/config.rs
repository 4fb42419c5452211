use crate::{
    collector::CollectorPolicy,
    locators::{LocatorSet, LoginPredicate},
    session::SessionPolicy,
    ScraperError,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SEARCH_URL: &str = "https://www.linkedin.com/search/results/people/?geoUrn=%5B%22103644278%22%5D&industry=%5B%221594%22%2C%221862%22%2C%2280%22%5D&keywords=%22lead%20generation%20agency%22&origin=GLOBAL_SEARCH_HEADER&titleFreeText=Founder";

/// Collect profile listings from a people-search page after a manual login.
#[derive(Debug, Clone, Parser)]
#[command(name = "lead-scraper", version)]
pub struct Config {
    #[arg(long, env = "LEAD_LOGIN_URL", default_value = "https://www.linkedin.com/login")]
    pub login_url: String,

    #[arg(long, env = "LEAD_SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    pub search_url: String,

    /// Directory for snapshot and emergency backup files.
    #[arg(long, env = "LEAD_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// SQLite file for the lead store.
    #[arg(long, env = "LEAD_DATABASE", default_value = "leads.db")]
    pub database: PathBuf,

    #[arg(long, env = "LEAD_MAX_PROFILES", default_value_t = 20)]
    pub max_profiles: usize,

    #[arg(long, env = "LEAD_MAX_SCROLL_ATTEMPTS", default_value_t = 15)]
    pub max_scroll_attempts: u32,

    #[arg(long, default_value_t = 3)]
    pub max_navigation_retries: u32,

    #[arg(long, default_value_t = 90)]
    pub navigation_timeout_secs: u64,

    /// JSON file overriding selectors of the results page.
    #[arg(long, env = "LEAD_LOCATORS")]
    pub locators: Option<PathBuf>,

    #[arg(long)]
    pub headless: bool,

    /// Trust the operator's ENTER instead of looking for logged-in page elements.
    #[arg(long, env = "LEAD_SKIP_LOGIN_CHECK")]
    pub skip_login_check: bool,

    /// Only write the JSON snapshot.
    #[arg(long)]
    pub no_store: bool,
}

impl Config {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn collector_policy(&self) -> CollectorPolicy {
        CollectorPolicy {
            max_profiles: self.max_profiles,
            max_scroll_attempts: self.max_scroll_attempts,
            ..CollectorPolicy::default()
        }
    }

    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            login_url: self.login_url.clone(),
            search_url: self.search_url.clone(),
            max_navigation_retries: self.max_navigation_retries,
            navigation_timeout: self.navigation_timeout(),
            ..SessionPolicy::default()
        }
    }

    pub fn login_predicate(&self, locators: &LocatorSet) -> LoginPredicate {
        if self.skip_login_check {
            LoginPredicate::Always
        } else {
            locators.login_predicate()
        }
    }

    pub async fn locator_set(&self) -> Result<LocatorSet, ScraperError> {
        match &self.locators {
            Some(path) => LocatorSet::from_file(path).await,
            None => Ok(LocatorSet::default()),
        }
    }
}
