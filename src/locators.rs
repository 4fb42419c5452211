//! Selector strings for the results page. These are a contract with third-party
//! markup; when the page changes, this is the only place to fix.

use crate::{error::ScraperError, Page};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorSet {
    pub card: String,
    pub name: String,
    pub primary_subtitle: String,
    pub secondary_subtitle: String,
    pub link: String,
    pub load_more: String,
    pub next_page: String,
    pub logged_in: Vec<String>,
}

impl Default for LocatorSet {
    fn default() -> Self {
        LocatorSet {
            card: ".reusable-search__result-container".to_string(),
            name: r#"span[aria-hidden="true"]"#.to_string(),
            primary_subtitle: ".entity-result__primary-subtitle".to_string(),
            secondary_subtitle: ".entity-result__secondary-subtitle".to_string(),
            link: "a.app-aware-link".to_string(),
            load_more: "button.scaffold-finite-scroll__load-button".to_string(),
            next_page: "button.artdeco-pagination__button--next:not([disabled])".to_string(),
            logged_in: vec![
                ".global-nav__me".to_string(),
                "#global-nav".to_string(),
                ".feed-identity-module".to_string(),
            ],
        }
    }
}

impl LocatorSet {
    /// Reads a locator set from JSON. Keys left out keep their default selector.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<LocatorSet, ScraperError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn login_predicate(&self) -> LoginPredicate {
        LoginPredicate::AnyOf(self.logged_in.clone())
    }
}

/// Heuristic for "the operator is logged in".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginPredicate {
    /// Logged in when at least one of the selectors matches.
    AnyOf(Vec<String>),
    /// Skip the check entirely.
    Always,
}

impl LoginPredicate {
    pub async fn check<P: Page + ?Sized>(&self, page: &P) -> Result<bool, ScraperError> {
        match self {
            LoginPredicate::Always => Ok(true),
            LoginPredicate::AnyOf(selectors) => {
                for selector in selectors {
                    if page.has_element(selector).await? {
                        tracing::debug!("Logged-in indicator present: {}", selector);
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}
