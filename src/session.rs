use crate::{
    locators::{LocatorSet, LoginPredicate},
    Page, ScraperError,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Something the run blocks on until the operator has finished logging in.
#[async_trait::async_trait]
pub trait OperatorSignal: Send {
    async fn wait(&mut self) -> Result<(), ScraperError>;
}

/// Waits for ENTER on stdin. A closed stdin counts as confirmation.
pub struct StdinSignal;

#[async_trait::async_trait]
impl OperatorSignal for StdinSignal {
    async fn wait(&mut self) -> Result<(), ScraperError> {
        println!("Log in manually in the browser window, then press ENTER...");
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SessionPolicy {
    pub login_url: String,
    pub search_url: String,
    pub max_navigation_retries: u32,
    pub navigation_timeout: Duration,
    /// Pause after navigation before looking for result cards.
    pub settle_delay: Duration,
    pub retry_delay: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        SessionPolicy {
            login_url: "https://www.linkedin.com/login".to_string(),
            search_url: String::new(),
            max_navigation_retries: 3,
            navigation_timeout: Duration::from_secs(90),
            settle_delay: Duration::from_secs(5),
            retry_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug)]
pub struct Bootstrapper {
    policy: SessionPolicy,
    login: LoginPredicate,
    card: String,
}

impl Bootstrapper {
    pub fn new(policy: SessionPolicy, locators: &LocatorSet) -> Bootstrapper {
        Bootstrapper {
            policy,
            login: locators.login_predicate(),
            card: locators.card.clone(),
        }
    }

    pub fn with_login_predicate(mut self, login: LoginPredicate) -> Bootstrapper {
        self.login = login;
        self
    }

    /// Logs in, then opens the search listing. Returns whether result cards were
    /// seen; a listing that never shows cards is not an error.
    pub async fn bootstrap<P, O>(&self, page: &P, signal: &mut O) -> Result<bool, ScraperError>
    where
        P: Page + ?Sized,
        O: OperatorSignal + ?Sized,
    {
        self.login(page, signal).await?;
        self.open_results(page).await
    }

    pub async fn login<P, O>(&self, page: &P, signal: &mut O) -> Result<(), ScraperError>
    where
        P: Page + ?Sized,
        O: OperatorSignal + ?Sized,
    {
        self.navigate(page, &self.policy.login_url).await?;
        signal.wait().await?;

        if !self.login.check(page).await? {
            let url = page
                .url()
                .await?
                .unwrap_or_else(|| self.policy.login_url.clone());
            return Err(ScraperError::Authentication { url });
        }
        info!("Login verified");
        Ok(())
    }

    pub async fn open_results<P: Page + ?Sized>(&self, page: &P) -> Result<bool, ScraperError> {
        let url = &self.policy.search_url;

        for attempt in 1..=self.policy.max_navigation_retries {
            match self.navigate(page, url).await {
                Ok(()) => {
                    tokio::time::sleep(self.policy.settle_delay).await;
                    match page.has_element(&self.card).await {
                        Ok(true) => {
                            info!("Results listing ready after {} attempt(s)", attempt);
                            return Ok(true);
                        }
                        Ok(false) => warn!(
                            "No result cards on {} (attempt {}/{})",
                            url, attempt, self.policy.max_navigation_retries
                        ),
                        Err(e) => warn!(
                            "Looking for result cards failed: {} (attempt {}/{})",
                            e, attempt, self.policy.max_navigation_retries
                        ),
                    }
                }
                Err(e) => warn!(
                    "{} (attempt {}/{})",
                    e, attempt, self.policy.max_navigation_retries
                ),
            }

            if attempt < self.policy.max_navigation_retries {
                tokio::time::sleep(self.policy.retry_delay).await;
            }
        }

        warn!("Results listing never appeared; collecting from the current page anyway");
        Ok(false)
    }

    async fn navigate<P: Page + ?Sized>(&self, page: &P, url: &str) -> Result<(), ScraperError> {
        match tokio::time::timeout(self.policy.navigation_timeout, page.goto(url)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ScraperError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ScraperError::Navigation {
                url: url.to_string(),
                reason: format!(
                    "timed out after {}s",
                    self.policy.navigation_timeout.as_secs()
                ),
            }),
        }
    }
}
