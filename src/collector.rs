use crate::{leads::Extractor, locators::LocatorSet, Page, ProfileRecord, ScraperError};
use rand::Rng;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Clone)]
pub struct CollectorPolicy {
    pub max_profiles: usize,
    pub max_scroll_attempts: u32,
    /// Pixels per scroll, drawn uniformly.
    pub scroll_distance: RangeInclusive<u32>,
    /// Pause after each scroll in milliseconds, drawn uniformly.
    pub scroll_delay_ms: RangeInclusive<u64>,
    /// Try the next results page on every n-th stalled scroll.
    pub page_advance_every: u32,
    pub page_advance_delay: Duration,
}

impl Default for CollectorPolicy {
    fn default() -> Self {
        CollectorPolicy {
            max_profiles: 20,
            max_scroll_attempts: 15,
            scroll_distance: 600..=1400,
            scroll_delay_ms: 1000..=2000,
            page_advance_every: 3,
            page_advance_delay: Duration::from_millis(3000),
        }
    }
}

impl CollectorPolicy {
    #[cfg(test)]
    pub(crate) fn immediate(max_profiles: usize, max_scroll_attempts: u32) -> CollectorPolicy {
        CollectorPolicy {
            max_profiles,
            max_scroll_attempts,
            scroll_delay_ms: 0..=0,
            page_advance_delay: Duration::ZERO,
            ..CollectorPolicy::default()
        }
    }
}

/// Scrolls and pages through a listing, keeping the first record seen for each
/// profile URL.
#[derive(Debug)]
pub struct Collector {
    extractor: Extractor,
    load_more: String,
    next_page: String,
    policy: CollectorPolicy,
    retained: Vec<ProfileRecord>,
    seen: HashSet<String>,
}

impl Collector {
    pub fn new(extractor: Extractor, locators: &LocatorSet, policy: CollectorPolicy) -> Collector {
        Collector {
            extractor,
            load_more: locators.load_more.clone(),
            next_page: locators.next_page.clone(),
            policy,
            retained: vec![],
            seen: HashSet::new(),
        }
    }

    /// Everything retained so far, also after `collect` failed midway.
    pub fn records(&self) -> &[ProfileRecord] {
        &self.retained
    }

    fn is_full(&self) -> bool {
        self.retained.len() >= self.policy.max_profiles
    }

    /// Appends unseen records in order until the target is hit. Returns how many were kept.
    pub fn retain_batch<I: IntoIterator<Item = ProfileRecord>>(&mut self, batch: I) -> usize {
        let mut added = 0;
        for record in batch {
            if self.is_full() {
                break;
            }
            if self.seen.insert(record.profile_url.clone()) {
                self.retained.push(record);
                added += 1;
            }
        }
        added
    }

    pub async fn collect<P: Page + ?Sized>(
        &mut self,
        page: &P,
    ) -> Result<&[ProfileRecord], ScraperError> {
        let mut scroll_attempts = 0;

        while !self.is_full() && scroll_attempts < self.policy.max_scroll_attempts {
            let html = page.content().await?;
            let base = page.url().await?.and_then(|u| Url::parse(&u).ok());
            let batch = self.extractor.extract(&html, base.as_ref());
            let found = batch.len();
            let added = self.retain_batch(batch);
            info!(
                "[{}/{}] Kept {} of {} card(s) on page",
                self.retained.len(),
                self.policy.max_profiles,
                added,
                found
            );
            if self.is_full() {
                break;
            }

            let before = page.scroll_height().await?;
            let distance = rand::rng().random_range(self.policy.scroll_distance.clone());
            page.scroll_by(distance).await?;
            let delay = rand::rng().random_range(self.policy.scroll_delay_ms.clone());
            tokio::time::sleep(Duration::from_millis(delay)).await;
            let after = page.scroll_height().await?;

            if after != before {
                scroll_attempts = 0;
                continue;
            }

            scroll_attempts += 1;
            debug!(
                "Scroll made no progress ({}/{})",
                scroll_attempts, self.policy.max_scroll_attempts
            );

            if page.click(&self.load_more).await? {
                debug!("Clicked load more");
                continue;
            }

            if self.policy.page_advance_every > 0
                && scroll_attempts % self.policy.page_advance_every == 0
            {
                if page.click(&self.next_page).await? {
                    info!("Moved to the next results page");
                    scroll_attempts = 0;
                    tokio::time::sleep(self.policy.page_advance_delay).await;
                } else {
                    debug!("No next results page");
                }
            }
        }

        if !self.is_full() {
            info!(
                "Stopped after {} stalled scroll(s) with {} of {} profile(s)",
                scroll_attempts,
                self.retained.len(),
                self.policy.max_profiles
            );
        }

        Ok(&self.retained)
    }
}
