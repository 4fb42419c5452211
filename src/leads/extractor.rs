use super::{split_title, ProfileRecord, DEFAULT_SOURCE};
use crate::{error::CardParseError, locators::LocatorSet, utils, ScraperError};
use itertools::Itertools;
use lazy_regex::regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Turns the result cards of a rendered listing into profile records.
#[derive(Debug)]
pub struct Extractor {
    card: Selector,
    name: Selector,
    primary_subtitle: Selector,
    secondary_subtitle: Selector,
    link: Selector,
    source: String,
}

fn compile(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

fn text_of(el: ElementRef) -> String {
    let text = el.text().map(str::trim).filter(|s| !s.is_empty()).join(" ");
    let text = regex!(r"\s+").replace_all(&text, " ");
    text.into_owned()
}

impl Extractor {
    pub fn new(locators: &LocatorSet) -> Result<Extractor, ScraperError> {
        Ok(Extractor {
            card: compile(&locators.card)?,
            name: compile(&locators.name)?,
            primary_subtitle: compile(&locators.primary_subtitle)?,
            secondary_subtitle: compile(&locators.secondary_subtitle)?,
            link: compile(&locators.link)?,
            source: DEFAULT_SOURCE.to_string(),
        })
    }

    pub fn with_source<S: Into<String>>(mut self, source: S) -> Extractor {
        self.source = source.into();
        self
    }

    /// Every parseable card on the page, in document order. Broken cards are skipped.
    pub fn extract(&self, html: &str, base: Option<&Url>) -> Vec<ProfileRecord> {
        let doc = Html::parse_document(html);
        let mut records = vec![];

        for (i, card) in doc.select(&self.card).enumerate() {
            match self.parse_card(card, base) {
                Ok(record) => records.push(record),
                Err(e) => tracing::debug!("Skip card #{}: {}", i, e),
            }
        }

        records
    }

    pub fn parse_card(
        &self,
        card: ElementRef,
        base: Option<&Url>,
    ) -> Result<ProfileRecord, CardParseError> {
        let name = card
            .select(&self.name)
            .map(text_of)
            .find(|s| !s.is_empty())
            .ok_or(CardParseError::MissingName)?;

        let href = card
            .select(&self.link)
            .find_map(|a| a.value().attr("href"))
            .ok_or(CardParseError::MissingLink)?;
        let profile_url = utils::canonical_profile_url(href, base)
            .ok_or_else(|| CardParseError::InvalidLink(href.to_string()))?;

        let (job_title, company) = card
            .select(&self.primary_subtitle)
            .next()
            .map(|el| split_title(&text_of(el)))
            .unwrap_or_default();

        let location = card
            .select(&self.secondary_subtitle)
            .next()
            .map(text_of)
            .unwrap_or_default();

        Ok(ProfileRecord {
            name,
            job_title,
            company,
            location,
            profile_url,
            source: self.source.clone(),
            date_added: Some(utils::get_now()),
        })
    }
}
