//! Scripted stand-ins for the browser, the operator and the lead store.

use crate::{LeadStore, OperatorSignal, Page, ProfileRecord, ScraperError};
use scraper::{Html, Selector};
use std::ops::Range;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct FakeCard {
    pub name: Option<String>,
    pub title: String,
    pub href: Option<String>,
}

impl FakeCard {
    pub fn new(name: &str, title: &str, href: &str) -> FakeCard {
        FakeCard {
            name: Some(name.to_string()),
            title: title.to_string(),
            href: Some(href.to_string()),
        }
    }

    pub fn numbered(range: Range<usize>) -> Vec<FakeCard> {
        range
            .map(|i| {
                FakeCard::new(
                    &format!("Person {}", i),
                    &format!("Founder at Company {}", i),
                    &format!("https://example.com/in/person-{}?trk=search", i),
                )
            })
            .collect()
    }

    fn render(&self) -> String {
        let name = self
            .name
            .as_ref()
            .map(|n| format!(r#"<span aria-hidden="true">{}</span>"#, n))
            .unwrap_or_default();
        let inner = match &self.href {
            Some(href) => format!(r#"<a class="app-aware-link" href="{}">{}</a>"#, href, name),
            None => name,
        };
        format!(
            r#"<li class="reusable-search__result-container">{}<div class="entity-result__primary-subtitle">{}</div></li>"#,
            inner, self.title
        )
    }
}

#[derive(Debug)]
struct State {
    pages: Vec<Vec<FakeCard>>,
    current: usize,
    visible: usize,
    per_scroll: usize,
    per_load_more: usize,
    logged_in: bool,
    fail_scroll_height: bool,
    failing_gotos: usize,
    failing_element_checks: usize,
    navigations: Vec<String>,
    content_calls: usize,
    scrolls: usize,
    closed: bool,
}

/// A results listing that reveals `per_scroll` more cards on each scroll and can
/// page forward through `pages`. Element queries run real selectors against the
/// rendered markup.
#[derive(Debug)]
pub struct FakePage {
    state: Mutex<State>,
}

impl FakePage {
    pub fn new(pages: Vec<Vec<FakeCard>>) -> FakePage {
        let visible = pages.first().map(Vec::len).unwrap_or_default();
        FakePage {
            state: Mutex::new(State {
                pages,
                current: 0,
                visible,
                per_scroll: 0,
                per_load_more: 0,
                logged_in: true,
                fail_scroll_height: false,
                failing_gotos: 0,
                failing_element_checks: 0,
                navigations: vec![],
                content_calls: 0,
                scrolls: 0,
                closed: false,
            }),
        }
    }

    /// Starts with `initial` cards shown and reveals `per_scroll` more on each scroll.
    pub fn lazy(self, initial: usize, per_scroll: usize) -> FakePage {
        {
            let mut s = self.state.lock().unwrap();
            s.visible = initial;
            s.per_scroll = per_scroll;
        }
        self
    }

    /// Renders a load-more button while cards are hidden; each click reveals `n`.
    pub fn load_more(self, n: usize) -> FakePage {
        self.state.lock().unwrap().per_load_more = n;
        self
    }

    pub fn logged_in(self, logged_in: bool) -> FakePage {
        self.state.lock().unwrap().logged_in = logged_in;
        self
    }

    pub fn fail_scroll_height(self) -> FakePage {
        self.state.lock().unwrap().fail_scroll_height = true;
        self
    }

    pub fn failing_gotos(self, n: usize) -> FakePage {
        self.state.lock().unwrap().failing_gotos = n;
        self
    }

    /// The next `n` element lookups fail as if the page was mid-navigation.
    pub fn failing_element_checks(self, n: usize) -> FakePage {
        self.state.lock().unwrap().failing_element_checks = n;
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn content_calls(&self) -> usize {
        self.state.lock().unwrap().content_calls
    }

    pub fn scrolls(&self) -> usize {
        self.state.lock().unwrap().scrolls
    }

    pub fn current_page(&self) -> usize {
        self.state.lock().unwrap().current
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    fn render(s: &State) -> String {
        let cards = s
            .pages
            .get(s.current)
            .map(|cards| {
                cards
                    .iter()
                    .take(s.visible)
                    .map(FakeCard::render)
                    .collect::<String>()
            })
            .unwrap_or_default();
        let total = s.pages.get(s.current).map(Vec::len).unwrap_or_default();

        let mut html = String::from("<html><body>");
        if s.logged_in {
            html.push_str(r#"<div class="global-nav__me">Me</div>"#);
        }
        html.push_str(&format!("<ul>{}</ul>", cards));
        if s.per_load_more > 0 && s.visible < total {
            html.push_str(r#"<button class="scaffold-finite-scroll__load-button">Show more</button>"#);
        }
        if s.current + 1 < s.pages.len() {
            html.push_str(r#"<button class="artdeco-pagination__button--next">Next</button>"#);
        }
        html.push_str("</body></html>");
        html
    }

    fn matches(s: &State, selector: &str) -> bool {
        let selector = Selector::parse(selector).expect("valid selector in test");
        let doc = Html::parse_document(&FakePage::render(s));
        let found = doc.select(&selector).next().is_some();
        found
    }
}

#[async_trait::async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<(), ScraperError> {
        let mut s = self.state.lock().unwrap();
        s.navigations.push(url.to_string());
        if s.failing_gotos > 0 {
            s.failing_gotos -= 1;
            return Err(ScraperError::Browser("net::ERR_CONNECTION_RESET".to_string()));
        }
        Ok(())
    }

    async fn url(&self) -> Result<Option<String>, ScraperError> {
        Ok(self.state.lock().unwrap().navigations.last().cloned())
    }

    async fn content(&self) -> Result<String, ScraperError> {
        let mut s = self.state.lock().unwrap();
        s.content_calls += 1;
        Ok(FakePage::render(&s))
    }

    async fn scroll_height(&self) -> Result<u64, ScraperError> {
        let s = self.state.lock().unwrap();
        if s.fail_scroll_height {
            return Err(ScraperError::Browser("Target closed".to_string()));
        }
        Ok(100 + 80 * s.visible as u64)
    }

    async fn scroll_by(&self, _distance: u32) -> Result<(), ScraperError> {
        let mut s = self.state.lock().unwrap();
        s.scrolls += 1;
        let total = s.pages.get(s.current).map(Vec::len).unwrap_or_default();
        s.visible = (s.visible + s.per_scroll).min(total);
        Ok(())
    }

    async fn has_element(&self, selector: &str) -> Result<bool, ScraperError> {
        let mut s = self.state.lock().unwrap();
        if s.failing_element_checks > 0 {
            s.failing_element_checks -= 1;
            return Err(ScraperError::Browser(
                "Execution context was destroyed".to_string(),
            ));
        }
        Ok(FakePage::matches(&s, selector))
    }

    async fn click(&self, selector: &str) -> Result<bool, ScraperError> {
        let mut s = self.state.lock().unwrap();
        if !FakePage::matches(&s, selector) {
            return Ok(false);
        }
        if selector.contains("load-button") {
            let total = s.pages.get(s.current).map(Vec::len).unwrap_or_default();
            s.visible = (s.visible + s.per_load_more).min(total);
        } else if selector.contains("pagination") {
            s.current += 1;
            let total = s.pages.get(s.current).map(Vec::len).unwrap_or_default();
            s.visible = if s.per_scroll > 0 {
                s.per_scroll.min(total)
            } else {
                total
            };
        }
        Ok(true)
    }

    async fn close(&self) -> Result<(), ScraperError> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

/// An operator who confirms the login immediately.
pub struct FakeSignal;

#[async_trait::async_trait]
impl OperatorSignal for FakeSignal {
    async fn wait(&mut self) -> Result<(), ScraperError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<ProfileRecord>,
    closed: bool,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn records(&self) -> Vec<ProfileRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

#[async_trait::async_trait]
impl LeadStore for MemoryStore {
    async fn insert_many(&self, records: &[ProfileRecord]) -> Result<u64, ScraperError> {
        let mut s = self.state.lock().unwrap();
        s.records.extend_from_slice(records);
        Ok(records.len() as u64)
    }

    async fn all(&self) -> Result<Vec<ProfileRecord>, ScraperError> {
        Ok(self.records())
    }

    async fn close(&self) {
        self.state.lock().unwrap().closed = true;
    }
}
