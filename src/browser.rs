//! `Page` over a Chromium tab driven through the DevTools protocol.

use crate::{Page, ScraperError};
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::debug;

pub struct ChromePage {
    browser: Mutex<Browser>,
    page: chromiumoxide::Page,
    handler_task: JoinHandle<()>,
}

impl ChromePage {
    /// Starts a browser (with a visible window unless `headless`) and opens one blank tab.
    pub async fn launch(headless: bool, request_timeout: Duration) -> Result<ChromePage, ScraperError> {
        let mut builder = BrowserConfig::builder().request_timeout(request_timeout);
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(ScraperError::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(ChromePage {
            browser: Mutex::new(browser),
            page,
            handler_task,
        })
    }

    async fn eval<T: DeserializeOwned>(&self, js: String) -> Result<T, ScraperError> {
        Ok(self.page.evaluate(js).await?.into_value::<T>()?)
    }
}

#[async_trait::async_trait]
impl Page for ChromePage {
    async fn goto(&self, url: &str) -> Result<(), ScraperError> {
        debug!("Visit {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn url(&self) -> Result<Option<String>, ScraperError> {
        Ok(self.page.url().await?)
    }

    async fn content(&self) -> Result<String, ScraperError> {
        Ok(self.page.content().await?)
    }

    async fn scroll_height(&self) -> Result<u64, ScraperError> {
        self.eval(
            "Math.max(document.body ? document.body.scrollHeight : 0, document.documentElement.scrollHeight)"
                .to_string(),
        )
        .await
    }

    async fn scroll_by(&self, distance: u32) -> Result<(), ScraperError> {
        self.page
            .evaluate(format!("window.scrollBy(0, {})", distance))
            .await?;
        Ok(())
    }

    async fn has_element(&self, selector: &str) -> Result<bool, ScraperError> {
        let selector = serde_json::to_string(selector)?;
        self.eval(format!("document.querySelector({}) !== null", selector))
            .await
    }

    async fn click(&self, selector: &str) -> Result<bool, ScraperError> {
        let selector = serde_json::to_string(selector)?;
        self.eval(format!(
            "(() => {{ const el = document.querySelector({}); if (!el) return false; el.click(); return true; }})()",
            selector
        ))
        .await
    }

    async fn close(&self) -> Result<(), ScraperError> {
        let mut browser = self.browser.lock().await;
        browser.close().await?;
        if let Err(e) = browser.wait().await {
            debug!("Browser process exit error: {}", e);
        }
        self.handler_task.abort();
        Ok(())
    }
}
