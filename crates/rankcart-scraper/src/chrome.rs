//! Chromium-backed [`PageDriver`] over the Chrome DevTools Protocol.
//!
//! Enabled with the `chrome` feature. The browser runs headful — the
//! storefronts this targets serve different markup (and more challenges)
//! to headless sessions.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::driver::{PageDriver, SessionFactory};
use crate::error::ScraperError;

/// How often [`ChromePage::wait_for`] re-checks for the element.
const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

fn session_err(e: impl std::fmt::Display) -> ScraperError {
    ScraperError::Session {
        reason: e.to_string(),
    }
}

/// A launched Chromium instance handing out one page per keyword.
pub struct ChromeBrowser {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl ChromeBrowser {
    /// Launch Chromium and start draining its CDP event stream.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Session`] when the browser binary cannot be
    /// found or fails to start.
    pub async fn launch() -> Result<Self, ScraperError> {
        let config = BrowserConfig::builder()
            .with_head()
            .args(vec!["--no-sandbox", "--disable-setuid-sandbox"])
            .build()
            .map_err(|reason| ScraperError::Session { reason })?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(session_err)?;

        // The event stream must be polled continuously or every CDP call
        // stalls.
        let handler_task = tokio::spawn(async move {
            while handler.next().await.is_some() {}
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Close the browser and stop the event-stream task.
    pub async fn shutdown(mut self) -> Result<(), ScraperError> {
        let result = self.browser.close().await.map(|_| ()).map_err(session_err);
        self.handler_task.abort();
        result
    }
}

#[async_trait]
impl SessionFactory for ChromeBrowser {
    type Page = ChromePage;

    async fn open_page(&self) -> Result<ChromePage, ScraperError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(session_err)?;
        Ok(ChromePage { page })
    }
}

/// One Chromium tab.
pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    async fn evaluate_value<T: serde::de::DeserializeOwned>(
        &self,
        script: String,
    ) -> Result<T, ScraperError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| ScraperError::Evaluate {
                reason: e.to_string(),
            })?;
        result.into_value::<T>().map_err(|e| ScraperError::Evaluate {
            reason: e.to_string(),
        })
    }

    async fn dispatch_enter(&self) -> Result<(), ScraperError> {
        for event_type in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
            let params = DispatchKeyEventParams::builder()
                .key("Enter")
                .text("\r")
                .r#type(event_type)
                .build()
                .map_err(|reason| ScraperError::Interaction {
                    action: "press Enter",
                    selector: String::new(),
                    reason,
                })?;
            self.page
                .execute(params)
                .await
                .map_err(|e| ScraperError::Interaction {
                    action: "press Enter",
                    selector: String::new(),
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), ScraperError> {
        let navigation = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(timeout, navigation).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ScraperError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ScraperError::Navigation {
                url: url.to_owned(),
                reason: format!("timed out after {}ms", timeout.as_millis()),
            }),
        }
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), ScraperError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScraperError::WaitTimeout {
                    selector: selector.to_owned(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(ELEMENT_POLL_INTERVAL).await;
        }
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), ScraperError> {
        let element =
            self.page
                .find_element(selector)
                .await
                .map_err(|e| ScraperError::Interaction {
                    action: "type",
                    selector: selector.to_owned(),
                    reason: e.to_string(),
                })?;
        element.click().await.map_err(|e| ScraperError::Interaction {
            action: "type",
            selector: selector.to_owned(),
            reason: e.to_string(),
        })?;
        element
            .type_str(text)
            .await
            .map_err(|e| ScraperError::Interaction {
                action: "type",
                selector: selector.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn submit_search(&self, timeout: Duration) -> Result<(), ScraperError> {
        self.dispatch_enter().await?;
        match tokio::time::timeout(timeout, self.page.wait_for_navigation()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(ScraperError::Navigation {
                url: "search submit".to_owned(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ScraperError::Navigation {
                url: "search submit".to_owned(),
                reason: format!("timed out after {}ms", timeout.as_millis()),
            }),
        }
    }

    async fn click(&self, selector: &str) -> Result<(), ScraperError> {
        let element =
            self.page
                .find_element(selector)
                .await
                .map_err(|e| ScraperError::Interaction {
                    action: "click",
                    selector: selector.to_owned(),
                    reason: e.to_string(),
                })?;
        element.click().await.map_err(|e| ScraperError::Interaction {
            action: "click",
            selector: selector.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    async fn card_links(&self, selector: &str) -> Result<Vec<Option<String>>, ScraperError> {
        let selector_json =
            serde_json::to_string(selector).map_err(|e| ScraperError::Evaluate {
                reason: e.to_string(),
            })?;
        let script = format!(
            "Array.from(document.querySelectorAll({selector_json})).map((card) => {{\
               const a = card.querySelector('a');\
               return a ? a.getAttribute('href') : null;\
             }})"
        );
        self.evaluate_value(script).await
    }

    async fn inner_text(&self, selector: &str) -> Result<Option<String>, ScraperError> {
        let selector_json =
            serde_json::to_string(selector).map_err(|e| ScraperError::Evaluate {
                reason: e.to_string(),
            })?;
        let script = format!(
            "(() => {{\
               const el = document.querySelector({selector_json});\
               return el ? el.textContent : null;\
             }})()"
        );
        self.evaluate_value(script).await
    }

    async fn scroll_height(&self) -> Result<u64, ScraperError> {
        let height: f64 = self
            .evaluate_value("document.body.scrollHeight".to_owned())
            .await?;
        Ok(height as u64)
    }

    async fn scroll_by(&self, px: u64) -> Result<(), ScraperError> {
        self.page
            .evaluate(format!("window.scrollBy(0, {px})"))
            .await
            .map_err(|e| ScraperError::Evaluate {
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn is_closed(&self) -> bool {
        self.page.url().await.is_err()
    }

    async fn close(&self) -> Result<(), ScraperError> {
        self.page.clone().close().await.map_err(session_err)
    }
}
