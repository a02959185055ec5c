use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{random_user_agent, Config, PAGE_SETTLE_MS};
use crate::error::{AppError, Result};
use crate::session::{PageSession, SessionFactory};

/// Launches one Chrome instance per session, each with its own random user agent.
#[derive(Debug, Clone)]
pub struct ChromeSessionFactory {
    headless: bool,
    nav_timeout: Duration,
    settle: Duration,
}

impl ChromeSessionFactory {
    pub fn new(cfg: &Config) -> Self {
        Self {
            headless: cfg.headless,
            nav_timeout: cfg.nav_timeout,
            settle: Duration::from_millis(PAGE_SETTLE_MS),
        }
    }
}

impl SessionFactory for ChromeSessionFactory {
    type Session = ChromeSession;

    async fn open(&self) -> Result<ChromeSession> {
        let agent = random_user_agent();
        let mut builder = BrowserConfig::builder()
            .request_timeout(self.nav_timeout)
            .arg(format!("--user-agent={agent}"))
            .arg("--log-level=3")
            .arg("--disable-dev-shm-usage");
        if !self.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| AppError::Session(format!("invalid browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::Session(format!("failed to launch browser: {e}")))?;

        // The CDP connection only makes progress while its handler is polled.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler event error: {e}");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(p) => p,
            Err(e) => {
                shutdown(browser, handler_task).await;
                return Err(AppError::Session(format!("failed to open page: {e}")));
            }
        };

        debug!(user_agent = agent, headless = self.headless, "browser session opened");
        Ok(ChromeSession {
            browser,
            page,
            handler_task,
            nav_timeout: self.nav_timeout,
            settle: self.settle,
        })
    }
}

pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    nav_timeout: Duration,
    settle: Duration,
}

impl PageSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        match tokio::time::timeout(self.nav_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(AppError::Session(format!("navigation to {url} failed: {e}"))),
            Err(_) => {
                return Err(AppError::Session(format!(
                    "navigation to {url} timed out after {}s",
                    self.nav_timeout.as_secs()
                )))
            }
        }
        tokio::time::sleep(self.settle).await;
        Ok(())
    }

    async fn read_text(&mut self, selector: &str) -> Result<String> {
        let element = first_match(selector, self.page.find_elements(selector).await)?;
        let text = element
            .inner_text()
            .await
            .map_err(|e| AppError::Session(format!("reading `{selector}` failed: {e}")))?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        let element = first_match(selector, self.page.find_elements(selector).await)?;
        element
            .click()
            .await
            .map_err(|e| AppError::Session(format!("clicking `{selector}` failed: {e}")))?;
        Ok(())
    }

    async fn close(self) {
        shutdown(self.browser, self.handler_task).await;
    }
}

/// First hit of a `querySelectorAll` lookup. An empty result is a selector miss;
/// a failed lookup is a session error and must not read as "absent".
fn first_match<T, E: std::fmt::Display>(
    selector: &str,
    found: std::result::Result<Vec<T>, E>,
) -> Result<T> {
    match found {
        Ok(elements) => elements
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ElementNotFound(selector.to_string())),
        Err(e) => Err(AppError::Session(format!("looking up `{selector}` failed: {e}"))),
    }
}

async fn shutdown(mut browser: Browser, handler_task: JoinHandle<()>) {
    if let Err(e) = browser.close().await {
        warn!("browser close failed: {e}");
    }
    if let Err(e) = browser.wait().await {
        warn!("browser process wait failed: {e}");
    }
    handler_task.abort();
}
