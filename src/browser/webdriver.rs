use crate::browser::Browser;
use crate::config::ScraperConfig;
use crate::error::BrowserError;
use async_trait::async_trait;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

/// How often visibility is polled while waiting
const VISIBILITY_POLL: Duration = Duration::from_millis(250);

const SCROLL_SCRIPT: &str = "arguments[0].scrollTo(0, arguments[0].scrollHeight);";

const HOVER_SCRIPT: &str = "const el = arguments[0];\
     el.scrollIntoView({block: 'center'});\
     for (const type of ['mouseover', 'mouseenter', 'mousemove']) {\
         el.dispatchEvent(new MouseEvent(type, {bubbles: true, cancelable: true, view: window}));\
     }";

/// Browser handle backed by a WebDriver session
pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects to the configured WebDriver server, trying common local
    /// ports if it cannot be reached
    pub async fn connect(config: &ScraperConfig) -> Option<Self> {
        let capabilities = chrome_capabilities(config);

        match connect_to(&config.webdriver_url, &capabilities).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", config.webdriver_url);
                return Some(Self::new(client));
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    config.webdriver_url,
                    e
                );
            }
        }

        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://localhost:4444", // Selenium/geckodriver default
            "http://127.0.0.1:4444",
        ];

        for url in fallback_urls.iter() {
            if *url == config.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = connect_to(url, &capabilities).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Some(Self::new(client));
            }
        }

        ::log::error!("Failed to connect to any WebDriver servers");
        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        None
    }

    /// Ends the WebDriver session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }
}

async fn connect_to(
    url: &str,
    capabilities: &Capabilities,
) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    builder.connect(url).await
}

/// Chrome options carrying the headless flag and user agent
fn chrome_capabilities(config: &ScraperConfig) -> Capabilities {
    let mut args = vec![format!("--user-agent={}", config.user_agent)];
    if config.headless {
        args.push("--headless".to_string());
    }

    let mut capabilities = Capabilities::new();
    capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    capabilities
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        Ok(self.client.goto(url).await?)
    }

    async fn current_url(&mut self) -> Result<String, BrowserError> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn source(&mut self) -> Result<String, BrowserError> {
        Ok(self.client.source().await?)
    }

    async fn wait_present(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
            .map(|_| ())
            .map_err(|e| {
                ::log::trace!("Waiting for {} failed: {}", selector, e);
                BrowserError::Timeout {
                    selector: selector.to_string(),
                    timeout_secs: timeout.as_secs(),
                }
            })
    }

    async fn wait_visible(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let deadline = Instant::now() + timeout;
        loop {
            for element in self.client.find_all(Locator::Css(selector)).await? {
                // Elements can be re-rendered while polling
                if element.is_displayed().await.unwrap_or(false) {
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    selector: selector.to_string(),
                    timeout_secs: timeout.as_secs(),
                });
            }
            tokio::time::sleep(VISIBILITY_POLL).await;
        }
    }

    async fn count(&mut self, selector: &str) -> Result<usize, BrowserError> {
        Ok(self.client.find_all(Locator::Css(selector)).await?.len())
    }

    async fn text(&mut self, selector: &str) -> Result<Option<String>, BrowserError> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        match elements.first() {
            Some(element) => Ok(Some(element.text().await?)),
            None => Ok(None),
        }
    }

    async fn attributes(
        &mut self,
        selector: &str,
        name: &str,
    ) -> Result<Vec<Result<Option<String>, BrowserError>>, BrowserError> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(element.attr(name).await.map_err(BrowserError::from));
        }
        Ok(values)
    }

    async fn scroll_to_bottom(&mut self, selector: &str) -> Result<(), BrowserError> {
        let container = self.client.find(Locator::Css(selector)).await?;
        let arg = serde_json::to_value(&container)
            .map_err(|e| BrowserError::Command(e.to_string()))?;
        self.client.execute(SCROLL_SCRIPT, vec![arg]).await?;
        Ok(())
    }

    async fn hover_last(&mut self, selector: &str) -> Result<(), BrowserError> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        let Some(last) = elements.last() else {
            return Ok(());
        };
        let arg =
            serde_json::to_value(last).map_err(|e| BrowserError::Command(e.to_string()))?;
        self.client.execute(HOVER_SCRIPT, vec![arg]).await?;
        Ok(())
    }
}
