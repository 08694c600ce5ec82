//! Retrieval of the registration page.
//!
//! One GET, no retry. The client is owned by the source value and dropped
//! with it; nothing is shared across invocations.

use std::time::Duration;

use async_trait::async_trait;

/// Public URL of the Udyam registration form.
pub const UDYAM_FORM_URL: &str = "https://udyamregistration.gov.in/UdyamRegistration.aspx";

/// Browser identity sent with the request. The portal serves a stripped page
/// to unknown agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/91.0.4472.124 Safari/537.36";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Why the page could not be retrieved.
#[derive(thiserror::Error, Debug)]
pub enum RetrievalError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Unreadable body: {0}")]
    Body(String),
}

/// Anything that can hand back the raw registration page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page body.
    async fn fetch(&self) -> Result<String, RetrievalError>;

    /// Where the page comes from, for log lines.
    fn describe(&self) -> String;
}

/// Retrieves the page over HTTP with reqwest.
pub struct HttpPageSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPageSource {
    /// Source for `url` with the given timeout.
    pub fn new(url: &str, timeout_ms: u64) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(BROWSER_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Source for the public portal with the default timeout.
    pub fn portal() -> Result<Self, RetrievalError> {
        Self::new(UDYAM_FORM_URL, DEFAULT_TIMEOUT_MS)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self) -> Result<String, RetrievalError> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                status: status.as_u16(),
                url: resp.url().to_string(),
            });
        }

        resp.text()
            .await
            .map_err(|e| RetrievalError::Body(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// A source that never touches the network. `Ok` serves the given HTML,
/// `Err` simulates an unreachable portal.
pub struct StaticPageSource {
    body: Option<String>,
}

impl StaticPageSource {
    pub fn serving(html: &str) -> Self {
        Self {
            body: Some(html.to_string()),
        }
    }

    pub fn unreachable() -> Self {
        Self { body: None }
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn fetch(&self) -> Result<String, RetrievalError> {
        self.body.clone().ok_or_else(|| RetrievalError::Status {
            status: 503,
            url: "static://offline".to_string(),
        })
    }

    fn describe(&self) -> String {
        "static page".to_string()
    }
}
