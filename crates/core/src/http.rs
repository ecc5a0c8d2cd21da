use std::time::Duration;

use crate::error::{Result, TldwError};

/// Desktop browser User-Agent. YouTube serves a stripped watch page to unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport knobs shared by every outbound request.
#[derive(Clone, Debug)]
pub struct HttpOptions {
    /// Per-request deadline. `None` waits forever.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpOptions {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client used by transcript and summary requests.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(TldwError::Client)
    }
}

/// GET `url` and return the body, treating any non-2xx status as a fetch failure.
pub(crate) async fn get_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| TldwError::from_reqwest(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TldwError::FetchStatus {
            url: url.to_string(),
            status,
        });
    }

    response
        .text()
        .await
        .map_err(|e| TldwError::from_reqwest(url, e))
}
