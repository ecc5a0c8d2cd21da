use thiserror::Error;

#[derive(Error, Debug)]
pub enum TldwError {
    #[error("No transcript found (missing YouTube config)")]
    ConfigNotFound,

    #[error("No caption tracks available")]
    NoCaptions,

    #[error("No valid caption track found")]
    InvalidTrack,

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch {url}: HTTP {status}")]
    FetchStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Player response not found in watch page {url}")]
    PlayerResponseNotFound { url: String },

    #[error("Missing API key for {provider}")]
    MissingCredential { provider: String },

    #[error("Summary API error: {status} - {body}")]
    SummaryApi { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TldwError {
    /// Transport-level failure of a GET, either in the client or as a non-2xx status.
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            TldwError::Fetch { .. } | TldwError::FetchStatus { .. } | TldwError::Timeout { .. }
        )
    }

    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            TldwError::Timeout {
                url: url.to_string(),
            }
        } else {
            TldwError::Fetch {
                url: url.to_string(),
                source,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TldwError>;
