#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("Login could not be verified: no logged-in indicator found on {url}")]
    Authentication { url: String },

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Card skipped: {0}")]
    CardParse(#[from] CardParseError),

    #[error("Lead store error: {0}")]
    Persistence(#[from] sqlx::error::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<chromiumoxide::error::CdpError> for ScraperError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        ScraperError::Browser(e.to_string())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CardParseError {
    #[error("missing name")]
    MissingName,

    #[error("missing profile link")]
    MissingLink,

    #[error("invalid profile link {0:?}")]
    InvalidLink(String),
}
