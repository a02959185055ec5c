use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The page has no such section. Expected for lower-tier leagues.
    #[error("{section} section missing (selector `{selector}`)")]
    StructureMissing {
        section: &'static str,
        selector: String,
    },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Page session error: {0}")]
    Session(String),

    #[error("Match ID source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Could not parse {what} from {text:?}")]
    Parse { what: &'static str, text: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Errors that end the whole run instead of a single record.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, AppError::SourceUnavailable(_) | AppError::Usage(_))
    }

    /// Re-labels a selector miss as a missing page section. Other errors pass through.
    pub fn in_section(self, section: &'static str) -> Self {
        match self {
            AppError::ElementNotFound(selector) => AppError::StructureMissing { section, selector },
            other => other,
        }
    }
}
