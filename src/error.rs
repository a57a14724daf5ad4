use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, CrmError>;

/// Everything that can go wrong between a form and the backend
#[derive(Debug, Error)]
pub enum CrmError {
    /// Transport failure, no response from the backend
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("backend returned {status}: {body}")]
    Http { status: u16, body: String },

    /// File upload failed for any reason
    #[error("upload failed: {0}")]
    Upload(String),

    /// Draft or input rejected before any network call
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Backend body could not be decoded into the expected record
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CrmError {
    /// Shorthand for a single validation message
    pub fn invalid(message: impl Into<String>) -> Self {
        CrmError::Validation(vec![message.into()])
    }

    /// HTTP status of the failure, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            CrmError::Http { status, .. } => Some(*status),
            CrmError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message shown to the user when a page surfaces this error
    pub fn alert_message(&self) -> String {
        match self {
            CrmError::Upload(_) => "שגיאה בהעלאת הקובץ".to_string(),
            CrmError::Validation(messages) => messages.join("\n"),
            _ => "הפעולה נכשלה. אנא נסה שוב.".to_string(),
        }
    }

    /// Same as [`alert_message`](Self::alert_message), naming the image on upload failures
    pub fn image_alert_message(&self) -> String {
        match self {
            CrmError::Upload(_) => "שגיאה בהעלאת התמונה".to_string(),
            other => other.alert_message(),
        }
    }
}
