use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidData(String),

    #[error("{0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub fn invalid(message: &str) -> Self {
        Self::InvalidData(message.to_string())
    }

    /// Text shown to the user in the fallback widget.
    pub fn message(&self) -> String {
        match self {
            Error::Http(e) if e.is_timeout() => "Request timed out".to_string(),
            Error::Http(_) => "Check connection".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<(u16, &str)> for Error {
    fn from((status, url): (u16, &str)) -> Self {
        Self::Status {
            status,
            url: url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_data_message_is_bare() {
        let err = Error::invalid("Invalid data structure");
        assert_eq!(err.message(), "Invalid data structure");
    }

    #[test]
    fn status_message_names_the_url() {
        let err = Error::from((503, "https://api.jolpi.ca/ergast/f1/current.json"));
        assert_eq!(
            err.message(),
            "API returned status 503 for https://api.jolpi.ca/ergast/f1/current.json"
        );
    }
}
