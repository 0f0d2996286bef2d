use std::fmt;

/// Errors from the OneMap client
#[derive(Debug)]
pub enum OneMapError {
    InvalidBaseUrl(String),
    Http(reqwest::Error),
    ApiError(String),
}

impl fmt::Display for OneMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(url) => write!(f, "Invalid OneMap base URL: {url}"),
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::ApiError(msg) => write!(f, "API error: {msg}"),
        }
    }
}

impl std::error::Error for OneMapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OneMapError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

pub type Result<T> = std::result::Result<T, OneMapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = OneMapError::ApiError("OneMap returned status 503".to_string());
        assert_eq!(err.to_string(), "API error: OneMap returned status 503");
    }

    #[test]
    fn test_invalid_base_url_display() {
        let err = OneMapError::InvalidBaseUrl("ftp://nowhere".to_string());
        assert!(err.to_string().contains("ftp://nowhere"));
        assert!(std::error::Error::source(&err).is_none());
    }
}
