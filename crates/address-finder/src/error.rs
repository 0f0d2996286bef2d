//! Error types for the address finder binary

use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Client(onemap_client::OneMapError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Client(err) => write!(f, "OneMap client error: {}", err),
            AppError::Io(err) => write!(f, "IO error: {}", err),
            AppError::Json(err) => write!(f, "JSON error: {}", err),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Client(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Config(_) => None,
        }
    }
}

impl From<onemap_client::OneMapError> for AppError {
    fn from(err: onemap_client::OneMapError) -> Self {
        AppError::Client(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err)
    }
}

impl From<tracing_subscriber::filter::ParseError> for AppError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = AppError::Config("bad filter".to_string());
        assert_eq!(format!("{}", err), "Configuration error: bad filter");
    }

    #[test]
    fn test_client_error_has_source() {
        let err = AppError::from(onemap_client::OneMapError::InvalidBaseUrl(
            "nope".to_string(),
        ));
        assert!(format!("{}", err).contains("nope"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
