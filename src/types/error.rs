use thiserror::Error;

/// revtrack error types
///
/// Only the outer surfaces (reading the snapshot, config) fail loudly.
/// The aggregation pipeline itself degrades silently and never returns these.
#[derive(Error, Debug)]
pub enum RevtrackError {
    /// Input document could not be interpreted
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for revtrack
pub type Result<T> = std::result::Result<T, RevtrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RevtrackError::Parse("snapshot is empty".into());
        assert_eq!(err.to_string(), "parse error: snapshot is empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RevtrackError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: RevtrackError = json_err.into();
        assert!(err.to_string().starts_with("json error"));
    }

    #[test]
    fn test_config_error_display() {
        let err = RevtrackError::Config("unknown theme".into());
        assert_eq!(err.to_string(), "config error: unknown theme");
    }
}
