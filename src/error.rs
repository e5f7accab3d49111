use thiserror::Error;

/// Errors that can occur during a sweep
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Invalid timestamp threshold '{value}': {message}")]
    InvalidTimestamp { value: String, message: String },

    #[error("Share unavailable: {message}")]
    ShareUnavailable { message: String },

    #[error("Failed to read remote file {path}: {message}")]
    FileRead { path: String, message: String },

    #[error("Missing required field '{field}' in structured document")]
    MissingRequiredField { field: String },

    #[error("Malformed structured data: {message}")]
    MalformedStructuredData { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SweepError {
    /// Whether this error aborts the whole run, as opposed to a
    /// single document's processing
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SweepError::InvalidTimestamp { .. } | SweepError::ShareUnavailable { .. }
        )
    }
}

/// Result type alias for sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_vs_document_scoped() {
        assert!(SweepError::InvalidTimestamp {
            value: "x".to_string(),
            message: "bad".to_string(),
        }
        .is_fatal());
        assert!(SweepError::ShareUnavailable {
            message: "down".to_string(),
        }
        .is_fatal());

        assert!(!SweepError::FileRead {
            path: "/certs/a.json".to_string(),
            message: "gone".to_string(),
        }
        .is_fatal());
        assert!(!SweepError::MissingRequiredField {
            field: "chassis_number".to_string(),
        }
        .is_fatal());
        assert!(!SweepError::MalformedStructuredData {
            message: "not an object".to_string(),
        }
        .is_fatal());

        let serialization: SweepError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(!serialization.is_fatal());
    }
}
