use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed byte pattern '{pattern}': {reason}")]
    MalformedPattern { pattern: String, reason: String },

    #[error("Invalid offset {offset} for data block '{block}': offset cannot be negative")]
    InvalidOffset { block: String, offset: i64 },

    #[error("Failed to load signatures from {provider}: {message}")]
    SupplierLoad { provider: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed(pattern: &str, reason: impl Into<String>) -> Self {
        Error::MalformedPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// True when a signature file or inspected file does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_definition_file_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = crate::provider::load_signatures(dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_not_found());

        let err = crate::provider::parse_signatures("not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_malformed_pattern_message() {
        let err = Error::malformed("4", "length 1 is not a multiple of 2");
        assert_eq!(
            err.to_string(),
            "Malformed byte pattern '4': length 1 is not a multiple of 2"
        );
    }
}
