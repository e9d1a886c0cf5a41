use thiserror::Error;

/// Errors from the River wrappers.
#[derive(Debug, Error)]
pub enum WrapperError {
    #[error("invalid parameter {name}: {detail}")]
    InvalidParameter { name: String, detail: String },

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    #[error("no cluster mirrored for algorithm key {0}")]
    UnknownClusterKey(usize),

    #[error("no cluster mirrored for algorithm object {0}")]
    UnknownClusterIdentity(u64),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("data model error: {0}")]
    Types(#[from] oa_types::TypesError),
}

impl WrapperError {
    pub(crate) fn invalid(name: &str, detail: impl Into<String>) -> Self {
        WrapperError::InvalidParameter {
            name: name.to_string(),
            detail: detail.into(),
        }
    }
}

impl From<serde_json::Error> for WrapperError {
    fn from(e: serde_json::Error) -> Self {
        WrapperError::Config(e.to_string())
    }
}

/// Convenience type alias for wrapper results.
pub type WrapperResult<T> = Result<T, WrapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = WrapperError::invalid("detection_steprate", "must be >= 1");
        assert!(e.to_string().contains("detection_steprate"));

        let e = WrapperError::NotImplemented("renormalization of CluStream".into());
        assert!(e.to_string().contains("CluStream"));

        let e = WrapperError::UnknownClusterKey(3);
        assert!(e.to_string().contains('3'));
    }

    #[test]
    fn json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: WrapperError = json_err.into();
        assert!(matches!(err, WrapperError::Config(_)));
    }

    #[test]
    fn types_error_conversion() {
        let err: WrapperError = oa_types::TypesError::DimensionMismatch {
            expected: 2,
            actual: 1,
        }
        .into();
        assert!(err.to_string().contains("expected 2"));
    }
}
