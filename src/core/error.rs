//! Error types for the logging facade

pub type Result<T> = std::result::Result<T, FacadeError>;

#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    /// A value comparator could not compare the values of a field
    #[error("Cannot compare values of field '{key}': {message}")]
    Comparison { key: String, message: String },

    /// A consumer failed to handle an event
    #[error("Consumer '{consumer}' failed: {message}")]
    Consumer { consumer: String, message: String },

    /// Unknown level name
    #[error("Invalid level: '{0}'")]
    InvalidLevel(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl FacadeError {
    /// Create a comparison error for the given field key
    pub fn comparison(key: impl Into<String>, message: impl Into<String>) -> Self {
        FacadeError::Comparison {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a consumer error
    pub fn consumer(consumer: impl Into<String>, message: impl Into<String>) -> Self {
        FacadeError::Consumer {
            consumer: consumer.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        FacadeError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FacadeError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = FacadeError::comparison("user", "unsupported type");
        assert!(matches!(err, FacadeError::Comparison { .. }));

        let err = FacadeError::config("DefaultFieldKeysSpec", "empty key");
        assert!(matches!(err, FacadeError::InvalidConfiguration { .. }));

        let err = FacadeError::consumer("recorder", "closed");
        assert!(matches!(err, FacadeError::Consumer { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = FacadeError::comparison("user", "unsupported type");
        assert_eq!(
            err.to_string(),
            "Cannot compare values of field 'user': unsupported type"
        );

        let err = FacadeError::config("DefaultFieldKeysSpec", "message key is empty");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for DefaultFieldKeysSpec: message key is empty"
        );

        assert_eq!(FacadeError::other("boom").to_string(), "boom");
        assert_eq!(
            FacadeError::InvalidLevel("loud".into()).to_string(),
            "Invalid level: 'loud'"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FacadeError = json_err.into();
        assert!(matches!(err, FacadeError::JsonError(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
