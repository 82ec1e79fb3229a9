//! Error types for keychain-item

use thiserror::Error;

use crate::native::{OsStatus, StatusTranslator};

/// Result type alias for keychain item operations
pub type Result<T> = std::result::Result<T, KeychainError>;

/// Keychain item error types
///
/// A missing attribute is not an error; getters report it as `None`.
#[derive(Error, Debug)]
pub enum KeychainError {
    #[error("Keychain operation failed ({code}): {message}")]
    NativeOperationFailed { code: OsStatus, message: String },

    #[error("Invalid item state: {0}")]
    InvalidState(String),

    #[error("Could not decode attribute '{attribute}': {reason}")]
    DecodeFailed {
        attribute: &'static str,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KeychainError {
    /// Build a native failure, letting the translator describe the raw status code.
    pub fn native(code: OsStatus, translator: &dyn StatusTranslator) -> Self {
        Self::NativeOperationFailed {
            code,
            message: translator.describe(code),
        }
    }

    pub(crate) fn decode(attribute: &'static str, reason: impl Into<String>) -> Self {
        Self::DecodeFailed {
            attribute,
            reason: reason.into(),
        }
    }

    /// The native status code, if this error came from the store
    pub fn status_code(&self) -> Option<OsStatus> {
        match self {
            Self::NativeOperationFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for KeychainError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for KeychainError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::DefaultStatusTranslator;

    #[test]
    fn test_native_error_keeps_code() {
        let err = KeychainError::native(-25308, &DefaultStatusTranslator);
        assert_eq!(err.status_code(), Some(-25308));
        assert!(err.to_string().contains("-25308"));
        assert!(err.to_string().contains("User interaction is not allowed"));
    }

    #[test]
    fn test_decode_error_names_attribute() {
        let err = KeychainError::decode("port", "not a number");
        assert_eq!(err.status_code(), None);
        assert_eq!(
            err.to_string(),
            "Could not decode attribute 'port': not a number"
        );
    }
}
