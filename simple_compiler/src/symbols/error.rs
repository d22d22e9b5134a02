//! Symbol errors

use crate::logging::codes::{symbols, Code};
use thiserror::Error;

/// Errors from the symbol context and directory
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SymbolError {
    #[error("Symbol '{key}' is already defined")]
    DuplicateKey { key: String },

    #[error("Symbol '{key}' is not defined")]
    KeyNotFound { key: String },

    #[error("Probe exhausted inserting '{key}' into directory of {capacity} slots")]
    ProbeExhausted { key: String, capacity: usize },

    #[error("Context nesting too deep: {depth} levels")]
    ContextDepthExceeded { depth: usize },
}

impl SymbolError {
    pub fn duplicate_key(key: &str) -> Self {
        Self::DuplicateKey {
            key: key.to_string(),
        }
    }

    pub fn key_not_found(key: &str) -> Self {
        Self::KeyNotFound {
            key: key.to_string(),
        }
    }

    pub fn probe_exhausted(key: &str, capacity: usize) -> Self {
        Self::ProbeExhausted {
            key: key.to_string(),
            capacity,
        }
    }

    /// Get the log code for this error
    pub fn error_code(&self) -> Code {
        match self {
            Self::DuplicateKey { .. } => symbols::DUPLICATE_KEY,
            Self::KeyNotFound { .. } => symbols::KEY_NOT_FOUND,
            Self::ProbeExhausted { .. } => symbols::PROBE_EXHAUSTED,
            Self::ContextDepthExceeded { .. } => symbols::CONTEXT_DEPTH_EXCEEDED,
        }
    }

    /// Whether the parser may report this and keep going
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. } | Self::KeyNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_recoverability() {
        let dup = SymbolError::duplicate_key("a.b");
        assert_eq!(dup.error_code().as_str(), "E030");
        assert!(dup.is_recoverable());

        let probe = SymbolError::probe_exhausted("x", 8);
        assert_eq!(probe.error_code().as_str(), "E032");
        assert!(!probe.is_recoverable());
    }
}
