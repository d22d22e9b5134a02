//! Parse failure types
//!
//! A rule outcome distinguishes three cases. "Did not match" is
//! `Ok(None)`: the rule looked at the input, declined it, and the caller is
//! free to try another alternative. A syntax error means the rule committed
//! to its alternative and then met ill-formed input; it is reported and the
//! parser recovers. A fatal error means the substrate itself failed and the
//! parse cannot continue.

use crate::config::compile_time;
use crate::logging::codes::{syntax, Code};
use crate::tokens::{QueueError, Token};
use crate::symbols::SymbolError;
use crate::utils::Span;
use thiserror::Error;

/// A committed rule met input it cannot accept
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SyntaxError {
    #[error("Expected {expected}, got {found} at {location}")]
    UnexpectedToken {
        expected: String,
        found: String,
        location: String,
        span: Span,
    },

    #[error("Expected {expected}, got end of input")]
    UnexpectedEndOfInput { expected: String },

    #[error("Symbol '{name}' is already defined at {location}")]
    DuplicateSymbol {
        name: String,
        location: String,
        span: Span,
    },

    #[error("Cannot import '{name}': source not found")]
    ImportNotFound { name: String, span: Span },
}

impl SyntaxError {
    pub fn unexpected_token(expected: &str, found: &Token) -> Self {
        if found.kind.is_terminal() {
            Self::UnexpectedEndOfInput {
                expected: expected.to_string(),
            }
        } else {
            let rendered = if found.lexeme.is_empty() {
                found.kind.to_string()
            } else {
                format!("'{}'", found.lexeme)
            };
            Self::UnexpectedToken {
                expected: expected.to_string(),
                found: rendered,
                location: found.location(),
                span: found.span,
            }
        }
    }

    pub fn duplicate_symbol(name: &str, at: &Token) -> Self {
        Self::DuplicateSymbol {
            name: name.to_string(),
            location: at.location(),
            span: at.span,
        }
    }

    pub fn import_not_found(name: &str, at: &Token) -> Self {
        Self::ImportNotFound {
            name: name.to_string(),
            span: at.span,
        }
    }

    /// Span of the offending input, when known
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::DuplicateSymbol { span, .. }
            | Self::ImportNotFound { span, .. } => Some(*span),
            Self::UnexpectedEndOfInput { .. } => None,
        }
    }

    /// Get the log code for this error
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfInput { .. } => syntax::UNEXPECTED_END_OF_INPUT,
            Self::DuplicateSymbol { .. } => crate::logging::codes::tree::DUPLICATE_SYMBOL,
            Self::ImportNotFound { .. } => syntax::IMPORT_NOT_FOUND,
        }
    }
}

/// The substrate failed underneath the rules
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FatalError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error("Rule nesting exceeds {limit} levels in '{rule}'")]
    MaxParseDepth { rule: String, limit: usize },

    #[error("Recovery scanned {scanned} tokens without finding a sync point")]
    RecoveryFailed { scanned: usize },
}

impl FatalError {
    pub fn max_parse_depth(rule: &str) -> Self {
        Self::MaxParseDepth {
            rule: rule.to_string(),
            limit: compile_time::syntax::MAX_PARSE_DEPTH,
        }
    }

    /// Get the log code for this error
    pub fn error_code(&self) -> Code {
        match self {
            Self::Queue(err) => err.error_code(),
            Self::Symbol(err) => err.error_code(),
            Self::MaxParseDepth { .. } => syntax::MAX_PARSE_DEPTH,
            Self::RecoveryFailed { .. } => syntax::RECOVERY_FAILED,
        }
    }
}

/// Why a committed rule did not produce a node
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseFailure {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

impl ParseFailure {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::Syntax(err) => err.error_code(),
            Self::Fatal(err) => err.error_code(),
        }
    }
}

impl From<QueueError> for ParseFailure {
    fn from(err: QueueError) -> Self {
        Self::Fatal(FatalError::Queue(err))
    }
}

/// Result of attempting one rule: matched node, clean no-match, or failure
pub type RuleResult = Result<Option<crate::tree::NodeId>, ParseFailure>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{Token, TokenKind};
    use crate::utils::{Position, Span};

    #[test]
    fn test_unexpected_token_carries_location() {
        let span = Span::of_lexeme(Position::new(10, 2, 3), "}");
        let tok = Token::new(TokenKind::CloseBrace, "}", span, "main.simple");
        let err = SyntaxError::unexpected_token("a name", &tok);
        assert_eq!(
            format!("{}", err),
            "Expected a name, got '}' at main.simple: 2: 3"
        );
        assert_eq!(err.span(), Some(span));
    }

    #[test]
    fn test_terminal_token_becomes_end_of_input() {
        let tok = Token::end_of_input();
        let err = SyntaxError::unexpected_token("'{'", &tok);
        assert!(matches!(err, SyntaxError::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn test_fatal_wraps_queue_errors() {
        let failure: ParseFailure = QueueError::stale_mark(4).into();
        assert!(failure.is_fatal());
        assert_eq!(failure.error_code().as_str(), "E010");
    }
}
