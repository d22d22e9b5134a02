// ============================================================================
// RUNTIME PREFERENCES (User Experience)
// ============================================================================

use serde::{Deserialize, Serialize};
use std::env;

/// Log severity selection for runtime preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warning" | "warn" => Some(LogLevel::Warning),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// Convert to the event-side level used by the logging service
    pub fn to_events_level(self) -> crate::logging::LogLevel {
        match self {
            LogLevel::Error => crate::logging::LogLevel::Error,
            LogLevel::Warning => crate::logging::LogLevel::Warning,
            LogLevel::Info => crate::logging::LogLevel::Info,
            LogLevel::Debug => crate::logging::LogLevel::Debug,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Minimum level emitted by the global logger
    pub min_log_level: LogLevel,

    /// Whether to emit JSON events instead of console lines
    pub structured_output: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: env::var("SIMPLE_LOG_LEVEL")
                .ok()
                .and_then(|v| LogLevel::from_str(&v))
                .unwrap_or(LogLevel::Warning),
            structured_output: env::var("SIMPLE_LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserPreferences {
    /// Whether to trace rule entry/exit through the debug log
    pub trace_rules: bool,

    /// Whether syntax errors should include a token context snippet
    pub errors_with_context: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            trace_rules: env::var("SIMPLE_TRACE_RULES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            errors_with_context: env::var("SIMPLE_ERRORS_WITH_CONTEXT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("WARN"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::from_str("bogus"), None);
    }

    #[test]
    fn test_parser_preferences_defaults() {
        let prefs = ParserPreferences::default();
        assert!(prefs.errors_with_context);
    }
}
