//! Consolidated diagnostic codes and classification
//!
//! Single source of truth for the codes emitted by the front end, their
//! metadata, and the classification helpers used by error types and the
//! logging macros.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a diagnostic code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System / internal invariant codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Lookahead queue codes
pub mod queue {
    use super::Code;

    pub const STALE_MARK: Code = Code::new("E010");
    pub const CLOSE_WITH_PENDING_INPUT: Code = Code::new("E011");
    pub const NO_OPEN_SOURCE: Code = Code::new("E012");
    pub const FILE_DEPTH_EXCEEDED: Code = Code::new("E013");
}

/// Attributed node store codes
pub mod tree {
    use super::Code;

    pub const DUPLICATE_SYMBOL: Code = Code::new("E020");
    pub const ATTRIBUTE_REPLACED: Code = Code::new("E021");
}

/// Symbol context and directory codes
pub mod symbols {
    use super::Code;

    pub const DUPLICATE_KEY: Code = Code::new("E030");
    pub const KEY_NOT_FOUND: Code = Code::new("E031");
    pub const PROBE_EXHAUSTED: Code = Code::new("E032");
    pub const CONTEXT_DEPTH_EXCEEDED: Code = Code::new("E033");
}

/// Syntax (grammar rule) codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E040");
    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E041");
    pub const MAX_PARSE_DEPTH: Code = Code::new("E042");
    pub const RECOVERY_FAILED: Code = Code::new("E043");
    pub const IMPORT_NOT_FOUND: Code = Code::new("E044");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const SOURCE_OPENED: Code = Code::new("I002");
    pub const RULE_MATCHED: Code = Code::new("I003");
    pub const PARSE_COMPLETE: Code = Code::new("I004");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

fn metadata_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    static REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let entries = [
            CodeMetadata {
                code: "ERR001",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Internal invariant violated",
            },
            CodeMetadata {
                code: "ERR002",
                category: "System",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Subsystem initialization failed",
            },
            CodeMetadata {
                code: "E010",
                category: "Queue",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Mark reset after finalize passed it",
            },
            CodeMetadata {
                code: "E011",
                category: "Queue",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Source closed before its end-of-file token",
            },
            CodeMetadata {
                code: "E012",
                category: "Queue",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Queue operation with no open source",
            },
            CodeMetadata {
                code: "E013",
                category: "Queue",
                severity: Severity::High,
                recoverable: false,
                requires_halt: true,
                description: "Import nesting exceeds the file depth limit",
            },
            CodeMetadata {
                code: "E020",
                category: "Tree",
                severity: Severity::Medium,
                recoverable: true,
                requires_halt: false,
                description: "Sibling with this name already exists at this level",
            },
            CodeMetadata {
                code: "E021",
                category: "Tree",
                severity: Severity::Low,
                recoverable: true,
                requires_halt: false,
                description: "Attribute of this kind replaced an earlier value",
            },
            CodeMetadata {
                code: "E030",
                category: "Symbols",
                severity: Severity::Medium,
                recoverable: true,
                requires_halt: false,
                description: "Qualified name already registered in the directory",
            },
            CodeMetadata {
                code: "E031",
                category: "Symbols",
                severity: Severity::Medium,
                recoverable: true,
                requires_halt: false,
                description: "Qualified name not present in the directory",
            },
            CodeMetadata {
                code: "E032",
                category: "Symbols",
                severity: Severity::Critical,
                recoverable: false,
                requires_halt: true,
                description: "Directory probe visited every bucket without resolution",
            },
            CodeMetadata {
                code: "E033",
                category: "Symbols",
                severity: Severity::High,
                recoverable: false,
                requires_halt: true,
                description: "Scope nesting exceeds the context depth limit",
            },
            CodeMetadata {
                code: "E040",
                category: "Syntax",
                severity: Severity::Medium,
                recoverable: true,
                requires_halt: false,
                description: "Committed production found an unexpected token",
            },
            CodeMetadata {
                code: "E041",
                category: "Syntax",
                severity: Severity::Medium,
                recoverable: true,
                requires_halt: false,
                description: "Input ended inside a committed production",
            },
            CodeMetadata {
                code: "E042",
                category: "Syntax",
                severity: Severity::High,
                recoverable: false,
                requires_halt: true,
                description: "Grammar nesting exceeds the parse depth limit",
            },
            CodeMetadata {
                code: "E043",
                category: "Syntax",
                severity: Severity::High,
                recoverable: false,
                requires_halt: true,
                description: "No synchronization point found during recovery",
            },
            CodeMetadata {
                code: "E044",
                category: "Syntax",
                severity: Severity::Medium,
                recoverable: true,
                requires_halt: false,
                description: "Imported source could not be resolved",
            },
        ];

        entries
            .into_iter()
            .map(|meta| (meta.code, meta))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    metadata_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_metadata(code)
        .map(|meta| meta.severity)
        .unwrap_or(Severity::Medium)
}

pub fn get_category(code: &str) -> &'static str {
    get_metadata(code)
        .map(|meta| meta.category)
        .unwrap_or("Unknown")
}

pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|meta| meta.description)
        .unwrap_or("Unknown error")
}

pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code)
        .map(|meta| meta.recoverable)
        .unwrap_or(false)
}

pub fn requires_halt(code: &str) -> bool {
    get_metadata(code)
        .map(|meta| meta.requires_halt)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_have_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            queue::STALE_MARK,
            tree::DUPLICATE_SYMBOL,
            symbols::DUPLICATE_KEY,
            syntax::UNEXPECTED_TOKEN,
        ];
        for code in codes {
            assert_ne!(get_description(code.as_str()), "Unknown error");
        }
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(is_recoverable(tree::DUPLICATE_SYMBOL.as_str()));
        assert!(is_recoverable(symbols::DUPLICATE_KEY.as_str()));
        assert!(!is_recoverable(queue::STALE_MARK.as_str()));
    }

    #[test]
    fn test_halt_classification() {
        assert!(requires_halt(queue::STALE_MARK.as_str()));
        assert!(requires_halt(symbols::PROBE_EXHAUSTED.as_str()));
        assert!(!requires_halt(syntax::UNEXPECTED_TOKEN.as_str()));
    }

    #[test]
    fn test_category_lookup() {
        assert_eq!(get_category(queue::STALE_MARK.as_str()), "Queue");
        assert_eq!(get_category("bogus"), "Unknown");
    }
}
