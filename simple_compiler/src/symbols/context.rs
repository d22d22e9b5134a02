//! Symbol context stack
//!
//! While the rules descend into nested declarations they push name segments
//! here, so the decorated name of whatever is being declared is always the
//! dot-joined stack. A snapshot of the stack travels with a symbol entry as
//! its `ScopePath` attribute.

use super::error::SymbolError;
use crate::config::compile_time;
use crate::log_error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stack of name segments forming the current qualified scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymContext {
    segments: Vec<String>,
}

impl SymContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Push one name segment
    pub fn push(&mut self, segment: &str) -> Result<(), SymbolError> {
        if self.segments.len() >= compile_time::symbols::MAX_CONTEXT_DEPTH {
            let err = SymbolError::ContextDepthExceeded {
                depth: self.segments.len(),
            };
            log_error!(
                err.error_code(),
                "context stack overflow",
                "segment" => segment
            );
            return Err(err);
        }
        self.segments.push(segment.to_string());
        Ok(())
    }

    /// Pop the innermost segment
    ///
    /// Pushes and pops are balanced by the rules that own them, so popping
    /// an empty context is a compiler bug and panics.
    pub fn pop(&mut self) -> String {
        self.segments
            .pop()
            .unwrap_or_else(|| panic!("context pop with no context pushed"))
    }

    /// The innermost segment, if any
    pub fn peek(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Push every dot-separated segment of a compound name
    pub fn add_path(&mut self, path: &str) -> Result<(), SymbolError> {
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            self.push(segment)?;
        }
        Ok(())
    }

    /// The dot-joined qualified name of the current scope
    pub fn qualified_name(&self) -> String {
        self.segments.join(".")
    }

    /// Qualify a name against the current scope
    pub fn qualify(&self, name: &str) -> String {
        if self.segments.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.qualified_name(), name)
        }
    }

    /// An independent copy of the stack as it is right now
    pub fn snapshot(&self) -> SymContext {
        self.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl fmt::Display for SymContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_tracks_pushes_and_pops() {
        let mut ctx = SymContext::new();
        ctx.push("a").unwrap();
        ctx.push("b").unwrap();
        ctx.push("c").unwrap();
        assert_eq!(ctx.qualified_name(), "a.b.c");

        assert_eq!(ctx.pop(), "c");
        assert_eq!(ctx.qualified_name(), "a.b");
        assert_eq!(ctx.peek(), Some("b"));
    }

    #[test]
    fn test_qualify_name_in_scope() {
        let mut ctx = SymContext::new();
        assert_eq!(ctx.qualify("Foo"), "Foo");
        ctx.push("pkg").unwrap();
        assert_eq!(ctx.qualify("Foo"), "pkg.Foo");
    }

    #[test]
    fn test_add_path_splits_segments() {
        let mut ctx = SymContext::new();
        ctx.add_path("a.b.c").unwrap();
        assert_eq!(ctx.depth(), 3);
        assert_eq!(ctx.peek(), Some("c"));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut ctx = SymContext::new();
        ctx.push("a").unwrap();
        let snap = ctx.snapshot();
        ctx.push("b").unwrap();

        assert_eq!(snap.qualified_name(), "a");
        assert_eq!(ctx.qualified_name(), "a.b");
    }

    #[test]
    fn test_depth_limit() {
        let mut ctx = SymContext::new();
        for i in 0..compile_time::symbols::MAX_CONTEXT_DEPTH {
            ctx.push(&format!("s{}", i)).unwrap();
        }
        assert!(matches!(
            ctx.push("overflow"),
            Err(SymbolError::ContextDepthExceeded { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "context pop")]
    fn test_empty_pop_panics() {
        let mut ctx = SymContext::new();
        ctx.pop();
    }
}
