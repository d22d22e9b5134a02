//! Shared primitive types for the Simple front end
//!
//! Dependency-free helper types used by the token queue, the node store,
//! and error reporting.

pub mod span;

pub use span::{Position, Span, Spanned};
