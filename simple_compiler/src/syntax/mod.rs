//! Syntax analysis
//!
//! The session holds the parse state, the rules walk the token queue and
//! build the tree, and the visitor runs later passes over what they built.

pub mod error;
pub mod rules;
pub mod session;
pub mod visitor;

pub use error::{FatalError, ParseFailure, RuleResult, SyntaxError};
pub use rules::{first_of, parse_class, parse_import, parse_source, parse_unit, Rule};
pub use session::{CompilerSession, MapResolver, NullResolver, SourceResolver};
pub use visitor::{walk, walk_siblings, TreeVisitor};
