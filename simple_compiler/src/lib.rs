// Internal modules
#[macro_use]
pub mod logging;

pub mod config;
pub mod symbols;
pub mod syntax;
pub mod tokens;
pub mod tree;
pub mod utils;

// Re-export key types for library consumers
pub use syntax::{CompilerSession, ParseFailure, RuleResult, SourceResolver};
pub use tokens::{LookaheadQueue, Mark, Token, TokenKind, TokenSupply};
pub use tree::{AttrKind, AttrValue, NodeArena, NodeId};
