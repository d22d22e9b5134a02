//! Attributed node store
//!
//! The single node representation shared by the syntax rules (AST nodes)
//! and the symbol machinery (symbol entries).

pub mod attr;
pub mod node;

pub use attr::{kind_for_scope_token, kind_for_type_token, AttrKind, AttrValue};
pub use node::{AttributedNode, NodeArena, NodeId, TreeError};
