//! Attribute kinds and values
//!
//! Every node in the store carries a keyed set of attributes with at most
//! one value per kind. Setting a kind again replaces the old value. The
//! value side is a closed union, so a `Name` attribute cannot silently hold
//! a node reference and a `Body` attribute cannot hold an integer.

use super::node::NodeId;
use crate::symbols::context::SymContext;
use crate::tokens::TokenKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keys for node attributes
///
/// The ordering of the variants fixes the iteration order when a node is
/// dumped, nothing else depends on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AttrKind {
    /// Local name of the node
    Name,
    /// Fully decorated symbol name
    SymbolName,
    /// What sort of declaration this node is (a `Kind` value)
    ObjKind,
    /// Marker kind for class declarations
    ClassDecl,
    /// Marker kind for data declarations
    DataDecl,
    /// Marker kind for function declarations
    FuncDecl,
    /// Source file the node was created from
    FileName,
    /// Source line the node was created from
    LineNo,
    /// Source column the node was created from
    ColNo,
    /// Name of the enclosing declaration
    ParentName,
    /// Name of the inherited class, as written
    InheritName,
    /// Resolved reference to the inherited class node
    InheritRef,
    /// Access scope of the node (a `Kind` value)
    Scope,
    /// Marker kind for public scope
    Public,
    /// Marker kind for private scope
    Private,
    /// Marker kind for protected scope
    Protected,
    /// Marks a declaration whose type is a reference
    RefType,
    FloatType,
    IntType,
    UintType,
    BoolType,
    DictType,
    ListType,
    StrType,
    NothingType,
    /// Marker kind for a user-defined type
    UserType,
    /// Resolved reference to the user-defined type node
    UserTypeRef,
    /// Context stack captured when the node was declared
    ScopePath,
    /// Owned subtree holding the body of the declaration
    Body,
}

impl AttrKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttrKind::Name => "name",
            AttrKind::SymbolName => "symbol name",
            AttrKind::ObjKind => "object kind",
            AttrKind::ClassDecl => "class declaration",
            AttrKind::DataDecl => "data declaration",
            AttrKind::FuncDecl => "function declaration",
            AttrKind::FileName => "file name",
            AttrKind::LineNo => "line",
            AttrKind::ColNo => "column",
            AttrKind::ParentName => "parent name",
            AttrKind::InheritName => "inherit name",
            AttrKind::InheritRef => "inherit reference",
            AttrKind::Scope => "scope",
            AttrKind::Public => "public",
            AttrKind::Private => "private",
            AttrKind::Protected => "protected",
            AttrKind::RefType => "reference type",
            AttrKind::FloatType => "float type",
            AttrKind::IntType => "int type",
            AttrKind::UintType => "uint type",
            AttrKind::BoolType => "bool type",
            AttrKind::DictType => "dict type",
            AttrKind::ListType => "list type",
            AttrKind::StrType => "string type",
            AttrKind::NothingType => "nothing type",
            AttrKind::UserType => "user type",
            AttrKind::UserTypeRef => "user type reference",
            AttrKind::ScopePath => "scope path",
            AttrKind::Body => "body",
        }
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map a native type token onto its type attribute kind
pub fn kind_for_type_token(kind: TokenKind) -> Option<AttrKind> {
    match kind {
        TokenKind::Float => Some(AttrKind::FloatType),
        TokenKind::Int => Some(AttrKind::IntType),
        TokenKind::Uint => Some(AttrKind::UintType),
        TokenKind::Bool => Some(AttrKind::BoolType),
        TokenKind::Dict => Some(AttrKind::DictType),
        TokenKind::List => Some(AttrKind::ListType),
        TokenKind::StrType => Some(AttrKind::StrType),
        TokenKind::Nothing => Some(AttrKind::NothingType),
        _ => None,
    }
}

/// Map a scope marker token onto its scope attribute kind
pub fn kind_for_scope_token(kind: TokenKind) -> Option<AttrKind> {
    match kind {
        TokenKind::Public => Some(AttrKind::Public),
        TokenKind::Private => Some(AttrKind::Private),
        TokenKind::Protected => Some(AttrKind::Protected),
        _ => None,
    }
}

/// Attribute values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Int(i64),
    Bool(bool),
    /// A marker kind, used for object kinds, scopes, and type tags
    Kind(AttrKind),
    Str(String),
    /// Non-owning reference to another node in the same arena
    NodeRef(NodeId),
    /// Root of a subtree owned through this attribute
    Subtree(NodeId),
    /// Captured context stack
    Context(SymContext),
}

impl AttrValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_kind(&self) -> Option<AttrKind> {
        match self {
            AttrValue::Kind(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            AttrValue::NodeRef(v) | AttrValue::Subtree(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(v) => write!(f, "{}", v),
            AttrValue::Bool(v) => write!(f, "{}", v),
            AttrValue::Kind(v) => write!(f, "{}", v),
            AttrValue::Str(v) => write!(f, "\"{}\"", v),
            AttrValue::NodeRef(v) => write!(f, "ref {}", v),
            AttrValue::Subtree(v) => write!(f, "subtree {}", v),
            AttrValue::Context(v) => write!(f, "{}", v.qualified_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_token_mapping() {
        assert_eq!(
            kind_for_type_token(TokenKind::Dict),
            Some(AttrKind::DictType)
        );
        assert_eq!(kind_for_type_token(TokenKind::Class), None);
    }

    #[test]
    fn test_scope_token_mapping() {
        assert_eq!(
            kind_for_scope_token(TokenKind::Private),
            Some(AttrKind::Private)
        );
        assert_eq!(kind_for_scope_token(TokenKind::Symbol), None);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(AttrValue::Int(7).as_int(), Some(7));
        assert_eq!(AttrValue::Str("x".into()).as_int(), None);
        assert_eq!(
            AttrValue::Kind(AttrKind::ClassDecl).as_kind(),
            Some(AttrKind::ClassDecl)
        );
    }
}
