//! Attributed node arena
//!
//! One node representation serves both AST nodes and symbol entries. Nodes
//! live in an arena and refer to each other by `NodeId`, so a node can hold
//! a back-reference to its parent or to a resolved type without owning it.
//!
//! Siblings with a common parent form an unbalanced binary tree ordered by
//! name. Insertion of a name that is already present is rejected, which is
//! how duplicate declarations in one scope are detected.

use super::attr::{AttrKind, AttrValue};
use crate::logging::codes::{tree, Code};
use crate::tokens::Token;
use crate::{log_debug, log_warning};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::{self, Write};
use thiserror::Error;

/// Errors from node store operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TreeError {
    #[error("Duplicate symbol '{name}'")]
    DuplicateSymbol { name: String },
}

impl TreeError {
    pub fn duplicate_symbol(name: &str) -> Self {
        Self::DuplicateSymbol {
            name: name.to_string(),
        }
    }

    /// Get the log code for this error
    pub fn error_code(&self) -> Code {
        match self {
            Self::DuplicateSymbol { .. } => tree::DUPLICATE_SYMBOL,
        }
    }
}

/// Handle to a node in a `NodeArena`
///
/// Ids are never reused within an arena, so a stored id stays valid for the
/// arena's whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named node with attributes, sibling links, and children
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributedNode {
    name: String,
    attrs: BTreeMap<AttrKind, AttrValue>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    /// Root of this node's child tree
    children: Option<NodeId>,
    parent: Option<NodeId>,
}

impl AttributedNode {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: BTreeMap::new(),
            left: None,
            right: None,
            children: None,
            parent: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&AttrKind, &AttrValue)> {
        self.attrs.iter()
    }
}

/// Arena of attributed nodes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeArena {
    nodes: Vec<AttributedNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a new detached node
    pub fn create(&mut self, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(AttributedNode::new(name));
        id
    }

    /// Borrow a node
    ///
    /// Ids come from `create` on this arena, so out-of-range ids are a
    /// caller bug and panic.
    pub fn node(&self, id: NodeId) -> &AttributedNode {
        &self.nodes[id.0]
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Insert a node into the sibling tree rooted at `root`
    ///
    /// Fails without modifying the tree when a sibling with the same name
    /// already exists.
    pub fn insert_sibling(&mut self, root: NodeId, node: NodeId) -> Result<(), TreeError> {
        let name = self.nodes[node.0].name.clone();
        let mut cur = root;
        loop {
            match name.as_str().cmp(self.nodes[cur.0].name.as_str()) {
                Ordering::Equal => {
                    log_warning!("duplicate symbol in scope", "name" => &name);
                    return Err(TreeError::duplicate_symbol(&name));
                }
                Ordering::Less => match self.nodes[cur.0].left {
                    Some(next) => cur = next,
                    None => {
                        self.nodes[cur.0].left = Some(node);
                        return Ok(());
                    }
                },
                Ordering::Greater => match self.nodes[cur.0].right {
                    Some(next) => cur = next,
                    None => {
                        self.nodes[cur.0].right = Some(node);
                        return Ok(());
                    }
                },
            }
        }
    }

    /// Insert a node into `parent`'s child tree and record the back-link
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        match self.nodes[parent.0].children {
            Some(root) => self.insert_sibling(root, child)?,
            None => self.nodes[parent.0].children = Some(child),
        }
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Find a node by name in the sibling tree rooted at `root`
    pub fn find(&self, root: NodeId, name: &str) -> Option<NodeId> {
        let mut cur = root;
        loop {
            let node = &self.nodes[cur.0];
            cur = match name.cmp(node.name.as_str()) {
                Ordering::Equal => return Some(cur),
                Ordering::Less => node.left?,
                Ordering::Greater => node.right?,
            };
        }
    }

    /// Find a direct child of `parent` by name
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let root = self.nodes[parent.0].children?;
        self.find(root, name)
    }

    /// Set an attribute, returning the replaced value if the kind was
    /// already present
    pub fn set_attr(&mut self, id: NodeId, kind: AttrKind, value: AttrValue) -> Option<AttrValue> {
        let replaced = self.nodes[id.0].attrs.insert(kind, value);
        if replaced.is_some() {
            log_debug!(
                "attribute replaced",
                "node" => &self.nodes[id.0].name,
                "kind" => kind
            );
        }
        replaced
    }

    /// Attach a subtree under an attribute and link its root back to `id`
    pub fn set_subtree_attr(&mut self, id: NodeId, kind: AttrKind, root: NodeId) {
        self.nodes[root.0].parent = Some(id);
        self.set_attr(id, kind, AttrValue::Subtree(root));
    }

    pub fn get_attr(&self, id: NodeId, kind: AttrKind) -> Option<&AttrValue> {
        self.nodes[id.0].attrs.get(&kind)
    }

    pub fn has_attr(&self, id: NodeId, kind: AttrKind) -> bool {
        self.nodes[id.0].attrs.contains_key(&kind)
    }

    /// Record where in the source a node came from
    pub fn set_provenance_attrs(&mut self, id: NodeId, token: &Token) {
        self.set_attr(id, AttrKind::FileName, AttrValue::Str(token.file.clone()));
        self.set_attr(
            id,
            AttrKind::LineNo,
            AttrValue::Int(i64::from(token.span.start.line)),
        );
        self.set_attr(
            id,
            AttrKind::ColNo,
            AttrValue::Int(i64::from(token.span.start.column)),
        );
    }

    /// Siblings of the tree rooted at `root`, in name order
    pub fn siblings_in_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.in_order(Some(root), &mut out);
        out
    }

    /// Direct children of `parent`, in name order
    pub fn children_in_order(&self, parent: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.in_order(self.nodes[parent.0].children, &mut out);
        out
    }

    fn in_order(&self, root: Option<NodeId>, out: &mut Vec<NodeId>) {
        if let Some(id) = root {
            self.in_order(self.nodes[id.0].left, out);
            out.push(id);
            self.in_order(self.nodes[id.0].right, out);
        }
    }

    /// Render the tree rooted at `root` for debugging
    pub fn dump_tree(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(root, 0, &mut out);
        out
    }

    fn dump_into(&self, root: NodeId, depth: usize, out: &mut String) {
        for id in self.siblings_in_order(root) {
            let node = &self.nodes[id.0];
            let _ = writeln!(out, "{:indent$}{}", "", node.name, indent = depth * 2);
            for (kind, value) in &node.attrs {
                let _ = writeln!(
                    out,
                    "{:indent$}. {} = {}",
                    "",
                    kind,
                    value,
                    indent = depth * 2
                );
                if let AttrValue::Subtree(sub) = value {
                    self.dump_into(*sub, depth + 1, out);
                }
            }
            if let Some(children) = node.children {
                self.dump_into(children, depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{SupplyBuilder, TokenSupply};
    use assert_matches::assert_matches;

    #[test]
    fn test_attribute_round_trip_and_replace() {
        let mut arena = NodeArena::new();
        let node = arena.create("Foo");

        assert_eq!(arena.set_attr(node, AttrKind::LineNo, AttrValue::Int(3)), None);
        assert_eq!(
            arena.get_attr(node, AttrKind::LineNo),
            Some(&AttrValue::Int(3))
        );

        let replaced = arena.set_attr(node, AttrKind::LineNo, AttrValue::Int(9));
        assert_eq!(replaced, Some(AttrValue::Int(3)));
        assert_eq!(
            arena.get_attr(node, AttrKind::LineNo),
            Some(&AttrValue::Int(9))
        );
    }

    #[test]
    fn test_sibling_names_are_unique() {
        let mut arena = NodeArena::new();
        let root = arena.create("m");
        let a = arena.create("a");
        arena.insert_sibling(root, a).unwrap();

        let dup = arena.create("a");
        assert_matches!(
            arena.insert_sibling(root, dup),
            Err(TreeError::DuplicateSymbol { ref name }) if name == "a"
        );
        // The original entry is untouched
        assert_eq!(arena.find(root, "a"), Some(a));
    }

    #[test]
    fn test_find_walks_both_directions() {
        let mut arena = NodeArena::new();
        let root = arena.create("m");
        let z = arena.create("z");
        let a = arena.create("a");
        arena.insert_sibling(root, z).unwrap();
        arena.insert_sibling(root, a).unwrap();

        assert_eq!(arena.find(root, "z"), Some(z));
        assert_eq!(arena.find(root, "a"), Some(a));
        assert_eq!(arena.find(root, "q"), None);
    }

    #[test]
    fn test_children_in_name_order() {
        let mut arena = NodeArena::new();
        let parent = arena.create("Foo");
        for name in ["c", "a", "b"] {
            let child = arena.create(name);
            arena.insert_child(parent, child).unwrap();
        }

        let names: Vec<&str> = arena
            .children_in_order(parent)
            .into_iter()
            .map(|id| arena.name(id))
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(arena.find_child(parent, "b").map(|id| arena.name(id)), Some("b"));
    }

    #[test]
    fn test_child_holds_parent_back_reference() {
        let mut arena = NodeArena::new();
        let parent = arena.create("Foo");
        let child = arena.create("bar");
        arena.insert_child(parent, child).unwrap();

        assert_eq!(arena.parent(child), Some(parent));
        assert_eq!(arena.parent(parent), None);
    }

    #[test]
    fn test_provenance_attrs_from_token() {
        let mut builder = SupplyBuilder::new("main.simple");
        builder.push_word("class").push_word("Foo");
        let mut supply = builder.build();
        supply.next_token();
        let name_tok = supply.next_token();

        let mut arena = NodeArena::new();
        let node = arena.create("Foo");
        arena.set_provenance_attrs(node, &name_tok);

        assert_eq!(
            arena.get_attr(node, AttrKind::FileName),
            Some(&AttrValue::Str("main.simple".to_string()))
        );
        assert_eq!(arena.get_attr(node, AttrKind::LineNo), Some(&AttrValue::Int(1)));
        assert_eq!(arena.get_attr(node, AttrKind::ColNo), Some(&AttrValue::Int(7)));
    }

    #[test]
    fn test_dump_tree_lists_names_and_attrs() {
        let mut arena = NodeArena::new();
        let root = arena.create("Foo");
        arena.set_attr(root, AttrKind::ObjKind, AttrValue::Kind(AttrKind::ClassDecl));
        let child = arena.create("bar");
        arena.insert_child(root, child).unwrap();

        let dump = arena.dump_tree(root);
        assert!(dump.contains("Foo"));
        assert!(dump.contains("class declaration"));
        assert!(dump.contains("  bar"));
    }
}
