//! Depth-first traversal over the node store
//!
//! Later passes (decoration, emission) walk the tree the rules built. The
//! walk visits a node, then the entries in its body subtree, then its
//! children in name order, calling the leave hook on the way back out.

use crate::tree::{AttrKind, AttrValue, NodeArena, NodeId};

/// Hooks called around each node during a walk
pub trait TreeVisitor {
    fn enter_node(&mut self, arena: &NodeArena, node: NodeId);

    fn leave_node(&mut self, arena: &NodeArena, node: NodeId) {
        let _ = (arena, node);
    }
}

/// Walk the tree rooted at `node`
pub fn walk(arena: &NodeArena, node: NodeId, visitor: &mut dyn TreeVisitor) {
    visitor.enter_node(arena, node);
    if let Some(AttrValue::Subtree(root)) = arena.get_attr(node, AttrKind::Body) {
        walk_siblings(arena, *root, visitor);
    }
    for child in arena.children_in_order(node) {
        walk(arena, child, visitor);
    }
    visitor.leave_node(arena, node);
}

/// Walk every node of a sibling tree in name order
pub fn walk_siblings(arena: &NodeArena, root: NodeId, visitor: &mut dyn TreeVisitor) {
    for id in arena.siblings_in_order(root) {
        walk(arena, id, visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::rules::parse_source;
    use crate::syntax::session::CompilerSession;
    use crate::tokens::VecSupply;

    struct NameCollector {
        names: Vec<String>,
        depth: usize,
        max_depth: usize,
    }

    impl NameCollector {
        fn new() -> Self {
            Self {
                names: Vec::new(),
                depth: 0,
                max_depth: 0,
            }
        }
    }

    impl TreeVisitor for NameCollector {
        fn enter_node(&mut self, arena: &NodeArena, node: NodeId) {
            self.names.push(arena.name(node).to_string());
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
        }

        fn leave_node(&mut self, _arena: &NodeArena, _node: NodeId) {
            self.depth -= 1;
        }
    }

    #[test]
    fn test_walk_visits_members_under_their_class() {
        let mut session = CompilerSession::new();
        parse_source(
            &mut session,
            Box::new(VecSupply::from_words(
                "main.simple",
                &["class", "Foo", "{", "int", "x", "bool", "b", "}"],
            )),
        )
        .unwrap();

        let mut collector = NameCollector::new();
        walk(&session.arena, session.root(), &mut collector);

        assert_eq!(collector.names, ["program", "Foo", "b", "x"]);
        assert_eq!(collector.max_depth, 3);
        assert_eq!(collector.depth, 0);
    }

    #[test]
    fn test_walk_descends_into_body_subtrees() {
        let mut session = CompilerSession::new();
        parse_source(
            &mut session,
            Box::new(VecSupply::from_words(
                "main.simple",
                &[
                    "class", "Foo", "{", "int", "f", "(", "int", "a", ")", "{", "}", "}",
                ],
            )),
        )
        .unwrap();

        let f = session.directory.lookup("Foo.f").unwrap();
        let mut collector = NameCollector::new();
        walk(&session.arena, f, &mut collector);

        assert_eq!(collector.names, ["f", "a"]);
    }
}
