//! Demonstration grammar rules
//!
//! These rules show the intended shape of a rule built on the substrate:
//! look at the input, return `Ok(None)` when the alternative is not
//! present, and once committed either finish or raise a syntax error. A
//! rule may consume tokens while deciding; `first_of` rewinds the queue to
//! its mark after every no-match, so alternatives always start from the
//! same read point.
//!
//! The grammar itself is the declaration subset of Simple:
//!
//! ```text
//! unit      := { import | class }
//! import    := 'import' name
//! class     := [ scope ] 'class' SYMBOL [ '(' name ')' ] '{' { member } '}'
//! member    := [ scope ] type SYMBOL [ '(' params ')' '{' '}' ]
//! params    := [ type SYMBOL { ',' type SYMBOL } ]
//! type      := native-type | name
//! scope     := 'public' | 'private' | 'protected'
//! ```

use super::error::{FatalError, ParseFailure, RuleResult, SyntaxError};
use super::session::CompilerSession;
use crate::tokens::{Token, TokenKind};
use crate::tree::{
    kind_for_scope_token, kind_for_type_token, AttrKind, AttrValue, NodeId,
};

/// A grammar rule over the shared session
pub type Rule = fn(&mut CompilerSession) -> RuleResult;

/// Try rules in order, resetting the queue after each clean no-match
///
/// The first rule to produce a node wins. Syntax and fatal errors pass
/// through untouched; a committed rule has already consumed input on
/// purpose and must not be unwound here.
pub fn first_of(session: &mut CompilerSession, rules: &[Rule]) -> RuleResult {
    for rule in rules {
        let mark = session.queue.mark()?;
        match rule(session)? {
            Some(node) => return Ok(Some(node)),
            None => session.queue.reset(&mark)?,
        }
    }
    Ok(None)
}

/// Parse declarations until the end of the current source
///
/// Syntax errors are reported, the input is resynchronized, and parsing
/// continues so one bad declaration does not hide the rest.
pub fn parse_unit(session: &mut CompilerSession) -> Result<Vec<NodeId>, ParseFailure> {
    let mut decls = Vec::new();
    while !session.current().kind.is_terminal() {
        match first_of(session, &[parse_import, parse_class]) {
            Ok(Some(node)) => decls.push(node),
            Ok(None) => {
                let err =
                    SyntaxError::unexpected_token("'class' or 'import'", session.current());
                session.report_syntax_error(&err);
                session.skip_to_sync_point()?;
            }
            Err(ParseFailure::Syntax(err)) => {
                session.report_syntax_error(&err);
                session.skip_to_sync_point()?;
            }
            Err(fatal) => return Err(fatal),
        }
    }
    Ok(decls)
}

/// Parse one whole source through a fresh chain on the session's queue
pub fn parse_source(
    session: &mut CompilerSession,
    supply: Box<dyn crate::tokens::TokenSupply>,
) -> Result<Vec<NodeId>, ParseFailure> {
    session.open_source(supply)?;
    let decls = parse_unit(session)?;
    session.close_source()?;
    if session.queue.depth() == 0 {
        session.finish();
    }
    Ok(decls)
}

/// import := 'import' name
///
/// Records an import node, then parses the imported source in place with
/// the import name pushed on the context, so everything the import declares
/// is qualified by it.
pub fn parse_import(session: &mut CompilerSession) -> RuleResult {
    session.enter_rule("import")?;
    let result = import_tail(session);
    session.leave_rule();
    result
}

fn import_tail(session: &mut CompilerSession) -> RuleResult {
    if session.accept(TokenKind::Import).is_none() {
        return Ok(None);
    }
    let name_tok = session.expect_name()?;
    session.queue.finalize();

    let node = session.arena.create(&name_tok.lexeme);
    session
        .arena
        .set_attr(node, AttrKind::Name, AttrValue::Str(name_tok.lexeme.clone()));
    session.arena.set_provenance_attrs(node, &name_tok);
    attach_declaration(session, node, &name_tok)?;

    if session.open_import(&name_tok)? {
        session
            .context
            .push(&name_tok.lexeme)
            .map_err(FatalError::Symbol)?;
        session.push_owner(node);

        let inner = parse_unit(session);

        session.pop_owner();
        session.context.pop();
        inner?;
        session.close_source()?;
    }
    Ok(Some(node))
}

/// class := [ scope ] 'class' SYMBOL [ '(' name ')' ] '{' { member } '}'
pub fn parse_class(session: &mut CompilerSession) -> RuleResult {
    session.enter_rule("class")?;
    let result = class_tail(session);
    session.leave_rule();
    result
}

fn class_tail(session: &mut CompilerSession) -> RuleResult {
    let scope = match kind_for_scope_token(session.current().kind) {
        Some(kind) => {
            session.advance();
            kind
        }
        // Classes without a scope marker are public
        None => AttrKind::Public,
    };
    if session.accept(TokenKind::Class).is_none() {
        // No-match after an optional scope marker; first_of rewinds it
        return Ok(None);
    }
    let name_tok = session.expect(TokenKind::Symbol)?;
    session.queue.finalize();

    let node = session.arena.create(&name_tok.lexeme);
    session
        .arena
        .set_attr(node, AttrKind::Name, AttrValue::Str(name_tok.lexeme.clone()));
    session.arena.set_attr(
        node,
        AttrKind::ObjKind,
        AttrValue::Kind(AttrKind::ClassDecl),
    );
    session
        .arena
        .set_attr(node, AttrKind::Scope, AttrValue::Kind(scope));
    session.arena.set_provenance_attrs(node, &name_tok);

    if session.accept(TokenKind::OpenParen).is_some() {
        let base_tok = session.expect_name()?;
        session.expect(TokenKind::CloseParen)?;
        session.arena.set_attr(
            node,
            AttrKind::InheritName,
            AttrValue::Str(base_tok.lexeme.clone()),
        );
        if let Some(base) = resolve_name(session, &base_tok.lexeme) {
            session
                .arena
                .set_attr(node, AttrKind::InheritRef, AttrValue::NodeRef(base));
        }
    }
    session.expect(TokenKind::OpenBrace)?;

    attach_declaration(session, node, &name_tok)?;
    session
        .context
        .push(&name_tok.lexeme)
        .map_err(FatalError::Symbol)?;
    session.push_owner(node);

    let members = class_members(session);

    session.pop_owner();
    session.context.pop();
    members?;

    session.expect(TokenKind::CloseBrace)?;
    session.queue.finalize();
    Ok(Some(node))
}

fn class_members(session: &mut CompilerSession) -> Result<(), ParseFailure> {
    loop {
        let kind = session.current().kind;
        if kind == TokenKind::CloseBrace || kind.is_terminal() {
            return Ok(());
        }
        match parse_member(session) {
            Ok(_) => {}
            Err(ParseFailure::Syntax(err)) => {
                session.report_syntax_error(&err);
                session.skip_to_member_sync()?;
            }
            Err(fatal) => return Err(fatal),
        }
    }
}

/// member := [ scope ] type SYMBOL [ '(' params ')' '{' '}' ]
///
/// A member is a data declaration, or a function declaration when a
/// parameter list follows the name. Parameters hang off the member's body
/// subtree.
fn parse_member(session: &mut CompilerSession) -> Result<NodeId, ParseFailure> {
    session.enter_rule("member")?;
    let result = member_tail(session);
    session.leave_rule();
    result
}

fn member_tail(session: &mut CompilerSession) -> Result<NodeId, ParseFailure> {
    let scope = match kind_for_scope_token(session.current().kind) {
        Some(kind) => {
            session.advance();
            kind
        }
        // Members without a scope marker are private
        None => AttrKind::Private,
    };

    let type_tok = expect_type(session)?;
    let name_tok = session.expect(TokenKind::Symbol)?;

    let node = session.arena.create(&name_tok.lexeme);
    session
        .arena
        .set_attr(node, AttrKind::Name, AttrValue::Str(name_tok.lexeme.clone()));
    session
        .arena
        .set_attr(node, AttrKind::Scope, AttrValue::Kind(scope));
    session.arena.set_provenance_attrs(node, &name_tok);
    set_type_attrs(session, node, &type_tok);

    let is_function = session.accept(TokenKind::OpenParen).is_some();
    session.arena.set_attr(
        node,
        AttrKind::ObjKind,
        AttrValue::Kind(if is_function {
            AttrKind::FuncDecl
        } else {
            AttrKind::DataDecl
        }),
    );
    attach_declaration(session, node, &name_tok)?;

    if is_function {
        session
            .context
            .push(&name_tok.lexeme)
            .map_err(FatalError::Symbol)?;
        let params = function_params(session, node);
        session.context.pop();
        params?;
        session.expect(TokenKind::OpenBrace)?;
        session.expect(TokenKind::CloseBrace)?;
    }

    session.queue.finalize();
    Ok(node)
}

/// params := [ type SYMBOL { ',' type SYMBOL } ]
fn function_params(
    session: &mut CompilerSession,
    function: NodeId,
) -> Result<(), ParseFailure> {
    let mut body_root: Option<NodeId> = None;
    if session.accept(TokenKind::CloseParen).is_none() {
        loop {
            let type_tok = expect_type(session)?;
            let name_tok = session.expect(TokenKind::Symbol)?;

            let param = session.arena.create(&name_tok.lexeme);
            session.arena.set_attr(
                param,
                AttrKind::Name,
                AttrValue::Str(name_tok.lexeme.clone()),
            );
            session.arena.set_attr(
                param,
                AttrKind::ObjKind,
                AttrValue::Kind(AttrKind::DataDecl),
            );
            session.arena.set_provenance_attrs(param, &name_tok);
            set_type_attrs(session, param, &type_tok);
            session.define_symbol(param, &name_tok)?;

            match body_root {
                None => body_root = Some(param),
                Some(root) => {
                    // A sibling collision duplicates the directory collision
                    // that define_symbol already reported
                    let _ = session.arena.insert_sibling(root, param);
                }
            }

            if session.accept(TokenKind::Comma).is_none() {
                break;
            }
        }
        session.expect(TokenKind::CloseParen)?;
    }
    if let Some(root) = body_root {
        session.arena.set_subtree_attr(function, AttrKind::Body, root);
    }
    Ok(())
}

/// type := native-type | name
fn expect_type(session: &mut CompilerSession) -> Result<Token, ParseFailure> {
    let tok = session.current().clone();
    if kind_for_type_token(tok.kind).is_some() || tok.kind.is_name() {
        session.advance();
        Ok(tok)
    } else {
        Err(SyntaxError::unexpected_token("a type", &tok).into())
    }
}

/// Record what a declaration's type is, resolving user types against the
/// directory when possible
fn set_type_attrs(session: &mut CompilerSession, node: NodeId, type_tok: &Token) {
    match kind_for_type_token(type_tok.kind) {
        Some(kind) => {
            session.arena.set_attr(node, kind, AttrValue::Bool(true));
        }
        None => {
            session.arena.set_attr(
                node,
                AttrKind::UserType,
                AttrValue::Str(type_tok.lexeme.clone()),
            );
            if let Some(target) = resolve_name(session, &type_tok.lexeme) {
                session
                    .arena
                    .set_attr(node, AttrKind::UserTypeRef, AttrValue::NodeRef(target));
            }
        }
    }
}

/// Look a name up first in the current scope, then at the top level
fn resolve_name(session: &CompilerSession, name: &str) -> Option<NodeId> {
    session
        .directory
        .lookup(&session.context.qualify(name))
        .or_else(|| session.directory.lookup(name))
}

/// Hang a declaration off the current owner and publish its symbol
fn attach_declaration(
    session: &mut CompilerSession,
    node: NodeId,
    name_tok: &Token,
) -> Result<(), ParseFailure> {
    session.define_symbol(node, name_tok)?;
    let owner = session.owner();
    if owner != session.root() {
        let parent_name = session.arena.name(owner).to_string();
        session
            .arena
            .set_attr(node, AttrKind::ParentName, AttrValue::Str(parent_name));
    }
    // A sibling collision duplicates the directory collision that
    // define_symbol already reported, so it is not reported again
    let _ = session.arena.insert_child(owner, node);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::session::MapResolver;
    use crate::tokens::VecSupply;
    use assert_matches::assert_matches;

    fn parse_words(words: &[&str]) -> (CompilerSession, Vec<NodeId>) {
        let mut session = CompilerSession::new();
        let decls = parse_source(
            &mut session,
            Box::new(VecSupply::from_words("main.simple", words)),
        )
        .unwrap();
        (session, decls)
    }

    #[test]
    fn test_empty_class_registers_symbol() {
        let (session, decls) = parse_words(&["class", "Foo", "{", "}"]);

        assert_eq!(decls.len(), 1);
        assert_eq!(session.error_count(), 0);

        let foo = session.directory.lookup("Foo").expect("Foo not defined");
        assert_eq!(foo, decls[0]);
        assert_eq!(
            session.arena.get_attr(foo, AttrKind::ObjKind),
            Some(&AttrValue::Kind(AttrKind::ClassDecl))
        );
        assert_eq!(
            session.arena.get_attr(foo, AttrKind::FileName),
            Some(&AttrValue::Str("main.simple".to_string()))
        );
        assert_eq!(session.arena.parent(foo), Some(session.root()));
    }

    #[test]
    fn test_class_scope_markers() {
        let (session, _) = parse_words(&[
            "private", "class", "Hidden", "{", "}", "class", "Open", "{", "}",
        ]);
        assert_eq!(session.error_count(), 0);

        let hidden = session.directory.lookup("Hidden").unwrap();
        assert_eq!(
            session.arena.get_attr(hidden, AttrKind::Scope),
            Some(&AttrValue::Kind(AttrKind::Private))
        );
        let open = session.directory.lookup("Open").unwrap();
        assert_eq!(
            session.arena.get_attr(open, AttrKind::Scope),
            Some(&AttrValue::Kind(AttrKind::Public))
        );
    }

    #[test]
    fn test_members_are_qualified_and_scoped() {
        let (session, _) = parse_words(&[
            "class", "Foo", "{", "int", "x", "public", "string", "s", "}",
        ]);
        assert_eq!(session.error_count(), 0);

        let x = session.directory.lookup("Foo.x").expect("Foo.x not defined");
        assert_eq!(
            session.arena.get_attr(x, AttrKind::Scope),
            Some(&AttrValue::Kind(AttrKind::Private))
        );
        assert_eq!(
            session.arena.get_attr(x, AttrKind::IntType),
            Some(&AttrValue::Bool(true))
        );

        let s = session.directory.lookup("Foo.s").expect("Foo.s not defined");
        assert_eq!(
            session.arena.get_attr(s, AttrKind::Scope),
            Some(&AttrValue::Kind(AttrKind::Public))
        );

        // Members are children of the class node
        let foo = session.directory.lookup("Foo").unwrap();
        assert_eq!(session.arena.find_child(foo, "x"), Some(x));
    }

    #[test]
    fn test_function_member_with_params() {
        let (session, _) = parse_words(&[
            "class", "Foo", "{", "int", "f", "(", "int", "a", ",", "bool", "b", ")", "{", "}",
            "}",
        ]);
        assert_eq!(session.error_count(), 0);

        let f = session.directory.lookup("Foo.f").expect("Foo.f not defined");
        assert_eq!(
            session.arena.get_attr(f, AttrKind::ObjKind),
            Some(&AttrValue::Kind(AttrKind::FuncDecl))
        );

        // Parameters are qualified by the function and hang off its body
        let a = session
            .directory
            .lookup("Foo.f.a")
            .expect("Foo.f.a not defined");
        assert_matches!(
            session.arena.get_attr(f, AttrKind::Body),
            Some(AttrValue::Subtree(root)) if session.arena.find(*root, "a") == Some(a)
        );
    }

    #[test]
    fn test_duplicate_param_reports_one_error() {
        let (session, _) = parse_words(&[
            "class", "Foo", "{", "int", "f", "(", "int", "a", ",", "int", "a", ")", "{", "}",
            "}",
        ]);

        // The directory collision is the single report; the sibling
        // collision is the same mistake and stays silent
        assert_eq!(session.error_count(), 1);

        let f = session.directory.lookup("Foo.f").unwrap();
        let a = session.directory.lookup("Foo.f.a").unwrap();
        assert_matches!(
            session.arena.get_attr(f, AttrKind::Body),
            Some(AttrValue::Subtree(root)) if session.arena.find(*root, "a") == Some(a)
        );
    }

    #[test]
    fn test_inheritance_resolves_to_base_class() {
        let (session, _) = parse_words(&[
            "class", "A", "{", "}", "class", "B", "(", "A", ")", "{", "}",
        ]);
        assert_eq!(session.error_count(), 0);

        let a = session.directory.lookup("A").unwrap();
        let b = session.directory.lookup("B").unwrap();
        assert_eq!(
            session.arena.get_attr(b, AttrKind::InheritName),
            Some(&AttrValue::Str("A".to_string()))
        );
        assert_eq!(
            session.arena.get_attr(b, AttrKind::InheritRef),
            Some(&AttrValue::NodeRef(a))
        );
    }

    #[test]
    fn test_user_type_member_resolves() {
        let (session, _) = parse_words(&[
            "class", "A", "{", "}", "class", "B", "{", "A", "a", "}",
        ]);
        assert_eq!(session.error_count(), 0);

        let a_class = session.directory.lookup("A").unwrap();
        let member = session.directory.lookup("B.a").unwrap();
        assert_eq!(
            session.arena.get_attr(member, AttrKind::UserType),
            Some(&AttrValue::Str("A".to_string()))
        );
        assert_eq!(
            session.arena.get_attr(member, AttrKind::UserTypeRef),
            Some(&AttrValue::NodeRef(a_class))
        );
    }

    #[test]
    fn test_first_of_leaves_queue_untouched_on_no_match() {
        let mut session = CompilerSession::new();
        session
            .open_source(Box::new(VecSupply::from_words(
                "main.simple",
                &["import", "util"],
            )))
            .unwrap();

        let result = first_of(&mut session, &[parse_class]).unwrap();
        assert_eq!(result, None);
        assert_eq!(session.current().lexeme, "import");
    }

    #[test]
    fn test_import_parses_inline_with_qualified_names() {
        let mut resolver = MapResolver::new();
        resolver.add_words("util", &["class", "Util", "{", "int", "n", "}"]);

        let mut session = CompilerSession::with_resolver(Box::new(resolver));
        let decls = parse_source(
            &mut session,
            Box::new(VecSupply::from_words(
                "main.simple",
                &["import", "util", "class", "Main", "{", "}"],
            )),
        )
        .unwrap();

        assert_eq!(session.error_count(), 0);
        assert_eq!(decls.len(), 2);
        assert!(session.directory.lookup("util.Util").is_some());
        assert!(session.directory.lookup("util.Util.n").is_some());
        assert!(session.directory.lookup("Main").is_some());
        // The imported class is not visible unqualified
        assert!(session.directory.lookup("Util").is_none());

        // The import node owns the imported declarations
        let util = session.directory.lookup("util").unwrap();
        assert!(session.arena.find_child(util, "Util").is_some());
    }

    #[test]
    fn test_unresolved_import_recovers() {
        let mut session = CompilerSession::new();
        let decls = parse_source(
            &mut session,
            Box::new(VecSupply::from_words(
                "main.simple",
                &["import", "missing", "class", "Main", "{", "}"],
            )),
        )
        .unwrap();

        assert_eq!(session.error_count(), 1);
        assert_eq!(decls.len(), 2);
        assert!(session.directory.lookup("Main").is_some());
    }

    #[test]
    fn test_malformed_class_reports_and_recovers() {
        let (session, decls) = parse_words(&[
            "class", "{", "}", "class", "Good", "{", "}",
        ]);

        assert!(session.error_count() >= 1);
        assert!(session.directory.lookup("Good").is_some());
        assert_eq!(decls.len(), 1);
    }

    #[test]
    fn test_duplicate_class_reported_once_first_wins() {
        let (session, _) = parse_words(&[
            "class", "Foo", "{", "int", "x", "}", "class", "Foo", "{", "}",
        ]);

        assert_eq!(session.error_count(), 1);
        let foo = session.directory.lookup("Foo").unwrap();
        // The first definition keeps its member
        assert!(session.arena.find_child(foo, "x").is_some());
    }

    #[test]
    fn test_malformed_member_recovers_within_class() {
        let (session, _) = parse_words(&[
            "class", "Foo", "{", "int", "=", "int", "y", "}",
        ]);

        assert_eq!(session.error_count(), 1);
        assert!(session.directory.lookup("Foo").is_some());
        assert!(session.directory.lookup("Foo.y").is_some());
    }
}
