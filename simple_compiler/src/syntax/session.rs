//! Compiler session
//!
//! The session owns every piece of parse state: the lookahead queue, the
//! node arena, the context stack, the symbol directory, and the running
//! error count. Rules receive `&mut CompilerSession` and nothing else, so
//! two sessions never share state and a test can build as many as it wants.

use crate::config::compile_time;
use crate::config::runtime::ParserPreferences;
use crate::logging::codes::success;
use crate::symbols::{SymContext, SymbolDirectory, SymbolError};
use crate::tokens::{LookaheadQueue, Token, TokenKind, TokenSupply, VecSupply};
use crate::tree::{AttrKind, AttrValue, NodeArena, NodeId};
use crate::{log_debug, log_error, log_success};
use std::collections::HashMap;

use super::error::{FatalError, ParseFailure, SyntaxError};

/// Maps import names to token supplies
///
/// The substrate does not touch the filesystem; whoever drives it decides
/// where imported sources come from.
pub trait SourceResolver {
    fn resolve(&self, name: &str) -> Option<Box<dyn TokenSupply>>;
}

/// Resolver that knows no sources
#[derive(Debug, Default)]
pub struct NullResolver;

impl SourceResolver for NullResolver {
    fn resolve(&self, _name: &str) -> Option<Box<dyn TokenSupply>> {
        None
    }
}

/// In-memory resolver backed by prepared token lists
#[derive(Debug, Default)]
pub struct MapResolver {
    sources: HashMap<String, (String, Vec<Token>)>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under an import name
    pub fn add(&mut self, name: &str, file: &str, tokens: Vec<Token>) -> &mut Self {
        self.sources
            .insert(name.to_string(), (file.to_string(), tokens));
        self
    }

    /// Register a source from bare words, one space apart
    pub fn add_words(&mut self, name: &str, words: &[&str]) -> &mut Self {
        let file = format!("{}.simple", name);
        let tokens = VecSupply::from_words(&file, words).into_tokens();
        self.add(name, &file, tokens)
    }
}

impl SourceResolver for MapResolver {
    fn resolve(&self, name: &str) -> Option<Box<dyn TokenSupply>> {
        let (file, tokens) = self.sources.get(name)?;
        Some(Box::new(VecSupply::new(file, tokens.clone())))
    }
}

/// All mutable state for one compilation
pub struct CompilerSession {
    pub queue: LookaheadQueue,
    pub arena: NodeArena,
    pub context: SymContext,
    pub directory: SymbolDirectory,
    resolver: Box<dyn SourceResolver>,
    root: NodeId,
    /// Stack of nodes new declarations attach to; the root is always at
    /// the bottom
    owners: Vec<NodeId>,
    errors: usize,
    rule_depth: usize,
    prefs: ParserPreferences,
}

impl Default for CompilerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerSession {
    pub fn new() -> Self {
        Self::with_resolver(Box::new(NullResolver))
    }

    pub fn with_resolver(resolver: Box<dyn SourceResolver>) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.create("program");
        Self {
            queue: LookaheadQueue::new(),
            arena,
            context: SymContext::new(),
            directory: SymbolDirectory::new(),
            resolver,
            root,
            owners: vec![root],
            errors: 0,
            rule_depth: 0,
            prefs: ParserPreferences::default(),
        }
    }

    pub fn with_preferences(mut self, prefs: ParserPreferences) -> Self {
        self.prefs = prefs;
        self
    }

    /// Node every top-level declaration hangs off
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Node the next declaration attaches to
    pub fn owner(&self) -> NodeId {
        *self.owners.last().unwrap_or(&self.root)
    }

    pub fn push_owner(&mut self, node: NodeId) {
        self.owners.push(node);
    }

    pub fn pop_owner(&mut self) -> NodeId {
        debug_assert!(self.owners.len() > 1, "owner stack underflow");
        self.owners.pop().unwrap_or(self.root)
    }

    pub fn current(&self) -> &Token {
        self.queue.current()
    }

    pub fn advance(&mut self) -> &Token {
        self.queue.advance()
    }

    /// Consume and return the current token if it has the wanted kind
    pub fn accept(&mut self, kind: TokenKind) -> Option<Token> {
        if self.queue.current().kind == kind {
            let tok = self.queue.current().clone();
            self.queue.advance();
            Some(tok)
        } else {
            None
        }
    }

    /// Consume the current token or fail the committed rule
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseFailure> {
        self.accept(kind).ok_or_else(|| {
            SyntaxError::unexpected_token(kind.as_str(), self.queue.current()).into()
        })
    }

    /// Consume a simple or compound name
    pub fn expect_name(&mut self) -> Result<Token, ParseFailure> {
        if self.queue.current().kind.is_name() {
            let tok = self.queue.current().clone();
            self.queue.advance();
            Ok(tok)
        } else {
            Err(SyntaxError::unexpected_token("a name", self.queue.current()).into())
        }
    }

    /// Track rule nesting; fails when recursion runs away
    pub fn enter_rule(&mut self, rule: &str) -> Result<(), ParseFailure> {
        if self.rule_depth >= compile_time::syntax::MAX_PARSE_DEPTH {
            let err = FatalError::max_parse_depth(rule);
            log_error!(err.error_code(), "rule nesting limit reached", "rule" => rule);
            return Err(err.into());
        }
        self.rule_depth += 1;
        if self.prefs.trace_rules {
            log_debug!(
                "entering rule",
                "rule" => rule,
                "at" => self.queue.current()
            );
        }
        Ok(())
    }

    pub fn leave_rule(&mut self) {
        debug_assert!(self.rule_depth > 0);
        self.rule_depth -= 1;
    }

    /// Count and log a syntax error, then keep going
    pub fn report_syntax_error(&mut self, err: &SyntaxError) {
        self.errors += 1;
        if self.prefs.errors_with_context && !self.context.is_empty() {
            match err.span() {
                Some(span) => log_error!(
                    err.error_code(),
                    &format!("{}", err),
                    span = span,
                    "scope" => self.context.qualified_name()
                ),
                None => log_error!(
                    err.error_code(),
                    &format!("{}", err),
                    "scope" => self.context.qualified_name()
                ),
            }
        } else {
            match err.span() {
                Some(span) => log_error!(err.error_code(), &format!("{}", err), span = span),
                None => log_error!(err.error_code(), &format!("{}", err)),
            }
        }
    }

    /// Decorate a node as a symbol and publish it in the directory
    ///
    /// A name collision is reported and counted; the node keeps its
    /// attributes but stays out of the directory.
    pub fn define_symbol(&mut self, node: NodeId, name_tok: &Token) -> Result<(), ParseFailure> {
        let qualified = self.context.qualify(&name_tok.lexeme);
        self.arena.set_attr(
            node,
            AttrKind::SymbolName,
            AttrValue::Str(qualified.clone()),
        );
        self.arena.set_attr(
            node,
            AttrKind::ScopePath,
            AttrValue::Context(self.context.snapshot()),
        );

        match self.directory.insert(&qualified, node) {
            Ok(()) => Ok(()),
            Err(SymbolError::DuplicateKey { .. }) => {
                self.report_syntax_error(&SyntaxError::duplicate_symbol(&qualified, name_tok));
                Ok(())
            }
            Err(err) => Err(FatalError::Symbol(err).into()),
        }
    }

    /// Open a top-level source
    pub fn open_source(&mut self, supply: Box<dyn TokenSupply>) -> Result<(), ParseFailure> {
        self.queue.open(supply)?;
        Ok(())
    }

    /// Open an imported source by name
    ///
    /// An unresolvable import is a reported syntax error, not a fatal one;
    /// `Ok(false)` tells the rule nothing was opened.
    pub fn open_import(&mut self, name_tok: &Token) -> Result<bool, ParseFailure> {
        match self.resolver.resolve(&name_tok.lexeme) {
            Some(supply) => {
                self.queue.open(supply)?;
                Ok(true)
            }
            None => {
                self.report_syntax_error(&SyntaxError::import_not_found(
                    &name_tok.lexeme,
                    name_tok,
                ));
                Ok(false)
            }
        }
    }

    pub fn close_source(&mut self) -> Result<(), ParseFailure> {
        self.queue.close()?;
        Ok(())
    }

    /// Skip ahead to the next top-level declaration after a syntax error
    ///
    /// Stops before a `class` or `import` keyword or at the end of the
    /// source. Everything skipped is finalized away so no later reset can
    /// wander back into the bad region.
    pub fn skip_to_sync_point(&mut self) -> Result<(), ParseFailure> {
        let mut scanned = 0usize;
        loop {
            match self.queue.current().kind {
                TokenKind::EndOfFile | TokenKind::EndOfInput => break,
                TokenKind::Class | TokenKind::Import => break,
                _ => {
                    self.check_scan_limit(&mut scanned)?;
                    self.queue.advance();
                }
            }
        }
        self.queue.finalize();
        Ok(())
    }

    /// Skip ahead to the next plausible class member after a syntax error
    ///
    /// Stops before anything that can start a member, and before the `}`
    /// that closes the class body so the enclosing rule still sees it.
    pub fn skip_to_member_sync(&mut self) -> Result<(), ParseFailure> {
        let mut scanned = 0usize;
        loop {
            let kind = self.queue.current().kind;
            if kind.is_terminal() || kind == TokenKind::CloseBrace || kind.starts_class_member()
            {
                break;
            }
            self.check_scan_limit(&mut scanned)?;
            self.queue.advance();
        }
        self.queue.finalize();
        Ok(())
    }

    fn check_scan_limit(&self, scanned: &mut usize) -> Result<(), ParseFailure> {
        if *scanned >= compile_time::syntax::MAX_RECOVERY_SCAN_TOKENS {
            let err = FatalError::RecoveryFailed { scanned: *scanned };
            log_error!(err.error_code(), "no sync point found");
            return Err(err.into());
        }
        *scanned += 1;
        Ok(())
    }

    /// Log the end-of-parse summary
    pub fn finish(&self) {
        log_success!(
            success::PARSE_COMPLETE,
            "parse complete",
            "symbols" => self.directory.len(),
            "errors" => self.errors
        );
    }
}
