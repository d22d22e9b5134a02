//! Token types for the Simple language
//!
//! Tokens are immutable values produced by the token supply and copied into
//! the lookahead queue. The kind vocabulary covers everything the
//! demonstration grammar and the substrate tests need; the character-level
//! lexer that produces these lives behind the `TokenSupply` trait.

use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token kinds for the Simple language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Sentinels
    /// Scanner error token
    Error,
    /// End of the current source file
    EndOfFile,
    /// No more input anywhere (file stack empty)
    EndOfInput,

    // Constructed tokens
    /// A simple name
    Symbol,
    /// A name with dots in it
    CompoundName,
    /// Float literal
    FloatLit,
    /// Signed integer literal
    IntLit,
    /// Unsigned (hex) integer literal
    UintLit,
    /// Quoted string literal
    StrLit,

    // Keywords
    Class,
    Import,
    Public,
    Private,
    Protected,

    // Native type keywords
    Float,
    Int,
    Uint,
    Bool,
    Dict,
    List,
    StrType,
    Nothing,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Dot,
    Comma,
    Equal,
}

impl TokenKind {
    /// Human-readable name used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Error => "error",
            TokenKind::EndOfFile => "end of file",
            TokenKind::EndOfInput => "end of input",
            TokenKind::Symbol => "symbol",
            TokenKind::CompoundName => "compound name",
            TokenKind::FloatLit => "float literal",
            TokenKind::IntLit => "integer literal",
            TokenKind::UintLit => "unsigned literal",
            TokenKind::StrLit => "string literal",
            TokenKind::Class => "'class'",
            TokenKind::Import => "'import'",
            TokenKind::Public => "'public'",
            TokenKind::Private => "'private'",
            TokenKind::Protected => "'protected'",
            TokenKind::Float => "'float'",
            TokenKind::Int => "'int'",
            TokenKind::Uint => "'uint'",
            TokenKind::Bool => "'bool'",
            TokenKind::Dict => "'dict'",
            TokenKind::List => "'list'",
            TokenKind::StrType => "'string'",
            TokenKind::Nothing => "'nothing'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
            TokenKind::OpenBracket => "'['",
            TokenKind::CloseBracket => "']'",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::Equal => "'='",
        }
    }

    /// Check if this kind names a native type
    pub fn is_native_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Float
                | TokenKind::Int
                | TokenKind::Uint
                | TokenKind::Bool
                | TokenKind::Dict
                | TokenKind::List
                | TokenKind::StrType
                | TokenKind::Nothing
        )
    }

    /// Check if this kind is a simple or compound name
    pub fn is_name(&self) -> bool {
        matches!(self, TokenKind::Symbol | TokenKind::CompoundName)
    }

    /// Check if this kind can start a class body member (type or scope marker)
    pub fn starts_class_member(&self) -> bool {
        self.is_native_type()
            || self.is_name()
            || matches!(
                self,
                TokenKind::Public | TokenKind::Private | TokenKind::Protected
            )
    }

    /// Check if this kind is a scope marker keyword
    pub fn is_scope_marker(&self) -> bool {
        matches!(
            self,
            TokenKind::Public | TokenKind::Private | TokenKind::Protected
        )
    }

    /// Check if this kind ends a source or the whole input
    pub fn is_terminal(&self) -> bool {
        matches!(self, TokenKind::EndOfFile | TokenKind::EndOfInput)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a scanned word as a keyword or a name
pub fn classify_word(word: &str) -> TokenKind {
    match word {
        "class" => TokenKind::Class,
        "import" => TokenKind::Import,
        "public" => TokenKind::Public,
        "private" => TokenKind::Private,
        "protected" | "protect" => TokenKind::Protected,
        "float" => TokenKind::Float,
        "int" | "signed" => TokenKind::Int,
        "uint" | "unsigned" => TokenKind::Uint,
        "bool" | "boolean" => TokenKind::Bool,
        "dict" | "dictionary" => TokenKind::Dict,
        "list" => TokenKind::List,
        "string" => TokenKind::StrType,
        "nothing" | "any" => TokenKind::Nothing,
        _ if word.contains('.') => TokenKind::CompoundName,
        _ => TokenKind::Symbol,
    }
}

/// An immutable token value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Literal text as it appeared in the source
    pub lexeme: String,
    pub span: Span,
    /// Name of the source file this token came from
    pub file: String,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: &str, span: Span, file: &str) -> Self {
        Self {
            kind,
            lexeme: lexeme.to_string(),
            span,
            file: file.to_string(),
        }
    }

    /// Synthesize an end-of-file token for a source
    pub fn end_of_file(file: &str, span: Span) -> Self {
        Self {
            kind: TokenKind::EndOfFile,
            lexeme: String::new(),
            span,
            file: file.to_string(),
        }
    }

    /// Synthesize the end-of-input sentinel
    pub fn end_of_input() -> Self {
        Self {
            kind: TokenKind::EndOfInput,
            lexeme: String::new(),
            span: Span::dummy(),
            file: String::new(),
        }
    }

    /// Source location rendered as `file: line: column`
    pub fn location(&self) -> String {
        format!(
            "{}: {}: {}",
            self.file, self.span.start.line, self.span.start.column
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lexeme.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}", self.lexeme)
        }
    }
}
