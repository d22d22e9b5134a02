//! Token supply boundary
//!
//! The lookahead queue pulls tokens one at a time through the `TokenSupply`
//! trait. Production supplies wrap a character-level scanner; tests and the
//! demonstration rules use `VecSupply`, which replays a prepared token list.

use super::token::{classify_word, Token, TokenKind};
use crate::utils::{Position, Span};

/// Source of tokens for a single file
///
/// A supply is exhausted when it returns an `EndOfFile` token. It must keep
/// returning `EndOfFile` on every call after that.
pub trait TokenSupply {
    /// Pull the next token from the source
    fn next_token(&mut self) -> Token;

    /// Name of the source this supply reads from
    fn source_name(&self) -> &str;
}

/// A token supply backed by a prepared vector of tokens
#[derive(Debug)]
pub struct VecSupply {
    name: String,
    tokens: Vec<Token>,
    pos: usize,
    /// Span of the last real token, reused for the end-of-file sentinel
    last_span: Span,
}

impl VecSupply {
    pub fn new(name: &str, tokens: Vec<Token>) -> Self {
        let last_span = tokens.last().map(|t| t.span).unwrap_or_else(Span::dummy);
        Self {
            name: name.to_string(),
            tokens,
            pos: 0,
            last_span,
        }
    }

    /// Build a supply from whitespace-free lexemes, classifying each word
    /// and laying tokens out one space apart on a single line
    pub fn from_words(name: &str, words: &[&str]) -> Self {
        let mut builder = SupplyBuilder::new(name);
        for word in words {
            builder.push_word(word);
        }
        builder.build()
    }
}

impl VecSupply {
    /// Take back the unread token list, for callers that stash token
    /// streams instead of supplies
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl TokenSupply for VecSupply {
    fn next_token(&mut self) -> Token {
        if self.pos < self.tokens.len() {
            let tok = self.tokens[self.pos].clone();
            self.pos += 1;
            tok
        } else {
            Token::end_of_file(&self.name, self.last_span)
        }
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

/// Incremental builder for `VecSupply`, tracking positions as it goes
#[derive(Debug)]
pub struct SupplyBuilder {
    name: String,
    tokens: Vec<Token>,
    pos: Position,
}

impl SupplyBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tokens: Vec::new(),
            pos: Position::start(),
        }
    }

    /// Append a token with an explicit kind
    pub fn push_token(&mut self, kind: TokenKind, lexeme: &str) -> &mut Self {
        let span = Span::of_lexeme(self.pos, lexeme);
        self.tokens.push(Token::new(kind, lexeme, span, &self.name));
        // One space of separation after each token
        self.pos = span.end.advance(' ');
        self
    }

    /// Append a word, classifying it as keyword, name, punctuation, or literal
    pub fn push_word(&mut self, word: &str) -> &mut Self {
        let kind = match word {
            "(" => TokenKind::OpenParen,
            ")" => TokenKind::CloseParen,
            "{" => TokenKind::OpenBrace,
            "}" => TokenKind::CloseBrace,
            "[" => TokenKind::OpenBracket,
            "]" => TokenKind::CloseBracket,
            "," => TokenKind::Comma,
            "=" => TokenKind::Equal,
            "." => TokenKind::Dot,
            _ if word.starts_with('"') => TokenKind::StrLit,
            _ if word.starts_with("0x") || word.starts_with("0X") => TokenKind::UintLit,
            _ if word.contains('.') && word.chars().next().is_some_and(|c| c.is_ascii_digit()) => {
                TokenKind::FloatLit
            }
            _ if word.chars().next().is_some_and(|c| c.is_ascii_digit()) => TokenKind::IntLit,
            _ => classify_word(word),
        };
        self.push_token(kind, word)
    }

    /// Start a new source line
    pub fn newline(&mut self) -> &mut Self {
        self.pos = self.pos.advance('\n');
        self
    }

    pub fn build(&mut self) -> VecSupply {
        VecSupply::new(&self.name, std::mem::take(&mut self.tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_supply_returns_tokens_then_eof() {
        let mut supply = VecSupply::from_words("t.simple", &["class", "Foo"]);
        assert_eq!(supply.next_token().kind, TokenKind::Class);
        assert_eq!(supply.next_token().kind, TokenKind::Symbol);
        assert_eq!(supply.next_token().kind, TokenKind::EndOfFile);
        // EndOfFile is sticky
        assert_eq!(supply.next_token().kind, TokenKind::EndOfFile);
    }

    #[test]
    fn test_builder_tracks_positions() {
        let mut supply = VecSupply::from_words("t.simple", &["class", "Foo"]);
        let class_tok = supply.next_token();
        let name_tok = supply.next_token();
        assert_eq!(class_tok.span.start.column, 1);
        assert_eq!(name_tok.span.start.column, 7);
        assert_eq!(name_tok.file, "t.simple");
    }

    #[test]
    fn test_builder_classifies_literals() {
        let mut supply = VecSupply::from_words("t.simple", &["12", "3.25", "0x1F", "a.b"]);
        assert_eq!(supply.next_token().kind, TokenKind::IntLit);
        assert_eq!(supply.next_token().kind, TokenKind::FloatLit);
        assert_eq!(supply.next_token().kind, TokenKind::UintLit);
        assert_eq!(supply.next_token().kind, TokenKind::CompoundName);
    }
}
