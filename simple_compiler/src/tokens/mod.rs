//! Token handling for the Simple front end
//!
//! Tokens enter through a `TokenSupply`, are buffered by the
//! `LookaheadQueue`, and are consumed by the syntax rules with arbitrary
//! lookahead and backtracking.

pub mod queue;
pub mod supply;
pub mod token;

pub use queue::{LookaheadQueue, Mark, QueueError};
pub use supply::{SupplyBuilder, TokenSupply, VecSupply};
pub use token::{classify_word, Token, TokenKind};
