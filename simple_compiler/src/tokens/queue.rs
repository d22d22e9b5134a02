//! Lookahead token queue with backtracking
//!
//! The queue sits between the token supply and the parser rules. Rules read
//! through `current`/`advance`, capture a `Mark` before trying an ordered
//! choice, and either `reset` to the mark when the alternative does not
//! match or `finalize` once a committed prefix has been consumed.
//!
//! An `import` pushes a fresh chain for the imported source; the outer
//! chain is frozen until the inner one is closed at its end-of-file token.
//!
//! Tokens carry globally monotonic serial numbers. `finalize` discards
//! everything before the read point, so a mark taken before the last
//! finalize refers to discarded tokens and `reset` reports it as stale
//! instead of silently rewinding into freed history.

use super::supply::TokenSupply;
use super::token::{Token, TokenKind};
use crate::config::compile_time;
use crate::logging::codes::{queue, success, Code};
use crate::{log_error, log_success};
use thiserror::Error;

/// Errors from lookahead queue operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueueError {
    #[error("Stale mark: serial {serial} precedes the last finalized position")]
    StaleMark { serial: u64 },

    #[error("Cannot close '{file}': input pending at '{lexeme}'")]
    CloseWithPendingInput { file: String, lexeme: String },

    #[error("No source is open")]
    NoOpenSource,

    #[error("Import nesting too deep: {depth} files open")]
    FileDepthExceeded { depth: usize },
}

impl QueueError {
    pub fn stale_mark(serial: u64) -> Self {
        Self::StaleMark { serial }
    }

    pub fn close_with_pending_input(file: &str, lexeme: &str) -> Self {
        Self::CloseWithPendingInput {
            file: file.to_string(),
            lexeme: lexeme.to_string(),
        }
    }

    /// Get the log code for this error
    pub fn error_code(&self) -> Code {
        match self {
            Self::StaleMark { .. } => queue::STALE_MARK,
            Self::CloseWithPendingInput { .. } => queue::CLOSE_WITH_PENDING_INPUT,
            Self::NoOpenSource => queue::NO_OPEN_SOURCE,
            Self::FileDepthExceeded { .. } => queue::FILE_DEPTH_EXCEEDED,
        }
    }
}

/// An opaque checkpoint into the queue
///
/// Valid until the next `finalize` or until its chain is closed. A stale
/// mark is detected by `reset`, never silently honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    chain: usize,
    serial: u64,
}

impl Mark {
    /// Serial of the token this mark points at
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

#[derive(Debug)]
struct QueueItem {
    token: Token,
    serial: u64,
}

/// One open source file and its buffered tokens
struct FileChain {
    supply: Box<dyn TokenSupply>,
    /// Buffered tokens; `items[0]` is the oldest retained token
    items: Vec<QueueItem>,
    /// Read point, as an index into `items`
    current: usize,
}

impl FileChain {
    fn current_item(&self) -> &QueueItem {
        &self.items[self.current]
    }

    fn first_serial(&self) -> u64 {
        self.items[0].serial
    }
}

/// Backtracking token queue over a stack of open sources
pub struct LookaheadQueue {
    chains: Vec<FileChain>,
    next_serial: u64,
    end_of_input: Token,
}

impl Default for LookaheadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl LookaheadQueue {
    pub fn new() -> Self {
        Self {
            chains: Vec::new(),
            next_serial: 0,
            end_of_input: Token::end_of_input(),
        }
    }

    /// Number of open sources
    pub fn depth(&self) -> usize {
        self.chains.len()
    }

    /// Open a source on top of the file stack and prime its chain with
    /// one token
    pub fn open(&mut self, supply: Box<dyn TokenSupply>) -> Result<(), QueueError> {
        if self.chains.len() >= compile_time::tokens::MAX_FILE_DEPTH {
            let err = QueueError::FileDepthExceeded {
                depth: self.chains.len(),
            };
            log_error!(
                err.error_code(),
                "import nesting limit reached",
                "file" => supply.source_name()
            );
            return Err(err);
        }

        let name = supply.source_name().to_string();
        let mut chain = FileChain {
            supply,
            items: Vec::new(),
            current: 0,
        };
        self.pull_into(&mut chain);
        self.chains.push(chain);

        log_success!(
            success::SOURCE_OPENED,
            "source opened",
            "file" => &name,
            "depth" => self.chains.len()
        );
        Ok(())
    }

    /// Close the top source
    ///
    /// Fails unless the read point sits on the end-of-file token, so a rule
    /// cannot silently drop unread input.
    pub fn close(&mut self) -> Result<(), QueueError> {
        let chain = self.chains.last().ok_or(QueueError::NoOpenSource)?;
        let tok = &chain.current_item().token;
        if tok.kind != TokenKind::EndOfFile {
            let err = QueueError::close_with_pending_input(&tok.file, &tok.lexeme);
            log_error!(
                err.error_code(),
                "close with pending input",
                span = tok.span,
                "file" => &tok.file,
                "at" => &tok.lexeme
            );
            return Err(err);
        }
        self.chains.pop();
        Ok(())
    }

    /// The token at the read point
    ///
    /// Returns the end-of-input sentinel when no source is open. Never
    /// consumes anything.
    pub fn current(&self) -> &Token {
        match self.chains.last() {
            Some(chain) => &chain.current_item().token,
            None => &self.end_of_input,
        }
    }

    /// Advance the read point one token and return the new current token
    ///
    /// Pulls exactly one token from the supply when the read point is at
    /// the newest buffered token. Advancing past end-of-file or end-of-input
    /// is a no-op.
    pub fn advance(&mut self) -> &Token {
        let serial = &mut self.next_serial;
        match self.chains.last_mut() {
            Some(chain) => {
                if chain.current_item().token.kind.is_terminal() {
                    return &chain.current_item().token;
                }
                if chain.current + 1 == chain.items.len() {
                    debug_assert!(chain.items.len() < compile_time::tokens::MAX_CHAIN_LENGTH);
                    let token = chain.supply.next_token();
                    chain.items.push(QueueItem {
                        token,
                        serial: *serial,
                    });
                    *serial += 1;
                }
                chain.current += 1;
                &chain.current_item().token
            }
            None => &self.end_of_input,
        }
    }

    /// Capture a checkpoint at the read point
    pub fn mark(&self) -> Result<Mark, QueueError> {
        let chain = self.chains.last().ok_or(QueueError::NoOpenSource)?;
        Ok(Mark {
            chain: self.chains.len() - 1,
            serial: chain.current_item().serial,
        })
    }

    /// Rewind the read point to a mark
    ///
    /// A mark is stale when its chain has been closed or when `finalize`
    /// has discarded the token it points at.
    pub fn reset(&mut self, mark: &Mark) -> Result<(), QueueError> {
        let top = self.chains.len();
        let chain = match self.chains.last_mut() {
            Some(chain) if mark.chain + 1 == top => chain,
            _ => return Err(Self::report_stale(mark)),
        };
        let first = chain.first_serial();
        if mark.serial < first {
            return Err(Self::report_stale(mark));
        }
        let idx = (mark.serial - first) as usize;
        if idx >= chain.items.len() || chain.items[idx].serial != mark.serial {
            return Err(Self::report_stale(mark));
        }
        chain.current = idx;
        Ok(())
    }

    /// Discard all tokens before the read point
    ///
    /// Marks taken before this call become stale. Tokens at and after the
    /// read point stay valid, so marks taken at the current position or
    /// later survive.
    pub fn finalize(&mut self) {
        if let Some(chain) = self.chains.last_mut() {
            chain.items.drain(..chain.current);
            chain.current = 0;
        }
    }

    fn pull_into(&mut self, chain: &mut FileChain) {
        let token = chain.supply.next_token();
        chain.items.push(QueueItem {
            token,
            serial: self.next_serial,
        });
        self.next_serial += 1;
    }

    fn report_stale(mark: &Mark) -> QueueError {
        let err = QueueError::stale_mark(mark.serial);
        log_error!(
            err.error_code(),
            "reset to a stale mark",
            "serial" => mark.serial
        );
        err
    }
}

impl std::fmt::Debug for LookaheadQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookaheadQueue")
            .field("depth", &self.chains.len())
            .field("next_serial", &self.next_serial)
            .field("current", self.current())
            .finish()
    }
}
