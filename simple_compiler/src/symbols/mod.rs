//! Symbol tracking
//!
//! Two cooperating pieces: the context stack that knows what scope the
//! parser is inside, and the directory that maps decorated names to their
//! entry nodes in the arena. Symbol entries themselves are ordinary
//! attributed nodes.

pub mod context;
pub mod directory;
pub mod error;

pub use context::SymContext;
pub use directory::SymbolDirectory;
pub use error::SymbolError;
