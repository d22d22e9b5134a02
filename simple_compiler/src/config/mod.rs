//! Configuration module for the Simple front end
//!
//! Compile-time limits live in `constants`; user-tunable preferences
//! (read from the environment) live in `runtime`.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
