//! Compile-time limits for the Simple front end
//!
//! These bounds are enforced at compile time of the compiler itself and
//! cannot be changed by runtime preferences.

pub mod compile_time {
    pub mod tokens {
        /// Debug-build assertion bound on tokens buffered in one file chain
        /// RESOURCE: Catches rules that never finalize; not checked in release
        pub const MAX_CHAIN_LENGTH: usize = 1_000_000;

        /// Maximum nested source files (import depth)
        /// SECURITY: Prevents stack exhaustion via circular imports
        pub const MAX_FILE_DEPTH: usize = 64;
    }

    pub mod syntax {
        /// Maximum parser recursion depth to prevent stack overflow
        /// SECURITY: Prevents DoS via deeply nested declarations
        pub const MAX_PARSE_DEPTH: usize = 200;

        /// Maximum tokens to examine during error recovery
        /// PERFORMANCE: Limits recovery scanning overhead
        pub const MAX_RECOVERY_SCAN_TOKENS: usize = 1_000;
    }

    pub mod symbols {
        /// Maximum nesting of named scopes (namespace/class/function)
        /// RESOURCE: Prevents unbounded context stack growth
        pub const MAX_CONTEXT_DEPTH: usize = 64;

        /// Initial symbol directory capacity (must be a power of two)
        pub const DIRECTORY_INITIAL_CAPACITY: usize = 8;

        /// Load factor expressed as a fraction: resize when live * NUM > cap * DEN
        /// Matches the 1.75 occupancy bound of the probing scheme.
        pub const DIRECTORY_LOAD_NUMERATOR: usize = 7;
        pub const DIRECTORY_LOAD_DENOMINATOR: usize = 4;
    }

    pub mod logging {
        /// Log buffer size for the in-memory logger
        /// RESOURCE: Controls memory usage for logging in tests
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Maximum log message length
        /// RESOURCE: Prevents memory attacks via huge messages
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time::symbols::*;

    #[test]
    fn test_directory_capacity_is_power_of_two() {
        assert!(DIRECTORY_INITIAL_CAPACITY.is_power_of_two());
    }

    #[test]
    fn test_load_factor_is_1_75() {
        // live * 7 > cap * 4  <=>  live * 1.75 > cap
        assert_eq!(
            DIRECTORY_LOAD_NUMERATOR as f64 / DIRECTORY_LOAD_DENOMINATOR as f64,
            1.75
        );
    }
}
