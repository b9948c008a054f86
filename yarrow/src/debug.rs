//! Debug output helpers.
//!
//! All of the macros here are gated behind the `debug_prints` feature. Do not
//! enable it when consuming the crate rather than working on it; the prints
//! are noisy and meant for chasing emitter state bugs.

/// Print, to stderr, if the `debug_prints` feature is enabled.
#[allow(unused_macros)]
macro_rules! debug_print {
    ($($arg:tt)*) => {{
        #[cfg(feature = "debug_prints")]
        eprint!($($arg)*);
    }};
}

/// Print with newline, to stderr, if the `debug_prints` feature is enabled.
#[allow(unused_macros)]
macro_rules! debug_println {
    ($($arg:tt)*) => {{
        #[cfg(feature = "debug_prints")]
        eprintln!($($arg)*);
    }};
}
