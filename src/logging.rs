//! Logging abstraction
//!
//! Unified logging macros for the storage and parameter layers:
//! - Embedded (`defmt` feature): forwards to defmt
//! - Host tests: prints to stdout with a level tag
//! - Everything else: no-op (arguments are still type-checked)
//!
//! Format arguments must be plain `{}` placeholders over primitives and
//! `&str` so the same call compiles under both defmt and `core::fmt`.

/// Level dispatch shared by the `log_*` macros
#[doc(hidden)]
#[macro_export]
macro_rules! __nvparams_log {
    ($level:ident, $tag:literal, $($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::$level!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[{}] {}", $tag, format_args!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// Failed writes and lost registrations
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::__nvparams_log!(error, "ERROR", $($arg)*)
    };
}

/// Recoverable data problems: truncation, dropped entries, malformed values
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::__nvparams_log!(warn, "WARN", $($arg)*)
    };
}

/// Region lifecycle: loads and pruning
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::__nvparams_log!(info, "INFO", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::__nvparams_log!(debug, "DEBUG", $($arg)*)
    };
}
