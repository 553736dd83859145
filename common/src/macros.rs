//! Logging macros shared by the workspace.
//!
//! Thin wrappers around `tracing` so every crate logs through the same targets.
//! The CLI formatter renders `success!` events with their own symbol.

/// Target used for events emitted by [`success!`](crate::success).
pub const SUCCESS_TARGET: &str = "nxpipe::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "nxpipe::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}
