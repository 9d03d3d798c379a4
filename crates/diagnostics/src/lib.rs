//! Lightweight structured logging shared by all crates in the workspace.
//!
//! Usage:
//! - Set HATCH_LOG=off (default) - no logs
//! - Set HATCH_LOG=info - operation logs (jobs launched, files written)
//! - Set HATCH_LOG=debug - detailed diagnostic logs

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable controlling the log level.
pub const LOG_ENV: &str = "HATCH_LOG";

static INIT: Once = Once::new();

/// Initialize diagnostics based on the HATCH_LOG environment variable.
///
/// Safe to call multiple times - subsequent calls are ignored.
pub fn init_diagnostics() {
    init_with_default("off");
}

/// Like [`init_diagnostics`], but `default_level` applies when HATCH_LOG
/// is unset. Lets a CLI verbose flag raise the level without touching the
/// process environment.
pub fn init_with_default(default_level: &str) {
    INIT.call_once(|| {
        let log_level =
            std::env::var(LOG_ENV).unwrap_or_else(|_| default_level.to_string());

        let rt = match log_level.as_str() {
            "off" => return, // No setup needed
            "debug" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Debug))
                .init(),
            "info" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Info))
                .init(),
            "warn" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Warn))
                .init(),
            "error" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Error))
                .init(),
            _ => {
                let rt = emit::setup()
                    .emit_to(emit_term::stderr())
                    .emit_when(emit::level::min_filter(emit::Level::Info))
                    .init();
                eprintln!("Warning: Unknown {} value '{}', using 'info'", LOG_ENV, log_level);
                rt
            }
        };

        std::mem::forget(rt); // TODO: find better lifetime management
    });
}

/// Log basic operations (requests handled, files materialized, jobs run).
///
/// Use this for operations that users might want to see in normal usage.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (argv construction, per-file metadata, state).
///
/// Use this for detail useful when debugging.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log warning conditions (fallbacks, cleanup failures, recoverable errors).
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log critical error conditions (failures that abort the operation).
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;
