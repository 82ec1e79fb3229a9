//! Logging setup
//!
//! The library only emits `tracing` events: attribute tags, byte counts, and
//! status codes. Attribute contents and secrets are never logged.
//! Applications that have no subscriber of their own can call [`init_logging`].

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered by `RUST_LOG`.
///
/// Falls back to `default_directive` (e.g. `"keychain_item=debug"`) when
/// `RUST_LOG` is unset or invalid. Returns `false` if a global subscriber
/// was already installed.
pub fn init_logging(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
