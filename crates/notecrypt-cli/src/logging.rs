//! Diagnostic logging to stderr.
//!
//! The filter comes from `NOTECRYPT_LOG` when set (e.g. `notecrypt_core=debug`),
//! otherwise from the `-v` count. Log fields carry ids and outcomes only;
//! note bodies, passwords, and ciphertext are never logged.

use tracing_subscriber::EnvFilter;

use crate::constants::env_vars;

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init(verbosity: u8) {
    let env_filter = EnvFilter::try_from_env(env_vars::LOG)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
