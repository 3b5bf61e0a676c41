//! Logger setup for the binary
//!
//! Log output goes to stderr so stdout carries only the summary line.

use log::debug;
use std::panic;

/// Initialize env_logger; `RUST_LOG` wins over the verbosity flag
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .try_init();
}

/// Route recovered test panics to the logger
///
/// Panics the executor catches become recorded failures, so they are only
/// logged. Any other panic goes to the previously installed hook.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if tally_core::is_guarded() {
            debug!("caught panic: {}", info);
        } else {
            previous(info);
        }
    }));
}
