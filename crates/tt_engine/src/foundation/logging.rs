//! Logging utilities and structured logging support
//!
//! The engine logs through the `log` facade; binaries pick the logger.

pub use log::{debug, info, warn, error, trace};

/// Initialize logging for tests, ignoring repeated initialization
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
