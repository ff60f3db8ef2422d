//! Common utilities shared between the harness and the mock backend

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};

/// Milliseconds since the Unix epoch, used to make synthesized values unique
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
