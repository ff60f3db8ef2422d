//! Account harness - integration checks for a desktop backend
//!
//! This library drives the account management and configuration commands a
//! desktop application exposes over local IPC, and reports which of them
//! behave as expected.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod common;
pub mod ipc;
pub mod testing;

// Re-export commonly used types for tests
pub use backend::{CommandInterface, Faults, MemoryBackend};
pub use common::{Error, Result};
pub use ipc::protocol::Command;
pub use testing::{run_all_tests, ResultSet, TestResult, TestStatus};
