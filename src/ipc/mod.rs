//! IPC communication between the harness and the application backend
//!
//! Uses Unix domain sockets on Unix/macOS and named pipes on Windows
//! via the interprocess crate.

pub mod client;
pub mod protocol;
pub mod server;
pub mod transport;

pub use client::BackendClient;
