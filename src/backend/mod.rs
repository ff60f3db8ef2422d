//! Command interface seam
//!
//! The runner only ever talks to the application through
//! [`CommandInterface`]: a command goes in by name with its arguments, and
//! either a JSON result or an error comes back. The production
//! implementation is the IPC [`BackendClient`]; [`MemoryBackend`] stands in
//! for the application in tests and behind the `mock_backend` binary.

mod memory;

pub use memory::{Faults, MemoryBackend};

use async_trait::async_trait;
use serde_json::Value;

use crate::common::Result;
use crate::ipc::protocol::Command;
use crate::ipc::BackendClient;

/// Something that can execute backend commands
#[async_trait]
pub trait CommandInterface: Send {
    /// Execute one command and return its JSON result
    async fn invoke(&mut self, command: Command) -> Result<Value>;
}

#[async_trait]
impl CommandInterface for BackendClient {
    async fn invoke(&mut self, command: Command) -> Result<Value> {
        self.send_command(command).await
    }
}
