//! IPC protocol message types
//!
//! Defines the request/response format spoken with the backend.
//! Uses a simple length-prefixed JSON protocol; commands are addressed by
//! name with structured arguments:
//!
//! ```json
//! {"id": 3, "command": {"command": "switch_account", "args": {"accountId": "a1"}}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::error::IpcError;

/// IPC request from the harness to the backend
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    /// Request ID for matching responses
    pub id: u64,
    /// The command to execute
    pub command: Command,
}

/// IPC response from the backend
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    /// Request ID this response corresponds to
    pub id: u64,
    /// Whether the command succeeded
    pub success: bool,
    /// Result data on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error information on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<IpcError>,
}

impl Response {
    /// Create a success response
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id,
            success: true,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: u64, error: IpcError) -> Self {
        Self {
            id,
            success: false,
            result: None,
            error: Some(error),
        }
    }
}

/// Commands exposed by the account/config backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum Command {
    // === Configuration ===
    /// Load the persisted configuration
    LoadConfig,

    /// Persist a configuration object
    SaveConfig { config: Value },

    // === Accounts ===
    /// List all stored accounts
    ListAccounts,

    /// Get the active account, or null
    GetCurrentAccount,

    /// Store a new account
    AddAccount { email: String, token: NewToken },

    /// Make an account the active one
    SwitchAccount {
        #[serde(rename = "accountId")]
        account_id: String,
    },

    /// Remove an account
    DeleteAccount {
        #[serde(rename = "accountId")]
        account_id: String,
    },
}

impl Command {
    /// Wire name of the command
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadConfig => "load_config",
            Self::SaveConfig { .. } => "save_config",
            Self::ListAccounts => "list_accounts",
            Self::GetCurrentAccount => "get_current_account",
            Self::AddAccount { .. } => "add_account",
            Self::SwitchAccount { .. } => "switch_account",
            Self::DeleteAccount { .. } => "delete_account",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Token fields sent along with `add_account`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewToken {
    pub access_token: String,
    pub refresh_token: String,
    /// RFC 3339 timestamp
    pub expires_at: String,
}

/// Identifier of an opaque account object, if it carries a non-empty one
pub fn account_id(account: &Value) -> Option<&str> {
    account
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unit_command_has_no_args() {
        let value = serde_json::to_value(Command::ListAccounts).unwrap();
        assert_eq!(value, json!({"command": "list_accounts"}));
    }

    #[test]
    fn test_account_id_is_camel_case_on_the_wire() {
        let cmd = Command::SwitchAccount {
            account_id: "acc-1".to_string(),
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            value,
            json!({"command": "switch_account", "args": {"accountId": "acc-1"}})
        );

        let back: Command = serde_json::from_value(value).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn test_add_account_args() {
        let cmd = Command::AddAccount {
            email: "a@example.com".to_string(),
            token: NewToken {
                access_token: "at".to_string(),
                refresh_token: "rt".to_string(),
                expires_at: "2026-01-01T00:00:00Z".to_string(),
            },
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["args"]["email"], "a@example.com");
        assert_eq!(value["args"]["token"]["expires_at"], "2026-01-01T00:00:00Z");
    }

    #[test]
    fn test_account_id_extraction() {
        assert_eq!(account_id(&json!({"id": "x"})), Some("x"));
        assert_eq!(account_id(&json!({"id": ""})), None);
        assert_eq!(account_id(&json!({"email": "a@b"})), None);
        assert_eq!(account_id(&Value::Null), None);
    }
}
