//! In-memory account/config store
//!
//! Implements the command table without any persistence. Faults can be
//! injected per command so the runner's failure paths are reachable.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::common::error::IpcError;
use crate::common::{now_millis, Error, Result};
use crate::ipc::protocol::{account_id, Command, NewToken};

use super::CommandInterface;

/// Misbehaviours the in-memory backend can be asked to exhibit
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// Command names that fail outright
    pub fail: HashSet<String>,
    /// `add_account` answers without an `id` field
    pub omit_account_id: bool,
    /// `switch_account` succeeds without changing the active account
    pub ignore_switch: bool,
    /// `delete_account` succeeds without removing anything
    pub ignore_delete: bool,
    /// `save_config` stores a different value than it was given
    pub mangle_saved_config: bool,
    /// `list_accounts` wraps the accounts in an object instead of an array
    pub malformed_list: bool,
    /// Commands that stall before answering
    pub delays: HashMap<String, Duration>,
}

impl Faults {
    /// Fail the named command
    pub fn failing(mut self, command: &str) -> Self {
        self.fail.insert(command.to_string());
        self
    }

    /// Hold the named command for `delay` before executing it
    pub fn delaying(mut self, command: &str, delay: Duration) -> Self {
        self.delays.insert(command.to_string(), delay);
        self
    }
}

/// Account/config backend living entirely in memory
#[derive(Debug)]
pub struct MemoryBackend {
    config: Value,
    accounts: Vec<Value>,
    current: Option<String>,
    next_id: u64,
    faults: Faults,
    /// Names of every command received, in order
    calls: Vec<&'static str>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(Faults::default())
    }
}

impl MemoryBackend {
    pub fn new(faults: Faults) -> Self {
        Self {
            config: json!({
                "language": "en-US",
                "theme": "light",
                "auto_refresh": false,
                "refresh_interval": 15,
                "auto_sync": true,
                "sync_interval": 5
            }),
            accounts: Vec::new(),
            current: None,
            next_id: 1,
            faults,
            calls: Vec::new(),
        }
    }

    /// Stored accounts
    pub fn accounts(&self) -> &[Value] {
        &self.accounts
    }

    /// Names of the commands received so far
    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }

    /// Persisted configuration
    pub fn config(&self) -> &Value {
        &self.config
    }

    /// Execute a command against the store
    pub fn execute(&mut self, command: Command) -> Result<Value> {
        let name = command.name();
        self.calls.push(name);

        if self.faults.fail.contains(name) {
            return Err(Error::command_failed(
                name,
                IpcError::new("INJECTED_FAILURE", format!("{} failed on request", name)),
            ));
        }

        match command {
            Command::LoadConfig => Ok(self.config.clone()),

            Command::SaveConfig { config } => {
                if !config.is_object() {
                    return Err(Error::invalid_arguments(name, "config must be an object"));
                }
                self.config = config;
                if self.faults.mangle_saved_config {
                    self.config["theme"] = json!("mangled");
                }
                Ok(Value::Null)
            }

            Command::ListAccounts if self.faults.malformed_list => {
                Ok(json!({ "accounts": self.accounts }))
            }
            Command::ListAccounts => Ok(Value::Array(self.accounts.clone())),

            Command::GetCurrentAccount => Ok(self
                .current
                .as_deref()
                .and_then(|id| self.find(id))
                .cloned()
                .unwrap_or(Value::Null)),

            Command::AddAccount { email, token } => self.add_account(email, token),

            Command::SwitchAccount { account_id } => {
                if self.find(&account_id).is_none() {
                    return Err(Error::AccountNotFound(account_id));
                }
                if !self.faults.ignore_switch {
                    self.current = Some(account_id);
                }
                Ok(Value::Null)
            }

            Command::DeleteAccount { account_id: id } => {
                let index = self
                    .accounts
                    .iter()
                    .position(|a| account_id(a) == Some(id.as_str()))
                    .ok_or_else(|| Error::AccountNotFound(id.clone()))?;
                if !self.faults.ignore_delete {
                    self.accounts.remove(index);
                    if self.current.as_deref() == Some(id.as_str()) {
                        self.current = None;
                    }
                }
                Ok(Value::Null)
            }
        }
    }

    fn add_account(&mut self, email: String, token: NewToken) -> Result<Value> {
        if email.trim().is_empty() {
            return Err(Error::invalid_arguments("add_account", "email is required"));
        }
        if self.accounts.iter().any(|a| a["email"] == email.as_str()) {
            return Err(Error::command_failed(
                "add_account",
                IpcError::new("ACCOUNT_EXISTS", format!("{} is already registered", email)),
            ));
        }

        let id = format!("acc-{}", self.next_id);
        self.next_id += 1;

        let account = json!({
            "id": id,
            "email": email,
            "token": token,
            "created_at": now_millis(),
        });
        self.accounts.push(account.clone());

        tracing::debug!(id = %id, "Account added");

        if self.faults.omit_account_id {
            let mut partial = account;
            if let Some(fields) = partial.as_object_mut() {
                fields.remove("id");
            }
            return Ok(partial);
        }
        Ok(account)
    }

    fn find(&self, id: &str) -> Option<&Value> {
        self.accounts.iter().find(|a| account_id(a) == Some(id))
    }
}

#[async_trait]
impl CommandInterface for MemoryBackend {
    async fn invoke(&mut self, command: Command) -> Result<Value> {
        if let Some(delay) = self.faults.delays.get(command.name()) {
            tracing::debug!(command = command.name(), ?delay, "Delaying command");
            tokio::time::sleep(*delay).await;
        }
        self.execute(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> NewToken {
        NewToken {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_at: "2026-10-18T13:00:00.000Z".to_string(),
        }
    }

    fn add(backend: &mut MemoryBackend, email: &str) -> Value {
        backend
            .execute(Command::AddAccount {
                email: email.to_string(),
                token: token(),
            })
            .unwrap()
    }

    #[test]
    fn test_add_switch_delete() {
        let mut backend = MemoryBackend::default();
        let account = add(&mut backend, "a@example.com");
        let id = account_id(&account).unwrap().to_string();

        backend
            .execute(Command::SwitchAccount {
                account_id: id.clone(),
            })
            .unwrap();
        let current = backend.execute(Command::GetCurrentAccount).unwrap();
        assert_eq!(account_id(&current), Some(id.as_str()));

        backend
            .execute(Command::DeleteAccount {
                account_id: id.clone(),
            })
            .unwrap();
        assert!(backend.accounts().is_empty());
        assert_eq!(backend.execute(Command::GetCurrentAccount).unwrap(), Value::Null);
    }

    #[test]
    fn test_unknown_account_is_not_found() {
        let mut backend = MemoryBackend::default();
        let err = backend
            .execute(Command::SwitchAccount {
                account_id: "nope".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, Error::AccountNotFound(id) if id == "nope"));
    }

    #[test]
    fn test_duplicate_email_is_rejected() {
        let mut backend = MemoryBackend::default();
        add(&mut backend, "dup@example.com");
        let err = backend
            .execute(Command::AddAccount {
                email: "dup@example.com".to_string(),
                token: token(),
            })
            .unwrap_err();
        assert_eq!(err.to_payload()["code"], "ACCOUNT_EXISTS");
    }

    #[test]
    fn test_save_then_load_config() {
        let mut backend = MemoryBackend::default();
        let config = json!({"language": "zh-CN", "theme": "dark"});
        backend
            .execute(Command::SaveConfig {
                config: config.clone(),
            })
            .unwrap();
        assert_eq!(backend.execute(Command::LoadConfig).unwrap(), config);
    }

    #[test]
    fn test_injected_failure_is_recorded_as_call() {
        let mut backend = MemoryBackend::new(Faults::default().failing("list_accounts"));
        let err = backend.execute(Command::ListAccounts).unwrap_err();
        assert_eq!(err.to_payload()["code"], "INJECTED_FAILURE");
        assert_eq!(backend.calls(), ["list_accounts"]);
    }

    #[test]
    fn test_omitted_id_still_stores_account() {
        let mut backend = MemoryBackend::new(Faults {
            omit_account_id: true,
            ..Faults::default()
        });
        let account = add(&mut backend, "anon@example.com");
        assert!(account_id(&account).is_none());
        assert_eq!(backend.accounts().len(), 1);
    }

    #[test]
    fn test_malformed_list_is_not_an_array() {
        let mut backend = MemoryBackend::new(Faults {
            malformed_list: true,
            ..Faults::default()
        });
        add(&mut backend, "wrapped@example.com");
        let listed = backend.execute(Command::ListAccounts).unwrap();
        assert!(!listed.is_array());
        assert_eq!(listed["accounts"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_delayed_command_still_executes() {
        let mut backend = MemoryBackend::new(
            Faults::default().delaying("load_config", Duration::from_millis(50)),
        );
        let started = tokio::time::Instant::now();
        let config = backend.invoke(Command::LoadConfig).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(config["theme"], "light");
    }
}
