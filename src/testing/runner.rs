//! Suite runner
//!
//! Runs the account/config checks in a fixed order against any
//! [`CommandInterface`]. Every call is awaited before the next one starts.
//! A failing call becomes a FAIL entry and the run moves on; steps that need
//! the account created earlier are recorded as SKIP when there is none.

use chrono::Utc;
use serde_json::{json, Value};

use crate::backend::CommandInterface;
use crate::common::Result;
use crate::ipc::protocol::{account_id, Command};

use super::fixtures::{placeholder_token, unique_email, AppConfig};
use super::report::{self, Progress};
use super::result::{ResultSet, TestResult};

/// Run the whole suite, printing progress to stdout
pub async fn run_all_tests<C: CommandInterface>(interface: &mut C) -> ResultSet {
    run_all_tests_with(interface, Progress::Stdout).await
}

/// Run the whole suite with progress going to `progress`
pub async fn run_all_tests_with<C: CommandInterface>(
    interface: &mut C,
    progress: Progress,
) -> ResultSet {
    let mut suite = Suite {
        interface,
        results: ResultSet::new(),
        progress,
    };

    suite.load_config().await;
    suite.list_accounts().await;
    suite.get_current_account().await;
    let created = suite.add_account().await;
    suite.switch_account(created.as_deref()).await;
    suite.save_config().await;
    suite.delete_account(created.as_deref()).await;

    suite.results
}

struct Suite<'a, C> {
    interface: &'a mut C,
    results: ResultSet,
    progress: Progress,
}

impl<C: CommandInterface> Suite<'_, C> {
    async fn call(&mut self, command: Command) -> Result<Value> {
        let name = command.name();
        tracing::debug!(command = name, "Invoking");
        let result = self.interface.invoke(command).await;
        if let Err(e) = &result {
            tracing::debug!(command = name, error = %e, "Call failed");
        }
        result
    }

    fn record(&mut self, result: TestResult) {
        for line in report::format_test(&result) {
            self.progress.emit(&line);
        }
        self.results.record(result);
    }

    fn section(&self, number: usize, title: &str) {
        self.progress.emit(&report::format_section(number, title));
    }

    async fn load_config(&mut self) {
        self.section(1, "load configuration");
        match self.call(Command::LoadConfig).await {
            Ok(config) => self.record(TestResult::pass("load_config", config)),
            Err(e) => self.record(TestResult::failed_call("load_config", &e)),
        }
    }

    async fn list_accounts(&mut self) {
        self.section(2, "list accounts");
        match self.call(Command::ListAccounts).await {
            Ok(accounts) => match accounts.as_array() {
                Some(list) => self.record(TestResult::pass(
                    "list_accounts",
                    format!("found {} accounts", list.len()),
                )),
                None => self.record(TestResult::failed_check(
                    "list_accounts",
                    accounts.clone(),
                    invalid_response("expected a list of accounts"),
                )),
            },
            Err(e) => self.record(TestResult::failed_call("list_accounts", &e)),
        }
    }

    async fn get_current_account(&mut self) {
        self.section(3, "get current account");
        match self.call(Command::GetCurrentAccount).await {
            Ok(current) => self.record(TestResult::pass("get_current_account", current)),
            Err(e) => self.record(TestResult::failed_call("get_current_account", &e)),
        }
    }

    /// Returns the id of the created account
    async fn add_account(&mut self) -> Option<String> {
        self.section(4, "add test account");

        let now = Utc::now();
        let email = unique_email(now);
        let command = Command::AddAccount {
            email: email.clone(),
            token: placeholder_token(now),
        };

        let account = match self.call(command).await {
            Ok(account) => account,
            Err(e) => {
                self.record(TestResult::failed_call("add_account", &e));
                return None;
            }
        };

        match account_id(&account) {
            Some(id) => {
                let id = id.to_string();
                self.record(TestResult::pass(
                    "add_account",
                    json!({ "id": id, "email": account.get("email").unwrap_or(&Value::Null) }),
                ));
                Some(id)
            }
            None => {
                self.record(TestResult::failed_check(
                    "add_account",
                    json!({ "email": email }),
                    json!({
                        "code": "MISSING_ACCOUNT_ID",
                        "message": "add_account succeeded but returned no account id",
                    }),
                ));
                None
            }
        }
    }

    async fn switch_account(&mut self, id: Option<&str>) {
        self.section(5, "switch account");
        let Some(id) = id else {
            self.record(TestResult::skip("switch_account", "no account to switch to"));
            return;
        };

        let command = Command::SwitchAccount {
            account_id: id.to_string(),
        };
        if let Err(e) = self.call(command).await {
            self.record(TestResult::failed_call("switch_account", &e));
            return;
        }
        self.record(TestResult::pass("switch_account", format!("switched to {}", id)));

        match self.call(Command::GetCurrentAccount).await {
            Ok(current) if account_id(&current) == Some(id) => {
                self.record(TestResult::pass("switch_account_verify", "switch verified"));
            }
            Ok(current) => self.record(TestResult::failed_check(
                "switch_account_verify",
                "switch verification failed",
                mismatch(format!(
                    "current account is {}, expected {}",
                    account_id(&current).unwrap_or("none"),
                    id
                )),
            )),
            Err(e) => self.record(TestResult::failed_call("switch_account_verify", &e)),
        }
    }

    async fn save_config(&mut self) {
        self.section(6, "save configuration");
        let config = AppConfig::default().to_value();

        let command = Command::SaveConfig {
            config: config.clone(),
        };
        if let Err(e) = self.call(command).await {
            self.record(TestResult::failed_call("save_config", &e));
            return;
        }
        self.record(TestResult::pass("save_config", config.clone()));

        match self.call(Command::LoadConfig).await {
            Ok(loaded) if loaded == config => {
                self.record(TestResult::pass("save_config_verify", "config verified"));
            }
            Ok(loaded) => self.record(TestResult::failed_check(
                "save_config_verify",
                "config verification failed",
                mismatch(format!("loaded {} after saving {}", loaded, config)),
            )),
            Err(e) => self.record(TestResult::failed_call("save_config_verify", &e)),
        }
    }

    async fn delete_account(&mut self, id: Option<&str>) {
        self.section(7, "delete test account");
        let Some(id) = id else {
            self.record(TestResult::skip("delete_account", "no account to delete"));
            return;
        };

        let command = Command::DeleteAccount {
            account_id: id.to_string(),
        };
        if let Err(e) = self.call(command).await {
            self.record(TestResult::failed_call("delete_account", &e));
            return;
        }
        self.record(TestResult::pass("delete_account", format!("deleted account {}", id)));

        match self.call(Command::ListAccounts).await {
            Ok(accounts) => match accounts.as_array() {
                Some(list) if !list.iter().any(|a| account_id(a) == Some(id)) => {
                    self.record(TestResult::pass("delete_account_verify", "delete verified"));
                }
                Some(_) => self.record(TestResult::failed_check(
                    "delete_account_verify",
                    "delete verification failed",
                    mismatch(format!("account {} is still listed", id)),
                )),
                None => self.record(TestResult::failed_check(
                    "delete_account_verify",
                    accounts.clone(),
                    invalid_response("expected a list of accounts"),
                )),
            },
            Err(e) => self.record(TestResult::failed_call("delete_account_verify", &e)),
        }
    }
}

fn invalid_response(message: &str) -> Value {
    json!({ "code": "INVALID_RESPONSE", "message": message })
}

fn mismatch(message: String) -> Value {
    json!({ "code": "VERIFICATION_FAILED", "message": message })
}
