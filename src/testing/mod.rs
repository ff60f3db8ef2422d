//! Account/config integration suite
//!
//! Drives the backend's commands in a fixed order, records one outcome per
//! check and summarizes the run. Assertions are made against the structured
//! JSON the backend returns rather than against printed output.

mod fixtures;
mod report;
mod result;
mod runner;

pub use fixtures::{placeholder_token, unique_email, AppConfig};
pub use report::{format_summary, format_test, print_summary, Progress, Summary};
pub use result::{ResultSet, TestResult, TestStatus};
pub use runner::{run_all_tests, run_all_tests_with};
