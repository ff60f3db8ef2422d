//! Test outcome bookkeeping

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::Error;

/// Outcome of a single test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pass,
    Fail,
    /// A precondition was unmet, so the test was not attempted
    Skip,
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Skip => write!(f, "SKIP"),
        }
    }
}

/// Record of one test outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    /// Success payload, or a short note for skips and failed checks
    pub data: Option<Value>,
    /// Failure payload
    pub error: Option<Value>,
}

impl TestResult {
    pub fn pass(name: &str, data: impl Into<Value>) -> Self {
        Self {
            name: name.to_string(),
            status: TestStatus::Pass,
            data: Some(data.into()),
            error: None,
        }
    }

    /// A test whose call itself failed
    pub fn failed_call(name: &str, error: &Error) -> Self {
        Self {
            name: name.to_string(),
            status: TestStatus::Fail,
            data: None,
            error: Some(error.to_payload()),
        }
    }

    /// A test whose call succeeded but whose check did not hold
    pub fn failed_check(name: &str, data: impl Into<Value>, error: Value) -> Self {
        Self {
            name: name.to_string(),
            status: TestStatus::Fail,
            data: Some(data.into()),
            error: Some(error),
        }
    }

    pub fn skip(name: &str, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            status: TestStatus::Skip,
            data: Some(Value::from(reason)),
            error: None,
        }
    }
}

/// All outcomes of one run, in execution order
///
/// Skipped tests are kept for auditability but count as neither passed nor
/// failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    passed: usize,
    failed: usize,
    tests: Vec<TestResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome and update the counters
    pub fn record(&mut self, result: TestResult) {
        match result.status {
            TestStatus::Pass => self.passed += 1,
            TestStatus::Fail => self.failed += 1,
            TestStatus::Skip => {}
        }
        self.tests.push(result);
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn skipped(&self) -> usize {
        self.tests.len() - self.passed - self.failed
    }

    pub fn tests(&self) -> &[TestResult] {
        &self.tests
    }

    pub fn total(&self) -> usize {
        self.tests.len()
    }

    /// Look up the first outcome recorded under `name`
    pub fn get(&self, name: &str) -> Option<&TestResult> {
        self.tests.iter().find(|t| t.name == name)
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Percentage of recorded tests that passed, skips included in the total
    pub fn success_rate(&self) -> f64 {
        if self.tests.is_empty() {
            return 0.0;
        }
        self.passed as f64 / self.tests.len() as f64 * 100.0
    }
}
