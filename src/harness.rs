//! Command-level checks against a live editor, used by the `smoke` command.

use crate::command::{Command, JsonMap};
use crate::connection::{CommandOutcome, UnrealConnection};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use uuid::Uuid;

const SMOKE_PATH: &str = "/Game/Test";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ExpectationError {
    #[error("{context}Expected success but got failure:{}", describe_failure(.code, .error))]
    UnexpectedFailure {
        context: String,
        code: Option<i64>,
        error: Option<String>,
    },
    #[error("{context}Expected failure but got success")]
    UnexpectedSuccess { context: String },
    #[error("{context}Expected error code {expected}, got {got:?}")]
    WrongErrorCode {
        context: String,
        expected: i64,
        got: Option<i64>,
    },
    #[error("Response is missing")]
    NoResponse,
    #[error("Key '{0}' not found in response")]
    MissingKey(String),
    #[error("Expected {key}={expected}, got {got}")]
    WrongValue {
        key: String,
        expected: JsonValue,
        got: JsonValue,
    },
}

fn describe_failure(code: &Option<i64>, error: &Option<String>) -> String {
    match (code, error) {
        (Some(code), Some(error)) => format!(" [{code}] {error}"),
        (None, Some(error)) => format!(" {error}"),
        _ => " Unknown error".to_string(),
    }
}

fn context(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!("{message}: ")
    }
}

pub fn expect_success(outcome: &CommandOutcome, message: &str) -> Result<(), ExpectationError> {
    if outcome.success {
        return Ok(());
    }
    Err(ExpectationError::UnexpectedFailure {
        context: context(message),
        code: outcome.error_code,
        error: outcome.error.clone(),
    })
}

pub fn expect_failure(outcome: &CommandOutcome, message: &str) -> Result<(), ExpectationError> {
    if outcome.success {
        return Err(ExpectationError::UnexpectedSuccess {
            context: context(message),
        });
    }
    Ok(())
}

pub fn expect_error_code(
    outcome: &CommandOutcome,
    expected: i64,
    message: &str,
) -> Result<(), ExpectationError> {
    expect_failure(outcome, message)?;
    if outcome.error_code == Some(expected) {
        Ok(())
    } else {
        Err(ExpectationError::WrongErrorCode {
            context: context(message),
            expected,
            got: outcome.error_code,
        })
    }
}

/// Checks `response.result[key]`, and its value when `value` is given.
pub fn expect_response_has(
    outcome: &CommandOutcome,
    key: &str,
    value: Option<&JsonValue>,
) -> Result<(), ExpectationError> {
    let response = outcome.response.as_ref().ok_or(ExpectationError::NoResponse)?;
    let found = response
        .get("result")
        .and_then(|result| result.get(key))
        .ok_or_else(|| ExpectationError::MissingKey(key.to_string()))?;
    match value {
        Some(expected) if expected != found => Err(ExpectationError::WrongValue {
            key: key.to_string(),
            expected: expected.clone(),
            got: found.clone(),
        }),
        _ => Ok(()),
    }
}

/// `prefix_` followed by eight hex digits.
pub fn unique_name(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &id[..8])
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FailureRecord {
    pub command: String,
    pub error: Option<String>,
    pub error_code: Option<i64>,
    pub details: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub avg_duration_ms: f64,
    pub failures: Vec<FailureRecord>,
}

/// Records every command it runs and undoes registered side effects on
/// [`CommandSuite::cleanup`].
pub struct CommandSuite {
    connection: Arc<UnrealConnection>,
    results: Vec<CommandOutcome>,
    cleanups: Vec<Command>,
}

impl CommandSuite {
    pub fn new(connection: Arc<UnrealConnection>) -> Self {
        Self {
            connection,
            results: Vec::new(),
            cleanups: Vec::new(),
        }
    }

    pub async fn run_command(
        &mut self,
        command: &str,
        params: JsonMap,
        expect_success: bool,
    ) -> CommandOutcome {
        let outcome = self.connection.send_command(command, params).await;
        if expect_success && !outcome.success {
            tracing::warn!(
                command,
                error_code = ?outcome.error_code,
                error = ?outcome.error,
                details = ?outcome.error_details(),
                "Expected success but got failure"
            );
        } else if !expect_success && outcome.success {
            tracing::warn!(command, "Expected failure but got success");
        }
        self.results.push(outcome.clone());
        outcome
    }

    pub fn add_cleanup(&mut self, command: &str, params: JsonMap) {
        self.cleanups.push(Command::new(command, params));
    }

    /// Runs cleanups newest first. Failures are logged and skipped.
    pub async fn cleanup(&mut self) {
        for action in self.cleanups.drain(..).rev() {
            let outcome = self
                .connection
                .send_command(action.name.clone(), action.params)
                .await;
            if !outcome.success {
                tracing::warn!(command = %action.name, error = ?outcome.error, "Cleanup failed");
            }
        }
    }

    pub fn results(&self) -> &[CommandOutcome] {
        &self.results
    }

    pub fn summary(&self) -> Summary {
        let total = self.results.len();
        let passed = self.results.iter().filter(|r| r.success).count();
        let (pass_rate, avg_duration_ms) = if total == 0 {
            (0.0, 0.0)
        } else {
            let duration: f64 = self.results.iter().map(|r| r.duration_ms).sum();
            (passed as f64 / total as f64 * 100.0, duration / total as f64)
        };
        Summary {
            total,
            passed,
            failed: total - passed,
            pass_rate,
            avg_duration_ms,
            failures: self
                .results
                .iter()
                .filter(|r| !r.success)
                .map(|r| FailureRecord {
                    command: r.command.clone(),
                    error: r.error.clone(),
                    error_code: r.error_code,
                    details: r.error_details().cloned(),
                })
                .collect(),
        }
    }
}

fn params(value: JsonValue) -> JsonMap {
    match value {
        JsonValue::Object(map) => map,
        _ => JsonMap::new(),
    }
}

fn asset_cleanup(name: &str) -> JsonMap {
    params(json!({"asset_path": format!("{SMOKE_PATH}/{name}")}))
}

/// Creates a widget with text and a button plus a Blueprint with a print node,
/// then deletes what it created.
pub async fn run_smoke(connection: Arc<UnrealConnection>) -> Summary {
    let mut suite = CommandSuite::new(connection);
    let widget_name = unique_name("WBP_Smoke");
    let blueprint_name = unique_name("BP_Smoke");

    let steps: [(&str, &str, JsonValue, Option<&str>); 5] = [
        (
            "Create widget",
            "create_umg_widget_blueprint",
            json!({"widget_name": widget_name, "path": SMOKE_PATH}),
            Some(widget_name.as_str()),
        ),
        (
            "Add text",
            "add_text_to_widget",
            json!({"widget_name": widget_name, "text_name": "SmokeText", "text": "Smoke Test", "path": SMOKE_PATH}),
            None,
        ),
        (
            "Add button",
            "add_button_to_widget",
            json!({"widget_name": widget_name, "button_name": "SmokeButton", "text": "Click", "path": SMOKE_PATH}),
            None,
        ),
        (
            "Create Blueprint",
            "create_blueprint",
            json!({"name": blueprint_name, "parent_class": "Actor", "path": SMOKE_PATH}),
            Some(blueprint_name.as_str()),
        ),
        (
            "Add print string node",
            "add_print_string_node",
            json!({"blueprint_name": blueprint_name, "message": "Smoke Test", "path": SMOKE_PATH}),
            None,
        ),
    ];

    let count = steps.len();
    for (index, (label, command, step_params, created)) in steps.into_iter().enumerate() {
        let outcome = suite.run_command(command, params(step_params), true).await;
        match (outcome.success, created) {
            (true, Some(asset)) => {
                suite.add_cleanup("delete_asset", asset_cleanup(asset));
                println!("[{}/{count}] {label}: OK ({:.0}ms)", index + 1, outcome.duration_ms);
            }
            (true, None) => {
                println!("[{}/{count}] {label}: OK ({:.0}ms)", index + 1, outcome.duration_ms)
            }
            (false, _) => println!(
                "[{}/{count}] {label}: FAILED {}",
                index + 1,
                outcome.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    let summary = suite.summary();
    suite.cleanup().await;
    summary
}
