//! The task model.
//!
//! A [`Task`] is one unit of work in a run: an id, an immutable
//! description, an open [`TaskKind`] tag, a [`Parameters`] bag and a
//! forward-only [`TaskStatus`]. Planners create tasks; the executor is the
//! only component that settles them.

use crate::error::TaskError;
use crate::identifiers::TaskId;
use crate::tool::FailureReason;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Parameter key naming the target tool of a [`TaskKind::ToolCall`] task.
pub const TOOL_PARAM: &str = "tool";

/// Kind tag of a task.
///
/// The tag is open: strings other than the known kinds are preserved as
/// [`TaskKind::Other`] so that plans can carry kinds this executor does not
/// (yet) understand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskKind {
    /// Invoke a registered tool named by the `tool` parameter
    ToolCall,
    /// Summarize the results accumulated so far in the run
    Summarize,
    /// Any other kind
    Other(String),
}

impl TaskKind {
    pub fn as_str(&self) -> &str {
        match self {
            TaskKind::ToolCall => "tool_call",
            TaskKind::Summarize => "summarize",
            TaskKind::Other(kind) => kind,
        }
    }
}

impl From<String> for TaskKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "tool_call" => TaskKind::ToolCall,
            "summarize" => TaskKind::Summarize,
            _ => TaskKind::Other(kind),
        }
    }
}

impl From<&str> for TaskKind {
    fn from(kind: &str) -> Self {
        TaskKind::from(kind.to_string())
    }
}

impl From<TaskKind> for String {
    fn from(kind: TaskKind) -> Self {
        match kind {
            TaskKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a task. Transitions go `Pending` to exactly one of
/// the terminal states and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyed bag of named values passed to tools.
///
/// Values are plain JSON (strings, numbers, nested objects). The `require_*`
/// accessors turn a missing or mistyped value into a typed
/// [`FailureReason`] so tools validate their input shape at dispatch time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// String value under `key`, if present and a string.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Numeric value under `key`, if present and a number.
    pub fn f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    /// String value under `key` or a typed failure.
    pub fn require_str(&self, key: &str) -> Result<&str, FailureReason> {
        match self.0.get(key) {
            None => Err(FailureReason::MissingParameter {
                name: key.to_string(),
            }),
            Some(value) => value.as_str().ok_or_else(|| FailureReason::InvalidInput {
                message: format!("parameter '{}' must be a string, got {}", key, value),
            }),
        }
    }

    /// Numeric value under `key` or a typed failure.
    pub fn require_f64(&self, key: &str) -> Result<f64, FailureReason> {
        match self.0.get(key) {
            None => Err(FailureReason::MissingParameter {
                name: key.to_string(),
            }),
            Some(value) => value.as_f64().ok_or_else(|| FailureReason::InvalidInput {
                message: format!("parameter '{}' must be a number, got {}", key, value),
            }),
        }
    }

    /// Copy of this bag with `key` stripped out.
    pub fn without(&self, key: &str) -> Parameters {
        let mut copy = self.0.clone();
        copy.remove(key);
        Parameters(copy)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    id: TaskId,
    description: String,
    kind: TaskKind,
    parameters: Parameters,
    status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
}

/// Wire shape of a task, checked before it becomes a [`Task`].
#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    description: String,
    kind: TaskKind,
    #[serde(default)]
    parameters: Parameters,
    status: TaskStatus,
    #[serde(default, deserialize_with = "present_value")]
    result: Option<Value>,
}

/// A present `result` field is `Some`, even when it holds JSON `null`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        // result is present exactly when the task completed
        if record.result.is_some() != (record.status == TaskStatus::Completed) {
            return Err(TaskError::InconsistentResult {
                task_id: record.id,
                status: record.status,
            });
        }
        Ok(Task {
            id: record.id,
            description: record.description,
            kind: record.kind,
            parameters: record.parameters,
            status: record.status,
            result: record.result,
        })
    }
}

impl Task {
    /// Create a pending task.
    pub fn new(
        id: TaskId,
        description: impl Into<String>,
        kind: TaskKind,
        parameters: Parameters,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            kind,
            parameters,
            status: TaskStatus::Pending,
            result: None,
        }
    }

    /// Pending tool call against `tool`; `parameters` are the tool's own
    /// arguments.
    pub fn tool_call(
        id: TaskId,
        description: impl Into<String>,
        tool: &str,
        parameters: Parameters,
    ) -> Self {
        Self::new(
            id,
            description,
            TaskKind::ToolCall,
            parameters.with(TOOL_PARAM, tool),
        )
    }

    /// Pending summarize task with empty parameters.
    pub fn summarize(id: TaskId, description: impl Into<String>) -> Self {
        Self::new(id, description, TaskKind::Summarize, Parameters::new())
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    /// Target tool name of a tool call, if the parameter is a string.
    pub fn tool_name(&self) -> Option<&str> {
        self.parameters.str(TOOL_PARAM)
    }

    /// Settle the task as completed with `result`.
    ///
    /// Called by the executor only. Fails if the task already left
    /// `Pending`, so a stored result is never overwritten.
    pub fn complete(&mut self, result: Value) -> Result<(), TaskError> {
        self.ensure_pending()?;
        self.status = TaskStatus::Completed;
        self.result = Some(result);
        Ok(())
    }

    /// Settle the task as failed. Called by the executor only.
    pub fn fail(&mut self) -> Result<(), TaskError> {
        self.ensure_pending()?;
        self.status = TaskStatus::Failed;
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), TaskError> {
        if self.status.is_terminal() {
            return Err(TaskError::AlreadySettled {
                task_id: self.id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }
}
