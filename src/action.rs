//! Recorded actions and the per-tracker action log
//!
//! Actions serialize to the plain wire shapes `{"key": .., "set": ..}` and
//! `{"key": .., "arguments": [..]}` with no tag field.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// One recorded write or call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Action {
    /// Method call. Listed first so a record carrying `arguments` is an
    /// invocation even when it also carries `set`.
    Invoke { key: String, arguments: Vec<Value> },
    /// Property assignment
    Assign { key: String, set: Value },
}

impl Action {
    pub fn assign(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Action::Assign {
            key: key.into(),
            set: value.into(),
        }
    }

    pub fn invoke(key: impl Into<String>, arguments: impl Into<Vec<Value>>) -> Self {
        Action::Invoke {
            key: key.into(),
            arguments: arguments.into(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Action::Assign { key, .. } | Action::Invoke { key, .. } => key,
        }
    }

    pub fn is_invocation(&self) -> bool {
        matches!(self, Action::Invoke { .. })
    }

    /// Parse one action record, checking structure only.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(record) = value.as_object() else {
            return Err(Error::invalid_argument(format!(
                "action must be an object, got {}",
                value
            )));
        };
        if !record.get("key").is_some_and(Value::is_string) {
            return Err(Error::invalid_argument("action needs a string 'key'"));
        }
        Action::deserialize(value).map_err(|_| {
            Error::invalid_argument(format!(
                "action '{}' needs either 'set' or an 'arguments' array",
                record["key"].as_str().unwrap_or_default()
            ))
        })
    }

    /// Parse an ordered list of action records.
    pub fn list_from_value(value: &Value) -> Result<Vec<Self>> {
        let Some(items) = value.as_array() else {
            return Err(Error::invalid_argument("play: must pass an array of actions"));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Action::from_value(item).map_err(|e| Error::invalid_argument(format!("action {}: {}", i, e)))
            })
            .collect()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Assign { key, set } => write!(f, "{} = {}", key, set),
            Action::Invoke { key, arguments } => {
                let args: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", key, args.join(", "))
            }
        }
    }
}

/// Live, append-only log owned by one tracker.
///
/// Clones share the same underlying sequence. Only the owning tracker can append,
/// and only [`track`](crate::track) creates logs:
///
/// ```compile_fail
/// let log = objtrack::ActionLog::default();
/// ```
#[derive(Clone)]
pub struct ActionLog {
    actions: Arc<Mutex<Vec<Action>>>,
}

impl ActionLog {
    pub(crate) fn new() -> Self {
        Self {
            actions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn push(&self, action: Action) {
        self.actions.lock().push(action);
    }

    /// Copy of the actions recorded so far
    pub fn snapshot(&self) -> Vec<Action> {
        self.actions.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.actions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.lock().is_empty()
    }

    pub fn last(&self) -> Option<Action> {
        self.actions.lock().last().cloned()
    }

    /// True when both handles refer to the same log
    pub fn same_log(&self, other: &ActionLog) -> bool {
        Arc::ptr_eq(&self.actions, &other.actions)
    }
}

impl fmt::Debug for ActionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.actions.lock().iter()).finish()
    }
}

impl PartialEq<Vec<Action>> for ActionLog {
    fn eq(&self, other: &Vec<Action>) -> bool {
        *self.actions.lock() == *other
    }
}

impl Serialize for ActionLog {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.actions.lock().serialize(serializer)
    }
}
