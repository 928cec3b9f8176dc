//! Recording proxy over a shared object
//!
//! A [`Tracker`] mirrors the members its object had when tracking started.
//! Writes and direct calls go through to the object and are appended to the
//! tracker's [`ActionLog`]; reads are always live and never recorded.

use crate::action::{Action, ActionLog};
use crate::error::{Error, MemberKind, Result};
use crate::inspect::{inspect, Inspection};
use crate::object::{Member, Shared, Trackable};
use serde_json::Value;
use std::fmt;
use tracing::trace;

/// When an action enters the log relative to the forwarded operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordOrder {
    /// Log first, then forward. A failed operation stays in the log.
    #[default]
    BeforeExecute,
    /// Forward first and log only if it succeeded.
    AfterSuccess,
}

/// Tracker configuration
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    pub order: RecordOrder,
}

impl TrackerConfig {
    pub fn order(mut self, order: RecordOrder) -> Self {
        self.order = order;
        self
    }
}

/// Start tracking `object` with the default configuration.
pub fn track<T: Trackable>(object: &Shared<T>) -> Result<Tracker<T>> {
    Tracker::with_config(object, TrackerConfig::default())
}

/// Live action log of a tracker.
///
/// Fails with an invalid-argument error for anything without a tracking slot.
pub fn get_actions<T: Trackable>(tracker: &T) -> Result<ActionLog> {
    if !tracker.is_object() {
        return Err(Error::invalid_argument("get_actions: must pass a valid tracker"));
    }
    tracker
        .action_log()
        .cloned()
        .ok_or_else(|| Error::invalid_argument("get_actions: must pass a valid tracker"))
}

pub struct Tracker<T> {
    object: Shared<T>,
    log: ActionLog,
    members: Inspection,
    config: TrackerConfig,
}

impl<T: Trackable> Tracker<T> {
    pub fn new(object: &Shared<T>) -> Result<Self> {
        Self::with_config(object, TrackerConfig::default())
    }

    pub fn with_config(object: &Shared<T>, config: TrackerConfig) -> Result<Self> {
        let members = object.read(|o| {
            if o.is_object() {
                Ok(inspect(o))
            } else {
                Err(Error::invalid_argument("track: can only track objects"))
            }
        })??;

        Ok(Self {
            object: object.clone(),
            log: ActionLog::new(),
            members,
            config,
        })
    }

    /// The tracked object
    pub fn object(&self) -> &Shared<T> {
        &self.object
    }

    pub fn actions(&self) -> &ActionLog {
        &self.log
    }

    /// Members captured when tracking started
    pub fn members(&self) -> &Inspection {
        &self.members
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Current value of a data member on the tracked object
    pub fn get(&self, key: &str) -> Result<Value> {
        self.require(key, MemberKind::Data)?;
        self.object.read(|o| match o.member(key) {
            Some(Member::Data(value)) => Ok(value),
            Some(Member::Method(_)) => Err(Error::member_mismatch(key, MemberKind::Data)),
            None => Ok(Value::Null),
        })?
    }

    /// Assign a data member on the tracked object and record it
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.require(key, MemberKind::Data)?;
        let value = value.into();
        let action = Action::Assign {
            key: key.to_string(),
            set: value.clone(),
        };
        self.record(action, |o| Ok(o.assign(key, value)?))
    }

    /// Call a method of the tracked object and record it
    pub fn call(&self, key: &str, args: &[Value]) -> Result<Value> {
        self.require(key, MemberKind::Callable)?;
        let action = Action::Invoke {
            key: key.to_string(),
            arguments: args.to_vec(),
        };
        self.record(action, |o| o.invoke(key, args))
    }

    /// Detached forwarding function for a callable member. Calls made
    /// through it reach the object but are never recorded.
    pub fn forwarder(&self, key: &str) -> Result<Forwarder<T>> {
        self.require(key, MemberKind::Callable)?;
        Ok(Forwarder {
            key: key.to_string(),
            object: self.object.clone(),
        })
    }

    fn require(&self, key: &str, kind: MemberKind) -> Result<()> {
        if self.members.kind_of(key) == Some(kind) {
            Ok(())
        } else {
            Err(Error::member_mismatch(key, kind))
        }
    }

    fn record<R>(&self, action: Action, op: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        self.object.write(|object| match self.config.order {
            RecordOrder::BeforeExecute => {
                self.append(action);
                op(object)
            }
            RecordOrder::AfterSuccess => {
                let out = op(object)?;
                self.append(action);
                Ok(out)
            }
        })?
    }

    fn append(&self, action: Action) {
        trace!(key = action.key(), invocation = action.is_invocation(), "recorded action");
        self.log.push(action);
    }
}

/// A tracker is itself trackable and replayable: it exposes the same
/// members, and applying one of its methods to a tracker records on it.
impl<T: Trackable + 'static> Trackable for Tracker<T> {
    fn keys(&self) -> Vec<String> {
        self.members
            .data
            .iter()
            .chain(&self.members.callable)
            .cloned()
            .collect()
    }

    fn member(&self, key: &str) -> Option<Member<Self>> {
        match self.members.kind_of(key)? {
            // `get` already reads a vanished member as null. An object
            // borrowed up the stack, or a member that became a method, has no
            // readable value and shows up as absent; `get` reports why.
            MemberKind::Data => match self.get(key) {
                Ok(value) => Some(Member::Data(value)),
                Err(_) => None,
            },
            MemberKind::Callable => {
                let name = key.to_string();
                Some(Member::method(move |tracker: &mut Tracker<T>, args| {
                    Ok(tracker.call(&name, args)?)
                }))
            }
        }
    }

    fn assign(&mut self, key: &str, value: Value) -> anyhow::Result<()> {
        Ok(self.set(key, value)?)
    }

    fn action_log(&self) -> Option<&ActionLog> {
        Some(&self.log)
    }
}

impl<T> fmt::Debug for Tracker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("members", &self.members)
            .field("actions", &self.log)
            .field("config", &self.config)
            .finish()
    }
}

/// Unbound forwarding function for one callable member
pub struct Forwarder<T> {
    key: String,
    object: Shared<T>,
}

impl<T: Trackable> Forwarder<T> {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Forward with the tracked object as receiver.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        self.object.write(|o| o.invoke(&self.key, args))?
    }

    /// Run the tracked object's current method against `receiver` instead.
    pub fn apply(&self, receiver: &mut T, args: &[Value]) -> Result<Value> {
        match self.object.read(|o| o.member(&self.key))? {
            Some(Member::Method(method)) => Ok(method(receiver, args)?),
            _ => Err(Error::NotCallable(self.key.clone())),
        }
    }
}

impl<T> Clone for Forwarder<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            object: self.object.clone(),
        }
    }
}
