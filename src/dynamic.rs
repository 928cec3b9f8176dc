//! Scriptable objects built at runtime from data and closures

use crate::error::{Error, Result};
use crate::object::{Member, Trackable};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

static UNDEFINED: Value = Value::Null;

/// Positional argument `i`, or `null` if the caller passed fewer.
pub fn arg(args: &[Value], i: usize) -> &Value {
    args.get(i).unwrap_or(&UNDEFINED)
}

#[derive(Clone)]
struct Slot {
    key: String,
    member: Member<DynamicObject>,
    enumerable: bool,
}

/// An object whose members are declared at runtime.
///
/// Members keep insertion order. Lookups fall back to the prototype, and
/// assignment always writes an own member, shadowing any inherited one.
#[derive(Clone, Default)]
pub struct DynamicObject {
    slots: Vec<Slot>,
    prototype: Option<Arc<DynamicObject>>,
    frozen: bool,
}

impl DynamicObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty object inheriting from `prototype`
    pub fn with_prototype(prototype: DynamicObject) -> Self {
        Self {
            prototype: Some(Arc::new(prototype)),
            ..Self::default()
        }
    }

    /// Build from a JSON object; every field becomes an enumerable data member.
    pub fn from_value(value: Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::invalid_argument(format!(
                    "expected a JSON object, got {}",
                    other
                )))
            }
        };
        let mut object = Self::new();
        for (key, value) in map {
            object.define(key, Member::Data(value), true);
        }
        Ok(object)
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.define(key, Member::Data(value.into()), true);
        self
    }

    pub fn method<F>(mut self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut DynamicObject, &[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.define(key, Member::method(f), true);
        self
    }

    /// Non-enumerable data member: readable by name, never inspected or tracked.
    pub fn hidden(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.define(key, Member::Data(value.into()), false);
        self
    }

    /// Create or replace an own member.
    pub fn define(&mut self, key: impl Into<String>, member: Member<DynamicObject>, enumerable: bool) {
        let key = key.into();
        match self.slots.iter_mut().find(|s| s.key == key) {
            Some(slot) => {
                slot.member = member;
                slot.enumerable = enumerable;
            }
            None => self.slots.push(Slot {
                key,
                member,
                enumerable,
            }),
        }
    }

    /// Reject every later assignment.
    pub fn freeze(mut self) -> Self {
        self.frozen = true;
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Current data value of `key`, own or inherited. `None` for methods and missing members.
    pub fn value(&self, key: &str) -> Option<Value> {
        match self.member(key)? {
            Member::Data(v) => Some(v),
            Member::Method(_) => None,
        }
    }

    /// Enumerable data members as a JSON object.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for key in self.keys() {
            if let Some(v) = self.value(&key) {
                map.insert(key, v);
            }
        }
        Value::Object(map)
    }

    fn own(&self, key: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.key == key)
    }
}

impl Trackable for DynamicObject {
    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .slots
            .iter()
            .filter(|s| s.enumerable)
            .map(|s| s.key.clone())
            .collect();
        if let Some(proto) = &self.prototype {
            for key in proto.keys() {
                // Own members shadow inherited ones even when hidden.
                if self.own(&key).is_none() && !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    fn member(&self, key: &str) -> Option<Member<Self>> {
        match self.own(key) {
            Some(slot) => Some(slot.member.clone()),
            None => self.prototype.as_ref()?.member(key),
        }
    }

    fn assign(&mut self, key: &str, value: Value) -> anyhow::Result<()> {
        if self.frozen {
            anyhow::bail!("cannot assign to '{}' of a frozen object", key);
        }
        let enumerable = self.own(key).map_or(true, |s| s.enumerable);
        self.define(key, Member::Data(value), enumerable);
        Ok(())
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for slot in &self.slots {
            map.entry(&slot.key, &slot.member);
        }
        map.finish()
    }
}
