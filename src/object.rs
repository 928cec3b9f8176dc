//! The object side of tracking: what a tracked object must expose and how it is shared

use crate::action::ActionLog;
use crate::error::{Error, MemberKind, Result};
use parking_lot::ReentrantMutex;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

/// A callable member. The receiver is passed explicitly so the same method
/// value can be applied to an object other than the one it was read from.
pub type Method<T> = Arc<dyn Fn(&mut T, &[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// Current runtime value of an object member
pub enum Member<T> {
    Data(Value),
    Method(Method<T>),
}

impl<T> Member<T> {
    pub fn method<F>(f: F) -> Self
    where
        F: Fn(&mut T, &[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Member::Method(Arc::new(f))
    }

    pub fn kind(&self) -> MemberKind {
        match self {
            Member::Data(_) => MemberKind::Data,
            Member::Method(_) => MemberKind::Callable,
        }
    }
}

impl<T> Clone for Member<T> {
    fn clone(&self) -> Self {
        match self {
            Member::Data(v) => Member::Data(v.clone()),
            Member::Method(m) => Member::Method(Arc::clone(m)),
        }
    }
}

impl<T> fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Data(v) => f.debug_tuple("Data").field(v).finish(),
            Member::Method(_) => f.write_str("Method(..)"),
        }
    }
}

/// Anything a tracker can wrap or a replayer can drive.
pub trait Trackable: Sized {
    /// Whether the value is object-typed. Non-objects are rejected with an
    /// invalid-argument error before any work happens.
    fn is_object(&self) -> bool {
        true
    }

    /// Enumerable member names, own members first, then inherited ones.
    fn keys(&self) -> Vec<String>;

    /// Current value of a member, enumerable or not.
    fn member(&self, key: &str) -> Option<Member<Self>>;

    /// The object's own assignment semantics.
    fn assign(&mut self, key: &str, value: Value) -> anyhow::Result<()>;

    /// Private tracking slot. Only trackers have one, and since logs cannot be
    /// built outside [`track`](crate::track), a value returned here always
    /// belongs to a real tracker.
    fn action_log(&self) -> Option<&ActionLog> {
        None
    }

    /// Call `key` with `self` as the receiver.
    fn invoke(&mut self, key: &str, args: &[Value]) -> Result<Value> {
        match self.member(key) {
            Some(Member::Method(method)) => Ok(method(self, args)?),
            _ => Err(Error::NotCallable(key.to_string())),
        }
    }
}

/// Plain JSON values behave as data-only objects.
impl Trackable for Value {
    fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    fn keys(&self) -> Vec<String> {
        match self {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn member(&self, key: &str) -> Option<Member<Self>> {
        match self {
            Value::Object(map) => map.get(key).cloned().map(Member::Data),
            _ => None,
        }
    }

    fn assign(&mut self, key: &str, value: Value) -> anyhow::Result<()> {
        match self {
            Value::Object(map) => {
                map.insert(key.to_string(), value);
                Ok(())
            }
            other => anyhow::bail!("cannot set '{}' on non-object value {}", key, other),
        }
    }
}

/// An object owned jointly by its caller and any trackers wrapping it.
///
/// Access from other threads waits for the lock. Nested access from the
/// thread already holding a mutable borrow fails with [`Error::Borrowed`].
pub struct Shared<T>(Arc<ReentrantMutex<RefCell<T>>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(ReentrantMutex::new(RefCell::new(value))))
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let guard = self.0.lock();
        let value = guard.try_borrow().map_err(|_| Error::Borrowed)?;
        let out = f(&*value);
        Ok(out)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let guard = self.0.lock();
        let mut value = guard.try_borrow_mut().map_err(|_| Error::Borrowed)?;
        let out = f(&mut *value);
        Ok(out)
    }

    /// True when both handles point at the same object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Take the object back if this is the last handle.
    pub fn try_unwrap(self) -> std::result::Result<T, Self> {
        Arc::try_unwrap(self.0)
            .map(|lock| lock.into_inner().into_inner())
            .map_err(Self)
    }
}

impl<T: Clone> Shared<T> {
    pub fn snapshot(&self) -> Result<T> {
        self.read(T::clone)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.0.lock();
        let result = match guard.try_borrow() {
            Ok(value) => f.debug_tuple("Shared").field(&*value).finish(),
            Err(_) => f.write_str("Shared(<borrowed>)"),
        };
        result
    }
}
