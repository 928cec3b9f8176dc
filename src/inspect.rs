//! Member classification

use crate::error::MemberKind;
use crate::object::{Member, Trackable};
use serde::Serialize;

/// Enumerable members of an object, split by the kind of their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub data: Vec<String>,
    pub callable: Vec<String>,
}

impl Inspection {
    pub fn kind_of(&self, key: &str) -> Option<MemberKind> {
        if self.data.iter().any(|k| k == key) {
            Some(MemberKind::Data)
        } else if self.callable.iter().any(|k| k == key) {
            Some(MemberKind::Callable)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.callable.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len() + self.callable.len()
    }
}

/// Classify every enumerable member of `object`.
///
/// A member is callable if its value is a method right now; anything else,
/// including a key that no longer resolves, is data.
pub fn inspect<T: Trackable>(object: &T) -> Inspection {
    let mut inspection = Inspection::default();
    for key in object.keys() {
        match object.member(&key) {
            Some(Member::Method(_)) => inspection.callable.push(key),
            _ => inspection.data.push(key),
        }
    }
    inspection
}
