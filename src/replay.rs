//! Re-applying recorded actions to an object

use crate::action::Action;
use crate::error::{Error, Result};
use crate::object::Trackable;
use serde_json::Value;
use std::borrow::Borrow;
use tracing::debug;

/// Apply `actions` to `object` in order and hand the object back.
///
/// The first failing action stops the replay; earlier actions stay applied.
pub fn play<T, I>(object: &mut T, actions: I) -> Result<&mut T>
where
    T: Trackable,
    I: IntoIterator,
    I::Item: Borrow<Action>,
{
    Replayer::new().play(object, actions)?;
    Ok(object)
}

/// [`play`] for actions in their JSON wire shape.
///
/// `actions` must be an array of action records. The whole array is
/// validated before the first action is applied.
pub fn play_json<'a, T: Trackable>(object: &'a mut T, actions: &Value) -> Result<&'a mut T> {
    if !object.is_object() {
        return Err(Error::invalid_argument("play: can only play actions on objects"));
    }
    let actions = Action::list_from_value(actions)?;
    play(object, actions)
}

/// Replays action sequences and counts what was applied
#[derive(Debug, Clone, Default)]
pub struct Replayer {}

impl Replayer {
    pub fn new() -> Self {
        Self {}
    }

    pub fn play<T, I>(&self, object: &mut T, actions: I) -> Result<ReplayStats>
    where
        T: Trackable,
        I: IntoIterator,
        I::Item: Borrow<Action>,
    {
        if !object.is_object() {
            return Err(Error::invalid_argument("play: can only play actions on objects"));
        }

        let mut stats = ReplayStats::default();
        for action in actions {
            match action.borrow() {
                Action::Invoke { key, arguments } => {
                    object.invoke(key, arguments)?;
                    stats.invocations += 1;
                }
                Action::Assign { key, set } => {
                    object.assign(key, set.clone())?;
                    stats.assignments += 1;
                }
            }
        }

        debug!(
            assignments = stats.assignments,
            invocations = stats.invocations,
            "replayed actions"
        );
        Ok(stats)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub assignments: usize,
    pub invocations: usize,
}

impl ReplayStats {
    pub fn total(&self) -> usize {
        self.assignments + self.invocations
    }
}
