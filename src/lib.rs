//! objtrack - record what is done to an object, replay it on another
//!
//! [`track`] wraps a [`Shared`] object in a [`Tracker`] that mirrors the
//! object's data members and methods. Writes and calls made through the
//! tracker reach the object and are appended to the tracker's action log.
//! [`play`] applies such a log to any object with compatible members.
//!
//! ## Quick Start
//!
//! ```rust
//! use objtrack::prelude::*;
//! use serde_json::json;
//!
//! fn counter() -> DynamicObject {
//!     DynamicObject::new()
//!         .data("count", 1)
//!         .method("add", |this, args| {
//!             let n = arg(args, 0).as_i64().unwrap_or(0);
//!             let count = this.value("count").and_then(|v| v.as_i64()).unwrap_or(0);
//!             this.assign("count", json!(count + n))?;
//!             Ok(json!(null))
//!         })
//! }
//!
//! let object = Shared::new(counter());
//! let tracker = track(&object)?;
//! tracker.set("count", 2)?;
//! tracker.call("add", &[json!(3)])?;
//! assert_eq!(tracker.get("count")?, json!(5));
//!
//! let mut copy = counter();
//! play(&mut copy, &get_actions(&tracker)?.snapshot())?;
//! assert_eq!(copy.value("count"), Some(json!(5)));
//! # Ok::<(), objtrack::Error>(())
//! ```

pub mod action;
pub mod dynamic;
pub mod error;
pub mod inspect;
pub mod object;
pub mod replay;
pub mod tracker;

pub use action::{Action, ActionLog};
pub use dynamic::{arg, DynamicObject};
pub use error::{Error, ErrorCode, ErrorReport, MemberKind, Result};
pub use inspect::{inspect, Inspection};
pub use object::{Member, Method, Shared, Trackable};
pub use replay::{play, play_json, ReplayStats, Replayer};
pub use tracker::{get_actions, track, Forwarder, RecordOrder, Tracker, TrackerConfig};

pub mod prelude {
    pub use crate::action::{Action, ActionLog};
    pub use crate::dynamic::{arg, DynamicObject};
    pub use crate::error::{Error, ErrorCode, MemberKind, Result};
    pub use crate::object::{Member, Shared, Trackable};
    pub use crate::replay::{play, play_json, Replayer};
    pub use crate::tracker::{get_actions, track, Forwarder, Tracker, TrackerConfig};
}
