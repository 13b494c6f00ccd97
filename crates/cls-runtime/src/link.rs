//! Prototype linking.
//!
//! A child never shares its parent's prototype object. Instead it gets a
//! fresh bridge object that delegates to the parent's prototype, so members
//! added to the child land on the bridge and the parent stays untouched. The
//! bridge is allocated directly rather than by running the parent's
//! initializer, so no instance fields leak into the chain as defaults.
//!
//! ```text
//! instance ──▶ Child.prototype (bridge) ──▶ Parent.prototype ──▶ …
//!                 constructor = Child          constructor = Parent
//! Child.uber ─────────────────────────────────┘
//! ```

use crate::error::ClsError;
use crate::realm::Realm;
use crate::value::{ObjectId, Value};
use cls_common::names::{CONSTRUCTOR, PROTOTYPE, UBER};
use tracing::debug;

impl Realm {
    /// Make `child` inherit from `parent`.
    ///
    /// With no parent, `child` is returned unchanged. Otherwise the parent's
    /// enumerable statics are copied onto `child` (a snapshot, not a live
    /// view), `child.prototype` is replaced by a bridge delegating to
    /// `parent.prototype`, and `child.uber` records `parent.prototype` for
    /// super dispatch.
    pub fn link_prototype(
        &mut self,
        child: ObjectId,
        parent: Option<ObjectId>,
    ) -> Result<ObjectId, ClsError> {
        self.try_object(child)?;
        let Some(parent) = parent else {
            return Ok(child);
        };
        self.try_object(parent)?;

        self.mixin(child, parent);

        let parent_prototype = self.get(parent, PROTOTYPE)?.as_object();
        let bridge = self.alloc_object(parent_prototype);
        self.set(bridge, CONSTRUCTOR, child);
        self.set(child, PROTOTYPE, bridge);
        self.set(
            child,
            UBER,
            parent_prototype.map_or(Value::Undefined, Value::Object),
        );

        debug!(
            child = child.0,
            parent = parent.0,
            bridge = bridge.0,
            "linked prototype chain"
        );
        Ok(child)
    }

    /// The object currently stored as `class.prototype`.
    pub fn prototype_object(&self, class: ObjectId) -> Result<ObjectId, ClsError> {
        let value = self.get(class, PROTOTYPE)?;
        value.as_object().ok_or(ClsError::NotAnObject {
            found: value.type_name(),
        })
    }

    /// The parent prototype recorded on `class`, if any.
    pub fn uber(&self, class: ObjectId) -> Option<ObjectId> {
        self.get_own(class, UBER).and_then(Value::as_object)
    }
}

#[cfg(test)]
#[path = "../tests/link_tests.rs"]
mod tests;
