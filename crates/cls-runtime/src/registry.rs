//! Opt-in global registration of the factory.
//!
//! Nothing is bound globally until [`Realm::register_factory`] is called. At
//! that point whatever was bound under the configured global name is
//! remembered, and [`Realm::conflict_guard_release`] puts it back.
//!
//! The factory itself is an ordinary function object: calling it with a
//! descriptor object creates a class, and its `mixin`, `linkPrototype`, and
//! `conflictGuardRelease` statics expose the rest of the surface to code that
//! only holds realm values.

use crate::error::ClsError;
use crate::function::arg;
use crate::realm::Realm;
use crate::value::{ObjectId, Value};
use cls_common::names::{CONFLICT_GUARD_RELEASE, LINK_PROTOTYPE, MIXIN};
use tracing::debug;

#[derive(Debug, Default)]
pub(crate) struct RegistrySlot {
    factory: Option<ObjectId>,
    /// Pending registration: the binding that existed before, if any.
    previous: Option<Option<Value>>,
}

impl Realm {
    /// The factory function object, created on first use.
    pub fn factory(&mut self) -> ObjectId {
        if let Some(factory) = self.registry.factory {
            return factory;
        }
        let factory = self.build_factory();
        self.registry.factory = Some(factory);
        factory
    }

    /// Bind the factory under the configured global name, remembering the
    /// previous binding.
    ///
    /// Only the binding seen by the first registration is remembered, so
    /// registering again never makes the factory its own predecessor.
    pub fn register_factory(&mut self) -> ObjectId {
        let factory = self.factory();
        let name = self.config().global_name.clone();
        let previous = self.set_global(name.clone(), factory);
        debug!(global = %name, shadowed = previous.is_some(), "registered factory");
        if self.registry.previous.is_none() {
            self.registry.previous = Some(previous);
        }
        factory
    }

    /// Restore whatever was bound under the global name before
    /// [`register_factory`](Self::register_factory), and hand back the
    /// factory so the caller can keep it under a name of their choosing.
    ///
    /// Without a pending registration the globals are left alone, so a
    /// second release is a no-op.
    pub fn conflict_guard_release(&mut self) -> ObjectId {
        let factory = self.factory();
        let name = self.config().global_name.clone();
        match self.registry.previous.take() {
            Some(Some(previous)) => {
                self.set_global(name.clone(), previous);
            }
            Some(None) => {
                self.remove_global(&name);
            }
            None => {}
        }
        debug!(global = %name, "released global binding");
        factory
    }

    fn build_factory(&mut self) -> ObjectId {
        let factory = self.native_function("Cls", |realm, _this, args| {
            let options = arg(args, 0).as_object();
            realm.create_class_from_object(options).map(Value::Object)
        });

        let mixin = self.native_function(MIXIN, |realm, _this, args| {
            let target = require_object(&arg(args, 0))?;
            if let Some(source) = arg(args, 1).as_object() {
                realm.mixin(target, source);
            }
            Ok(Value::Object(target))
        });

        let link = self.native_function(LINK_PROTOTYPE, |realm, _this, args| {
            let child = require_object(&arg(args, 0))?;
            let parent = match arg(args, 1) {
                Value::Undefined => None,
                other => Some(require_object(&other)?),
            };
            realm.link_prototype(child, parent).map(Value::Object)
        });

        let release = self.native_function(CONFLICT_GUARD_RELEASE, |realm, _this, _args| {
            Ok(Value::Object(realm.conflict_guard_release()))
        });

        self.set(factory, MIXIN, mixin);
        self.set(factory, LINK_PROTOTYPE, link);
        self.set(factory, CONFLICT_GUARD_RELEASE, release);
        factory
    }
}

fn require_object(value: &Value) -> Result<ObjectId, ClsError> {
    value.as_object().ok_or(ClsError::NotAnObject {
        found: value.type_name(),
    })
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod tests;
