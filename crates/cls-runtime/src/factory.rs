//! The class factory.
//!
//! A class is a function object. Its body is the explicit `constructor`
//! member when one is declared, otherwise an initializer that forwards to the
//! parent's constructor (derived classes) or does nothing (root classes).
//! Creation then links the class to its parent, copies instance members onto
//! the prototype and static members onto the class, and installs `callSuper`.

use crate::descriptor::{ClassDescriptor, Member, Members};
use crate::error::ClsError;
use crate::function::{FunctionBody, arg};
use crate::realm::Realm;
use crate::value::{ObjectId, Value};
use cls_common::names::{CALL_SUPER, CONSTRUCTOR, INSTANCE_MEMBERS, PARENT_CLASS, STATIC_MEMBERS, UBER};
use smallvec::SmallVec;
use tracing::{debug, debug_span, trace};

impl Realm {
    /// Create a class from a typed descriptor.
    ///
    /// Only a malformed descriptor fails: an explicit `constructor` member
    /// holding something other than a function.
    pub fn create_class(&mut self, descriptor: ClassDescriptor) -> Result<ObjectId, ClsError> {
        let ClassDescriptor {
            name,
            parent,
            instance_members,
            static_members,
        } = descriptor;
        let name = name.unwrap_or_default();
        let _span = debug_span!("create_class", name = %name, parent = ?parent.map(|p| p.0)).entered();
        if let Some(parent) = parent {
            self.try_object(parent)?;
        }

        let class = match instance_members.get(CONSTRUCTOR) {
            Some(member) => self.constructor_from_member(&name, member)?,
            None => self.base_initializer(&name, parent),
        };
        let methods = self.materialize(&instance_members, Some(class));
        let statics = self.materialize(&static_members, None);
        self.assemble_class(class, parent, methods, statics)
    }

    /// Create a class from a descriptor object with optional `parentClass`,
    /// `instanceMembers`, and `staticMembers` properties. `None` behaves like
    /// an empty descriptor.
    pub fn create_class_from_object(
        &mut self,
        options: Option<ObjectId>,
    ) -> Result<ObjectId, ClsError> {
        let _span = debug_span!("create_class_from_object", options = ?options.map(|o| o.0)).entered();

        let (parent_value, methods_value, statics_value) = match options {
            Some(options) => {
                self.try_object(options)?;
                (
                    self.get(options, PARENT_CLASS)?,
                    self.get(options, INSTANCE_MEMBERS)?,
                    self.get(options, STATIC_MEMBERS)?,
                )
            }
            None => (Value::Undefined, Value::Undefined, Value::Undefined),
        };

        let parent = if parent_value.is_truthy() {
            match parent_value.as_object() {
                Some(parent) => {
                    self.try_object(parent)?;
                    Some(parent)
                }
                None => {
                    return Err(ClsError::NotAnObject {
                        found: parent_value.type_name(),
                    });
                }
            }
        } else {
            None
        };
        let methods = match methods_value.as_object() {
            Some(methods) => methods,
            None => self.new_object(),
        };
        let statics = match statics_value.as_object() {
            Some(statics) => statics,
            None => self.new_object(),
        };

        let class = match self.get_own(methods, CONSTRUCTOR).cloned() {
            Some(constructor) => self.require_constructor(&constructor)?,
            None => self.base_initializer("", parent),
        };
        self.assemble_class(class, parent, methods, statics)
    }

    fn base_initializer(&mut self, name: &str, parent: Option<ObjectId>) -> ObjectId {
        let body = if parent.is_some() {
            FunctionBody::DelegateToParent
        } else {
            FunctionBody::Noop
        };
        self.new_function(name, body)
    }

    fn constructor_from_member(&mut self, name: &str, member: &Member) -> Result<ObjectId, ClsError> {
        match member {
            Member::Method(f) => Ok(self.new_function(name, FunctionBody::Native(f.clone()))),
            Member::Value(value) => self.require_constructor(value),
        }
    }

    fn require_constructor(&self, value: &Value) -> Result<ObjectId, ClsError> {
        match value.as_object() {
            Some(id) if self.object(id).is_callable() => Ok(id),
            _ => Err(ClsError::InvalidConstructor {
                found: self.type_of(value),
            }),
        }
    }

    /// Build a plain object from `members`. The `constructor` entry resolves
    /// to `constructor` when given, so the prototype points back at the very
    /// function that became the class.
    fn materialize(&mut self, members: &Members, constructor: Option<ObjectId>) -> ObjectId {
        let object = self.new_object();
        for (key, member) in members.iter() {
            let value = match (constructor, member) {
                (Some(class), _) if key == CONSTRUCTOR => Value::Object(class),
                (_, Member::Method(f)) => {
                    Value::Object(self.new_function(key, FunctionBody::Native(f.clone())))
                }
                (_, Member::Value(value)) => value.clone(),
            };
            self.set(object, key, value);
        }
        object
    }

    fn assemble_class(
        &mut self,
        class: ObjectId,
        parent: Option<ObjectId>,
        methods: ObjectId,
        statics: ObjectId,
    ) -> Result<ObjectId, ClsError> {
        self.link_prototype(class, parent)?;

        let prototype = self.prototype_object(class)?;
        self.mixin(prototype, methods);
        self.mixin(class, statics);

        let dispatcher = self.super_dispatcher(class);
        self.set(prototype, CALL_SUPER, dispatcher);

        debug!(
            class = class.0,
            prototype = prototype.0,
            derived = parent.is_some(),
            "created class"
        );
        Ok(class)
    }

    /// `callSuper(name, args)` bound to `class`.
    ///
    /// `name` is resolved on the class's own `uber` at call time, following
    /// that object's prototype chain. A missing or falsy entry yields `Null`
    /// without side effects.
    fn super_dispatcher(&mut self, class: ObjectId) -> ObjectId {
        self.native_function(CALL_SUPER, move |realm, this, args| {
            let name = arg(args, 0).to_property_key();
            let method = match realm.get(class, UBER)?.as_object() {
                Some(uber) => realm.get(uber, &name)?,
                None => Value::Undefined,
            };
            if !method.is_truthy() {
                trace!(class = class.0, method = %name, "super method not found");
                return Ok(Value::Null);
            }

            let forwarded = forwarded_args(&arg(args, 1))?;
            trace!(class = class.0, method = %name, "super dispatch");
            realm.call(&method, this, &forwarded)
        })
    }
}

/// Unpack the argument list handed to `callSuper`.
fn forwarded_args(list: &Value) -> Result<SmallVec<[Value; 4]>, ClsError> {
    match list {
        Value::Array(items) => Ok(items.iter().cloned().collect()),
        Value::Undefined | Value::Null | Value::Object(_) => Ok(SmallVec::new()),
        other => Err(ClsError::NotAnObject {
            found: other.type_name(),
        }),
    }
}

#[cfg(test)]
#[path = "../tests/factory_tests.rs"]
mod tests;
