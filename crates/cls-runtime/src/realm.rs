//! The realm: an arena owning every object of one class universe.
//!
//! Objects are addressed by [`ObjectId`] handles, so prototype links, the
//! `constructor` back-reference from a prototype to its class, and the
//! `uber` reference from a class to its parent's prototype are plain ids
//! rather than reference-counted pointers. Cycles between classes and their
//! prototypes cost nothing.
//!
//! Property lookup follows the prototype chain explicitly: own table first,
//! then each prototype in turn. Every walk and every nested call is bounded
//! by the limits in [`ClsConfig`].

use crate::error::ClsError;
use crate::function::{FunctionBody, FunctionData, native_fn};
use crate::object::{ObjectData, ObjectKind, Property};
use crate::registry::RegistrySlot;
use crate::value::{ObjectId, Value};
use cls_common::names::{CALL_SUPER, CONSTRUCTOR, PROTOTYPE, UBER};
use cls_common::{CallDepth, ClsConfig, RecursionGuard, RecursionProfile, RecursionResult};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::trace;

#[derive(Debug)]
pub struct Realm {
    objects: Vec<ObjectData>,
    globals: IndexMap<String, Value, FxBuildHasher>,
    pub(crate) registry: RegistrySlot,
    calls: CallDepth,
    config: ClsConfig,
}

impl Realm {
    pub fn new() -> Self {
        Self::with_config(ClsConfig::default())
    }

    pub fn with_config(config: ClsConfig) -> Self {
        Self {
            objects: Vec::new(),
            globals: IndexMap::default(),
            registry: RegistrySlot::default(),
            calls: CallDepth::new(config.max_call_depth),
            config,
        }
    }

    pub fn config(&self) -> &ClsConfig {
        &self.config
    }

    /// Number of objects allocated so far (functions included).
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    fn alloc(&mut self, data: ObjectData) -> ObjectId {
        let Ok(index) = u32::try_from(self.objects.len()) else {
            panic!("realm arena exhausted the u32 object id space");
        };
        self.objects.push(data);
        ObjectId(index)
    }

    /// Allocate an empty ordinary object delegating to `prototype`.
    pub fn alloc_object(&mut self, prototype: Option<ObjectId>) -> ObjectId {
        self.alloc(ObjectData::new(prototype, ObjectKind::Ordinary))
    }

    pub fn new_object(&mut self) -> ObjectId {
        self.alloc_object(None)
    }

    /// Allocate an ordinary object holding `entries` as enumerable properties.
    pub fn object_from_entries<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>) -> ObjectId
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let id = self.new_object();
        for (key, value) in entries {
            self.set(id, key, value);
        }
        id
    }

    /// Allocate a function object.
    ///
    /// Like any host function it gets a fresh default prototype whose hidden
    /// `constructor` points back at the function, stored under a hidden
    /// `prototype` property. Neither is enumerable, so neither is copied by
    /// `mixin`.
    pub fn new_function(&mut self, name: impl Into<String>, body: FunctionBody) -> ObjectId {
        let function = self.alloc(ObjectData::new(
            None,
            ObjectKind::Function(FunctionData::new(name, body)),
        ));
        let prototype = self.new_object();
        self.define_hidden(prototype, CONSTRUCTOR, function);
        self.define_hidden(function, PROTOTYPE, prototype);
        function
    }

    pub fn native_function<F>(&mut self, name: impl Into<String>, f: F) -> ObjectId
    where
        F: Fn(&mut Realm, Value, &[Value]) -> Result<Value, ClsError> + 'static,
    {
        self.new_function(name, FunctionBody::Native(native_fn(f)))
    }

    // =========================================================================
    // Object access
    // =========================================================================

    /// Panics if `id` was not minted by this realm.
    pub fn object(&self, id: ObjectId) -> &ObjectData {
        &self.objects[id.0 as usize]
    }

    /// Whether `id` was minted by this realm.
    pub fn contains(&self, id: ObjectId) -> bool {
        (id.0 as usize) < self.objects.len()
    }

    /// Checked form of [`object`](Self::object) for ids coming from callers.
    pub fn try_object(&self, id: ObjectId) -> Result<&ObjectData, ClsError> {
        self.objects
            .get(id.0 as usize)
            .ok_or(ClsError::NotAnObject { found: "unknown object id" })
    }

    fn object_mut(&mut self, id: ObjectId) -> &mut ObjectData {
        &mut self.objects[id.0 as usize]
    }

    pub fn prototype_of(&self, id: ObjectId) -> Option<ObjectId> {
        self.object(id).prototype
    }

    pub fn get_own(&self, id: ObjectId, key: &str) -> Option<&Value> {
        self.object(id).property(key).map(|p| &p.value)
    }

    pub fn has_own(&self, id: ObjectId, key: &str) -> bool {
        self.object(id).property(key).is_some()
    }

    /// Resolve `key` on `id` or its prototype chain. Missing is `Undefined`.
    pub fn get(&self, id: ObjectId, key: &str) -> Result<Value, ClsError> {
        let found = self.find_in_chain(id, |_, data| data.property(key).map(|p| p.value.clone()))?;
        Ok(found.unwrap_or_default())
    }

    /// [`get`](Self::get) for arbitrary values; primitives carry no properties.
    pub fn get_value(&self, target: &Value, key: &str) -> Result<Value, ClsError> {
        match target.as_object() {
            Some(id) => self.get(id, key),
            None => Ok(Value::Undefined),
        }
    }

    pub fn has_property(&self, id: ObjectId, key: &str) -> Result<bool, ClsError> {
        Ok(self
            .find_in_chain(id, |_, data| data.property(key).map(|_| ()))?
            .is_some())
    }

    /// Assign an own property. New properties are enumerable; existing ones
    /// keep their flags.
    pub fn set(&mut self, id: ObjectId, key: impl Into<String>, value: impl Into<Value>) {
        self.object_mut(id).assign(key.into(), value.into());
    }

    /// Define (or redefine) a non-enumerable own property.
    pub fn define_hidden(&mut self, id: ObjectId, key: impl Into<String>, value: impl Into<Value>) {
        self.object_mut(id)
            .define(key.into(), Property::hidden(value.into()));
    }

    pub fn delete(&mut self, id: ObjectId, key: &str) -> bool {
        self.object_mut(id).remove(key).is_some()
    }

    /// Own enumerable keys in insertion order.
    pub fn own_keys(&self, id: ObjectId) -> Vec<String> {
        self.object(id)
            .properties()
            .filter(|(_, p)| p.is_enumerable())
            .map(|(k, _)| k.to_string())
            .collect()
    }

    /// Own enumerable entries in insertion order.
    pub fn own_entries(&self, id: ObjectId) -> Vec<(String, Value)> {
        self.object(id)
            .properties()
            .filter(|(_, p)| p.is_enumerable())
            .map(|(k, p)| (k.to_string(), p.value.clone()))
            .collect()
    }

    /// Visit `start` and its prototypes in order until `visit` yields a value.
    fn find_in_chain<T>(
        &self,
        start: ObjectId,
        mut visit: impl FnMut(ObjectId, &ObjectData) -> Option<T>,
    ) -> Result<Option<T>, ClsError> {
        let mut guard = RecursionGuard::new(self.config.max_prototype_depth);
        let mut current = Some(start);
        while let Some(id) = current {
            match guard.enter(id) {
                RecursionResult::Entered => {}
                RecursionResult::Cycle => break,
                RecursionResult::DepthExceeded => {
                    return Err(ClsError::RecursionLimit {
                        kind: RecursionProfile::PrototypeChain.label(),
                        limit: guard.max_depth(),
                    });
                }
            }
            let data = self.object(id);
            if let Some(found) = visit(id, data) {
                return Ok(Some(found));
            }
            current = data.prototype;
        }
        Ok(None)
    }

    // =========================================================================
    // Calls and construction
    // =========================================================================

    pub fn is_callable(&self, value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|id| self.object(id).is_callable())
    }

    /// Like [`Value::type_name`], but reports callable objects as `"function"`.
    pub fn type_of(&self, value: &Value) -> &'static str {
        if self.is_callable(value) {
            "function"
        } else {
            value.type_name()
        }
    }

    pub fn function_name(&self, id: ObjectId) -> Option<&str> {
        self.object(id).function().map(|f| f.name.as_str())
    }

    fn describe(&self, value: &Value) -> String {
        match value {
            Value::Object(id) => format!("object #{}", id.0),
            other => other.type_name().to_string(),
        }
    }

    /// Invoke `callee` with `this` as receiver.
    pub fn call(&mut self, callee: &Value, this: Value, args: &[Value]) -> Result<Value, ClsError> {
        let target = callee
            .as_object()
            .and_then(|id| self.object(id).function().map(|f| (id, f.body.clone())));
        let Some((id, body)) = target else {
            return Err(ClsError::NotCallable {
                what: self.describe(callee),
            });
        };

        if !self.calls.enter() {
            return Err(ClsError::RecursionLimit {
                kind: RecursionProfile::CallStack.label(),
                limit: self.calls.max(),
            });
        }
        let result = match body {
            FunctionBody::Noop => Ok(Value::Undefined),
            FunctionBody::DelegateToParent => self.delegate_to_parent(id, this, args),
            FunctionBody::Native(f) => f(self, this, args),
        };
        self.calls.leave();
        result
    }

    fn delegate_to_parent(
        &mut self,
        class: ObjectId,
        this: Value,
        args: &[Value],
    ) -> Result<Value, ClsError> {
        let uber_value = self.get(class, UBER)?;
        let Some(uber) = uber_value.as_object() else {
            return Err(ClsError::NotAnObject {
                found: uber_value.type_name(),
            });
        };
        let parent_constructor = self.get(uber, CONSTRUCTOR)?;
        trace!(class = class.0, "delegating to parent constructor");
        self.call(&parent_constructor, this, args)
    }

    /// Create an instance of `class`.
    ///
    /// The instance delegates to the class's current `prototype` and is
    /// passed as receiver to the class body. A body that returns an object
    /// replaces the instance.
    pub fn construct(&mut self, class: ObjectId, args: &[Value]) -> Result<ObjectId, ClsError> {
        self.try_object(class)?;
        let callee = Value::Object(class);
        if !self.is_callable(&callee) {
            return Err(ClsError::NotCallable {
                what: self.describe(&callee),
            });
        }
        let prototype = self.get(class, PROTOTYPE)?.as_object();
        let instance = self.alloc_object(prototype);
        let result = self.call(&callee, Value::Object(instance), args)?;
        Ok(result.as_object().unwrap_or(instance))
    }

    /// Resolve `name` on `receiver` and invoke it with `receiver` as `this`.
    pub fn call_method(
        &mut self,
        receiver: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<Value, ClsError> {
        let method = self.get_value(receiver, name)?;
        if !self.is_callable(&method) {
            return Err(ClsError::NotCallable {
                what: name.to_string(),
            });
        }
        self.call(&method, receiver.clone(), args)
    }

    /// Invoke `receiver.callSuper(name, args)`.
    pub fn call_super(
        &mut self,
        receiver: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<Value, ClsError> {
        let packed = [Value::str(name), Value::array(args.iter().cloned())];
        self.call_method(receiver, CALL_SUPER, &packed)
    }

    /// Whether `class.prototype` appears on the prototype chain of `value`.
    pub fn instance_of(&self, value: &Value, class: ObjectId) -> Result<bool, ClsError> {
        if !self.try_object(class)?.is_callable() {
            return Err(ClsError::NotCallable {
                what: self.describe(&Value::Object(class)),
            });
        }
        let prototype_value = self.get(class, PROTOTYPE)?;
        let Some(prototype) = prototype_value.as_object() else {
            return Err(ClsError::NotAnObject {
                found: prototype_value.type_name(),
            });
        };
        let Some(first) = value.as_object().and_then(|id| self.prototype_of(id)) else {
            return Ok(false);
        };
        let found = self.find_in_chain(first, |id, _| (id == prototype).then_some(()))?;
        Ok(found.is_some())
    }

    // =========================================================================
    // Globals
    // =========================================================================

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Bind `name`, returning the previous binding.
    pub fn set_global(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.globals.insert(name.into(), value.into())
    }

    pub fn remove_global(&mut self, name: &str) -> Option<Value> {
        self.globals.shift_remove(name)
    }
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/realm_tests.rs"]
mod tests;
