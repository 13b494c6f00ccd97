//! Class descriptors.
//!
//! A descriptor is the declarative input of the factory: an optional parent
//! class, instance members, and static members. Members are ordered name to
//! [`Member`] maps; the reserved `constructor` instance member becomes the
//! class initializer.

use crate::error::ClsError;
use crate::function::{NativeFn, native_fn};
use crate::realm::Realm;
use crate::value::{ObjectId, Value};
use cls_common::names::CONSTRUCTOR;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt;

#[derive(Clone)]
pub enum Member {
    /// Materialized as a fresh function object named after its key.
    Method(NativeFn),
    /// Copied as-is. May reference an existing function object.
    Value(Value),
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(_) => f.write_str("Method(..)"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl From<Value> for Member {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<NativeFn> for Member {
    fn from(f: NativeFn) -> Self {
        Self::Method(f)
    }
}

/// Ordered member map. Re-inserting a name replaces its member in place.
#[derive(Debug, Clone, Default)]
pub struct Members {
    entries: IndexMap<String, Member, FxBuildHasher>,
}

impl Members {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, member: impl Into<Member>) -> &mut Self {
        self.entries.insert(name.into(), member.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.entries.iter().map(|(k, m)| (k.as_str(), m))
    }
}

/// Input of [`Realm::create_class`].
///
/// ```ignore
/// let person = realm.create_class(
///     ClassDescriptor::new()
///         .constructor(|realm, this, args| { /* ... */ Ok(Value::Undefined) })
///         .method("describe", |realm, this, _| { /* ... */ Ok(Value::Undefined) })
///         .static_value("species", "human"),
/// )?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassDescriptor {
    /// Diagnostic name for the generated constructor.
    pub name: Option<String>,
    pub parent: Option<ObjectId>,
    pub instance_members: Members,
    pub static_members: Members,
}

impl ClassDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn extends(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn constructor<F>(self, f: F) -> Self
    where
        F: Fn(&mut Realm, Value, &[Value]) -> Result<Value, ClsError> + 'static,
    {
        self.method(CONSTRUCTOR, f)
    }

    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Realm, Value, &[Value]) -> Result<Value, ClsError> + 'static,
    {
        self.instance_members.insert(name, native_fn(f));
        self
    }

    pub fn member(mut self, name: impl Into<String>, member: impl Into<Member>) -> Self {
        self.instance_members.insert(name, member);
        self
    }

    pub fn static_method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Realm, Value, &[Value]) -> Result<Value, ClsError> + 'static,
    {
        self.static_members.insert(name, native_fn(f));
        self
    }

    pub fn static_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.static_members.insert(name, Member::Value(value.into()));
        self
    }
}
