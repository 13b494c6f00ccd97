//! Object storage.
//!
//! Every object owns an ordered property table and an optional prototype
//! link. Function objects additionally carry a [`FunctionData`] body; classes
//! are function objects whose `prototype` property holds the method table
//! shared by their instances.

use crate::function::FunctionData;
use crate::value::{ObjectId, Value};
use bitflags::bitflags;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

bitflags! {
    /// Attribute flags stored alongside each property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        /// Visible to `own_keys`, `mixin`, and JSON projection.
        const ENUMERABLE = 1 << 0;
    }
}

#[derive(Debug, Clone)]
pub struct Property {
    pub value: Value,
    pub flags: PropertyFlags,
}

impl Property {
    pub fn enumerable(value: Value) -> Self {
        Self {
            value,
            flags: PropertyFlags::ENUMERABLE,
        }
    }

    pub fn hidden(value: Value) -> Self {
        Self {
            value,
            flags: PropertyFlags::empty(),
        }
    }

    #[inline]
    pub fn is_enumerable(&self) -> bool {
        self.flags.contains(PropertyFlags::ENUMERABLE)
    }
}

/// Insertion-ordered property table.
pub type PropertyMap = IndexMap<String, Property, FxBuildHasher>;

#[derive(Debug)]
pub enum ObjectKind {
    Ordinary,
    Function(FunctionData),
}

#[derive(Debug)]
pub struct ObjectData {
    pub(crate) properties: PropertyMap,
    pub(crate) prototype: Option<ObjectId>,
    pub(crate) kind: ObjectKind,
}

impl ObjectData {
    pub(crate) fn new(prototype: Option<ObjectId>, kind: ObjectKind) -> Self {
        Self {
            properties: PropertyMap::default(),
            prototype,
            kind,
        }
    }

    pub fn prototype(&self) -> Option<ObjectId> {
        self.prototype
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_))
    }

    pub fn function(&self) -> Option<&FunctionData> {
        match &self.kind {
            ObjectKind::Function(data) => Some(data),
            ObjectKind::Ordinary => None,
        }
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    /// Own properties in insertion order, enumerable or not.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Assignment semantics: an existing property keeps its flags, a new one
    /// is enumerable.
    pub(crate) fn assign(&mut self, key: String, value: Value) {
        match self.properties.get_mut(&key) {
            Some(existing) => existing.value = value,
            None => {
                self.properties.insert(key, Property::enumerable(value));
            }
        }
    }

    pub(crate) fn define(&mut self, key: String, property: Property) {
        self.properties.insert(key, property);
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Property> {
        self.properties.shift_remove(key)
    }
}
