//! Realm object model and class factory.
//!
//! A [`Realm`] owns every object of one class universe: plain objects,
//! function objects, classes, prototypes, and instances. On top of it sit the
//! class operations:
//! - [`Realm::create_class`] / [`Realm::create_class_from_object`]: build a
//!   class from instance members, static members, and an optional parent
//! - [`Realm::mixin`]: shallow-copy own enumerable properties
//! - [`Realm::link_prototype`]: prototype inheritance through a bridge object
//! - [`Realm::call_super`]: explicit, name-based parent dispatch
//! - [`Realm::register_factory`] / [`Realm::conflict_guard_release`]: opt-in
//!   global binding of the factory

pub mod descriptor;
pub mod error;
pub mod function;
pub mod object;
pub mod realm;
pub mod value;

// Realm operations, implemented as `impl Realm` blocks
mod factory;
mod json;
mod link;
mod mixin;
mod registry;

pub use descriptor::{ClassDescriptor, Member, Members};
pub use error::ClsError;
pub use function::{FunctionBody, NativeFn, arg, native_fn};
pub use object::{ObjectData, ObjectKind, Property, PropertyFlags};
pub use realm::Realm;
pub use value::{ObjectId, Value};
