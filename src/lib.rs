//! Classical-inheritance classes over a prototype object model.
//!
//! `cls` re-exports the pieces most callers need:
//!
//! - [`Realm`]: the object arena plus the class operations
//!   ([`Realm::create_class`], [`Realm::mixin`], [`Realm::link_prototype`],
//!   [`Realm::call_super`], [`Realm::register_factory`],
//!   [`Realm::conflict_guard_release`])
//! - [`ClassDescriptor`]: typed class input
//! - [`ClsConfig`]: realm limits and the global factory name
//!
//! ```ignore
//! use cls::{ClassDescriptor, Realm, Value, arg};
//!
//! let mut realm = Realm::new();
//! let animal = realm.create_class(
//!     ClassDescriptor::new()
//!         .constructor(|realm, this, args| {
//!             if let Some(this) = this.as_object() {
//!                 realm.set(this, "name", arg(args, 0));
//!             }
//!             Ok(Value::Undefined)
//!         })
//!         .method("speak", |_, _, _| Ok("...".into())),
//! )?;
//! let dog = realm.create_class(ClassDescriptor::new().extends(animal))?;
//! let rex = realm.construct(dog, &["Rex".into()])?;
//! ```

pub use cls_common as common;
pub use cls_runtime as runtime;

pub use cls_common::names;
pub use cls_common::{ClsConfig, ConfigError};
pub use cls_runtime::{
    ClassDescriptor, ClsError, FunctionBody, Member, Members, NativeFn, ObjectId, Realm, Value,
    arg, native_fn,
};

pub mod tracing_config;
