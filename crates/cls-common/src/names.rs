//! Well-known property names.
//!
//! Classes, prototypes, and the factory object all communicate through plain
//! named properties. The names below are the ones the runtime reads or writes
//! on its own; everything else belongs to user code.

/// Reserved instance-member key that becomes the class initializer. Also the
/// back-reference from a prototype to its class.
pub const CONSTRUCTOR: &str = "constructor";

/// Method table shared by all instances of a class.
pub const PROTOTYPE: &str = "prototype";

/// Class property recording the parent's prototype, used for super dispatch.
pub const UBER: &str = "uber";

/// Super-dispatch helper installed on every class prototype.
pub const CALL_SUPER: &str = "callSuper";

// Keys of a dynamic class descriptor object.
pub const PARENT_CLASS: &str = "parentClass";
pub const INSTANCE_MEMBERS: &str = "instanceMembers";
pub const STATIC_MEMBERS: &str = "staticMembers";

// Static functions exposed on the factory object.
pub const MIXIN: &str = "mixin";
pub const LINK_PROTOTYPE: &str = "linkPrototype";
pub const CONFLICT_GUARD_RELEASE: &str = "conflictGuardRelease";

/// Global binding used by the factory registry unless configured otherwise.
pub const DEFAULT_GLOBAL_NAME: &str = "Cls";
