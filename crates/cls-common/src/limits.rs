//! Centralized limits and thresholds.
//!
//! Every walk over a prototype chain and every nested function call in a
//! realm is bounded. The values here are the defaults; a realm may override
//! them through [`ClsConfig`](crate::ClsConfig).

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum number of nested calls inside one realm.
///
/// Native bodies call back into the realm (`callSuper`, delegating
/// initializers, user methods), so runaway recursion would otherwise overflow
/// the host stack. The classic trigger is a method that super-calls through a
/// receiver whose class sits two levels below the method's own class:
///
/// ```text
/// A.walk          <- B.walk calls this.callSuper("walk")
/// B.walk          <- resolved through C.uber, which is B.prototype
/// C (no walk)     <- receiver
/// ```
///
/// Each `callSuper` made from `B.walk` on a `C` instance resolves `walk` on
/// `C`'s recorded parent prototype, which is `B.walk` again.
pub const MAX_CALL_DEPTH: u32 = 256;

/// Maximum number of prototype hops when resolving a property.
///
/// Chains are acyclic by construction, so this only bounds pathological depth.
pub const MAX_PROTOTYPE_CHAIN_DEPTH: u32 = 1_000;

/// Maximum nesting when projecting a value to JSON.
pub const MAX_JSON_DEPTH: u32 = 128;
