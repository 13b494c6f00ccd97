//! Cycle detection and depth limiting for realm walks and nested calls.
//!
//! Two guards live here:
//! 1. [`RecursionGuard`] tracks a visiting set plus depth for walks over
//!    object graphs (prototype chains, JSON projection).
//! 2. [`CallDepth`] is a plain nesting counter for function calls, where the
//!    same callee legitimately appears more than once on the stack.
//!
//! [`RecursionProfile`] names the default limit for each kind of walk so
//! call sites do not carry magic numbers.

use crate::limits;
use rustc_hash::FxHashSet;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Property lookup along a prototype chain.
    ///
    /// depth = [`limits::MAX_PROTOTYPE_CHAIN_DEPTH`]
    PrototypeChain,

    /// Nested function calls inside a realm.
    ///
    /// depth = [`limits::MAX_CALL_DEPTH`]
    CallStack,

    /// Nesting of objects and arrays during JSON projection.
    ///
    /// depth = [`limits::MAX_JSON_DEPTH`]
    JsonProjection,
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::PrototypeChain => limits::MAX_PROTOTYPE_CHAIN_DEPTH,
            Self::CallStack => limits::MAX_CALL_DEPTH,
            Self::JsonProjection => limits::MAX_JSON_DEPTH,
        }
    }

    /// Human-readable label used in limit errors.
    pub const fn label(self) -> &'static str {
        match self {
            Self::PrototypeChain => "prototype chain",
            Self::CallStack => "call stack",
            Self::JsonProjection => "JSON nesting",
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Outcome of [`RecursionGuard::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// The walk may proceed into the key.
    Entered,
    /// The key is already being visited.
    Cycle,
    /// The walk is nested too deeply.
    DepthExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Visiting set plus depth bound for walks over object graphs.
///
/// Recursive walks pair every successful [`enter`](Self::enter) with a
/// [`leave`](Self::leave). Linear walks (a prototype chain) may simply keep
/// entering and drop the guard at the end; the visiting set then doubles as a
/// visited set.
#[derive(Debug)]
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    max_depth: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            max_depth,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Try to enter `key`.
    ///
    /// On [`RecursionResult::Entered`] the key joins the visiting set and the
    /// depth grows by one.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        if !self.visiting.insert(key) {
            return RecursionResult::Cycle;
        }
        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave `key` after a matching [`enter`](Self::enter).
    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    /// Returns `true` once any `enter` has been denied for depth.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

// ---------------------------------------------------------------------------
// CallDepth
// ---------------------------------------------------------------------------

/// Nesting counter for function calls.
#[derive(Debug, Clone, Copy)]
pub struct CallDepth {
    current: u32,
    max: u32,
}

impl CallDepth {
    pub const fn new(max: u32) -> Self {
        Self { current: 0, max }
    }

    /// Push one frame. Returns `false` (and pushes nothing) at the limit.
    pub fn enter(&mut self) -> bool {
        if self.current >= self.max {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn leave(&mut self) {
        debug_assert!(self.current > 0, "CallDepth::leave() without enter()");
        self.current = self.current.saturating_sub(1);
    }

    #[inline]
    pub const fn current(&self) -> u32 {
        self.current
    }

    #[inline]
    pub const fn max(&self) -> u32 {
        self.max
    }
}

impl Default for CallDepth {
    fn default() -> Self {
        Self::new(RecursionProfile::CallStack.max_depth())
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
