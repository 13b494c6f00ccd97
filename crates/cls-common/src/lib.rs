//! Common types and utilities for the cls class factory.
//!
//! This crate provides foundational pieces shared by the runtime and the
//! facade crate:
//! - Well-known property names (`constructor`, `prototype`, `uber`, ...)
//! - Centralized limits for chain walks and nested calls
//! - Recursion guards built on those limits
//! - Realm configuration (`ClsConfig`)

// Reserved and well-known property names
pub mod names;

// Centralized limits and thresholds
pub mod limits;

// Cycle detection and depth limiting for chain walks and nested calls
pub mod recursion;
pub use recursion::{CallDepth, RecursionGuard, RecursionProfile, RecursionResult};

// Realm configuration
pub mod config;
pub use config::{ClsConfig, ConfigError};
