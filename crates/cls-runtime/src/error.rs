//! Errors raised by realm operations.
//!
//! Class creation itself is tolerant: missing parents, members, statics, and
//! super methods are all valid. Errors surface where something is *used*:
//! calling a value that is not a function, reading through a non-object, or
//! nesting calls past the configured limit.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClsError {
    #[error("{what} is not a function")]
    NotCallable { what: String },

    #[error("expected an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("`constructor` member must be a function, found {found}")]
    InvalidConstructor { found: &'static str },

    #[error("{kind} exceeded the limit of {limit}")]
    RecursionLimit { kind: &'static str, limit: u32 },

    /// Raised by host closures.
    #[error("{0}")]
    Native(String),
}

impl ClsError {
    pub fn native(message: impl Into<String>) -> Self {
        Self::Native(message.into())
    }
}
