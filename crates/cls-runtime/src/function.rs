//! Function bodies.

use crate::error::ClsError;
use crate::realm::Realm;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// Host closure backing a native function: `(realm, this, args) -> result`.
pub type NativeFn = Rc<dyn Fn(&mut Realm, Value, &[Value]) -> Result<Value, ClsError>>;

/// Wrap a closure as a [`NativeFn`].
pub fn native_fn<F>(f: F) -> NativeFn
where
    F: Fn(&mut Realm, Value, &[Value]) -> Result<Value, ClsError> + 'static,
{
    Rc::new(f)
}

/// Argument `index`, or `Undefined` when the caller passed fewer.
pub fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

#[derive(Clone)]
pub enum FunctionBody {
    /// Returns `Undefined` and touches nothing.
    Noop,
    /// Default initializer of a derived class without its own constructor.
    ///
    /// At call time it reads the callee's own `uber`, resolves `constructor`
    /// on it, and forwards the receiver and arguments there. Resolving late
    /// means a parent constructor swapped in after class creation is the one
    /// that runs.
    DelegateToParent,
    Native(NativeFn),
}

impl fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Noop => f.write_str("Noop"),
            Self::DelegateToParent => f.write_str("DelegateToParent"),
            Self::Native(_) => f.write_str("Native(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionData {
    /// Diagnostic name; not exposed as a property.
    pub name: String,
    pub body: FunctionBody,
}

impl FunctionData {
    pub fn new(name: impl Into<String>, body: FunctionBody) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}
