//! Property copying.
//!
//! `mixin` is the one primitive behind instance members, static members, and
//! static inheritance. It stays public so callers can keep extending classes
//! and instances after creation.

use crate::realm::Realm;
use crate::value::ObjectId;
use tracing::trace;

impl Realm {
    /// Copy every own enumerable property of `source` onto `target`.
    ///
    /// Same-named properties on `target` are overwritten (last writer wins,
    /// nothing is merged), other properties of `target` are left alone, and
    /// inherited properties of `source` are ignored. Returns `target`.
    pub fn mixin(&mut self, target: ObjectId, source: ObjectId) -> ObjectId {
        let entries = self.own_entries(source);
        trace!(
            target = target.0,
            source = source.0,
            count = entries.len(),
            "mixin"
        );
        for (key, value) in entries {
            self.set(target, key, value);
        }
        target
    }
}

#[cfg(test)]
#[path = "../tests/mixin_tests.rs"]
mod tests;
