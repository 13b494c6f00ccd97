//! JSON projection of realm values.
//!
//! `to_json` follows `JSON.stringify` conventions: only own enumerable
//! properties are written, function-valued and `Undefined` properties are
//! skipped, non-finite numbers become `null`, and integral numbers are
//! written as integers. `value_from_json` builds plain realm objects and arrays.

use crate::error::ClsError;
use crate::realm::Realm;
use crate::value::{ObjectId, Value};
use cls_common::{RecursionGuard, RecursionProfile, RecursionResult};
use serde_json::{Map, Number};

impl Realm {
    pub fn to_json(&self, value: &Value) -> Result<serde_json::Value, ClsError> {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::JsonProjection);
        Ok(self
            .project(value, &mut guard)?
            .unwrap_or(serde_json::Value::Null))
    }

    pub fn value_from_json(&mut self, json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::str(s),
            serde_json::Value::Array(items) => {
                Value::array(items.iter().map(|item| self.value_from_json(item)).collect::<Vec<_>>())
            }
            serde_json::Value::Object(entries) => {
                let object = self.new_object();
                for (key, item) in entries {
                    let value = self.value_from_json(item);
                    self.set(object, key.as_str(), value);
                }
                Value::Object(object)
            }
        }
    }

    /// `None` means "omit" (functions and `Undefined`).
    fn project(
        &self,
        value: &Value,
        guard: &mut RecursionGuard<usize>,
    ) -> Result<Option<serde_json::Value>, ClsError> {
        let json = match value {
            Value::Undefined => return Ok(None),
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::Str(s) => serde_json::Value::String(s.to_string()),
            Value::Array(items) => {
                let key = items.as_ptr() as usize;
                self.enter_json(guard, key)?;
                let mut out = Vec::with_capacity(items.len());
                for item in items.iter() {
                    out.push(self.project(item, guard)?.unwrap_or(serde_json::Value::Null));
                }
                guard.leave(key);
                serde_json::Value::Array(out)
            }
            Value::Object(id) => {
                if self.object(*id).is_callable() {
                    return Ok(None);
                }
                return self.project_object(*id, guard).map(Some);
            }
        };
        Ok(Some(json))
    }

    fn project_object(
        &self,
        id: ObjectId,
        guard: &mut RecursionGuard<usize>,
    ) -> Result<serde_json::Value, ClsError> {
        // Object ids and array addresses share one key space; tag objects.
        let key = ((id.0 as usize) << 1) | 1;
        self.enter_json(guard, key)?;
        let mut out = Map::new();
        for (name, value) in self.own_entries(id) {
            if let Some(json) = self.project(&value, guard)? {
                out.insert(name, json);
            }
        }
        guard.leave(key);
        Ok(serde_json::Value::Object(out))
    }

    fn enter_json(&self, guard: &mut RecursionGuard<usize>, key: usize) -> Result<(), ClsError> {
        match guard.enter(key) {
            RecursionResult::Entered => Ok(()),
            RecursionResult::Cycle => Err(ClsError::native("converting circular structure to JSON")),
            RecursionResult::DepthExceeded => Err(ClsError::RecursionLimit {
                kind: RecursionProfile::JsonProjection.label(),
                limit: guard.max_depth(),
            }),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

#[cfg(test)]
#[path = "../tests/json_tests.rs"]
mod tests;
