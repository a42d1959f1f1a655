// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Generic mutable object builder: named fields holding either a scalar or an ordered list, with chainable mutators
// role: builder/state
// inputs: Field names, JSON scalars, JSON entries (objects or scalars), match keys for removal
// outputs: Deep-copied JSON object snapshots via make()
// invariants:
// - A field is a scalar or a list for its whole lifetime; cross-kind writes fail with BuildError::Configuration
// - List entries keep insertion order; removal keeps the relative order of survivors
// - Removal from an absent field or with no matching entry is a silent no-op
// - make() never mutates state; repeated calls without mutation are structurally equal
// errors: BuildError::Configuration on kind mismatch; state is untouched when an error is returned
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{BuildError, Result};

/// Declared shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Scalar,
  List,
}

impl fmt::Display for FieldKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FieldKind::Scalar => write!(f, "scalar"),
      FieldKind::List => write!(f, "list"),
    }
  }
}

/// Value currently stored under a field name.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
  Scalar(Value),
  List(Vec<Value>),
}

impl FieldValue {
  pub fn kind(&self) -> FieldKind {
    match self {
      FieldValue::Scalar(_) => FieldKind::Scalar,
      FieldValue::List(_) => FieldKind::List,
    }
  }

  fn to_json(&self) -> Value {
    match self {
      FieldValue::Scalar(v) => v.clone(),
      FieldValue::List(items) => Value::Array(items.clone()),
    }
  }
}

/// Field name → value mapping, plus the kinds fixed for each field so far.
///
/// Kinds are fixed either up front via [`BuilderState::declare`] or by the
/// first write to a field. A declared kind survives [`BuilderState::remove_field`];
/// an inferred one does not.
#[derive(Debug, Clone, Default)]
pub struct BuilderState {
  fields: BTreeMap<String, FieldValue>,
  declared: BTreeMap<String, FieldKind>,
}

impl BuilderState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Pin the kind of `field` before anything is written to it.
  pub fn declare(&mut self, field: &str, kind: FieldKind) {
    self.declared.insert(field.to_string(), kind);
  }

  pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
    self
      .declared
      .get(field)
      .copied()
      .or_else(|| self.fields.get(field).map(FieldValue::kind))
  }

  pub fn get(&self, field: &str) -> Option<&FieldValue> {
    self.fields.get(field)
  }

  pub fn contains(&self, field: &str) -> bool {
    self.fields.contains_key(field)
  }

  fn check(&self, field: &str, expected: FieldKind) -> Result<()> {
    match self.kind_of(field) {
      Some(found) if found != expected => Err(BuildError::Configuration {
        field: field.to_string(),
        expected,
        found,
      }),
      _ => Ok(()),
    }
  }

  pub fn set_scalar(&mut self, field: &str, value: Value) -> Result<()> {
    self.check(field, FieldKind::Scalar)?;
    trace!(field, %value, "set scalar");
    self.fields.insert(field.to_string(), FieldValue::Scalar(value));

    Ok(())
  }

  pub fn replace_list(&mut self, field: &str, entries: Vec<Value>) -> Result<()> {
    self.check(field, FieldKind::List)?;
    trace!(field, len = entries.len(), "replace list");
    self.fields.insert(field.to_string(), FieldValue::List(entries));

    Ok(())
  }

  pub fn push(&mut self, field: &str, entry: Value) -> Result<()> {
    self.check(field, FieldKind::List)?;
    trace!(field, %entry, "append");

    match self.fields.get_mut(field) {
      Some(FieldValue::List(items)) => items.push(entry),
      // kind check above rules out a scalar here
      _ => {
        self.fields.insert(field.to_string(), FieldValue::List(vec![entry]));
      }
    }

    Ok(())
  }

  /// Drop every list entry whose `key` attribute equals one of `values`.
  pub fn remove_where(&mut self, field: &str, key: &str, values: &[Value]) -> Result<()> {
    self.check(field, FieldKind::List)?;

    if let Some(FieldValue::List(items)) = self.fields.get_mut(field) {
      let before = items.len();
      items.retain(|entry| match entry.get(key) {
        Some(attr) => !values.contains(attr),
        None => true,
      });
      trace!(field, key, removed = before - items.len(), "remove");
    }

    Ok(())
  }

  pub fn remove_field(&mut self, field: &str) {
    trace!(field, "clear");
    self.fields.remove(field);
  }

  /// Deep copy of the current fields as a JSON object.
  pub fn to_json(&self) -> Value {
    let map: Map<String, Value> = self
      .fields
      .iter()
      .map(|(k, v)| (k.clone(), v.to_json()))
      .collect();

    Value::Object(map)
  }
}

/// Chainable mutators over a [`BuilderState`].
///
/// Implementors only provide access to their state; every mutator is a
/// provided method and returns the builder itself so calls can be chained
/// with `?`. Mutation is in place, so a builder must not be shared between
/// concurrent callers.
pub trait ObjectBuilder {
  fn state(&self) -> &BuilderState;
  fn state_mut(&mut self) -> &mut BuilderState;

  /// Overwrite `field` with a scalar.
  fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<&mut Self>
  where
    Self: Sized,
  {
    self.state_mut().set_scalar(field, value.into())?;
    Ok(self)
  }

  /// Overwrite `field` with a whole list.
  fn set_list<I>(&mut self, field: &str, entries: I) -> Result<&mut Self>
  where
    Self: Sized,
    I: IntoIterator,
    I::Item: Into<Value>,
  {
    let entries = entries.into_iter().map(Into::into).collect();
    self.state_mut().replace_list(field, entries)?;
    Ok(self)
  }

  fn append(&mut self, field: &str, entry: impl Into<Value>) -> Result<&mut Self>
  where
    Self: Sized,
  {
    self.state_mut().push(field, entry.into())?;
    Ok(self)
  }

  /// Same as calling [`ObjectBuilder::append`] for each entry in order.
  fn append_multiple<I>(&mut self, field: &str, entries: I) -> Result<&mut Self>
  where
    Self: Sized,
    I: IntoIterator,
    I::Item: Into<Value>,
  {
    let entries: Vec<Value> = entries.into_iter().map(Into::into).collect();
    // check once so a kind mismatch cannot leave a half-appended list
    self.state().check(field, FieldKind::List)?;

    for entry in entries {
      self.state_mut().push(field, entry)?;
    }

    Ok(self)
  }

  fn remove(&mut self, field: &str, key: &str, value: impl Into<Value>) -> Result<&mut Self>
  where
    Self: Sized,
  {
    self.state_mut().remove_where(field, key, &[value.into()])?;
    Ok(self)
  }

  fn remove_multiple<I>(&mut self, field: &str, key: &str, values: I) -> Result<&mut Self>
  where
    Self: Sized,
    I: IntoIterator,
    I::Item: Into<Value>,
  {
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    self.state_mut().remove_where(field, key, &values)?;
    Ok(self)
  }

  fn clear(&mut self, field: &str) -> &mut Self
  where
    Self: Sized,
  {
    self.state_mut().remove_field(field);
    self
  }

  /// Snapshot of the current state. Later mutation does not affect the result.
  fn make(&self) -> Value {
    self.state().to_json()
  }
}

impl ObjectBuilder for BuilderState {
  fn state(&self) -> &BuilderState {
    self
  }

  fn state_mut(&mut self) -> &mut BuilderState {
    self
  }
}
