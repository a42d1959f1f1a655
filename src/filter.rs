// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build leaf filter clauses (metric and dimension) and compose them into AND/OR filter groups
// role: filter/builders
// inputs: Field names (resolved at materialization), comparison operators and values, inversion flag
// outputs: Clause objects `{field, operator, value|values, inverted, caseSensitive?}` and FilterGroup values
// invariants:
// - Group members keep input order exactly
// - make() requires field and operator (and a value unless the operator is IS_MISSING)
// - FilterGroup is itself a clause, so groups nest
// errors: BuildError::IncompleteFilter naming the missing part
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BuildError, Result};
use crate::model::{FilterGroup, GroupOperator};
use crate::names::{NameResolver, PrefixNameResolver};

/// Anything that materializes into one entry of a filter group.
pub trait FilterClause {
  fn make_with(&self, resolver: &dyn NameResolver) -> Result<Value>;

  /// Materialize with the default resolver.
  fn make(&self) -> Result<Value> {
    self.make_with(&PrefixNameResolver)
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricOperator {
  Equal,
  LessThan,
  LessThanOrEqual,
  GreaterThan,
  GreaterThanOrEqual,
  IsMissing,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DimensionOperator {
  Regexp,
  BeginsWith,
  EndsWith,
  Partial,
  Exact,
  NumericEqual,
  NumericGreaterThan,
  NumericLessThan,
  InList,
}

#[derive(Serialize)]
struct MetricClauseShape<'a> {
  field: String,
  operator: MetricOperator,
  #[serde(skip_serializing_if = "Option::is_none")]
  value: Option<&'a Value>,
  inverted: bool,
}

/// Single comparison on a metric, e.g. `pageviews <= 1000`.
///
/// ```ignore
/// let mut f = MetricFilterBuilder::new();
/// f.metric("pageviews").less_than_equal_to(1000).inverse();
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricFilterBuilder {
  field: Option<String>,
  operator: Option<MetricOperator>,
  value: Option<Value>,
  inverted: bool,
}

impl MetricFilterBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn metric(&mut self, name: &str) -> &mut Self {
    self.field = Some(name.to_string());
    self
  }

  fn compare(&mut self, operator: MetricOperator, value: Value) -> &mut Self {
    self.operator = Some(operator);
    self.value = Some(value);
    self
  }

  pub fn equals(&mut self, value: impl Into<Value>) -> &mut Self {
    self.compare(MetricOperator::Equal, value.into())
  }

  pub fn less_than(&mut self, value: impl Into<Value>) -> &mut Self {
    self.compare(MetricOperator::LessThan, value.into())
  }

  pub fn less_than_equal_to(&mut self, value: impl Into<Value>) -> &mut Self {
    self.compare(MetricOperator::LessThanOrEqual, value.into())
  }

  pub fn greater_than(&mut self, value: impl Into<Value>) -> &mut Self {
    self.compare(MetricOperator::GreaterThan, value.into())
  }

  pub fn greater_than_equal_to(&mut self, value: impl Into<Value>) -> &mut Self {
    self.compare(MetricOperator::GreaterThanOrEqual, value.into())
  }

  pub fn is_missing(&mut self) -> &mut Self {
    self.operator = Some(MetricOperator::IsMissing);
    self.value = None;
    self
  }

  /// Toggle NOT on this clause.
  pub fn inverse(&mut self) -> &mut Self {
    self.inverted = !self.inverted;
    self
  }
}

impl FilterClause for MetricFilterBuilder {
  fn make_with(&self, resolver: &dyn NameResolver) -> Result<Value> {
    let field = self.field.as_deref().ok_or(BuildError::IncompleteFilter { missing: "field" })?;
    let operator = self.operator.ok_or(BuildError::IncompleteFilter { missing: "operator" })?;

    if operator != MetricOperator::IsMissing && self.value.is_none() {
      return Err(BuildError::IncompleteFilter { missing: "comparison value" });
    }

    let shape = MetricClauseShape {
      field: resolver.resolve(field),
      operator,
      value: self.value.as_ref(),
      inverted: self.inverted,
    };

    Ok(serde_json::to_value(shape)?)
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DimensionClauseShape<'a> {
  field: String,
  operator: DimensionOperator,
  values: &'a [String],
  inverted: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  case_sensitive: Option<bool>,
}

/// Single match on a dimension, e.g. `pagePath BEGINS_WITH /blog`.
#[derive(Debug, Clone, Default)]
pub struct DimensionFilterBuilder {
  field: Option<String>,
  operator: Option<DimensionOperator>,
  values: Vec<String>,
  case_sensitive: Option<bool>,
  inverted: bool,
}

impl DimensionFilterBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn dimension(&mut self, name: &str) -> &mut Self {
    self.field = Some(name.to_string());
    self
  }

  fn matching<I>(&mut self, operator: DimensionOperator, values: I) -> &mut Self
  where
    I: IntoIterator,
    I::Item: ToString,
  {
    self.operator = Some(operator);
    self.values = values.into_iter().map(|v| v.to_string()).collect();
    self
  }

  pub fn regexp(&mut self, pattern: &str) -> &mut Self {
    self.matching(DimensionOperator::Regexp, [pattern])
  }

  pub fn begins_with(&mut self, prefix: &str) -> &mut Self {
    self.matching(DimensionOperator::BeginsWith, [prefix])
  }

  pub fn ends_with(&mut self, suffix: &str) -> &mut Self {
    self.matching(DimensionOperator::EndsWith, [suffix])
  }

  pub fn partial(&mut self, needle: &str) -> &mut Self {
    self.matching(DimensionOperator::Partial, [needle])
  }

  pub fn exact(&mut self, value: &str) -> &mut Self {
    self.matching(DimensionOperator::Exact, [value])
  }

  pub fn numeric_equal(&mut self, n: f64) -> &mut Self {
    self.matching(DimensionOperator::NumericEqual, [n])
  }

  pub fn numeric_greater_than(&mut self, n: f64) -> &mut Self {
    self.matching(DimensionOperator::NumericGreaterThan, [n])
  }

  pub fn numeric_less_than(&mut self, n: f64) -> &mut Self {
    self.matching(DimensionOperator::NumericLessThan, [n])
  }

  pub fn in_list<I>(&mut self, values: I) -> &mut Self
  where
    I: IntoIterator,
    I::Item: ToString,
  {
    self.matching(DimensionOperator::InList, values)
  }

  pub fn case_sensitive(&mut self, yes: bool) -> &mut Self {
    self.case_sensitive = Some(yes);
    self
  }

  pub fn inverse(&mut self) -> &mut Self {
    self.inverted = !self.inverted;
    self
  }
}

impl FilterClause for DimensionFilterBuilder {
  fn make_with(&self, resolver: &dyn NameResolver) -> Result<Value> {
    let field = self.field.as_deref().ok_or(BuildError::IncompleteFilter { missing: "field" })?;
    let operator = self.operator.ok_or(BuildError::IncompleteFilter { missing: "operator" })?;

    if self.values.is_empty() {
      return Err(BuildError::IncompleteFilter { missing: "comparison value" });
    }

    let shape = DimensionClauseShape {
      field: resolver.resolve(field),
      operator,
      values: &self.values,
      inverted: self.inverted,
      case_sensitive: self.case_sensitive,
    };

    Ok(serde_json::to_value(shape)?)
  }
}

impl FilterClause for FilterGroup {
  fn make_with(&self, _resolver: &dyn NameResolver) -> Result<Value> {
    Ok(serde_json::to_value(self)?)
  }
}

/// Materialize `clauses` in order and wrap them in one group.
pub fn compose_group<'a, I, C>(clauses: I, operator: GroupOperator, resolver: &dyn NameResolver) -> Result<FilterGroup>
where
  I: IntoIterator<Item = &'a C>,
  C: FilterClause + ?Sized + 'a,
{
  let filters = clauses
    .into_iter()
    .map(|c| c.make_with(resolver))
    .collect::<Result<Vec<_>>>()?;

  Ok(FilterGroup { operator, filters })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn inverted_less_than_or_equal() {
    let mut f = MetricFilterBuilder::new();
    f.metric("pageviews").less_than_equal_to(1000).inverse();

    assert_eq!(
      f.make().unwrap(),
      json!({
        "field": "ga:pageviews",
        "operator": "LESS_THAN_OR_EQUAL",
        "value": 1000,
        "inverted": true
      })
    );
  }

  #[test]
  fn inverse_twice_cancels() {
    let mut f = MetricFilterBuilder::new();
    f.metric("users").greater_than(5).inverse().inverse();

    assert_eq!(f.make().unwrap()["inverted"], json!(false));
  }

  #[test]
  fn is_missing_has_no_value() {
    let mut f = MetricFilterBuilder::new();
    f.metric("goal1Completions").is_missing();

    let v = f.make().unwrap();
    assert_eq!(v["operator"], json!("IS_MISSING"));
    assert!(v.get("value").is_none());
  }

  #[test]
  fn incomplete_metric_clause_is_rejected() {
    let f = MetricFilterBuilder::new();
    assert!(matches!(f.make(), Err(BuildError::IncompleteFilter { missing: "field" })));

    let mut f = MetricFilterBuilder::new();
    f.metric("users");
    assert!(matches!(f.make(), Err(BuildError::IncompleteFilter { missing: "operator" })));
  }

  #[test]
  fn dimension_clause_shape() {
    let mut f = DimensionFilterBuilder::new();
    f.dimension("page path").begins_with("/blog").case_sensitive(true);

    assert_eq!(
      f.make().unwrap(),
      json!({
        "field": "ga:pagePath",
        "operator": "BEGINS_WITH",
        "values": ["/blog"],
        "inverted": false,
        "caseSensitive": true
      })
    );
  }

  #[test]
  fn in_list_keeps_order_and_numeric_is_stringified() {
    let mut f = DimensionFilterBuilder::new();
    f.dimension("country").in_list(["Spain", "Chile", "Peru"]);
    assert_eq!(f.make().unwrap()["values"], json!(["Spain", "Chile", "Peru"]));

    let mut n = DimensionFilterBuilder::new();
    n.dimension("sessionCount").numeric_greater_than(3.0);
    assert_eq!(n.make().unwrap()["values"], json!(["3"]));
  }

  #[test]
  fn dimension_without_values_is_incomplete() {
    let mut f = DimensionFilterBuilder::new();
    f.dimension("country").in_list(Vec::<String>::new());

    assert!(matches!(
      f.make(),
      Err(BuildError::IncompleteFilter { missing: "comparison value" })
    ));
  }

  #[test]
  fn groups_preserve_order_and_nest() {
    let mut a = MetricFilterBuilder::new();
    a.metric("users").greater_than(10);
    let mut b = MetricFilterBuilder::new();
    b.metric("sessions").less_than(3);

    let inner = compose_group([&a, &b], GroupOperator::Or, &PrefixNameResolver).unwrap();
    assert_eq!(inner.filters[0]["field"], json!("ga:users"));
    assert_eq!(inner.filters[1]["field"], json!("ga:sessions"));

    let outer = compose_group(
      [&a as &dyn FilterClause, &inner],
      GroupOperator::And,
      &PrefixNameResolver,
    )
    .unwrap();

    assert_eq!(outer.operator, GroupOperator::And);
    assert_eq!(outer.filters[1]["operator"], json!("OR"));
    assert_eq!(outer.filters[1]["filters"].as_array().unwrap().len(), 2);
  }

  #[test]
  fn group_fails_on_first_incomplete_member() {
    let ok = {
      let mut f = MetricFilterBuilder::new();
      f.metric("users").equals(1);
      f
    };
    let bad = MetricFilterBuilder::new();

    assert!(compose_group([&ok, &bad], GroupOperator::And, &PrefixNameResolver).is_err());
  }
}
