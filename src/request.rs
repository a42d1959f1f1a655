// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Reporting vocabulary on top of the object builder: view, paging, sampling, dates, dimensions, metrics, ordering, filters
// role: request/assembler
// inputs: Human-readable names (canonicalized through a NameResolver), filter clause builders
// outputs: JSON snapshot via make(); typed RequestObject via request_object()
// invariants:
// - Every field has a declared kind; dimensions/metrics/orderBys/dateRanges/filter clauses are lists
// - dateRanges holds at most one range; date_range() replaces
// - histogram() replaces the whole dimensions list with a single descriptor
// - Removal matches on the canonical name: `name` for dimensions, `expression` for metrics, `fieldName` for orders
// - Nothing is auto-populated; an absent field means the remote default applies
// errors: BuildError::Configuration if raw ObjectBuilder calls break a declared kind; IncompleteFilter from filter clauses
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Display;

use serde_json::Value;
use tracing::debug;

use crate::builder::{BuilderState, FieldKind, ObjectBuilder};
use crate::error::{BuildError, Result};
use crate::filter::{compose_group, FilterClause};
use crate::model::{
  DateRange, DimensionDescriptor, FormattingType, GroupOperator, MetricDescriptor, OrderSpec, OrderType,
  RequestObject, SortOrder,
};
use crate::names::{NameResolver, PrefixNameResolver};

pub const VIEW_ID: &str = "viewId";
pub const PAGE_SIZE: &str = "pageSize";
pub const PAGE_TOKEN: &str = "pageToken";
pub const SAMPLING_LEVEL: &str = "samplingLevel";
pub const DATE_RANGES: &str = "dateRanges";
pub const DIMENSIONS: &str = "dimensions";
pub const METRICS: &str = "metrics";
pub const FILTERS_EXPRESSION: &str = "filtersExpression";
pub const ORDER_BYS: &str = "orderBys";
pub const METRIC_FILTER_CLAUSES: &str = "metricFilterClauses";
pub const DIMENSION_FILTER_CLAUSES: &str = "dimensionFilterClauses";

const FIELD_KINDS: &[(&str, FieldKind)] = &[
  (VIEW_ID, FieldKind::Scalar),
  (PAGE_SIZE, FieldKind::Scalar),
  (PAGE_TOKEN, FieldKind::Scalar),
  (SAMPLING_LEVEL, FieldKind::Scalar),
  (FILTERS_EXPRESSION, FieldKind::Scalar),
  (DATE_RANGES, FieldKind::List),
  (DIMENSIONS, FieldKind::List),
  (METRICS, FieldKind::List),
  (ORDER_BYS, FieldKind::List),
  (METRIC_FILTER_CLAUSES, FieldKind::List),
  (DIMENSION_FILTER_CLAUSES, FieldKind::List),
];

/// Which clause list a filter group is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseList {
  Metric,
  Dimension,
}

impl ClauseList {
  pub fn field(self) -> &'static str {
    match self {
      ClauseList::Metric => METRIC_FILTER_CLAUSES,
      ClauseList::Dimension => DIMENSION_FILTER_CLAUSES,
    }
  }
}

/// Bounds for `date_range`. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateBounds {
  pub from: Option<String>,
  pub to: Option<String>,
}

impl DateBounds {
  pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
    Self { from: Some(from.into()), to: Some(to.into()) }
  }

  pub fn since(from: impl Into<String>) -> Self {
    Self { from: Some(from.into()), to: None }
  }

  pub fn until(to: impl Into<String>) -> Self {
    Self { from: None, to: Some(to.into()) }
  }
}

/// Parameters for `order_by`; unset parts fall back to VALUE / DESCENDING.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBy {
  pub name: String,
  pub order_type: Option<OrderType>,
  pub sort_order: Option<SortOrder>,
}

impl OrderBy {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Default::default() }
  }
}

fn non_empty(s: Option<String>) -> Option<String> {
  s.filter(|v| !v.is_empty())
}

/// Chainable builder for one report request.
///
/// Every call mutates in place and hands back `&mut Self`, so a request is
/// not meant to be shared between threads while it is being built. Use
/// [`ObjectBuilder::make`] or [`ReportRequest::request_object`] to take a
/// detached snapshot for the transport.
#[derive(Debug, Clone)]
pub struct ReportRequest<R = PrefixNameResolver> {
  state: BuilderState,
  resolver: R,
}

impl Default for ReportRequest {
  fn default() -> Self {
    Self::new()
  }
}

impl ReportRequest {
  pub fn new() -> Self {
    Self::with_resolver(PrefixNameResolver)
  }
}

impl<R: NameResolver> ObjectBuilder for ReportRequest<R> {
  fn state(&self) -> &BuilderState {
    &self.state
  }

  fn state_mut(&mut self) -> &mut BuilderState {
    &mut self.state
  }
}

impl<R: NameResolver> ReportRequest<R> {
  pub fn with_resolver(resolver: R) -> Self {
    let mut state = BuilderState::new();
    for (field, kind) in FIELD_KINDS {
      state.declare(field, *kind);
    }

    Self { state, resolver }
  }

  pub fn resolver(&self) -> &R {
    &self.resolver
  }

  fn resolve_all<I>(&self, names: I) -> Vec<String>
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    names.into_iter().map(|n| self.resolver.resolve(n.as_ref())).collect()
  }

  // --- view, paging, sampling ---

  pub fn view(&mut self, id: &str) -> Result<&mut Self> {
    let id = self.resolver.resolve_view(id);
    self.set(VIEW_ID, id)
  }

  pub fn page_size(&mut self, size: u32) -> Result<&mut Self> {
    self.set(PAGE_SIZE, size)
  }

  /// Alias of `page_size`.
  pub fn results(&mut self, count: u32) -> Result<&mut Self> {
    self.page_size(count)
  }

  /// Set the continuation token; `None` or an empty token clears it.
  pub fn page_token(&mut self, token: Option<&str>) -> Result<&mut Self> {
    match token.filter(|t| !t.is_empty()) {
      Some(t) => self.set(PAGE_TOKEN, t),
      None => Ok(self.clear(PAGE_TOKEN)),
    }
  }

  pub fn remove_page_token(&mut self) -> Result<&mut Self> {
    self.page_token(None)
  }

  /// Offsets travel as page tokens.
  pub fn offset(&mut self, value: Option<&str>) -> Result<&mut Self> {
    self.page_token(value)
  }

  pub fn remove_offset(&mut self) -> Result<&mut Self> {
    self.page_token(None)
  }

  pub fn sample(&mut self, level: &str) -> Result<&mut Self> {
    self.set(SAMPLING_LEVEL, level.trim().to_uppercase())
  }

  pub fn fast(&mut self) -> Result<&mut Self> {
    self.sample("SMALL")
  }

  pub fn precise(&mut self) -> Result<&mut Self> {
    self.sample("LARGE")
  }

  // --- dates ---

  /// Only one range is kept; a second call replaces the first.
  pub fn date_range(&mut self, bounds: DateBounds) -> Result<&mut Self> {
    let range = DateRange {
      start_date: non_empty(bounds.from),
      end_date: non_empty(bounds.to),
    };
    let entry = serde_json::to_value(range)?;
    self.set_list(DATE_RANGES, [entry])
  }

  // --- dimensions ---

  pub fn dimension(&mut self, name: &str) -> Result<&mut Self> {
    self.dimensions([name])
  }

  pub fn dimensions<I>(&mut self, names: I) -> Result<&mut Self>
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    let entries = self
      .resolve_all(names)
      .into_iter()
      .map(|name| serde_json::to_value(DimensionDescriptor { name, histogram_buckets: None }))
      .collect::<std::result::Result<Vec<Value>, _>>()?;

    self.append_multiple(DIMENSIONS, entries)
  }

  /// Replace all dimensions with one histogram dimension.
  ///
  /// Unlike `dimension`, this does not append: earlier dimensions are dropped.
  pub fn histogram<I>(&mut self, name: &str, buckets: I) -> Result<&mut Self>
  where
    I: IntoIterator,
    I::Item: Display,
  {
    let buckets: Vec<String> = buckets.into_iter().map(|b| b.to_string()).collect();
    let descriptor = DimensionDescriptor {
      name: self.resolver.resolve(name),
      histogram_buckets: if buckets.is_empty() { None } else { Some(buckets) },
    };
    let entry = serde_json::to_value(descriptor)?;

    self.set_list(DIMENSIONS, [entry])
  }

  pub fn clear_dimensions(&mut self) -> &mut Self {
    self.clear(DIMENSIONS)
  }

  pub fn remove_dimension(&mut self, name: &str) -> Result<&mut Self> {
    self.remove_dimensions([name])
  }

  pub fn remove_dimensions<I>(&mut self, names: I) -> Result<&mut Self>
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    let names = self.resolve_all(names);
    self.remove_multiple(DIMENSIONS, "name", names)
  }

  // --- metrics ---

  /// Append one metric with INTEGER formatting.
  pub fn metric(&mut self, name: &str) -> Result<&mut Self> {
    self.metric_as(name, FormattingType::default())
  }

  pub fn metric_as(&mut self, name: &str, formatting_type: FormattingType) -> Result<&mut Self> {
    let descriptor = MetricDescriptor {
      expression: self.resolver.resolve(name),
      formatting_type,
    };
    let entry = serde_json::to_value(descriptor)?;

    self.append(METRICS, entry)
  }

  /// Append several INTEGER metrics in order.
  pub fn metrics<I>(&mut self, names: I) -> Result<&mut Self>
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    let entries = self
      .resolve_all(names)
      .into_iter()
      .map(|expression| {
        serde_json::to_value(MetricDescriptor {
          expression,
          formatting_type: FormattingType::Integer,
        })
      })
      .collect::<std::result::Result<Vec<Value>, _>>()?;

    self.append_multiple(METRICS, entries)
  }

  pub fn metric_int(&mut self, name: &str) -> Result<&mut Self> {
    self.metric_as(name, FormattingType::Integer)
  }

  pub fn name_float(&mut self, name: &str) -> Result<&mut Self> {
    self.metric_as(name, FormattingType::Float)
  }

  pub fn name_currency(&mut self, name: &str) -> Result<&mut Self> {
    self.metric_as(name, FormattingType::Currency)
  }

  pub fn name_percent(&mut self, name: &str) -> Result<&mut Self> {
    self.metric_as(name, FormattingType::Percent)
  }

  pub fn name_time(&mut self, name: &str) -> Result<&mut Self> {
    self.metric_as(name, FormattingType::Time)
  }

  pub fn clear_metrics(&mut self) -> &mut Self {
    self.clear(METRICS)
  }

  pub fn remove_metric(&mut self, name: &str) -> Result<&mut Self> {
    self.remove_metrics([name])
  }

  pub fn remove_metrics<I>(&mut self, names: I) -> Result<&mut Self>
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    let names = self.resolve_all(names);
    self.remove_multiple(METRICS, "expression", names)
  }

  // --- ordering ---

  pub fn order_by(&mut self, order: OrderBy) -> Result<&mut Self> {
    let spec = OrderSpec {
      field_name: self.resolver.resolve(&order.name),
      order_type: order.order_type.unwrap_or_default(),
      sort_order: order.sort_order.unwrap_or_default(),
    };
    let entry = serde_json::to_value(spec)?;

    self.append(ORDER_BYS, entry)
  }

  pub fn order_asc(&mut self, name: &str) -> Result<&mut Self> {
    self.order_by(OrderBy {
      sort_order: Some(SortOrder::Ascending),
      ..OrderBy::new(name)
    })
  }

  pub fn order_desc(&mut self, name: &str) -> Result<&mut Self> {
    self.order_by(OrderBy::new(name))
  }

  pub fn order_histogram(&mut self, name: &str) -> Result<&mut Self> {
    self.order_by(OrderBy {
      order_type: Some(OrderType::HistogramBucket),
      ..OrderBy::new(name)
    })
  }

  pub fn clear_orders(&mut self) -> &mut Self {
    self.clear(ORDER_BYS)
  }

  pub fn remove_order(&mut self, name: &str) -> Result<&mut Self> {
    self.remove_orders([name])
  }

  pub fn remove_orders<I>(&mut self, names: I) -> Result<&mut Self>
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
  {
    let names = self.resolve_all(names);
    self.remove_multiple(ORDER_BYS, "fieldName", names)
  }

  // --- filters ---

  /// Raw filter expression passed through untouched.
  pub fn filters_expression(&mut self, expression: &str) -> Result<&mut Self> {
    self.set(FILTERS_EXPRESSION, expression)
  }

  fn group<'a, I, C>(&mut self, list: ClauseList, filters: I, operator: GroupOperator) -> Result<&mut Self>
  where
    I: IntoIterator<Item = &'a C>,
    C: FilterClause + ?Sized + 'a,
  {
    let group = compose_group(filters, operator, &self.resolver)?;
    let entry = serde_json::to_value(group)?;

    self.append(list.field(), entry)
  }

  /// Append one AND group built from `filters` to the given clause list.
  pub fn and_filters<'a, I, C>(&mut self, list: ClauseList, filters: I) -> Result<&mut Self>
  where
    I: IntoIterator<Item = &'a C>,
    C: FilterClause + ?Sized + 'a,
  {
    self.group(list, filters, GroupOperator::And)
  }

  /// Append one OR group built from `filters` to the given clause list.
  pub fn or_filters<'a, I, C>(&mut self, list: ClauseList, filters: I) -> Result<&mut Self>
  where
    I: IntoIterator<Item = &'a C>,
    C: FilterClause + ?Sized + 'a,
  {
    self.group(list, filters, GroupOperator::Or)
  }

  /// A single clause, wrapped in a one-member OR group.
  pub fn metric_filter<C: FilterClause + ?Sized>(&mut self, filter: &C) -> Result<&mut Self> {
    self.or_filters(ClauseList::Metric, [filter])
  }

  pub fn metric_filters<'a, I, C>(&mut self, filters: I) -> Result<&mut Self>
  where
    I: IntoIterator<Item = &'a C>,
    C: FilterClause + ?Sized + 'a,
  {
    self.and_filters(ClauseList::Metric, filters)
  }

  pub fn metric_or_filters<'a, I, C>(&mut self, filters: I) -> Result<&mut Self>
  where
    I: IntoIterator<Item = &'a C>,
    C: FilterClause + ?Sized + 'a,
  {
    self.or_filters(ClauseList::Metric, filters)
  }

  pub fn dimension_filter<C: FilterClause + ?Sized>(&mut self, filter: &C) -> Result<&mut Self> {
    self.or_filters(ClauseList::Dimension, [filter])
  }

  pub fn dimension_filters<'a, I, C>(&mut self, filters: I) -> Result<&mut Self>
  where
    I: IntoIterator<Item = &'a C>,
    C: FilterClause + ?Sized + 'a,
  {
    self.and_filters(ClauseList::Dimension, filters)
  }

  pub fn dimension_or_filters<'a, I, C>(&mut self, filters: I) -> Result<&mut Self>
  where
    I: IntoIterator<Item = &'a C>,
    C: FilterClause + ?Sized + 'a,
  {
    self.or_filters(ClauseList::Dimension, filters)
  }

  // --- materialization ---

  /// Typed snapshot of the request, checked against the transport shapes.
  pub fn request_object(&self) -> Result<RequestObject> {
    let snapshot = self.make();
    debug!(fields = snapshot.as_object().map(|m| m.len()).unwrap_or(0), "materialize request");

    serde_json::from_value(snapshot).map_err(BuildError::Shape)
  }
}
