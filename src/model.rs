// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the transport shapes of a v4 report request (descriptors, order specs, date ranges, filter groups)
// role: model/types
// outputs: Serializable structs with camelCase field names matching the remote schema
// invariants: Absent optional fields are omitted, never serialized as null; list order is preserved
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormattingType {
  #[default]
  Integer,
  Float,
  Currency,
  Percent,
  Time,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
  #[default]
  Value,
  HistogramBucket,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
  Ascending,
  #[default]
  Descending,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupOperator {
  And,
  #[default]
  Or,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DimensionDescriptor {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub histogram_buckets: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricDescriptor {
  pub expression: String,
  pub formatting_type: FormattingType,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSpec {
  pub field_name: String,
  pub order_type: OrderType,
  pub sort_order: SortOrder,
}

/// One date range. Either bound may be left to the remote default.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_date: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub end_date: Option<String>,
}

/// Materialized AND/OR group. `filters` holds clause objects or nested groups.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FilterGroup {
  pub operator: GroupOperator,
  pub filters: Vec<serde_json::Value>,
}

/// Fully materialized request, as handed to the transport.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestObject {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub view_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub page_size: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub page_token: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sampling_level: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date_ranges: Option<Vec<DateRange>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dimensions: Option<Vec<DimensionDescriptor>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub metrics: Option<Vec<MetricDescriptor>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub filters_expression: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub order_bys: Option<Vec<OrderSpec>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub metric_filter_clauses: Option<Vec<FilterGroup>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dimension_filter_clauses: Option<Vec<FilterGroup>>,
}
