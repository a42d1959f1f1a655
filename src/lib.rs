//! ga-report-builder - chainable builder for Analytics Reporting API v4 requests
//!
//! - `builder/` - generic scalar/list field builder (`ObjectBuilder`, `BuilderState`)
//! - `request/` - reporting vocabulary (`ReportRequest`)
//! - `filter/` - metric and dimension clauses, AND/OR group composition
//! - `model/` - transport shapes (`RequestObject` and friends)
//! - `names/` - canonical field names (`NameResolver`)
//! - `client/` - transport seam (`ReportingClient`) and the HTTP implementation
//!
//! # Example
//!
//! ```ignore
//! use ga_report_builder::{MetricFilterBuilder, ObjectBuilder, ReportRequest};
//!
//! let mut pageviews = MetricFilterBuilder::new();
//! pageviews.metric("pageviews").less_than_equal_to(1000).inverse();
//!
//! let mut request = ReportRequest::new();
//! request
//!   .view("12345")?
//!   .page_size(10)?
//!   .dimension("pagePath")?
//!   .metric("pageviews")?
//!   .order_asc("pageviews")?
//!   .metric_filter(&pageviews)?;
//!
//! let body = request.make();
//! ```

pub mod builder;
pub mod client;
pub mod error;
pub mod ext;
pub mod filter;
pub mod model;
pub mod names;
pub mod request;

pub use builder::{BuilderState, FieldKind, FieldValue, ObjectBuilder};
pub use client::{HttpReportingClient, ReportResponse, ReportingClient};
pub use error::BuildError;
pub use filter::{compose_group, DimensionFilterBuilder, DimensionOperator, FilterClause, MetricFilterBuilder, MetricOperator};
pub use model::{
  DateRange, DimensionDescriptor, FilterGroup, FormattingType, GroupOperator, MetricDescriptor, OrderSpec, OrderType,
  RequestObject, SortOrder,
};
pub use names::{NameResolver, PrefixNameResolver};
pub use request::{ClauseList, DateBounds, OrderBy, ReportRequest};
