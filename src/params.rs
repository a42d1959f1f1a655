// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn the normalized CLI configuration into a ReportRequest
// role: params/request-assembly
// inputs: EffectiveConfig
// outputs: ReportRequest ready for materialization
// invariants: Call order mirrors flag order within each flag family; histogram wins over --dimension
// errors: BuildError converted to anyhow with the offending flag in context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};

use ga_report_builder::{
  DateBounds, DimensionFilterBuilder, DimensionOperator, MetricFilterBuilder, MetricOperator, ReportRequest,
};

use crate::cli::{DimensionFilterSpec, EffectiveConfig, MetricFilterSpec};

fn metric_filter(spec: &MetricFilterSpec) -> MetricFilterBuilder {
  let mut f = MetricFilterBuilder::new();
  f.metric(&spec.name);

  let value = spec.value.clone();
  match spec.operator {
    MetricOperator::Equal => f.equals(value),
    MetricOperator::LessThan => f.less_than(value),
    MetricOperator::LessThanOrEqual => f.less_than_equal_to(value),
    MetricOperator::GreaterThan => f.greater_than(value),
    MetricOperator::GreaterThanOrEqual => f.greater_than_equal_to(value),
    MetricOperator::IsMissing => f.is_missing(),
  };

  if spec.inverted {
    f.inverse();
  }

  f
}

fn dimension_filter(spec: &DimensionFilterSpec) -> DimensionFilterBuilder {
  let mut f = DimensionFilterBuilder::new();
  f.dimension(&spec.name);

  let value = spec.value.as_str();
  match spec.operator {
    DimensionOperator::BeginsWith => f.begins_with(value),
    DimensionOperator::EndsWith => f.ends_with(value),
    DimensionOperator::Partial => f.partial(value),
    DimensionOperator::Regexp => f.regexp(value),
    DimensionOperator::InList => f.in_list(value.split(',')),
    _ => f.exact(value),
  };

  if spec.inverted {
    f.inverse();
  }

  f
}

pub fn build_request(cfg: &EffectiveConfig) -> Result<ReportRequest> {
  let mut request = ReportRequest::new();

  if let Some(view) = &cfg.view {
    request.view(view).context("--view")?;
  }

  if let Some(size) = cfg.page_size {
    request.page_size(size).context("--page-size")?;
  }

  request.page_token(cfg.page_token.as_deref()).context("--page-token")?;

  if let Some(level) = &cfg.sample {
    request.sample(level).context("--sample")?;
  }

  if cfg.from.is_some() || cfg.to.is_some() {
    let bounds = DateBounds { from: cfg.from.clone(), to: cfg.to.clone() };
    request.date_range(bounds).context("--from/--to")?;
  }

  request.dimensions(&cfg.dimensions).context("--dimension")?;

  if let Some(h) = &cfg.histogram {
    request.histogram(&h.name, &h.buckets).context("--histogram")?;
  }

  for m in &cfg.metrics {
    request.metric_as(&m.name, m.formatting_type).context("--metric")?;
  }

  for name in &cfg.order_asc {
    request.order_asc(name).context("--order-asc")?;
  }

  for name in &cfg.order_desc {
    request.order_desc(name).context("--order-desc")?;
  }

  if let Some(expr) = &cfg.filters_expression {
    request.filters_expression(expr).context("--filters-expression")?;
  }

  let metric_filters: Vec<MetricFilterBuilder> = cfg.metric_filters.iter().map(metric_filter).collect();
  match metric_filters.as_slice() {
    [] => {}
    [one] => {
      request.metric_filter(one).context("--metric-filter")?;
    }
    many if cfg.any => {
      request.metric_or_filters(many).context("--metric-filter")?;
    }
    many => {
      request.metric_filters(many).context("--metric-filter")?;
    }
  }

  let dimension_filters: Vec<DimensionFilterBuilder> = cfg.dimension_filters.iter().map(dimension_filter).collect();
  match dimension_filters.as_slice() {
    [] => {}
    [one] => {
      request.dimension_filter(one).context("--dimension-filter")?;
    }
    many if cfg.any => {
      request.dimension_or_filters(many).context("--dimension-filter")?;
    }
    many => {
      request.dimension_filters(many).context("--dimension-filter")?;
    }
  }

  Ok(request)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cli::{normalize, Cli};
  use clap::Parser;
  use ga_report_builder::ObjectBuilder;
  use serde_json::json;

  fn cfg(args: &[&str]) -> EffectiveConfig {
    let mut argv = vec!["ga-report-builder"];
    argv.extend_from_slice(args);
    normalize(Cli::parse_from(argv)).unwrap()
  }

  #[test]
  fn flags_become_request_fields() {
    let c = cfg(&[
      "--view", "123", "--page-size", "10", "--dimension", "pagePath", "--metric", "pageviews",
      "--order-asc", "pageviews", "--metric-filter", "!pageviews<=1000",
    ]);
    let v = build_request(&c).unwrap().make();

    assert_eq!(v["viewId"], json!("123"));
    assert_eq!(v["pageSize"], json!(10));
    assert_eq!(v["dimensions"], json!([{"name": "ga:pagePath"}]));
    assert_eq!(
      v["metricFilterClauses"],
      json!([{
        "operator": "OR",
        "filters": [{"field": "ga:pageviews", "operator": "LESS_THAN_OR_EQUAL", "value": 1000, "inverted": true}]
      }])
    );
  }

  #[test]
  fn several_filters_use_and_unless_any() {
    let and = cfg(&["--metric-filter", "users>1", "--metric-filter", "sessions>2"]);
    assert_eq!(build_request(&and).unwrap().make()["metricFilterClauses"][0]["operator"], json!("AND"));

    let or = cfg(&["--any", "--dimension-filter", "country==Chile", "--dimension-filter", "country==Peru"]);
    let v = build_request(&or).unwrap().make();
    assert_eq!(v["dimensionFilterClauses"][0]["operator"], json!("OR"));
    assert_eq!(v["dimensionFilterClauses"][0]["filters"].as_array().unwrap().len(), 2);
  }

  #[test]
  fn histogram_overrides_dimensions() {
    let c = cfg(&["--dimension", "city", "--histogram", "sessionCount=0,10"]);
    assert_eq!(
      build_request(&c).unwrap().make()["dimensions"],
      json!([{"name": "ga:sessionCount", "histogramBuckets": ["0", "10"]}])
    );
  }
}
