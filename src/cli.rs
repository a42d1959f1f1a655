use anyhow::{bail, Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use ga_report_builder::{DimensionOperator, FormattingType, MetricOperator};

use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "ga-report-builder",
    version,
    about = "Build (and optionally run) an Analytics Reporting API v4 report request",
    long_about = None
)]
pub struct Cli {
  /// View id to query (`ga:` prefix optional)
  #[arg(long)]
  pub view: Option<String>,

  /// Dimension to group by; repeat for more columns
  #[arg(long = "dimension")]
  pub dimensions: Vec<String>,

  /// Metric as name or name:TYPE (INTEGER, FLOAT, CURRENCY, PERCENT, TIME); repeatable
  #[arg(long = "metric")]
  pub metrics: Vec<String>,

  /// Histogram dimension as name=b1,b2,...; replaces any --dimension
  #[arg(long)]
  pub histogram: Option<String>,

  /// Order ascending by this field; repeatable
  #[arg(long = "order-asc")]
  pub order_asc: Vec<String>,

  /// Order descending by this field; repeatable
  #[arg(long = "order-desc")]
  pub order_desc: Vec<String>,

  /// Rows per page
  #[arg(long)]
  pub page_size: Option<u32>,

  /// Continuation token from a previous response
  #[arg(long, alias = "offset")]
  pub page_token: Option<String>,

  /// Sampling level: DEFAULT, SMALL (fast) or LARGE (precise)
  #[arg(long)]
  pub sample: Option<String>,

  /// Start date (YYYY-MM-DD, today, yesterday, NdaysAgo)
  #[arg(long, alias = "start")]
  pub from: Option<String>,

  /// End date (YYYY-MM-DD, today, yesterday, NdaysAgo)
  #[arg(long, alias = "end")]
  pub to: Option<String>,

  /// Calendar month, e.g. 2020-01; excludes --from/--to
  #[arg(long)]
  pub month: Option<String>,

  /// Raw v3-style filter expression passed through untouched
  #[arg(long)]
  pub filters_expression: Option<String>,

  /// Metric filter like "pageviews<=1000"; prefix with ! to invert; repeatable
  #[arg(long = "metric-filter")]
  pub metric_filters: Vec<String>,

  /// Dimension filter like "pagePath^=/blog" (==, ^=, $=, *=, ~=); prefix with ! to invert; repeatable
  #[arg(long = "dimension-filter")]
  pub dimension_filters: Vec<String>,

  /// Combine multiple filters with OR instead of AND
  #[arg(long)]
  pub any: bool,

  /// Send the request instead of printing it (needs GA_ACCESS_TOKEN)
  #[arg(long)]
  pub execute: bool,

  /// Override the batchGet endpoint (hidden; tests only)
  #[arg(long, hide = true)]
  pub endpoint: Option<String>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MetricSpec {
  pub name: String,
  pub formatting_type: FormattingType,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistogramSpec {
  pub name: String,
  pub buckets: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MetricFilterSpec {
  pub name: String,
  pub operator: MetricOperator,
  pub value: serde_json::Value,
  pub inverted: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DimensionFilterSpec {
  pub name: String,
  pub operator: DimensionOperator,
  pub value: String,
  pub inverted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub view: Option<String>,
  pub dimensions: Vec<String>,
  pub metrics: Vec<MetricSpec>,
  pub histogram: Option<HistogramSpec>,
  pub order_asc: Vec<String>,
  pub order_desc: Vec<String>,
  pub page_size: Option<u32>,
  pub page_token: Option<String>,
  pub sample: Option<String>,
  pub from: Option<String>,
  pub to: Option<String>,
  pub filters_expression: Option<String>,
  pub metric_filters: Vec<MetricFilterSpec>,
  pub dimension_filters: Vec<DimensionFilterSpec>,
  pub any: bool,
  pub execute: bool,
  pub endpoint: Option<String>,
}

fn parse_formatting_type(s: &str) -> Result<FormattingType> {
  serde_json::from_value(serde_json::Value::String(s.trim().to_uppercase()))
    .with_context(|| format!("unknown metric type '{}'", s))
}

fn parse_metric(raw: &str) -> Result<MetricSpec> {
  match raw.split_once(':') {
    // keep `ga:users` intact
    Some((name, ty)) if name != "ga" => Ok(MetricSpec {
      name: name.to_string(),
      formatting_type: parse_formatting_type(ty)?,
    }),
    _ => Ok(MetricSpec {
      name: raw.to_string(),
      formatting_type: FormattingType::Integer,
    }),
  }
}

fn parse_histogram(raw: &str) -> Result<HistogramSpec> {
  let Some((name, buckets)) = raw.split_once('=') else {
    bail!("--histogram expects name=b1,b2,... (got '{}')", raw);
  };

  let buckets = buckets
    .split(',')
    .map(|b| b.trim().parse::<i64>().with_context(|| format!("bad histogram bucket '{}'", b)))
    .collect::<Result<Vec<_>>>()?;

  Ok(HistogramSpec { name: name.trim().to_string(), buckets })
}

static RE_METRIC_FILTER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^(!?)\s*([A-Za-z][\w:]*)\s*(<=|>=|==|=|<|>)\s*(-?\d+(?:\.\d+)?)$").unwrap());

static RE_DIMENSION_FILTER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^(!?)\s*([A-Za-z][\w:]*)\s*(==|\^=|\$=|\*=|~=)(.+)$").unwrap());

fn parse_metric_filter(raw: &str) -> Result<MetricFilterSpec> {
  let Some(c) = RE_METRIC_FILTER.captures(raw.trim()) else {
    bail!("cannot parse metric filter '{}' (expected e.g. pageviews<=1000)", raw);
  };

  let operator = match &c[3] {
    "<" => MetricOperator::LessThan,
    "<=" => MetricOperator::LessThanOrEqual,
    ">" => MetricOperator::GreaterThan,
    ">=" => MetricOperator::GreaterThanOrEqual,
    _ => MetricOperator::Equal,
  };

  let value: serde_json::Value =
    serde_json::from_str(&c[4]).with_context(|| format!("bad comparison value in '{}'", raw))?;

  Ok(MetricFilterSpec {
    name: c[2].to_string(),
    operator,
    value,
    inverted: !c[1].is_empty(),
  })
}

fn parse_dimension_filter(raw: &str) -> Result<DimensionFilterSpec> {
  let Some(c) = RE_DIMENSION_FILTER.captures(raw.trim()) else {
    bail!("cannot parse dimension filter '{}' (expected e.g. pagePath^=/blog)", raw);
  };

  let operator = match &c[3] {
    "^=" => DimensionOperator::BeginsWith,
    "$=" => DimensionOperator::EndsWith,
    "*=" => DimensionOperator::Partial,
    "~=" => DimensionOperator::Regexp,
    _ => DimensionOperator::Exact,
  };

  Ok(DimensionFilterSpec {
    name: c[2].to_string(),
    operator,
    value: c[4].to_string(),
    inverted: !c[1].is_empty(),
  })
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let (from, to) = match (&cli.month, &cli.from, &cli.to) {
    (Some(ym), None, None) => {
      let (start, end) = util::month_bounds(ym)?;
      (Some(start), Some(end))
    }
    (Some(_), _, _) => bail!("Ambiguous date selection: choose only one of --month | --from/--to"),
    (None, from, to) => (from.clone(), to.clone()),
  };

  let metrics = cli.metrics.iter().map(|m| parse_metric(m)).collect::<Result<Vec<_>>>()?;
  let histogram = cli.histogram.as_deref().map(parse_histogram).transpose()?;
  let metric_filters = cli
    .metric_filters
    .iter()
    .map(|f| parse_metric_filter(f))
    .collect::<Result<Vec<_>>>()?;
  let dimension_filters = cli
    .dimension_filters
    .iter()
    .map(|f| parse_dimension_filter(f))
    .collect::<Result<Vec<_>>>()?;

  if cli.execute && cli.view.is_none() {
    bail!("--execute needs --view");
  }

  Ok(EffectiveConfig {
    view: cli.view,
    dimensions: cli.dimensions,
    metrics,
    histogram,
    order_asc: cli.order_asc,
    order_desc: cli.order_desc,
    page_size: cli.page_size,
    page_token: cli.page_token,
    sample: cli.sample,
    from,
    to,
    filters_expression: cli.filters_expression,
    metric_filters,
    dimension_filters,
    any: cli.any,
    execute: cli.execute,
    endpoint: cli.endpoint,
  })
}
