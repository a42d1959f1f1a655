use ga_report_builder::{
  DateBounds, DimensionFilterBuilder, FilterClause, GroupOperator, MetricFilterBuilder, ObjectBuilder, ReportRequest,
};
use serde_json::json;

fn pageviews_request() -> ReportRequest {
  let mut pageviews = MetricFilterBuilder::new();
  pageviews.metric("pageviews").less_than_equal_to(1000).inverse();

  let mut request = ReportRequest::new();
  request
    .view("12345")
    .unwrap()
    .page_size(10)
    .unwrap()
    .dimension("pagePath")
    .unwrap()
    .metric("pageviews")
    .unwrap()
    .order_asc("pageviews")
    .unwrap()
    .metric_filter(&pageviews)
    .unwrap();

  request
}

#[test]
fn links_with_more_than_1000_pageviews() {
  test_support::init_tracing();
  let v = pageviews_request().make();

  insta::with_settings!({ sort_maps => true }, {
    insta::assert_json_snapshot!(v, @r#"
    {
      "dimensions": [
        {
          "name": "ga:pagePath"
        }
      ],
      "metricFilterClauses": [
        {
          "filters": [
            {
              "field": "ga:pageviews",
              "inverted": true,
              "operator": "LESS_THAN_OR_EQUAL",
              "value": 1000
            }
          ],
          "operator": "OR"
        }
      ],
      "metrics": [
        {
          "expression": "ga:pageviews",
          "formattingType": "INTEGER"
        }
      ],
      "orderBys": [
        {
          "fieldName": "ga:pageviews",
          "orderType": "VALUE",
          "sortOrder": "ASCENDING"
        }
      ],
      "pageSize": 10,
      "viewId": "12345"
    }
    "#);
  });
}

#[test]
fn materialized_requests_conform_to_schema() {
  let validator = test_support::compile_schema("report-request.schema.json");

  let v = serde_json::to_value(pageviews_request().request_object().unwrap()).unwrap();
  validator.validate(&v).expect("pageviews request");

  let mut country = DimensionFilterBuilder::new();
  country.dimension("country").in_list(["Chile", "Peru"]).inverse();
  let mut blog = DimensionFilterBuilder::new();
  blog.dimension("page path").begins_with("/blog").case_sensitive(false);
  let mut missing = MetricFilterBuilder::new();
  missing.metric("goal1Completions").is_missing();

  let mut request = ReportRequest::new();
  request
    .view("ga:98765")
    .unwrap()
    .precise()
    .unwrap()
    .date_range(DateBounds::between("30daysAgo", "yesterday"))
    .unwrap()
    .histogram("sessionCount", [1, 5, 10])
    .unwrap()
    .order_histogram("sessionCount")
    .unwrap()
    .name_currency("transactionRevenue")
    .unwrap()
    .dimension_filters([&country, &blog])
    .unwrap()
    .metric_or_filters([&missing])
    .unwrap()
    .filters_expression("ga:browser==Firefox")
    .unwrap();

  let v = serde_json::to_value(request.request_object().unwrap()).unwrap();
  validator.validate(&v).expect("full request");
}

#[test]
fn schema_rejects_unprefixed_and_unknown_fields() {
  let schema = test_support::read_schema("report-request.schema.json");
  let validator = jsonschema::validator_for(&schema).expect("compile schema");

  let mut request = ReportRequest::new();
  request.metrics(["ga:CTR", "ga:calcMetric_my_metric"]).unwrap();
  assert!(validator.is_valid(&request.make()));

  assert!(!validator.is_valid(&json!({ "metrics": [{ "expression": "CTR", "formattingType": "INTEGER" }] })));
  assert!(!validator.is_valid(&json!({ "viewId": "1", "sampleLevel": "LARGE" })));
}

#[test]
fn date_range_keeps_a_single_range() {
  let mut request = ReportRequest::new();
  request.date_range(DateBounds::between("2020-01-01", "2020-01-31")).unwrap();
  assert_eq!(
    request.make(),
    json!({"dateRanges": [{"startDate": "2020-01-01", "endDate": "2020-01-31"}]})
  );

  request.date_range(DateBounds::between("2020-02-01", "2020-02-29")).unwrap();
  assert_eq!(request.make()["dateRanges"].as_array().unwrap().len(), 1);
  assert_eq!(request.make()["dateRanges"][0]["startDate"], json!("2020-02-01"));
}

#[test]
fn histogram_replaces_earlier_dimensions() {
  let mut request = ReportRequest::new();
  request.dimension("city").unwrap().dimension("country").unwrap();
  request.histogram("sessionCount", [0, 10, 20]).unwrap();

  assert_eq!(
    request.make()["dimensions"],
    json!([{"name": "ga:sessionCount", "histogramBuckets": ["0", "10", "20"]}])
  );
}

#[test]
fn repeated_make_is_stable() {
  let request = pageviews_request();
  assert_eq!(request.make(), request.make());
  assert_eq!(request.request_object().unwrap(), request.request_object().unwrap());
}

#[test]
fn nested_groups_round_out_a_clause_list() {
  let mut users = MetricFilterBuilder::new();
  users.metric("users").greater_than(100);
  let mut sessions = MetricFilterBuilder::new();
  sessions.metric("sessions").greater_than(50);

  let either = ga_report_builder::compose_group(
    [&users, &sessions],
    GroupOperator::Or,
    &ga_report_builder::PrefixNameResolver,
  )
  .unwrap();

  let mut bounce = MetricFilterBuilder::new();
  bounce.metric("bounceRate").less_than(0.5);

  let mut request = ReportRequest::new();
  request
    .metric_filters([&bounce as &dyn FilterClause, &either])
    .unwrap();

  let clauses = &request.make()["metricFilterClauses"];
  assert_eq!(clauses[0]["operator"], json!("AND"));
  assert_eq!(clauses[0]["filters"][0]["field"], json!("ga:bounceRate"));
  assert_eq!(clauses[0]["filters"][1]["operator"], json!("OR"));
  assert_eq!(clauses[0]["filters"][1]["filters"][1]["field"], json!("ga:sessions"));
}
