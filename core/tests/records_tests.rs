// tests/records_tests.rs
use bulk_reroute::{extract_work_items, parse_jsonl, ExtractRule, ReferencePattern, WorkItem};
use serde_json::json;

const MIXED_EXPORT: &str = r#"{}
{"id":"gid://shopify/FulfillmentOrder/78912358671","order_reference":"gid://shopify/Order/12345","__typename":"FulfillmentOrder"}
{}
{"id":"gid://shopify/FulfillmentOrder/78912358672","order_reference":"gid://shopify/Order/12346","__typename":"FulfillmentOrder"}
{}
{"id":"gid://shopify/FulfillmentOrder/78912358673","order_reference":"gid://shopify/Order/12347","__typename":"FulfillmentOrder"}"#;

#[test]
fn test_parse_keeps_placeholders_and_drops_corrupt_lines() {
  let records = parse_jsonl("{}\n{\"__typename\":\"X\",\"id\":\"1\"}\n not-json\n");

  // The empty object survives parsing; the corrupt line does not.
  assert_eq!(records.len(), 2);
  assert!(records[0].is_placeholder());
  assert_eq!(records[1].typename(), Some("X"));

  let rule = ExtractRule {
    typename: "X".to_string(),
    ..ExtractRule::default()
  };
  let items = extract_work_items(&records, &rule);
  assert_eq!(
    items,
    vec![WorkItem {
      fulfillment_order_id: "1".to_string(),
      order_id: None
    }]
  );
}

#[test]
fn test_parse_trims_and_skips_blank_lines() {
  let records = parse_jsonl("\n   {\"a\": 1}   \r\n\n\t\n[1,2]\n");
  assert_eq!(records.len(), 2);
  assert_eq!(records[0].value(), &json!({"a": 1}));
  assert_eq!(records[1].value(), &json!([1, 2]));
  assert!(!records[1].is_placeholder());
}

#[test]
fn test_parse_of_empty_input_is_empty() {
  assert!(parse_jsonl("").is_empty());
  assert!(parse_jsonl("\n\n").is_empty());
}

#[test]
fn test_extract_preserves_order_of_fulfillment_orders() {
  let records = parse_jsonl(MIXED_EXPORT);
  assert_eq!(records.len(), 6);

  let ids: Vec<String> = extract_work_items(&records, &ExtractRule::default())
    .into_iter()
    .map(|i| i.fulfillment_order_id)
    .collect();
  assert_eq!(
    ids,
    vec![
      "gid://shopify/FulfillmentOrder/78912358671",
      "gid://shopify/FulfillmentOrder/78912358672",
      "gid://shopify/FulfillmentOrder/78912358673",
    ]
  );
}

#[test]
fn test_extract_requires_type_and_non_empty_id() {
  let text = [
    r#"{"__typename":"Order","id":"gid://shopify/Order/1"}"#,
    r#"{"__typename":"FulfillmentOrder","id":""}"#,
    r#"{"__typename":"FulfillmentOrder"}"#,
    r#"{"__typename":"FulfillmentOrder","id":42}"#,
    r#"{"id":"gid://shopify/FulfillmentOrder/5"}"#,
    r#"{"__typename":"FulfillmentOrder","id":"gid://shopify/FulfillmentOrder/6"}"#,
  ]
  .join("\n");

  let items = extract_work_items(&parse_jsonl(&text), &ExtractRule::default());
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].fulfillment_order_id, "gid://shopify/FulfillmentOrder/6");
}

#[test]
fn test_reference_pattern_derives_order_ids_and_drops_mismatches() {
  let text = [
    r#"{"__typename":"FulfillmentOrder","id":"gid://shopify/FulfillmentOrder/1","order_reference":"gid://shopify/Order/12345"}"#,
    r#"{"__typename":"FulfillmentOrder","id":"gid://shopify/FulfillmentOrder/2","order_reference":"gid://shopify/Order/abc"}"#,
    r#"{"__typename":"FulfillmentOrder","id":"gid://shopify/FulfillmentOrder/3"}"#,
    r#"{"__typename":"FulfillmentOrder","id":"gid://shopify/FulfillmentOrder/4","order_reference":"gid://shopify/Order/777/extra"}"#,
    r#"{"__typename":"FulfillmentOrder","id":"gid://shopify/FulfillmentOrder/5","order_reference":"gid://shopify/Order/98765"}"#,
  ]
  .join("\n");
  let rule = ExtractRule::default().with_reference(ReferencePattern::order_reference());

  let items = extract_work_items(&parse_jsonl(&text), &rule);
  assert_eq!(
    items,
    vec![
      WorkItem {
        fulfillment_order_id: "gid://shopify/FulfillmentOrder/1".to_string(),
        order_id: Some(12345)
      },
      WorkItem {
        fulfillment_order_id: "gid://shopify/FulfillmentOrder/5".to_string(),
        order_id: Some(98765)
      },
    ]
  );
}

#[test]
fn test_custom_reference_pattern() {
  let pattern = ReferencePattern::new("parent", r"/Parent/(\d+)$").unwrap();
  let rule = ExtractRule::default().with_reference(pattern);
  let records = parse_jsonl(r#"{"__typename":"FulfillmentOrder","id":"fo-1","parent":"gid://x/Parent/9"}"#);
  let items = extract_work_items(&records, &rule);
  assert_eq!(items[0].order_id, Some(9));

  assert!(ReferencePattern::new("parent", "(").is_err());
}
