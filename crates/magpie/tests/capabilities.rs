use serde_json::json;

use magpie::capabilities::default_registry;

#[test]
fn test_default_registry_contents() {
    let registry = default_registry().unwrap();
    assert_eq!(registry.len(), 3);

    for name in ["calculator", "current_time", "json_parse"] {
        let capability = registry.lookup(name).unwrap();
        assert_eq!(capability.name(), name);
        assert!(!capability.description().is_empty());

        let schema = capability.input_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"].is_object());
    }

    let names: Vec<String> = registry
        .definitions()
        .into_iter()
        .map(|tool| tool.name)
        .collect();
    assert_eq!(names, vec!["calculator", "current_time", "json_parse"]);
}

#[test]
fn test_schemas_for_preserves_configured_order() {
    let registry = default_registry().unwrap();

    let schemas = registry.schemas_for(&[
        "json_parse".to_string(),
        "calculator".to_string(),
        "unknown_tool".to_string(),
    ]);

    let names: Vec<&str> = schemas.iter().map(|tool| tool.name.as_str()).collect();
    assert_eq!(names, vec!["json_parse", "calculator"]);
}

#[tokio::test]
async fn test_calculator_through_the_registry() {
    let registry = default_registry().unwrap();
    let calculator = registry.lookup("calculator").unwrap();

    let result = calculator
        .call(json!({"expression": "sqrt(16)"}))
        .await
        .unwrap();
    assert_eq!(result, json!(4.0));

    let error = calculator.call(json!({"expression": "2 +"})).await;
    assert!(error.is_err());
}

#[tokio::test]
async fn test_current_time_through_the_registry() {
    let registry = default_registry().unwrap();
    let clock = registry.lookup("current_time").unwrap();

    let result = clock.call(json!({"format": "date"})).await.unwrap();
    assert_eq!(result.as_str().unwrap().len(), 10); // YYYY-MM-DD
}

#[tokio::test]
async fn test_json_parse_through_the_registry() {
    let registry = default_registry().unwrap();
    let json_parse = registry.lookup("json_parse").unwrap();

    let result = json_parse
        .call(json!({
            "json_string": r#"{"data": {"items": [{"name": "only"}]}}"#,
            "path": "data.items[0].name"
        }))
        .await
        .unwrap();
    assert_eq!(result, json!("only"));
}
