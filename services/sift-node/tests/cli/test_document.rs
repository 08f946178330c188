//! Tests for the validate-document CLI command
//!
//! - Valid documents in both output formats
//! - Per-field failures carried as a 422 validation error
//! - Non-object and malformed input rejected as bad requests

use crate::cli::test_helpers::{create_cli_test_services, setup_article_index, write_json};
use crate::common::valid_article;
use serde_json::{json, Value};
use sift::cli::commands::document::{execute, parse_document, DocumentArgs};
use sift::cli::OutputFormat;
use sift::SiftError;

#[tokio::test]
async fn test_validate_document_valid() {
    let (services, temp) = create_cli_test_services().await;
    setup_article_index(&services, "articles");
    let document = write_json(temp.path(), "doc.json", &Value::Object(valid_article()));

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = DocumentArgs {
            index: "articles".to_string(),
            document: document.clone(),
        };
        let result = execute(args, &services, format).await;
        assert!(result.is_ok(), "Valid document rejected: {:?}", result.err());
    }
}

#[tokio::test]
async fn test_validate_document_field_errors() {
    let (services, temp) = create_cli_test_services().await;
    setup_article_index(&services, "articles");
    let document = write_json(
        temp.path(),
        "doc.json",
        &json!({"title": "x", "author": {"name": "sam"}, "flags": 1000, "extra": true}),
    );

    let args = DocumentArgs {
        index: "articles".to_string(),
        document,
    };
    let err = execute(args, &services, OutputFormat::Json)
        .await
        .unwrap_err();
    let sift_err = err.downcast_ref::<SiftError>().unwrap();
    assert_eq!(sift_err.status_code(), 422);

    let paths: Vec<_> = sift_err
        .field_errors()
        .iter()
        .map(|e| e.path.as_str())
        .collect();
    assert_eq!(paths.len(), 2);
    assert!(paths.contains(&"flags"));
    assert!(paths.contains(&"extra"));
}

#[tokio::test]
async fn test_validate_document_unknown_index() {
    let (services, temp) = create_cli_test_services().await;
    let document = write_json(temp.path(), "doc.json", &json!({"title": "x"}));

    let args = DocumentArgs {
        index: "missing".to_string(),
        document,
    };
    let err = execute(args, &services, OutputFormat::Human)
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<SiftError>().unwrap().is_not_found());
}

#[test]
fn test_parse_document_requires_an_object() {
    assert!(parse_document(r#"{"a": 1}"#).is_ok());

    let array = parse_document("[1, 2]").unwrap_err();
    assert!(array.is_bad_request());
    assert!(array.to_string().contains("got array"));

    let malformed = parse_document("{\"a\":").unwrap_err();
    assert!(malformed.is_bad_request());
}

#[test]
fn test_parse_document_keeps_number_literals() {
    let doc = parse_document(r#"{"big": 18446744073709551616, "exact": 0.1000000000000000055511151231257827}"#)
        .unwrap();
    assert_eq!(doc["big"].to_string(), "18446744073709551616");
    assert_eq!(
        doc["exact"].to_string(),
        "0.1000000000000000055511151231257827"
    );
}
