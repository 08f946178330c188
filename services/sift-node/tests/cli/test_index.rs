//! Tests for index CLI commands (list, get, create, delete)
//!
//! - list-indexes: List all indexes
//! - get-index: Show one index with its field tree
//! - create-index: Create an index from a request body file
//! - delete-index: Delete an index (with --force)

use crate::cli::test_helpers::{create_cli_test_services, setup_article_index, write_json};
use crate::common::{article_request, article_schema};
use serde_json::json;
use sift::cli::commands::index::{
    execute_create, execute_delete, execute_get, execute_list, render_fields, CreateArgs,
    DeleteArgs, GetArgs, IndexListResponse, ListArgs,
};
use sift::cli::OutputFormat;
use sift::SiftError;

// =============================================================================
// list-indexes tests
// =============================================================================

#[tokio::test]
async fn test_list_indexes_empty() {
    let (services, _temp) = create_cli_test_services().await;

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = execute_list(ListArgs {}, &services, format).await;
        assert!(result.is_ok(), "List empty indexes should succeed");
    }
}

#[tokio::test]
async fn test_list_indexes_multiple() {
    let (services, _temp) = create_cli_test_services().await;
    setup_article_index(&services, "zeta");
    setup_article_index(&services, "alpha");

    let result = execute_list(ListArgs {}, &services, OutputFormat::Human).await;
    assert!(result.is_ok());

    let response = IndexListResponse::from_indexes(&services.indexes.list());
    assert_eq!(response.count, 2);
    assert_eq!(response.indexes[0].name, "alpha");
    assert_eq!(response.indexes[1].name, "zeta");
    assert_eq!(response.indexes[0].fields, article_schema().fields.len());
    assert_eq!(response.indexes[0].analyzers, 2);

    let json = serde_json::to_value(&response).unwrap();
    assert!(json["indexes"][0].get("createdAt").is_some());
}

// =============================================================================
// get-index tests
// =============================================================================

#[tokio::test]
async fn test_get_index_found() {
    let (services, _temp) = create_cli_test_services().await;
    setup_article_index(&services, "articles");

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = GetArgs {
            name: "articles".to_string(),
        };
        assert!(execute_get(args, &services, format).await.is_ok());
    }
}

#[tokio::test]
async fn test_get_index_not_found() {
    let (services, _temp) = create_cli_test_services().await;

    let args = GetArgs {
        name: "missing".to_string(),
    };
    let err = execute_get(args, &services, OutputFormat::Human)
        .await
        .unwrap_err();
    let sift_err = err.downcast_ref::<SiftError>().expect("expected a SiftError");
    assert!(sift_err.is_not_found());
}

#[test]
fn test_render_fields_nests_children() {
    let schema = article_schema();
    let lines = render_fields(&schema.fields, 0);

    // One line per field at every depth
    assert_eq!(lines.len(), schema.fields.len() + 2 + 2);

    let author = lines
        .iter()
        .position(|l| l.contains("author"))
        .expect("author line");
    assert!(lines[author].contains("map"));
    assert!(lines[author].contains("required"));
    assert!(lines[author + 1].starts_with("  "));
    assert!(lines[author + 1].contains("bio"));
    assert!(lines[author + 1].contains("analyzer=std"));
}

// =============================================================================
// create-index tests
// =============================================================================

#[tokio::test]
async fn test_create_index_from_body_file() {
    let (services, temp) = create_cli_test_services().await;
    let body = write_json(temp.path(), "articles.json", &article_request());

    let args = CreateArgs {
        name: "articles".to_string(),
        body,
    };
    let result = execute_create(args, &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "Create should succeed: {:?}", result.err());

    let index = services.indexes.get("articles").unwrap();
    assert_eq!(index.schema, article_schema());
}

#[tokio::test]
async fn test_create_index_twice_conflicts() {
    let (services, temp) = create_cli_test_services().await;
    let body = write_json(temp.path(), "articles.json", &article_request());

    let first = CreateArgs {
        name: "articles".to_string(),
        body: body.clone(),
    };
    execute_create(first, &services, OutputFormat::Human)
        .await
        .unwrap();

    let second = CreateArgs {
        name: "articles".to_string(),
        body,
    };
    let err = execute_create(second, &services, OutputFormat::Human)
        .await
        .unwrap_err();
    assert_eq!(err.downcast_ref::<SiftError>().unwrap().status_code(), 409);
}

#[tokio::test]
async fn test_create_index_invalid_schema() {
    let (services, temp) = create_cli_test_services().await;
    let body = write_json(
        temp.path(),
        "bad.json",
        &json!({"schema": {"fields": {"tags": {"type": "slice"}}}}),
    );

    let args = CreateArgs {
        name: "bad".to_string(),
        body,
    };
    let err = execute_create(args, &services, OutputFormat::Json)
        .await
        .unwrap_err();
    let sift_err = err.downcast_ref::<SiftError>().unwrap();
    assert_eq!(sift_err.status_code(), 422);
    assert_eq!(sift_err.field_errors()[0].path, "schema.fields.tags.children");
    assert!(services.indexes.list().is_empty());
}

#[tokio::test]
async fn test_create_index_malformed_body() {
    let (services, temp) = create_cli_test_services().await;
    let path = temp.path().join("broken.json");
    std::fs::write(&path, "{\"schema\": ").unwrap();

    let args = CreateArgs {
        name: "broken".to_string(),
        body: path,
    };
    let err = execute_create(args, &services, OutputFormat::Human)
        .await
        .unwrap_err();
    assert_eq!(err.downcast_ref::<SiftError>().unwrap().status_code(), 400);
}

#[tokio::test]
async fn test_create_index_missing_body_file() {
    let (services, temp) = create_cli_test_services().await;

    let args = CreateArgs {
        name: "articles".to_string(),
        body: temp.path().join("nope.json"),
    };
    assert!(execute_create(args, &services, OutputFormat::Human)
        .await
        .is_err());
}

// =============================================================================
// delete-index tests
// =============================================================================

#[tokio::test]
async fn test_delete_index_force() {
    let (services, _temp) = create_cli_test_services().await;
    setup_article_index(&services, "articles");

    let args = DeleteArgs {
        name: "articles".to_string(),
        force: true,
    };
    assert!(execute_delete(args, &services, OutputFormat::Json)
        .await
        .is_ok());
    assert!(services.indexes.get("articles").unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_delete_index_not_found() {
    let (services, _temp) = create_cli_test_services().await;

    let args = DeleteArgs {
        name: "missing".to_string(),
        force: true,
    };
    let err = execute_delete(args, &services, OutputFormat::Human)
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<SiftError>().unwrap().is_not_found());
}
