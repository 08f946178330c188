//! Tests for snapshot CLI commands (export, import)

use crate::cli::test_helpers::{create_cli_test_services, setup_article_index};
use sift::cli::commands::snapshot::{execute_export, execute_import, ExportArgs, ImportArgs};
use sift::cli::OutputFormat;

#[tokio::test]
async fn test_export_then_import_into_other_node() {
    let (source, source_temp) = create_cli_test_services().await;
    setup_article_index(&source, "articles");
    setup_article_index(&source, "users");

    let path = source_temp.path().join("indexes.snapshot");
    let export = ExportArgs { path: path.clone() };
    assert!(execute_export(export, &source, OutputFormat::Human)
        .await
        .is_ok());
    assert!(std::fs::metadata(&path).unwrap().len() > 0);

    let (target, _target_temp) = create_cli_test_services().await;
    setup_article_index(&target, "users");

    let import = ImportArgs { path };
    assert!(execute_import(import, &target, OutputFormat::Json)
        .await
        .is_ok());

    let names: Vec<_> = target.indexes.list().into_iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["articles", "users"]);
    assert_eq!(
        target.indexes.get("articles").unwrap(),
        source.indexes.get("articles").unwrap()
    );
}

#[tokio::test]
async fn test_export_empty_store() {
    let (services, temp) = create_cli_test_services().await;

    let args = ExportArgs {
        path: temp.path().join("empty.snapshot"),
    };
    assert!(execute_export(args, &services, OutputFormat::Json)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_import_missing_file() {
    let (services, temp) = create_cli_test_services().await;

    let args = ImportArgs {
        path: temp.path().join("absent.snapshot"),
    };
    assert!(execute_import(args, &services, OutputFormat::Human)
        .await
        .is_err());
}

#[tokio::test]
async fn test_import_garbage_file() {
    let (services, temp) = create_cli_test_services().await;
    let path = temp.path().join("garbage.snapshot");
    std::fs::write(&path, b"definitely not bincode").unwrap();

    let args = ImportArgs { path };
    assert!(execute_import(args, &services, OutputFormat::Human)
        .await
        .is_err());
    assert!(services.indexes.list().is_empty());
}
