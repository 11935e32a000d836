//! Tests for index CLI commands
//!
//! - list-indexes
//! - index-info
//! - delete-index (with --force; the prompt path reads stdin)
//! - verify-index

use crate::cli::test_helpers::{create_cli_test_services, setup_handbook_index};
use docqa::cli::commands::index::{
    execute_delete, execute_info, execute_list, execute_verify, DeleteArgs, InfoArgs, ListArgs,
    VerifyArgs,
};
use docqa::cli::OutputFormat;
use docqa::core::storage::INDEX_FILE;

#[tokio::test]
async fn test_list_empty() {
    let (services, _temp) = create_cli_test_services();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = execute_list(ListArgs {}, &services, format).await;
        assert!(result.is_ok());
    }
}

#[tokio::test]
async fn test_list_with_indexes() {
    let (services, _temp) = create_cli_test_services();
    setup_handbook_index(&services, "alpha").await;
    setup_handbook_index(&services, "beta").await;

    let result = execute_list(ListArgs {}, &services, OutputFormat::Human).await;
    assert!(result.is_ok());
    assert_eq!(services.store.list().unwrap().len(), 2);
}

#[tokio::test]
async fn test_info_existing_index() {
    let (services, _temp) = create_cli_test_services();
    setup_handbook_index(&services, "handbook").await;

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let args = InfoArgs {
            index: Some("handbook".to_string()),
        };
        let result = execute_info(args, &services, format).await;
        assert!(result.is_ok(), "info should succeed: {:?}", result.err());
    }
}

#[tokio::test]
async fn test_info_missing_index() {
    let (services, _temp) = create_cli_test_services();

    let result = execute_info(InfoArgs { index: None }, &services, OutputFormat::Human).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("'faiss_index' not found"));
    assert!(err.to_string().contains("docqa list-indexes"));
}

#[tokio::test]
async fn test_delete_with_force() {
    let (services, _temp) = create_cli_test_services();
    setup_handbook_index(&services, "handbook").await;

    let args = DeleteArgs {
        index: "handbook".to_string(),
        force: true,
    };
    let result = execute_delete(args, &services, OutputFormat::Json).await;

    assert!(result.is_ok());
    assert!(!services.store.exists("handbook"));
}

#[tokio::test]
async fn test_delete_missing_index() {
    let (services, _temp) = create_cli_test_services();

    let args = DeleteArgs {
        index: "ghost".to_string(),
        force: true,
    };
    let result = execute_delete(args, &services, OutputFormat::Human).await;

    assert!(result.unwrap_err().to_string().contains("'ghost' not found"));
}

#[tokio::test]
async fn test_verify_healthy_index() {
    let (services, _temp) = create_cli_test_services();
    setup_handbook_index(&services, "faiss_index").await;

    let args = VerifyArgs {
        index: None,
        all: false,
    };
    let result = execute_verify(args, &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "verify should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_verify_all_detects_corruption() {
    let (services, temp) = create_cli_test_services();
    setup_handbook_index(&services, "good").await;
    setup_handbook_index(&services, "bad").await;

    let path = temp.path().join("bad").join(INDEX_FILE);
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    let args = VerifyArgs {
        index: None,
        all: true,
    };
    let result = execute_verify(args, &services, OutputFormat::Json).await;

    assert!(result
        .unwrap_err()
        .to_string()
        .contains("verification failed"));
}
