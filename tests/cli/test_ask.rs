//! Tests for the ask CLI command

use crate::cli::test_helpers::{create_cli_test_services, setup_handbook_index};
use docqa::cli::commands::ask::{execute, AskArgs};
use docqa::cli::OutputFormat;

fn args(question: &str, index: Option<&str>) -> AskArgs {
    AskArgs {
        question: question.to_string(),
        index: index.map(str::to_string),
        k: None,
        show_context: false,
    }
}

#[tokio::test]
async fn test_ask_human_with_context() {
    let (services, _temp) = create_cli_test_services();
    setup_handbook_index(&services, "handbook").await;

    let mut ask_args = args("How many vacation days?", Some("handbook"));
    ask_args.show_context = true;
    ask_args.k = Some(2);

    let result = execute(ask_args, &services, OutputFormat::Human).await;
    assert!(result.is_ok(), "ask should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_ask_json() {
    let (services, _temp) = create_cli_test_services();
    setup_handbook_index(&services, "faiss_index").await;

    let result = execute(args("remote work", None), &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "ask should succeed: {:?}", result.err());
}

#[tokio::test]
async fn test_ask_missing_index() {
    let (services, _temp) = create_cli_test_services();

    let result = execute(args("anything?", Some("nope")), &services, OutputFormat::Human).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Index not found"));
}

#[tokio::test]
async fn test_ask_empty_question() {
    let (services, _temp) = create_cli_test_services();
    setup_handbook_index(&services, "faiss_index").await;

    let result = execute(args("  ", None), &services, OutputFormat::Human).await;
    assert!(result.is_err());
}
