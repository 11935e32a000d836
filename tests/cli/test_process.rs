//! Tests for the process CLI command
//!
//! - Processing PDFs from disk into the default and named indexes
//! - Chunking overrides
//! - Error cases (no files, missing file, no text)

use crate::cli::test_helpers::create_cli_test_services;
use crate::common::{pdf_with_pages, PdfDir};
use docqa::cli::commands::process::{execute, ProcessArgs};
use docqa::cli::OutputFormat;
use std::path::PathBuf;

fn args(pdfs: Vec<PathBuf>, index: Option<&str>) -> ProcessArgs {
    ProcessArgs {
        pdfs,
        index: index.map(str::to_string),
        chunk_size: None,
        overlap: None,
        quiet: true,
    }
}

#[tokio::test]
async fn test_process_default_index_human() {
    let (services, _temp) = create_cli_test_services();
    let pdfs = PdfDir::handbook();

    let result = execute(args(pdfs.files.clone(), None), &services, OutputFormat::Human).await;

    assert!(result.is_ok(), "process should succeed: {:?}", result.err());
    assert!(services.store.exists("faiss_index"));
}

#[tokio::test]
async fn test_process_named_index_json() {
    let (services, _temp) = create_cli_test_services();
    let pdfs = PdfDir::handbook();

    let result = execute(
        args(pdfs.files.clone(), Some("handbook")),
        &services,
        OutputFormat::Json,
    )
    .await;

    assert!(result.is_ok(), "process should succeed: {:?}", result.err());
    let meta = services.store.get_metadata("handbook").unwrap();
    assert_eq!(meta.documents, 2);
}

#[tokio::test]
async fn test_process_chunk_overrides() {
    let (services, _temp) = create_cli_test_services();
    let pdfs = PdfDir::handbook();

    let mut process_args = args(pdfs.files.clone(), Some("tuned"));
    process_args.chunk_size = Some(200);
    process_args.overlap = Some(50);
    execute(process_args, &services, OutputFormat::Human)
        .await
        .unwrap();

    let meta = services.store.get_metadata("tuned").unwrap();
    assert_eq!(meta.chunk_size, 200);
    assert_eq!(meta.overlap, 50);
}

#[tokio::test]
async fn test_process_without_files_fails() {
    let (services, _temp) = create_cli_test_services();

    let result = execute(args(vec![], None), &services, OutputFormat::Human).await;

    let err = result.unwrap_err();
    assert!(err
        .to_string()
        .contains("Please upload at least one PDF document."));
}

#[tokio::test]
async fn test_process_missing_file_fails() {
    let (services, _temp) = create_cli_test_services();
    let pdfs = PdfDir::handbook();
    let missing = pdfs.path().join("does-not-exist.pdf");

    let result = execute(args(vec![missing], None), &services, OutputFormat::Human).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("does-not-exist.pdf"));
    assert!(!services.store.exists("faiss_index"));
}

#[tokio::test]
async fn test_process_blank_pdf_fails() {
    let (services, _temp) = create_cli_test_services();
    let pdfs = PdfDir::with_files(&[("blank.pdf", pdf_with_pages(&[""]))]);

    let result = execute(args(pdfs.files.clone(), None), &services, OutputFormat::Json).await;

    assert!(result.is_err());
    assert!(!services.store.exists("faiss_index"));
}
