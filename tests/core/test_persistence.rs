//! Index persistence across service instances

use crate::common::{
    create_test_services, pdf_with_pages, services_with, upload, EchoSynthesizer, HashEmbedder,
    HANDBOOK_PAGES,
};
use docqa::core::error::DocQaError;
use docqa::core::storage::{IndexValidator, INDEX_FILE};
use std::sync::Arc;

#[tokio::test]
async fn test_index_survives_restart() {
    let (services, temp) = create_test_services();
    services
        .process(
            None,
            &[upload("handbook.pdf", pdf_with_pages(&HANDBOOK_PAGES))],
            None,
            None,
        )
        .await
        .unwrap();
    let before = services
        .ask(None, "remote work days", None)
        .await
        .unwrap();
    drop(services);

    let restarted = services_with(
        temp.path(),
        Arc::new(HashEmbedder::default()),
        Arc::new(EchoSynthesizer::default()),
    );
    let after = restarted
        .ask(None, "remote work days", None)
        .await
        .unwrap();

    assert_eq!(before.context, after.context);
}

#[tokio::test]
async fn test_corrupt_index_is_detected() {
    let (services, temp) = create_test_services();
    services
        .process(
            Some("docs"),
            &[upload("handbook.pdf", pdf_with_pages(&HANDBOOK_PAGES))],
            None,
            None,
        )
        .await
        .unwrap();

    // Flip the last byte of the vector data
    let path = temp.path().join("docs").join(INDEX_FILE);
    let mut bytes = std::fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    std::fs::write(&path, bytes).unwrap();

    let err = services
        .ask(Some("docs"), "vacation", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DocQaError::IndexCorrupt(_)));

    let report = IndexValidator::new(&services.store).validate("docs").unwrap();
    assert!(!report.checksum_ok);
    assert!(!report.is_consistent);
}

#[tokio::test]
async fn test_list_and_delete_indexes() {
    let (services, _temp) = create_test_services();
    let docs = vec![upload("handbook.pdf", pdf_with_pages(&HANDBOOK_PAGES))];
    services.process(Some("beta"), &docs, None, None).await.unwrap();
    services.process(Some("alpha"), &docs, None, None).await.unwrap();

    let names: Vec<String> = services
        .store
        .list()
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["alpha", "beta"]);

    services.store.delete("alpha").unwrap();
    assert!(!services.store.exists("alpha"));
    assert!(services.store.exists("beta"));

    let err = services.store.delete("alpha").unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_validate_all_reports_every_index() {
    let (services, _temp) = create_test_services();
    let docs = vec![upload("handbook.pdf", pdf_with_pages(&HANDBOOK_PAGES))];
    services.process(Some("one"), &docs, None, None).await.unwrap();
    services.process(Some("two"), &docs, None, None).await.unwrap();

    let reports = IndexValidator::new(&services.store).validate_all().unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.is_consistent));
}
