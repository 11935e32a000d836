//! Query flow: retrieval, ranking and answer synthesis

use crate::common::{
    create_test_services, hash_embed, pdf_with_pages, services_with, upload, EchoSynthesizer,
    FailingSynthesizer, HashEmbedder, HANDBOOK_PAGES,
};
use docqa::core::error::DocQaError;
use docqa::core::services::Services;
use std::sync::atomic::Ordering;
use std::sync::Arc;

async fn process_handbook(services: &Services, index: &str) {
    services
        .process(
            Some(index),
            &[upload("handbook.pdf", pdf_with_pages(&HANDBOOK_PAGES))],
            None,
            None,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_ask_retrieves_relevant_chunk() {
    let (services, _temp) = create_test_services();
    process_handbook(&services, "handbook").await;

    let answer = services
        .ask(
            Some("handbook"),
            "How many vacation days per year do full time employees receive?",
            Some(1),
        )
        .await
        .unwrap();

    assert_eq!(answer.index, "handbook");
    assert_eq!(answer.context.len(), 1);
    assert!(answer.context[0].text.contains("twenty vacation days"));
    assert!(answer.answer.contains("twenty vacation days"));
}

#[tokio::test]
async fn test_context_is_ranked_by_score() {
    let (services, _temp) = create_test_services();
    process_handbook(&services, "handbook").await;

    let answer = services
        .ask(Some("handbook"), "laptops disk encryption screen lock", None)
        .await
        .unwrap();

    assert!(!answer.context.is_empty());
    assert!(answer.context.len() <= 4);
    for pair in answer.context.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert!(answer.context[0].text.contains("encryption"));
}

#[tokio::test]
async fn test_synthesizer_receives_joined_context() {
    let temp = tempfile::TempDir::new().unwrap();
    let synthesizer = Arc::new(EchoSynthesizer::default());
    let services = services_with(
        temp.path(),
        Arc::new(HashEmbedder::default()),
        synthesizer.clone(),
    );
    process_handbook(&services, "handbook").await;

    let answer = services
        .ask(Some("handbook"), "remote work approval", Some(2))
        .await
        .unwrap();

    let contexts = synthesizer.contexts.lock().unwrap();
    assert_eq!(contexts.len(), 1);
    let expected: Vec<&str> = answer.context.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(contexts[0], expected.join("\n\n"));
}

#[tokio::test]
async fn test_k_larger_than_index_returns_everything() {
    let (services, _temp) = create_test_services();
    process_handbook(&services, "handbook").await;
    let chunks = services.store.get_metadata("handbook").unwrap().chunks;

    let answer = services
        .ask(Some("handbook"), "policy", Some(40))
        .await
        .unwrap();

    assert_eq!(answer.context.len(), chunks);
}

#[tokio::test]
async fn test_k_zero_is_rejected() {
    let (services, _temp) = create_test_services();
    process_handbook(&services, "handbook").await;

    let err = services
        .ask(Some("handbook"), "policy", Some(0))
        .await
        .unwrap_err();
    assert!(err.is_bad_request());
}

#[tokio::test]
async fn test_empty_question_is_rejected() {
    let (services, _temp) = create_test_services();
    process_handbook(&services, "handbook").await;

    let err = services
        .ask(Some("handbook"), "   \n", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DocQaError::InvalidInput(_)));
}

#[tokio::test]
async fn test_missing_index_fails_before_embedding() {
    let temp = tempfile::TempDir::new().unwrap();
    let embedder = Arc::new(HashEmbedder::default());
    let services = services_with(
        temp.path(),
        embedder.clone(),
        Arc::new(EchoSynthesizer::default()),
    );

    let err = services.ask(None, "anything?", None).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("faiss_index"));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_identical_ingest_gives_identical_results() {
    let (services, _temp) = create_test_services();
    process_handbook(&services, "first").await;
    process_handbook(&services, "second").await;

    let question = "travel expenses reimbursed";
    let a = services.ask(Some("first"), question, None).await.unwrap();
    let b = services.ask(Some("second"), question, None).await.unwrap();

    assert_eq!(a.context, b.context);
}

#[tokio::test]
async fn test_scores_match_l2_distance() {
    let (services, _temp) = create_test_services();
    process_handbook(&services, "handbook").await;

    let question = "screen lock";
    let answer = services
        .ask(Some("handbook"), question, Some(1))
        .await
        .unwrap();

    let q = hash_embed(question);
    let c = hash_embed(&answer.context[0].text);
    let dist: f32 = q.iter().zip(&c).map(|(a, b)| (a - b) * (a - b)).sum();
    assert!((answer.context[0].score - 1.0 / (1.0 + dist)).abs() < 1e-5);
}

#[tokio::test]
async fn test_synthesis_failure_surfaces() {
    let temp = tempfile::TempDir::new().unwrap();
    let services = services_with(
        temp.path(),
        Arc::new(HashEmbedder::default()),
        Arc::new(FailingSynthesizer),
    );
    process_handbook(&services, "handbook").await;

    let err = services
        .ask(Some("handbook"), "vacation", None)
        .await
        .unwrap_err();

    assert!(matches!(err, DocQaError::SynthesisService { .. }));
    assert!(!err.is_retryable());
}
