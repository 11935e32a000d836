//! Chat sessions over the query flow

use crate::common::{create_test_services, pdf_with_pages, upload, HANDBOOK_PAGES};
use docqa::core::session::ChatSession;

#[tokio::test]
async fn test_session_records_answered_questions() {
    let (services, _temp) = create_test_services();
    services
        .process(
            Some("handbook"),
            &[upload("handbook.pdf", pdf_with_pages(&HANDBOOK_PAGES))],
            None,
            None,
        )
        .await
        .unwrap();

    let mut session = ChatSession::new("handbook");
    services
        .ask_in_session(&mut session, "vacation days", None)
        .await
        .unwrap();
    services
        .ask_in_session(&mut session, "expense reimbursement", None)
        .await
        .unwrap();

    let questions: Vec<&str> = session.history().map(|e| e.question.as_str()).collect();
    assert_eq!(questions, vec!["expense reimbursement", "vacation days"]);
}

#[tokio::test]
async fn test_failed_question_is_not_recorded() {
    let (services, _temp) = create_test_services();

    let mut session = ChatSession::new("missing");
    let err = services
        .ask_in_session(&mut session, "anything?", None)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(session.is_empty());
}
