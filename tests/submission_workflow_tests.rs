use card_portal::{
    client::{
        IdentityProvider, InMemoryIdentityProvider, Session, SubmissionError, SubmissionWorkflow,
        WorkflowState, WorkflowView,
    },
    error::{StoreError, ValidationError},
    models::{Category, SubmissionDraft},
    storage::{InMemorySubmissionStore, StorageState},
};
use std::sync::Arc;

fn ada() -> Session {
    Session::new("uid-ada")
        .with_email("ada@example.com")
        .with_display_name("Ada")
}

fn filled_draft() -> SubmissionDraft {
    SubmissionDraft {
        name: "  Zed  ".to_string(),
        description: "Fast editor".to_string(),
        icon: String::new(),
        link: " https://zed.dev ".to_string(),
        category: "software".to_string(),
    }
}

/// Signs in, opens the form and fills it in.
async fn open_workflow(
    store: Arc<InMemorySubmissionStore>,
) -> (SubmissionWorkflow, InMemoryIdentityProvider) {
    let identity = InMemoryIdentityProvider::new(ada());
    let mut workflow = SubmissionWorkflow::new(store as StorageState, &identity);
    identity.sign_in().await.unwrap();
    workflow.open().unwrap();
    *workflow.draft_mut() = filled_draft();
    (workflow, identity)
}

#[tokio::test]
async fn test_sign_in_prompt_without_session() {
    let identity = InMemoryIdentityProvider::new(ada());
    let store = Arc::new(InMemorySubmissionStore::new());
    let mut workflow = SubmissionWorkflow::new(store.clone() as StorageState, &identity);

    assert_eq!(workflow.view(), WorkflowView::SignInPrompt);
    assert_eq!(workflow.open(), Err(SubmissionError::NotSignedIn));
    assert_eq!(workflow.state(), WorkflowState::Closed);
    assert_eq!(workflow.submit().await.unwrap_err(), SubmissionError::FormClosed);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_form_available_after_sign_in() {
    let identity = InMemoryIdentityProvider::new(ada());
    let store = Arc::new(InMemorySubmissionStore::new());
    let mut workflow = SubmissionWorkflow::new(store as StorageState, &identity);

    identity.sign_in().await.unwrap();
    assert_eq!(workflow.session(), Some(ada()));
    assert_eq!(workflow.view(), WorkflowView::Closed);

    workflow.open().unwrap();
    assert_eq!(
        workflow.view(),
        WorkflowView::Form {
            draft: &SubmissionDraft::default(),
            error: None,
            submitting: false,
        }
    );
}

#[tokio::test]
async fn test_cancelled_sign_in_keeps_prompt() {
    let identity = InMemoryIdentityProvider::cancelling();
    let store = Arc::new(InMemorySubmissionStore::new());
    let workflow = SubmissionWorkflow::new(store as StorageState, &identity);

    assert!(identity.sign_in().await.is_err());
    assert_eq!(workflow.view(), WorkflowView::SignInPrompt);
}

#[tokio::test]
async fn test_successful_submit_writes_unapproved_record_and_closes() {
    let store = Arc::new(InMemorySubmissionStore::new());
    let (mut workflow, _identity) = open_workflow(store.clone()).await;

    let record = workflow.submit().await.unwrap();

    assert_eq!(record.name, "Zed");
    assert_eq!(record.link, "https://zed.dev");
    assert_eq!(record.icon, "");
    assert_eq!(record.category, Category::Software);
    assert!(!record.approved);
    assert_eq!(record.user_id, "uid-ada");
    assert_eq!(record.user_email, "ada@example.com");
    assert_eq!(record.user_name, "Ada");

    assert_eq!(store.records(), vec![record]);
    assert_eq!(workflow.state(), WorkflowState::Closed);
    assert_eq!(workflow.draft(), &SubmissionDraft::default());
    assert_eq!(workflow.last_error(), None);
}

#[tokio::test]
async fn test_blank_name_is_rejected_before_any_write() {
    let store = Arc::new(InMemorySubmissionStore::new());
    let (mut workflow, _identity) = open_workflow(store.clone()).await;
    workflow.draft_mut().name = "   ".to_string();

    let err = workflow.submit().await.unwrap_err();
    assert!(matches!(
        err,
        SubmissionError::Validation(ValidationError::MissingField(_))
    ));
    assert_eq!(workflow.last_error(), Some("Please fill all required fields."));
    assert_eq!(workflow.state(), WorkflowState::Open);
    assert_eq!(workflow.draft().description, "Fast editor");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_unknown_category_is_stored_as_software() {
    let store = Arc::new(InMemorySubmissionStore::new());
    let (mut workflow, _identity) = open_workflow(store.clone()).await;
    workflow.draft_mut().category = "banana".to_string();

    let record = workflow.submit().await.unwrap();
    assert_eq!(record.category, Category::Software);
}

#[tokio::test]
async fn test_store_failures_map_to_user_messages_and_keep_draft() {
    let cases = [
        (
            StoreError::PermissionDenied("rules".to_string()),
            SubmissionError::PermissionDenied,
            "Submission failed: permission denied. Check that you are signed in and allowed to submit.",
        ),
        (
            StoreError::Unavailable("offline".to_string()),
            SubmissionError::Network,
            "Network error while submitting. Please check your connection and try again.",
        ),
        (
            StoreError::FailedPrecondition("no table".to_string()),
            SubmissionError::FailedPrecondition,
            "The resource store rejected the write (precondition failed). Please try again later.",
        ),
        (
            StoreError::Other("boom".to_string()),
            SubmissionError::Unknown,
            "Error submitting. Please try again.",
        ),
    ];

    for (store_err, expected, message) in cases {
        let store = Arc::new(InMemorySubmissionStore::new_failing(store_err));
        let (mut workflow, _identity) = open_workflow(store.clone()).await;

        assert_eq!(workflow.submit().await.unwrap_err(), expected);
        assert_eq!(workflow.last_error(), Some(message));
        assert_eq!(workflow.state(), WorkflowState::Open);
        assert_eq!(workflow.draft(), &filled_draft());
        assert!(store.is_empty());

        match workflow.view() {
            WorkflowView::Form {
                error, submitting, ..
            } => {
                assert_eq!(error, Some(message));
                assert!(!submitting);
            }
            other => panic!("expected the form, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_close_then_reopen_keeps_typed_values() {
    let store = Arc::new(InMemorySubmissionStore::new());
    let (mut workflow, _identity) = open_workflow(store).await;

    workflow.close();
    assert_eq!(workflow.view(), WorkflowView::Closed);
    assert_eq!(workflow.submit().await.unwrap_err(), SubmissionError::FormClosed);

    workflow.open().unwrap();
    assert_eq!(workflow.draft(), &filled_draft());
}

#[tokio::test]
async fn test_sign_out_restores_prompt() {
    let store = Arc::new(InMemorySubmissionStore::new());
    let (mut workflow, identity) = open_workflow(store.clone()).await;

    identity.sign_out().await.unwrap();
    assert_eq!(identity.current(), None);
    assert_eq!(workflow.view(), WorkflowView::SignInPrompt);

    let err = workflow.submit().await.unwrap_err();
    assert_eq!(err, SubmissionError::NotSignedIn);
    assert!(store.is_empty());
}
