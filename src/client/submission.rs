use thiserror::Error;
use tokio::sync::watch;

use crate::{
    client::identity::{IdentityProvider, Session},
    error::{StoreError, ValidationError},
    models::{Submission, SubmissionDraft},
    storage::StorageState,
    submission::{build_submission, validate_draft},
};

/// SubmissionError
///
/// Every way a submit attempt can fail. The `Display` text is the message shown to
/// the user; each store failure category gets its own wording.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("You must be signed in to submit.")]
    NotSignedIn,
    #[error("Open the submission form first.")]
    FormClosed,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(
        "Submission failed: permission denied. Check that you are signed in and allowed to submit."
    )]
    PermissionDenied,
    #[error("The resource store rejected the write (precondition failed). Please try again later.")]
    FailedPrecondition,
    #[error("Network error while submitting. Please check your connection and try again.")]
    Network,
    #[error("Error submitting. Please try again.")]
    Unknown,
}

impl From<StoreError> for SubmissionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PermissionDenied(_) => SubmissionError::PermissionDenied,
            StoreError::FailedPrecondition(_) => SubmissionError::FailedPrecondition,
            StoreError::Unavailable(_) => SubmissionError::Network,
            StoreError::Other(_) => SubmissionError::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Closed,
    Open,
    Submitting,
}

/// What the user currently sees.
#[derive(Debug, PartialEq, Eq)]
pub enum WorkflowView<'a> {
    /// No session: a sign-in prompt replaces the form entirely.
    SignInPrompt,
    /// Signed in, form not open.
    Closed,
    Form {
        draft: &'a SubmissionDraft,
        error: Option<&'a str>,
        submitting: bool,
    },
}

/// SubmissionWorkflow
///
/// `Closed -> Open -> Submitting -> Closed` on success, back to `Open` with the
/// entered values intact on any failure. The write is fire-and-forget: the stored
/// record is returned as the confirmation and never read back.
pub struct SubmissionWorkflow {
    store: StorageState,
    session: watch::Receiver<Option<Session>>,
    state: WorkflowState,
    draft: SubmissionDraft,
    error: Option<String>,
}

impl SubmissionWorkflow {
    pub fn new(store: StorageState, identity: &dyn IdentityProvider) -> Self {
        Self {
            store,
            session: identity.subscribe(),
            state: WorkflowState::Closed,
            draft: SubmissionDraft::default(),
            error: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    /// Mutable access to the form fields, as a text input would have.
    pub fn draft_mut(&mut self) -> &mut SubmissionDraft {
        &mut self.draft
    }

    pub fn view(&self) -> WorkflowView<'_> {
        if self.session.borrow().is_none() {
            return WorkflowView::SignInPrompt;
        }
        match self.state {
            WorkflowState::Closed => WorkflowView::Closed,
            WorkflowState::Open | WorkflowState::Submitting => WorkflowView::Form {
                draft: &self.draft,
                error: self.error.as_deref(),
                submitting: self.state == WorkflowState::Submitting,
            },
        }
    }

    /// Opens the form. Refused without a session.
    pub fn open(&mut self) -> Result<(), SubmissionError> {
        if self.session.borrow().is_none() {
            return Err(SubmissionError::NotSignedIn);
        }
        self.state = WorkflowState::Open;
        Ok(())
    }

    /// Closes the form without discarding what was typed.
    pub fn close(&mut self) {
        self.state = WorkflowState::Closed;
        self.error = None;
    }

    /// submit
    ///
    /// Validates locally, then writes one unapproved record. Validation failures never
    /// reach the store.
    pub async fn submit(&mut self) -> Result<Submission, SubmissionError> {
        if self.state != WorkflowState::Open {
            return Err(SubmissionError::FormClosed);
        }
        self.error = None;

        let result = self.try_submit().await;
        match &result {
            Ok(record) => {
                tracing::info!(submission_id = %record.id, "submission sent for review");
                self.draft = SubmissionDraft::default();
                self.state = WorkflowState::Closed;
            }
            Err(err) => {
                tracing::warn!(error = ?err, "submission failed");
                self.error = Some(err.to_string());
                self.state = WorkflowState::Open;
            }
        }
        result
    }

    async fn try_submit(&mut self) -> Result<Submission, SubmissionError> {
        let session = self.session().ok_or(SubmissionError::NotSignedIn)?;
        let valid = validate_draft(&self.draft)?;
        let record = build_submission(valid, &session.submitter());

        self.state = WorkflowState::Submitting;
        Ok(self.store.add(record).await?)
    }
}
