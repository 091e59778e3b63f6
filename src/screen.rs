//! # CRUD Screens
//!
//! A [`CrudScreen`] is the list, the form and the notices of one entity kind.  Every
//! kind is managed by the same component; the [`Record`] trait supplies the endpoint,
//! the field schema and the validation rule.
//!
//! ```text
//! mount ──> list ──> start_create / start_edit ──> set_field* ──> submit
//!                                                                   │
//!              ┌──── validation failed: error banner, no request <──┤
//!              │                                                    │
//!              └──── saved: banner, form emptied, list refetched <──┘
//! ```

use crate::api::LoanApi;
use crate::edit_state::{EditState, Submission};
use crate::http_utils::HttpError;
use crate::notify::{ConfirmPrompt, Notices};
use crate::store::ListStore;
use crate::{Draft, Form, FormError, Record, RecordId, ValidationError};

/// Result of a submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A new record was created.
    Created,
    /// The bound record was updated.
    Updated,
    /// Validation failed; nothing was sent.
    Rejected(ValidationError),
    /// The server refused or could not be reached; the draft is kept.
    Failed(HttpError),
    /// There was no draft to submit.
    NoDraft,
}

/// Result of answering a delete confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The record was deleted and the list refetched.
    Deleted(RecordId),
    /// The user declined; nothing was sent.
    Cancelled,
    /// The delete was sent and failed.
    Failed(HttpError),
    /// No confirmation was pending.
    NoPending,
}

/// Error for a screen operation that names a record the screen does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotListed {
    /// The kind of the screen.
    pub kind: crate::EntityKind,
    /// The identifier that was asked for.
    pub id: RecordId,
}

impl std::fmt::Display for NotListed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No {} with ID {} in the list", self.kind.noun(), self.id)
    }
}

impl std::error::Error for NotListed {}

////////////////////////////////////////////// CrudScreen ////////////////////////////////////////////

/// List, form and notices of one entity kind.
#[derive(Debug, Clone)]
pub struct CrudScreen<R: Record> {
    list: ListStore<R>,
    edit: EditState<R::Draft>,
    notices: Notices,
}

impl<R: Record> Default for CrudScreen<R> {
    fn default() -> Self {
        Self {
            list: ListStore::default(),
            edit: EditState::default(),
            notices: Notices::default(),
        }
    }
}

impl<R: Record> CrudScreen<R> {
    /// Creates an unmounted screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the list.
    pub async fn mount(&mut self, api: &LoanApi) {
        self.list.refresh(api).await;
    }

    /// Refetches the list.
    pub async fn refresh(&mut self, api: &LoanApi) {
        self.list.refresh(api).await;
    }

    /// The held list.
    pub fn list(&self) -> &ListStore<R> {
        &self.list
    }

    /// The form.
    pub fn edit_state(&self) -> &EditState<R::Draft> {
        &self.edit
    }

    /// The banner and confirmation slots.
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Hides the banner.
    pub fn dismiss(&mut self) {
        self.notices.dismiss();
    }

    /// Opens a blank form for a new record.
    pub fn start_create(&mut self) {
        self.edit.start_create();
    }

    /// Opens the form on a copy of the listed record `id`.
    pub fn start_edit(&mut self, id: RecordId) -> Result<(), NotListed> {
        let record = self.list.find(id).ok_or(NotListed { kind: R::KIND, id })?;
        self.edit.start_edit(record);
        Ok(())
    }

    /// Sets one field of the draft.  Without an open form this opens a blank one.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        if self.edit.is_empty() {
            self.edit.start_create();
        }
        match self.edit.draft_mut() {
            Some(draft) => draft.set_field(name, raw),
            None => Ok(()),
        }
    }

    /// Closes the form without submitting.
    pub fn cancel(&mut self) {
        self.edit.cancel();
    }

    /// Validates and sends the draft.
    pub async fn submit(&mut self, api: &LoanApi) -> SubmitOutcome {
        let Some(submission) = self.edit.submission() else {
            return SubmitOutcome::NoDraft;
        };
        let draft = match &submission {
            Submission::Create(draft) | Submission::Update(_, draft) => *draft,
        };
        if let Err(e) = draft.validate() {
            self.notices.error(e.to_string());
            return SubmitOutcome::Rejected(e);
        }
        let result = match submission {
            Submission::Create(draft) => api
                .create::<R>(draft)
                .await
                .map(|_| (SubmitOutcome::Created, "Added Successfully")),
            Submission::Update(id, draft) => api
                .update::<R>(id, draft)
                .await
                .map(|_| (SubmitOutcome::Updated, "Updated Successfully")),
        };
        match result {
            Ok((outcome, message)) => {
                self.notices.success(message);
                self.edit.finish();
                self.list.refresh(api).await;
                outcome
            }
            Err(e) => {
                tracing::warn!(kind = %R::KIND, error = %e, "save failed");
                self.notices.error(format!("Error saving {}", R::KIND.noun()));
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Asks for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: RecordId) -> &ConfirmPrompt {
        self.notices.ask_confirm(R::KIND, id)
    }

    /// The open delete confirmation.
    pub fn pending_delete(&self) -> Option<&ConfirmPrompt> {
        self.notices.pending_confirm()
    }

    /// Deletes the record named by the open confirmation, then refetches the list.
    pub async fn confirm_delete(&mut self, api: &LoanApi) -> DeleteOutcome {
        let Some(prompt) = self.notices.take_confirm() else {
            return DeleteOutcome::NoPending;
        };
        match api.delete(R::KIND, prompt.id).await {
            Ok(()) => {
                self.list.refresh(api).await;
                self.notices.success("Deleted Successfully");
                DeleteOutcome::Deleted(prompt.id)
            }
            Err(e) => {
                tracing::warn!(kind = %R::KIND, id = %prompt.id, error = %e, "delete failed");
                self.notices.error(format!("Error deleting {}", R::KIND.noun()));
                DeleteOutcome::Failed(e)
            }
        }
    }

    /// Closes the open confirmation without deleting.
    pub fn cancel_delete(&mut self) -> DeleteOutcome {
        match self.notices.take_confirm() {
            Some(_) => DeleteOutcome::Cancelled,
            None => DeleteOutcome::NoPending,
        }
    }
}
