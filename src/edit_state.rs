use crate::{Record, RecordId};

/////////////////////////////////////////////// EditState //////////////////////////////////////////////

/// Create-or-edit state of a single form.
///
/// The form holds at most one draft.  A draft with no bound identifier is being created; a
/// draft with a bound identifier is an edit of that record.  The two are never mixed.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditState<D> {
    /// No draft.
    #[default]
    Empty,
    /// A draft for a new record.
    Creating(D),
    /// A draft editing the record with `id`.
    Editing {
        /// The record being edited.
        id: RecordId,
        /// The edited copy.
        draft: D,
    },
}

/// What a submit should send.
#[derive(Debug, PartialEq)]
pub enum Submission<'a, D> {
    /// Create a new record from the draft.
    Create(&'a D),
    /// Replace the record `id` with the draft.
    Update(RecordId, &'a D),
}

impl<D: Default> EditState<D> {
    /// Starts a blank draft for a new record, discarding any current draft.
    pub fn start_create(&mut self) {
        *self = EditState::Creating(D::default());
    }

    /// Starts editing `record`, copying its fields into the draft.
    pub fn start_edit<R>(&mut self, record: &R)
    where
        R: Record<Draft = D>,
    {
        *self = EditState::Editing {
            id: record.id(),
            draft: record.to_draft(),
        };
    }

    /// Drops the draft without submitting it.
    pub fn cancel(&mut self) {
        *self = EditState::Empty;
    }

    /// Drops the draft after a successful submission.
    pub fn finish(&mut self) {
        *self = EditState::Empty;
    }

    /// The current draft, if any.
    pub fn draft(&self) -> Option<&D> {
        match self {
            EditState::Empty => None,
            EditState::Creating(draft) => Some(draft),
            EditState::Editing { draft, .. } => Some(draft),
        }
    }

    /// Mutable access to the current draft, if any.
    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match self {
            EditState::Empty => None,
            EditState::Creating(draft) => Some(draft),
            EditState::Editing { draft, .. } => Some(draft),
        }
    }

    /// The identifier bound in edit mode.
    pub fn bound_id(&self) -> Option<RecordId> {
        match self {
            EditState::Editing { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// True when no draft is held.
    pub fn is_empty(&self) -> bool {
        matches!(self, EditState::Empty)
    }

    /// The request the current draft calls for.
    pub fn submission(&self) -> Option<Submission<'_, D>> {
        match self {
            EditState::Empty => None,
            EditState::Creating(draft) => Some(Submission::Create(draft)),
            EditState::Editing { id, draft } => Some(Submission::Update(*id, draft)),
        }
    }
}
