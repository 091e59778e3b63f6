//! # Notices
//!
//! Transient prompts attached to a screen: a confirmation that gates a destructive
//! delete, and a banner that reports the outcome of the last mutation.  Each slot holds
//! at most one entry; opening a new one replaces the old one, nothing is queued.

use crate::{EntityKind, RecordId};

/// Whether a banner reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// The mutation went through.
    Success,
    /// The mutation, or its validation, failed.
    Error,
}

/// Outcome message shown after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Success or failure.
    pub tone: Tone,
    /// Text shown to the user.
    pub message: String,
}

/// A pending question that must be answered before a delete is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    /// Kind of the record to delete.
    pub kind: EntityKind,
    /// Record to delete.
    pub id: RecordId,
}

impl ConfirmPrompt {
    /// The question put to the user.
    pub fn message(&self) -> String {
        format!(
            "Are you sure you want to delete {} with ID: {}?",
            self.kind.noun(),
            self.id
        )
    }
}

/// The banner and confirmation slots of one screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices {
    banner: Option<Banner>,
    confirm: Option<ConfirmPrompt>,
}

impl Notices {
    /// Creates empty notices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows a success banner, replacing any visible banner.
    pub fn success(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner {
            tone: Tone::Success,
            message: message.into(),
        });
    }

    /// Shows an error banner, replacing any visible banner.
    pub fn error(&mut self, message: impl Into<String>) {
        self.banner = Some(Banner {
            tone: Tone::Error,
            message: message.into(),
        });
    }

    /// The visible banner.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Hides the banner.
    pub fn dismiss(&mut self) {
        self.banner = None;
    }

    /// Asks for confirmation before deleting `id`, replacing any open prompt.
    pub fn ask_confirm(&mut self, kind: EntityKind, id: RecordId) -> &ConfirmPrompt {
        self.confirm.insert(ConfirmPrompt { kind, id })
    }

    /// The open prompt.
    pub fn pending_confirm(&self) -> Option<&ConfirmPrompt> {
        self.confirm.as_ref()
    }

    /// Closes the prompt, returning it so the caller can act on a confirmation.
    pub fn take_confirm(&mut self) -> Option<ConfirmPrompt> {
        self.confirm.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_banner_replaces_old() {
        let mut notices = Notices::new();
        notices.error("Error saving city");
        notices.success("Added Successfully");
        let banner = notices.banner().unwrap();
        assert_eq!(banner.tone, Tone::Success);
        assert_eq!(banner.message, "Added Successfully");
        notices.dismiss();
        assert_eq!(notices.banner(), None);
    }

    #[test]
    fn prompt_replaces_and_is_taken_once() {
        let mut notices = Notices::new();
        notices.ask_confirm(EntityKind::City, RecordId::new(1));
        let prompt = notices.ask_confirm(EntityKind::City, RecordId::new(2));
        assert_eq!(
            prompt.message(),
            "Are you sure you want to delete city with ID: 2?"
        );
        assert_eq!(notices.take_confirm().map(|p| p.id), Some(RecordId::new(2)));
        assert_eq!(notices.take_confirm(), None);
    }

    #[test]
    fn slots_are_independent() {
        let mut notices = Notices::new();
        notices.ask_confirm(EntityKind::Customer, RecordId::new(5));
        notices.success("Updated Successfully");
        assert!(notices.pending_confirm().is_some());
        notices.dismiss();
        assert!(notices.pending_confirm().is_some());
    }
}
