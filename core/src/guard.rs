//! Unsaved-changes guard and keyboard shortcuts for edit forms.
//!
//! The guard does not own any dialog. Confirmation is asked through a
//! callback so the view decides how to prompt.

pub const UNSAVED_CHANGES_PROMPT: &str =
    "You have unsaved changes. Are you sure you want to cancel?";

/// Keys the edit forms react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    /// `modifier` is true when Ctrl or Cmd is held.
    Enter { modifier: bool },
    Other,
}

/// What the view should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardAction {
    /// Leave the form (history back / link to parent).
    NavigateBack,
    /// Submit the form programmatically.
    Submit,
    /// Confirmation declined; keep editing.
    Stay,
    /// Event not handled by the guard.
    Ignore,
}

#[derive(Debug, Clone)]
pub struct EditGuard {
    original: String,
    dirty: bool,
}

impl EditGuard {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            dirty: false,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record the field's current value. Typing back the original text
    /// clears the flag again.
    pub fn on_input(&mut self, value: &str) {
        self.dirty = value != self.original;
    }

    pub fn on_key<F>(&self, key: Key, confirm: F) -> GuardAction
    where
        F: FnOnce(&str) -> bool,
    {
        match key {
            Key::Escape => self.leave(confirm),
            Key::Enter { modifier: true } => GuardAction::Submit,
            Key::Enter { modifier: false } | Key::Other => GuardAction::Ignore,
        }
    }

    /// The Cancel control shares the Escape gate.
    pub fn on_cancel<F>(&self, confirm: F) -> GuardAction
    where
        F: FnOnce(&str) -> bool,
    {
        self.leave(confirm)
    }

    fn leave<F>(&self, confirm: F) -> GuardAction
    where
        F: FnOnce(&str) -> bool,
    {
        if !self.dirty || confirm(UNSAVED_CHANGES_PROMPT) {
            GuardAction::NavigateBack
        } else {
            GuardAction::Stay
        }
    }
}
