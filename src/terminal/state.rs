use ratatui::widgets::ListState;

use crate::app::compose::ComposeField;
use crate::app::render::{ArchiveToggle, Screen};
use crate::app::view::{View, ViewKind};
use crate::app::{App, Completion, Job};
use crate::domain::email::EmailId;

/// Terminal-side state around the controller: selection, focus, scroll.
pub struct TuiState {
    pub app: App,
    pub list_state: ListState,
    pub field: ComposeField,
    pub body_scroll: u16,
    pub should_quit: bool,
}

impl TuiState {
    pub fn new(app: App) -> Self {
        Self {
            app,
            list_state: ListState::default(),
            field: ComposeField::default(),
            body_scroll: 0,
            should_quit: false,
        }
    }

    fn card_count(&self) -> usize {
        match self.app.view() {
            View::Mailbox { list, .. } => list.ready().map(Vec::len).unwrap_or(0),
            _ => 0,
        }
    }

    pub fn selected_id(&self) -> Option<EmailId> {
        let idx = self.list_state.selected()?;
        match self.app.view() {
            View::Mailbox { list, .. } => list.ready()?.get(idx).map(|e| e.id),
            _ => None,
        }
    }

    pub fn selected_toggle(&self) -> Option<ArchiveToggle> {
        let idx = self.list_state.selected()?;
        match self.app.screen() {
            Screen::Mailbox(pane) => pane.cards.into_iter().nth(idx)?.archive,
            _ => None,
        }
    }

    pub fn move_selection(&mut self, delta: i32) {
        let len = self.card_count();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let cur = self.list_state.selected().unwrap_or(0) as i32;
        let next = (cur + delta).clamp(0, len as i32 - 1) as usize;
        self.list_state.select(Some(next));
    }

    pub fn scroll_body(&mut self, delta: i32) {
        if self.app.kind() != ViewKind::Detail {
            return;
        }
        if delta < 0 {
            self.body_scroll = self.body_scroll.saturating_sub((-delta) as u16);
        } else {
            self.body_scroll = self.body_scroll.saturating_add(delta as u16);
        }
    }

    /// Resets selection, focus and scroll after the view changed.
    pub fn after_navigation(&mut self, jobs: Vec<Job>) -> Vec<Job> {
        self.list_state.select(None);
        self.field = ComposeField::default();
        self.body_scroll = 0;
        jobs
    }

    pub fn apply(&mut self, completion: Completion) -> Vec<Job> {
        let jobs = self.app.apply(completion);
        let len = self.card_count();
        if len == 0 {
            self.list_state.select(None);
        } else if self.list_state.selected().is_none_or(|i| i >= len) {
            self.list_state.select(Some(0));
        }
        jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Outcome;
    use crate::config::ArchiveRefresh;
    use crate::domain::email::{EmailSummary, Mailbox};

    fn loaded(ids: &[EmailId], mailbox: Mailbox) -> TuiState {
        let mut state = TuiState::new(App::new(ArchiveRefresh::Inbox, false));
        let jobs = state.app.show_mailbox(mailbox);
        let emails = ids
            .iter()
            .map(|&id| EmailSummary {
                id,
                sender: "a@x.com".into(),
                subject: "s".into(),
                timestamp: "t".into(),
                read: false,
                archived: false,
            })
            .collect();
        state.apply(Completion {
            generation: jobs[0].generation,
            outcome: Outcome::Mailbox(mailbox, Ok(emails)),
        });
        state
    }

    #[test]
    fn selection_starts_on_first_card_and_clamps() {
        let mut state = loaded(&[4, 8, 15], Mailbox::Inbox);
        assert_eq!(state.selected_id(), Some(4));
        state.move_selection(5);
        assert_eq!(state.selected_id(), Some(15));
        state.move_selection(-10);
        assert_eq!(state.selected_id(), Some(4));
    }

    #[test]
    fn toggle_only_outside_sent() {
        let state = loaded(&[1], Mailbox::Inbox);
        assert_eq!(state.selected_toggle().map(|t| t.id), Some(1));
        let state = loaded(&[1], Mailbox::Sent);
        assert_eq!(state.selected_toggle(), None);
    }

    #[test]
    fn empty_listing_has_no_selection() {
        let mut state = loaded(&[], Mailbox::Archive);
        assert_eq!(state.list_state.selected(), None);
        state.move_selection(1);
        assert_eq!(state.selected_id(), None);
    }
}
