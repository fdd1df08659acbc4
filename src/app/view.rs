use crate::domain::email::{EmailDetail, EmailId, EmailSummary, Mailbox};

/// Data that arrives asynchronously for the current view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Loadable<T> {
    #[default]
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(v) => Some(v),
            _ => None,
        }
    }
}

/// The single visible view. Holding it as one value keeps exactly one pane on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Mailbox {
        mailbox: Mailbox,
        list: Loadable<Vec<EmailSummary>>,
    },
    Detail {
        id: EmailId,
        email: Loadable<EmailDetail>,
    },
    Compose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Mailbox,
    Detail,
    Compose,
}

impl View {
    pub fn kind(&self) -> ViewKind {
        match self {
            View::Mailbox { .. } => ViewKind::Mailbox,
            View::Detail { .. } => ViewKind::Detail,
            View::Compose => ViewKind::Compose,
        }
    }
}

impl Default for View {
    fn default() -> Self {
        View::Mailbox {
            mailbox: Mailbox::Inbox,
            list: Loadable::Loading,
        }
    }
}
