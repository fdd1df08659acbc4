//! View models for the three panes.
//!
//! Everything here is a pure function of the controller state; the terminal
//! front end only draws what these return.

use crate::app::compose::ComposeDraft;
use crate::app::view::{Loadable, View};
use crate::domain::email::{EmailDetail, EmailId, EmailSummary, Mailbox};

pub const DETAIL_FAILED: &str = "Failed to load email details. Please try again later.";
pub const MAILBOX_FAILED: &str = "Failed to load mailbox.";
pub const LOADING: &str = "Loading…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    /// Already seen: drawn muted.
    Read,
    /// Not seen yet: drawn prominent.
    Unread,
}

/// Archive/unarchive control of one card. Remembers the mailbox it was rendered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveToggle {
    pub id: EmailId,
    pub label: &'static str,
    pub set_archived: bool,
    pub origin: Mailbox,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailCard {
    pub id: EmailId,
    pub sender: String,
    pub subject: String,
    pub timestamp: String,
    pub style: CardStyle,
    pub archive: Option<ArchiveToggle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxPane {
    pub header: String,
    pub cards: Vec<EmailCard>,
    /// Shown instead of the cards while loading or after a failure.
    pub notice: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailCard {
    pub from: String,
    pub to: Option<String>,
    pub subject: String,
    pub timestamp: String,
    pub reply_label: &'static str,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPane {
    Loading,
    Loaded(DetailCard),
    Failed(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Mailbox(MailboxPane),
    Detail(DetailPane),
    Compose(ComposeDraft),
}

pub fn render(view: &View, draft: &ComposeDraft) -> Screen {
    match view {
        View::Mailbox { mailbox, list } => Screen::Mailbox(render_mailbox(*mailbox, list)),
        View::Detail { email, .. } => Screen::Detail(render_detail(email)),
        View::Compose => Screen::Compose(draft.clone()),
    }
}

pub fn render_mailbox(mailbox: Mailbox, list: &Loadable<Vec<EmailSummary>>) -> MailboxPane {
    let header = mailbox.title();
    match list {
        Loadable::Loading => MailboxPane {
            header,
            cards: Vec::new(),
            notice: Some(LOADING),
        },
        Loadable::Failed(_) => MailboxPane {
            header,
            cards: Vec::new(),
            notice: Some(MAILBOX_FAILED),
        },
        // server order is kept as-is
        Loadable::Ready(emails) => MailboxPane {
            header,
            cards: emails.iter().map(|e| email_card(mailbox, e)).collect(),
            notice: None,
        },
    }
}

fn email_card(mailbox: Mailbox, email: &EmailSummary) -> EmailCard {
    let archive = (mailbox != Mailbox::Sent).then(|| ArchiveToggle {
        id: email.id,
        label: if email.archived { "Unarchive" } else { "Archive" },
        set_archived: !email.archived,
        origin: mailbox,
    });

    EmailCard {
        id: email.id,
        sender: email.sender.clone(),
        subject: email.subject.clone(),
        timestamp: email.timestamp.clone(),
        style: if email.read {
            CardStyle::Read
        } else {
            CardStyle::Unread
        },
        archive,
    }
}

pub fn render_detail(email: &Loadable<EmailDetail>) -> DetailPane {
    match email {
        Loadable::Loading => DetailPane::Loading,
        Loadable::Failed(_) => DetailPane::Failed(DETAIL_FAILED),
        Loadable::Ready(email) => DetailPane::Loaded(DetailCard {
            from: format!("From: {}", email.sender),
            to: email
                .recipients
                .as_ref()
                .map(|r| format!("To: {}", r.join(", "))),
            subject: format!("Subject: {}", email.subject),
            timestamp: format!("Timestamp: {}", email.timestamp),
            reply_label: "Reply",
            body: email.body.clone(),
        }),
    }
}
