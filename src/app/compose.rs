//! Compose form contents and reply prefill.

use chrono::NaiveDateTime;

use crate::domain::email::{EmailDetail, NewEmail};

const REPLY_PREFIX: &str = "Re: ";

/// Formats the server may use for `timestamp`. The first one is what the mail server sends.
const SERVER_TIMESTAMP_FORMATS: &[&str] = &[
    "%b %d %Y, %I:%M %p",
    "%b %d %Y, %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// en-US `toLocaleString` layout, e.g. `1/1/2024, 12:00:00 PM`.
const LOCALE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeDraft {
    pub recipients: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeField {
    #[default]
    Recipients,
    Subject,
    Body,
}

impl ComposeField {
    pub fn next(self) -> Self {
        match self {
            ComposeField::Recipients => ComposeField::Subject,
            ComposeField::Subject => ComposeField::Body,
            ComposeField::Body => ComposeField::Recipients,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ComposeField::Recipients => ComposeField::Body,
            ComposeField::Subject => ComposeField::Recipients,
            ComposeField::Body => ComposeField::Subject,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComposeField::Recipients => "To",
            ComposeField::Subject => "Subject",
            ComposeField::Body => "Body",
        }
    }
}

impl ComposeDraft {
    /// Prefill for answering `email`: sender as recipient, `Re:` subject, quoted body.
    pub fn reply_to(email: &EmailDetail) -> Self {
        Self {
            recipients: email.sender.clone(),
            subject: reply_subject(&email.subject),
            body: reply_body(&email.sender, &email.timestamp, &email.body),
        }
    }

    /// Overwrites recipients and subject from a just-displayed email, leaving the body alone.
    pub fn prefill_from_detail(&mut self, email: &EmailDetail) {
        self.recipients = email.sender.clone();
        self.subject = format!("{REPLY_PREFIX}{}", email.subject);
    }

    pub fn field(&self, field: ComposeField) -> &str {
        match field {
            ComposeField::Recipients => &self.recipients,
            ComposeField::Subject => &self.subject,
            ComposeField::Body => &self.body,
        }
    }

    pub fn field_mut(&mut self, field: ComposeField) -> &mut String {
        match field {
            ComposeField::Recipients => &mut self.recipients,
            ComposeField::Subject => &mut self.subject,
            ComposeField::Body => &mut self.body,
        }
    }

    pub fn to_new_email(&self) -> NewEmail {
        NewEmail {
            recipients: self.recipients.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
        }
    }
}

/// Adds `Re: ` unless the subject already starts with it.
pub fn reply_subject(subject: &str) -> String {
    if subject.starts_with(REPLY_PREFIX) {
        subject.to_string()
    } else {
        format!("{REPLY_PREFIX}{subject}")
    }
}

/// Attribution line (quotes included) followed by the original body.
pub fn reply_body(sender: &str, timestamp: &str, body: &str) -> String {
    format!(
        "\"On {}, {} wrote:\"\n{}",
        locale_timestamp(timestamp),
        sender,
        body
    )
}

/// Re-renders a server timestamp in en-US locale form; unknown formats are returned as-is.
pub fn locale_timestamp(timestamp: &str) -> String {
    let ts = timestamp.trim();
    SERVER_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
        .map(|dt| dt.format(LOCALE_FORMAT).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
