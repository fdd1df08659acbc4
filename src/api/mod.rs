pub mod http;

use anyhow::Result;

use crate::domain::email::{EmailDetail, EmailId, EmailPatch, EmailSummary, Mailbox, NewEmail, SendOutcome};

pub use http::HttpMailApi;

/// The four operations the client performs against the mail server.
pub trait MailApi: Send + Sync {
    fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<EmailSummary>>;
    fn get_email(&self, id: EmailId) -> Result<EmailDetail>;
    fn update_email(&self, id: EmailId, patch: &EmailPatch) -> Result<()>;
    fn create_email(&self, email: &NewEmail) -> Result<SendOutcome>;
}
