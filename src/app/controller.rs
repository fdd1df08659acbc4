//! View and compose controller.
//!
//! `App` owns the current view, the compose draft and a generation counter.
//! User actions return the `Job`s to run against the server; finished jobs
//! come back as `Completion`s through [`App::apply`]. Every navigation starts
//! a new generation and completions from an older one are not displayed.

use anyhow::Result;
use log::{debug, error, info, warn};

use crate::app::compose::{ComposeDraft, ComposeField};
use crate::app::render::{ArchiveToggle, Screen, render};
use crate::app::view::{Loadable, View, ViewKind};
use crate::config::{ArchiveRefresh, Config};
use crate::domain::email::{
    EmailDetail, EmailId, EmailPatch, EmailSummary, Mailbox, NewEmail, SendOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListMailbox(Mailbox),
    GetEmail(EmailId),
    /// `then` is a mailbox to reload once the update has been answered.
    UpdateEmail {
        id: EmailId,
        patch: EmailPatch,
        then: Option<Mailbox>,
    },
    CreateEmail {
        email: NewEmail,
        then: Option<Mailbox>,
    },
}

/// A request tagged with the generation it was issued in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub generation: u64,
    pub request: Request,
}

#[derive(Debug)]
pub enum Outcome {
    Mailbox(Mailbox, Result<Vec<EmailSummary>>),
    Email(EmailId, Result<EmailDetail>),
    Updated {
        id: EmailId,
        result: Result<()>,
        then: Option<Mailbox>,
    },
    Created {
        result: Result<SendOutcome>,
        then: Option<Mailbox>,
    },
}

#[derive(Debug)]
pub struct Completion {
    pub generation: u64,
    pub outcome: Outcome,
}

pub struct App {
    view: View,
    draft: ComposeDraft,
    generation: u64,
    last_mailbox: Mailbox,
    status: Option<String>,
    archive_refresh: ArchiveRefresh,
    await_mutations: bool,
}

impl App {
    pub fn new(archive_refresh: ArchiveRefresh, await_mutations: bool) -> Self {
        Self {
            view: View::default(),
            draft: ComposeDraft::default(),
            generation: 0,
            last_mailbox: Mailbox::Inbox,
            status: None,
            archive_refresh,
            await_mutations,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.archive_refresh, cfg.await_mutations)
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn kind(&self) -> ViewKind {
        self.view.kind()
    }

    pub fn draft(&self) -> &ComposeDraft {
        &self.draft
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn screen(&self) -> Screen {
        render(&self.view, &self.draft)
    }

    fn navigate(&mut self, view: View) {
        self.generation += 1;
        self.view = view;
    }

    fn job(&self, request: Request) -> Job {
        Job {
            generation: self.generation,
            request,
        }
    }

    pub fn show_mailbox(&mut self, mailbox: Mailbox) -> Vec<Job> {
        self.last_mailbox = mailbox;
        self.navigate(View::Mailbox {
            mailbox,
            list: Loadable::Loading,
        });
        vec![self.job(Request::ListMailbox(mailbox))]
    }

    /// Opens an email. The mark-as-read update is issued alongside the fetch, not after it.
    pub fn show_detail(&mut self, id: EmailId) -> Vec<Job> {
        self.navigate(View::Detail {
            id,
            email: Loadable::Loading,
        });
        vec![
            self.job(Request::GetEmail(id)),
            self.job(Request::UpdateEmail {
                id,
                patch: EmailPatch::mark_read(),
                then: None,
            }),
        ]
    }

    pub fn show_compose(&mut self, prefill: Option<ComposeDraft>) -> Vec<Job> {
        self.navigate(View::Compose);
        self.draft = prefill.unwrap_or_default();
        Vec::new()
    }

    pub fn compose_new(&mut self) -> Vec<Job> {
        self.show_compose(None)
    }

    /// Answers the email currently shown. Does nothing until it has loaded.
    pub fn reply(&mut self) -> Vec<Job> {
        let View::Detail {
            email: Loadable::Ready(email),
            ..
        } = &self.view
        else {
            return Vec::new();
        };
        let prefill = ComposeDraft::reply_to(email);
        self.show_compose(Some(prefill))
    }

    pub fn toggle_archive(&mut self, toggle: &ArchiveToggle) -> Vec<Job> {
        let target = match self.archive_refresh {
            ArchiveRefresh::Inbox => Mailbox::Inbox,
            ArchiveRefresh::Current => toggle.origin,
        };
        let patch = EmailPatch::archived(toggle.set_archived);
        self.mutate_then_show(
            |then| Request::UpdateEmail {
                id: toggle.id,
                patch,
                then,
            },
            target,
        )
    }

    /// Sends the draft as typed and moves to the sent mailbox.
    pub fn submit(&mut self) -> Vec<Job> {
        let email = self.draft.to_new_email();
        self.mutate_then_show(|then| Request::CreateEmail { email, then }, Mailbox::Sent)
    }

    fn mutate_then_show(
        &mut self,
        mutation: impl FnOnce(Option<Mailbox>) -> Request,
        target: Mailbox,
    ) -> Vec<Job> {
        if self.await_mutations {
            // reload only once the server has answered the mutation
            self.last_mailbox = target;
            self.navigate(View::Mailbox {
                mailbox: target,
                list: Loadable::Loading,
            });
            vec![self.job(mutation(Some(target)))]
        } else {
            let mut jobs = vec![self.job(mutation(None))];
            jobs.extend(self.show_mailbox(target));
            jobs
        }
    }

    /// Leaves detail or compose for the last mailbox shown. The draft is dropped.
    pub fn back(&mut self) -> Vec<Job> {
        match self.view.kind() {
            ViewKind::Mailbox => Vec::new(),
            ViewKind::Detail => self.show_mailbox(self.last_mailbox),
            ViewKind::Compose => {
                self.draft = ComposeDraft::default();
                self.show_mailbox(self.last_mailbox)
            }
        }
    }

    pub fn edit(&mut self, field: ComposeField, edit: impl FnOnce(&mut String)) {
        if self.view.kind() == ViewKind::Compose {
            edit(self.draft.field_mut(field));
        }
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Folds a finished job into the state and returns any follow-up jobs.
    pub fn apply(&mut self, completion: Completion) -> Vec<Job> {
        let current = completion.generation == self.generation;
        match completion.outcome {
            Outcome::Mailbox(mailbox, result) => {
                if let Err(e) = &result {
                    error!("Failed to load mailbox {mailbox}: {e:#}");
                }
                if !current {
                    debug!("Dropping stale {mailbox} listing (generation {})", completion.generation);
                    return Vec::new();
                }
                if let View::Mailbox { mailbox: shown, list } = &mut self.view {
                    if *shown == mailbox {
                        *list = match result {
                            Ok(emails) => Loadable::Ready(emails),
                            Err(e) => Loadable::Failed(format!("{e:#}")),
                        };
                    }
                }
                Vec::new()
            }

            Outcome::Email(id, result) => {
                if let Err(e) = &result {
                    error!("Error fetching email {id}: {e:#}");
                }
                if !current {
                    debug!("Dropping stale email {id} (generation {})", completion.generation);
                    return Vec::new();
                }
                if let View::Detail { id: shown, email } = &mut self.view {
                    if *shown == id {
                        *email = match result {
                            Ok(detail) => {
                                self.draft.prefill_from_detail(&detail);
                                Loadable::Ready(detail)
                            }
                            Err(e) => Loadable::Failed(format!("{e:#}")),
                        };
                    }
                }
                Vec::new()
            }

            Outcome::Updated { id, result, then } => {
                match result {
                    Ok(()) => debug!("Updated email {id}"),
                    Err(e) => {
                        warn!("Failed to update email {id}: {e:#}");
                        self.status = Some(format!("Could not update email {id}"));
                    }
                }
                self.follow_up(current, then)
            }

            Outcome::Created { result, then } => {
                match result {
                    Ok(outcome) if outcome.is_sent() => {
                        info!("{}", outcome.text());
                        self.status = Some(outcome.text().to_string());
                    }
                    Ok(outcome) => {
                        warn!("Email not sent: {}", outcome.text());
                        self.status = Some(format!("Not sent: {}", outcome.text()));
                    }
                    Err(e) => {
                        error!("Failed to send email: {e:#}");
                        self.status = Some("Failed to send email".to_string());
                    }
                }
                self.follow_up(current, then)
            }
        }
    }

    fn follow_up(&self, current: bool, then: Option<Mailbox>) -> Vec<Job> {
        match then {
            Some(mailbox) if current => vec![self.job(Request::ListMailbox(mailbox))],
            _ => Vec::new(),
        }
    }
}
