//! Runs jobs off the UI thread.
//!
//! Each job gets its own worker thread; the result is sent back on a channel
//! that the UI loop drains between input polls. There is no ordering between
//! jobs and no cancellation.

use log::debug;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::api::MailApi;
use crate::app::{App, Completion, Job, Outcome, Request};

pub struct Dispatcher {
    api: Arc<dyn MailApi>,
    tx: Sender<Completion>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn MailApi>) -> (Self, Receiver<Completion>) {
        let (tx, rx) = mpsc::channel();
        (Self { api, tx }, rx)
    }

    pub fn dispatch(&self, job: Job) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        debug!("dispatch {:?} (generation {})", job.request, job.generation);

        thread::spawn(move || {
            let outcome = execute(api.as_ref(), job.request);
            // receiver gone means the UI has quit
            let _ = tx.send(Completion {
                generation: job.generation,
                outcome,
            });
        });
    }

    pub fn dispatch_all(&self, jobs: impl IntoIterator<Item = Job>) {
        for job in jobs {
            self.dispatch(job);
        }
    }
}

/// Runs `jobs` and their follow-ups on the calling thread, in issue order,
/// folding each result into `app`. Used by one-shot commands.
pub fn run_blocking(api: &dyn MailApi, app: &mut App, jobs: Vec<Job>) {
    let mut queue = VecDeque::from(jobs);
    while let Some(job) = queue.pop_front() {
        debug!("run {:?} (generation {})", job.request, job.generation);
        let outcome = execute(api, job.request);
        queue.extend(app.apply(Completion {
            generation: job.generation,
            outcome,
        }));
    }
}

/// Performs one request synchronously.
pub fn execute(api: &dyn MailApi, request: Request) -> Outcome {
    match request {
        Request::ListMailbox(mailbox) => Outcome::Mailbox(mailbox, api.list_mailbox(mailbox)),
        Request::GetEmail(id) => Outcome::Email(id, api.get_email(id)),
        Request::UpdateEmail { id, patch, then } => Outcome::Updated {
            id,
            result: api.update_email(id, &patch),
            then,
        },
        Request::CreateEmail { email, then } => Outcome::Created {
            result: api.create_email(&email),
            then,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::render::{DETAIL_FAILED, DetailPane, Screen};
    use crate::app::view::ViewKind;
    use crate::config::ArchiveRefresh;
    use crate::domain::email::{
        EmailDetail, EmailId, EmailPatch, EmailSummary, Mailbox, NewEmail, SendOutcome,
    };
    use anyhow::{Result, anyhow};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List(Mailbox),
        Get(EmailId),
        Update(EmailId, EmailPatch),
        Create(NewEmail),
    }

    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<Call>>,
        fail_get: bool,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MailApi for FakeApi {
        fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<EmailSummary>> {
            self.calls.lock().unwrap().push(Call::List(mailbox));
            Ok(vec![EmailSummary {
                id: 1,
                sender: "a@x.com".into(),
                subject: "Hello".into(),
                timestamp: "Jan 01 2024, 12:00 PM".into(),
                read: false,
                archived: false,
            }])
        }

        fn get_email(&self, id: EmailId) -> Result<EmailDetail> {
            self.calls.lock().unwrap().push(Call::Get(id));
            if self.fail_get {
                return Err(anyhow!("connection reset"));
            }
            Ok(EmailDetail {
                id,
                sender: "a@x.com".into(),
                recipients: None,
                subject: "Hello".into(),
                body: "hi".into(),
                timestamp: "Jan 01 2024, 12:00 PM".into(),
                read: true,
                archived: false,
            })
        }

        fn update_email(&self, id: EmailId, patch: &EmailPatch) -> Result<()> {
            self.calls.lock().unwrap().push(Call::Update(id, *patch));
            Ok(())
        }

        fn create_email(&self, email: &NewEmail) -> Result<SendOutcome> {
            self.calls.lock().unwrap().push(Call::Create(email.clone()));
            Ok(SendOutcome::Sent {
                message: "Email sent successfully.".into(),
            })
        }
    }

    fn drain(app: &mut App, dispatcher: &Dispatcher, rx: &Receiver<Completion>, mut pending: usize) {
        while pending > 0 {
            let completion = rx
                .recv_timeout(Duration::from_secs(5))
                .expect("worker did not answer");
            pending -= 1;
            let follow = app.apply(completion);
            pending += follow.len();
            dispatcher.dispatch_all(follow);
        }
    }

    #[test]
    fn opening_an_email_fetches_and_marks_read() {
        let api = Arc::new(FakeApi::default());
        let (dispatcher, rx) = Dispatcher::new(api.clone());
        let mut app = App::new(ArchiveRefresh::Inbox, false);

        let jobs = app.show_detail(5);
        let n = jobs.len();
        dispatcher.dispatch_all(jobs);
        drain(&mut app, &dispatcher, &rx, n);

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&Call::Get(5)));
        assert!(calls.contains(&Call::Update(5, EmailPatch::mark_read())));
        assert_eq!(app.kind(), ViewKind::Detail);
    }

    #[test]
    fn failed_fetch_keeps_app_usable() {
        let api = Arc::new(FakeApi {
            fail_get: true,
            ..Default::default()
        });
        let (dispatcher, rx) = Dispatcher::new(api.clone());
        let mut app = App::new(ArchiveRefresh::Inbox, false);

        let jobs = app.show_detail(9);
        let n = jobs.len();
        dispatcher.dispatch_all(jobs);
        drain(&mut app, &dispatcher, &rx, n);

        let jobs = app.show_mailbox(Mailbox::Inbox);
        dispatcher.dispatch_all(jobs);
        drain(&mut app, &dispatcher, &rx, 1);
        assert_eq!(app.kind(), ViewKind::Mailbox);
    }

    #[test]
    fn awaited_submit_lists_sent_after_create() {
        let api = Arc::new(FakeApi::default());
        let (dispatcher, rx) = Dispatcher::new(api.clone());
        let mut app = App::new(ArchiveRefresh::Inbox, true);

        app.compose_new();
        let jobs = app.submit();
        assert_eq!(jobs.len(), 1);
        dispatcher.dispatch_all(jobs);
        drain(&mut app, &dispatcher, &rx, 1);

        let calls = api.calls();
        assert!(matches!(calls[0], Call::Create(_)));
        assert_eq!(calls[1], Call::List(Mailbox::Sent));
        assert_eq!(app.status(), Some("Email sent successfully."));
    }

    #[test]
    fn blocking_run_marks_read_even_when_fetch_fails() {
        let api = FakeApi {
            fail_get: true,
            ..Default::default()
        };
        let mut app = App::new(ArchiveRefresh::Inbox, false);

        let jobs = app.show_detail(9);
        run_blocking(&api, &mut app, jobs);

        assert_eq!(
            api.calls(),
            vec![Call::Get(9), Call::Update(9, EmailPatch::mark_read())]
        );
        assert_eq!(app.screen(), Screen::Detail(DetailPane::Failed(DETAIL_FAILED)));
    }

    #[test]
    fn blocking_run_follows_awaited_mutations() {
        let api = FakeApi::default();
        let mut app = App::new(ArchiveRefresh::Inbox, true);

        app.compose_new();
        let jobs = app.submit();
        run_blocking(&api, &mut app, jobs);

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], Call::List(Mailbox::Sent));
        let Screen::Mailbox(pane) = app.screen() else {
            panic!("expected mailbox screen");
        };
        assert_eq!(pane.cards.len(), 1);
    }
}
