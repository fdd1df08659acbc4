//! Drives `HttpMailApi` against a loopback server and checks what goes over the wire.

use std::io::Read;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rs_webmail_client::api::{HttpMailApi, MailApi};
use rs_webmail_client::domain::email::{EmailPatch, Mailbox, NewEmail, SendOutcome};
use tiny_http::{Header, Response, Server};

#[derive(Debug)]
struct Seen {
    method: String,
    url: String,
    body: String,
    headers: Vec<(String, String)>,
}

impl Seen {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Answers each incoming request with the next canned (status, body) pair.
fn serve(replies: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Seen>>) {
    // port 0: the OS picks a free one and the server keeps holding it
    let server = Server::http("127.0.0.1:0").unwrap();
    let base = format!("http://127.0.0.1:{}/", server.server_addr().port());

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, reply) in replies {
            let mut req = server.recv().unwrap();
            let mut body = String::new();
            req.as_reader().read_to_string(&mut body).unwrap();
            seen.push(Seen {
                method: req.method().to_string(),
                url: req.url().to_string(),
                body,
                headers: req
                    .headers()
                    .iter()
                    .map(|h| (h.field.as_str().as_str().to_string(), h.value.as_str().to_string()))
                    .collect(),
            });
            let json = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
            req.respond(
                Response::from_string(reply)
                    .with_status_code(status)
                    .with_header(json),
            )
            .unwrap();
        }
        seen
    });

    (base, handle)
}

fn api(base: &str) -> HttpMailApi {
    HttpMailApi::new(base, None, None, Some(Duration::from_secs(5))).unwrap()
}

#[test]
fn list_mailbox_keeps_server_order() {
    let (base, server) = serve(vec![(
        200,
        r#"[
            {"id": 3, "sender": "c@x.com", "recipients": ["me@x.com"], "subject": "third",
             "body": "", "timestamp": "Jan 03 2024, 10:00 AM", "read": false, "archived": false},
            {"id": 1, "sender": "a@x.com", "recipients": ["me@x.com"], "subject": "first",
             "body": "", "timestamp": "Jan 01 2024, 10:00 AM", "read": true, "archived": false}
        ]"#,
    )]);

    let emails = api(&base).list_mailbox(Mailbox::Inbox).unwrap();
    let ids: Vec<_> = emails.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert!(emails[1].read);

    let seen = server.join().unwrap();
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].url, "/emails/inbox");
}

#[test]
fn get_email_decodes_detail() {
    let (base, server) = serve(vec![(
        200,
        r#"{"id": 5, "sender": "a@x.com", "recipients": ["b@x.com", "c@x.com"],
            "subject": "Hello", "body": "hi", "timestamp": "Jan 01 2024, 12:00 PM",
            "read": false, "archived": false}"#,
    )]);

    let email = api(&base).get_email(5).unwrap();
    assert_eq!(email.recipients.as_deref(), Some(&["b@x.com".to_string(), "c@x.com".to_string()][..]));
    assert_eq!(email.body, "hi");

    let seen = server.join().unwrap();
    assert_eq!(seen[0].url, "/emails/5");
}

#[test]
fn get_email_not_found_is_an_error() {
    let (base, server) = serve(vec![(404, r#"{"error": "Email not found."}"#)]);
    assert!(api(&base).get_email(99).is_err());
    server.join().unwrap();
}

#[test]
fn get_email_bad_json_is_an_error() {
    let (base, server) = serve(vec![(200, "<html>login</html>")]);
    assert!(api(&base).get_email(1).is_err());
    server.join().unwrap();
}

#[test]
fn update_sends_partial_json() {
    let (base, server) = serve(vec![(204, ""), (204, "")]);
    let api = api(&base);
    api.update_email(7, &EmailPatch::mark_read()).unwrap();
    api.update_email(7, &EmailPatch::archived(true)).unwrap();

    let seen = server.join().unwrap();
    assert_eq!(seen[0].method, "PUT");
    assert_eq!(seen[0].url, "/emails/7");
    assert_eq!(seen[0].body, r#"{"read":true}"#);
    assert_eq!(seen[1].body, r#"{"archived":true}"#);
    assert_eq!(seen[1].header("content-type"), Some("application/json"));
}

#[test]
fn create_posts_recipients_verbatim() {
    let (base, server) = serve(vec![(201, r#"{"message": "Email sent successfully."}"#)]);
    let outcome = api(&base)
        .create_email(&NewEmail {
            recipients: "b@x.com, c@x.com".into(),
            subject: "Hi".into(),
            body: "text".into(),
        })
        .unwrap();
    assert!(outcome.is_sent());

    let seen = server.join().unwrap();
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].url, "/emails");
    let sent: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(sent["recipients"], "b@x.com, c@x.com");
    assert_eq!(sent["subject"], "Hi");
}

#[test]
fn create_with_empty_recipients_returns_server_error() {
    let (base, server) = serve(vec![(400, r#"{"error": "At least one recipient required."}"#)]);
    let outcome = api(&base).create_email(&NewEmail::default()).unwrap();
    assert_eq!(
        outcome,
        SendOutcome::Rejected {
            error: "At least one recipient required.".into()
        }
    );
    server.join().unwrap();
}

#[test]
fn session_cookie_and_csrf_header_are_sent() {
    let (base, server) = serve(vec![(200, "[]")]);
    let api = HttpMailApi::new(&base, Some("abc"), Some("tok"), None).unwrap();
    api.list_mailbox(Mailbox::Sent).unwrap();

    let seen = server.join().unwrap();
    assert_eq!(seen[0].header("cookie"), Some("sessionid=abc; csrftoken=tok"));
    assert_eq!(seen[0].header("x-csrftoken"), Some("tok"));
}
