//! `MailApi` over HTTP/JSON.
//!
//! Uses the blocking reqwest client; callers that must not block run it on
//! a worker thread (see `dispatch`).

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

use crate::api::MailApi;
use crate::config::Config;
use crate::domain::email::{EmailDetail, EmailId, EmailPatch, EmailSummary, Mailbox, NewEmail, SendOutcome};

const CSRF_HEADER: &str = "x-csrftoken";

pub struct HttpMailApi {
    client: Client,
    base: Url,
}

impl HttpMailApi {
    pub fn new(
        base_url: &str,
        session_id: Option<&str>,
        csrf_token: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| anyhow!("Invalid base_url '{base_url}': {e}"))?;
        // Url::join replaces the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        let mut cookies = Vec::new();
        if let Some(session) = session_id {
            cookies.push(format!("sessionid={session}"));
        }
        if let Some(csrf) = csrf_token {
            cookies.push(format!("csrftoken={csrf}"));
            headers.insert(
                HeaderName::from_static(CSRF_HEADER),
                HeaderValue::from_str(csrf).context("csrf_token is not a valid header value")?,
            );
        }
        if !cookies.is_empty() {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(&cookies.join("; "))
                    .context("session cookie is not a valid header value")?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            &cfg.base_url,
            cfg.session_id.as_deref(),
            cfg.csrf_token.as_deref(),
            cfg.timeout(),
        )
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("Failed to build URL for '{path}'"))
    }
}

impl MailApi for HttpMailApi {
    fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<EmailSummary>> {
        let url = self.url(&format!("emails/{mailbox}"))?;
        debug!("GET {url}");

        let emails: Vec<EmailSummary> = self
            .client
            .get(url)
            .send()
            .context("Failed to send list mailbox request")?
            .error_for_status()
            .context("List mailbox request was rejected")?
            .json()
            .context("Failed to parse mailbox response")?;

        debug!("{} emails in {mailbox}", emails.len());
        Ok(emails)
    }

    fn get_email(&self, id: EmailId) -> Result<EmailDetail> {
        let url = self.url(&format!("emails/{id}"))?;
        debug!("GET {url}");

        let email: EmailDetail = self
            .client
            .get(url)
            .send()
            .context("Failed to send get email request")?
            .error_for_status()
            .context("Get email request was rejected")?
            .json()
            .context("Failed to parse email response")?;

        Ok(email)
    }

    fn update_email(&self, id: EmailId, patch: &EmailPatch) -> Result<()> {
        let url = self.url(&format!("emails/{id}"))?;
        debug!("PUT {url} {patch:?}");

        self.client
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .json(patch)
            .send()
            .context("Failed to send update email request")?
            .error_for_status()
            .context("Update email request was rejected")?;

        Ok(())
    }

    fn create_email(&self, email: &NewEmail) -> Result<SendOutcome> {
        let url = self.url("emails")?;
        debug!("POST {url}");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(email)
            .send()
            .context("Failed to send create email request")?;

        let status = response.status();
        let body = response
            .text()
            .context("Failed to read create email response")?;

        // A 400 with {"error": ...} is a normal answer, not a transport failure.
        match serde_json::from_str::<SendOutcome>(&body) {
            Ok(outcome) => {
                if !status.is_success() {
                    warn!("Server rejected email ({status}): {}", outcome.text());
                }
                Ok(outcome)
            }
            Err(e) if status.is_success() => {
                Err(anyhow!(e).context("Failed to parse create email response"))
            }
            Err(_) => Err(anyhow!("Create email request failed with status {status}")),
        }
    }
}
