use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::sync::Arc;

use rs_webmail_client::api::{HttpMailApi, MailApi};
use rs_webmail_client::app::App;
use rs_webmail_client::app::render::{DETAIL_FAILED, DetailPane, Screen};
use rs_webmail_client::config::{load_config, log_path};
use rs_webmail_client::dispatch::run_blocking;
use rs_webmail_client::domain::email::{EmailId, EmailPatch, Mailbox, NewEmail};
use rs_webmail_client::terminal::run_tui;

#[derive(Parser)]
#[command(name = "rs_webmail_client")]
#[command(about = "Terminal client for the mail web API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the terminal client
    Tui {
        /// Mailbox shown on start (inbox, sent, archive)
        #[arg(long, default_value = "inbox")]
        mailbox: Mailbox,
    },

    /// Print a mailbox
    List { mailbox: Mailbox },

    /// Print one email and mark it read. The mark-read update is sent even if the fetch fails
    Show { id: EmailId },

    /// Send an email
    Send {
        /// Comma separated, sent as typed
        #[arg(long, default_value = "")]
        to: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, default_value = "")]
        body: String,
    },

    /// Move an email to the archive
    Archive { id: EmailId },

    /// Move an email back to the inbox
    Unarchive { id: EmailId },
}

fn init_file_logger() -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path()?)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // the TUI owns the terminal, so its logs go to a file
    if matches!(cli.cmd, Command::Tui { .. }) {
        init_file_logger()?;
    } else {
        env_logger::init();
    }

    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
    let api = HttpMailApi::from_config(&cfg)?;

    match cli.cmd {
        Command::Tui { mailbox } => {
            let app = App::from_config(&cfg);
            run_tui(Arc::new(api), app, mailbox)
        }

        Command::List { mailbox } => {
            let emails = api.list_mailbox(mailbox)?;
            println!("{}", mailbox.title());
            for e in emails {
                let mark = if e.read { ' ' } else { '*' };
                let archived = if e.archived { " [archived]" } else { "" };
                println!(
                    "{mark} {:>5}  {:<30}  {:<40}  {}{archived}",
                    e.id, e.sender, e.subject, e.timestamp
                );
            }
            Ok(())
        }

        Command::Show { id } => {
            // same requests the TUI issues: fetch and mark-read go out together
            let mut app = App::from_config(&cfg);
            let jobs = app.show_detail(id);
            run_blocking(&api, &mut app, jobs);
            if let Some(status) = app.status() {
                log::warn!("{status}");
            }
            match app.screen() {
                Screen::Detail(DetailPane::Loaded(card)) => {
                    println!("{}", card.from);
                    if let Some(to) = card.to {
                        println!("{to}");
                    }
                    println!("{}", card.subject);
                    println!("{}", card.timestamp);
                    println!();
                    println!("{}", card.body);
                    Ok(())
                }
                Screen::Detail(DetailPane::Failed(msg)) => Err(anyhow!(msg)),
                _ => Err(anyhow!(DETAIL_FAILED)),
            }
        }

        Command::Send { to, subject, body } => {
            let outcome = api.create_email(&NewEmail {
                recipients: to,
                subject,
                body,
            })?;
            if outcome.is_sent() {
                println!("{}", outcome.text());
                Ok(())
            } else {
                Err(anyhow!("Not sent: {}", outcome.text()))
            }
        }

        Command::Archive { id } => {
            api.update_email(id, &EmailPatch::archived(true))?;
            println!("Archived {id}");
            Ok(())
        }

        Command::Unarchive { id } => {
            api.update_email(id, &EmailPatch::archived(false))?;
            println!("Unarchived {id}");
            Ok(())
        }
    }
}
