mod commands;
mod config;
mod screen;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{views::RowAction, HomePage, HttpGateway, MutationOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::{Command, HELP};
use config::{load_settings, normalize_server_url, SETTINGS_FILE};
use screen::TerminalScreen;

#[derive(Parser, Debug)]
#[command(about = "Browse and edit your hobbies from the terminal")]
struct Args {
    /// Settings file; missing files fall back to defaults.
    #[arg(long, default_value = SETTINGS_FILE)]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    /// Raw `Cookie` header value, e.g. `session=...`.
    #[arg(long)]
    session_cookie: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(server_url) = args.server_url {
        settings.server_url = normalize_server_url(&server_url);
    }
    if let Some(cookie) = args.session_cookie {
        settings.session_cookie = Some(cookie);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let gateway = HttpGateway::with_session_cookie(
        &settings.server_url,
        settings.session_cookie.as_deref(),
    )
    .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    info!(server_url = %settings.server_url, "connecting");

    let screen = TerminalScreen::new();
    let page = HomePage::new(Arc::new(gateway), screen.bindings());

    report_user(page.load().await.map(|user| user.username));
    print!("{}", screen.snapshot());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Show => {}
            Command::Refresh => report_user(page.refresh().await.map(|user| user.username)),
            Command::Next => {
                page.pagination().next().await;
            }
            Command::Previous => {
                if page.pagination().previous().await.is_none() {
                    eprintln!("already on the first page");
                }
            }
            Command::Page(number) => {
                page.pagination().load_page(number).await;
            }
            Command::Add(name) => {
                screen.hobby_input.set_value(name);
                report(page.handlers().submit_hobby().await);
            }
            Command::Remove(hobby_id) => {
                report(page.activate(RowAction::RemoveHobby(hobby_id)).await)
            }
            Command::Cancel(meeting_id) => {
                report(page.activate(RowAction::CancelOneOnOne(meeting_id)).await)
            }
            Command::Logout => report(page.logout().await),
        }
        print!("{}", screen.snapshot());
    }

    Ok(())
}

fn report_user(username: Option<String>) {
    match username {
        Some(username) => println!("logged in as {username}"),
        None => println!("not logged in; only popular hobbies are shown"),
    }
}

fn report(outcome: MutationOutcome) {
    if let MutationOutcome::Failed = outcome {
        warn!("request failed; see log for details");
    }
}
