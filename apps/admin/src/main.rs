use std::{collections::BTreeSet, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    view::render_table, DashboardClient, DashboardSummary, MembersApi, MembersBoard, Notifier,
    Prompter, WorkflowOutcome,
};
use shared::domain::{MemberId, Track};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::load_settings;
use terminal::{TerminalNotifier, TerminalPrompter};

#[derive(Parser, Debug)]
#[command(name = "forum-admin", about = "Manage forum members from the terminal")]
struct Cli {
    #[arg(long, default_value = "forum-admin.toml")]
    config: PathBuf,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the members table.
    List,
    /// Print the dashboard summary tiles.
    Counts {
        #[arg(long, value_enum, default_value = "committees")]
        track: TrackArg,
    },
    /// Show the profile the token belongs to.
    Whoami,
    Add {
        name: String,
        affiliation: String,
    },
    ChangePosition {
        ids: Vec<i64>,
        #[arg(long)]
        position: Option<String>,
    },
    Remove {
        ids: Vec<i64>,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TrackArg {
    Committees,
    Members,
    Applicants,
}

impl From<TrackArg> for Track {
    fn from(value: TrackArg) -> Self {
        match value {
            TrackArg::Committees => Track::Committees,
            TrackArg::Members => Track::Members,
            TrackArg::Applicants => Track::Applicants,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config, |key: &str| std::env::var(key).ok());
    if let Some(v) = cli.api_url {
        settings.api_url = v;
    }
    if let Some(v) = cli.token {
        settings.token = Some(v);
    }
    let token = settings
        .token
        .clone()
        .context("no API token configured; set FORUM_API_TOKEN or pass --token")?;
    let client = Arc::new(
        DashboardClient::with_timeout(&settings.api_url, token, settings.request_timeout())
            .with_context(|| format!("invalid api url '{}'", settings.api_url))?,
    );
    info!(api_url = client.api_url(), "forum api configured");
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);

    let report = match cli.command {
        Command::Whoami => {
            let profile = client.profile().await.context("failed to load profile")?;
            println!(
                "{} <{}> authority={}",
                profile.name,
                profile.email.as_deref().unwrap_or("-"),
                profile
                    .authority
                    .map_or_else(|| "-".to_string(), |level| level.to_string())
            );
            return Ok(ExitCode::SUCCESS);
        }
        Command::Counts { track } => {
            let mut summary = DashboardSummary::new();
            summary.select_track(track.into());
            summary
                .refresh(client.as_ref(), notifier.as_ref())
                .await
                .context("failed to load dashboard counts")?;
            if summary.track() != Track::Members {
                print_tiles(&summary);
                return Ok(ExitCode::SUCCESS);
            }

            let board = MembersBoard::new(
                client,
                notifier,
                Arc::new(TerminalPrompter::new(None, false)),
            );
            let loaded = board.load().await.is_completed();
            if loaded {
                summary.follow_member_count(&board.subscribe_member_count());
            }
            print_tiles(&summary);
            let report = board_report(&board, loaded).await;
            board.dispose();
            report
        }
        command => {
            let prompter = match &command {
                Command::ChangePosition { position, .. } => {
                    TerminalPrompter::new(position.clone(), false)
                }
                Command::Remove { yes, .. } => TerminalPrompter::new(None, *yes),
                _ => TerminalPrompter::new(None, false),
            };
            run_board(client, notifier, Arc::new(prompter), command).await?
        }
    };

    print!("{}", report.table);
    println!("{} members", report.member_count);
    Ok(if report.succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_tiles(summary: &DashboardSummary) {
    for tile in summary.tiles() {
        let marker = if tile.active { "*" } else { " " };
        println!("{marker} {:<16} {}", tile.title, tile.value);
    }
}

#[derive(Debug)]
struct BoardReport {
    table: String,
    member_count: usize,
    succeeded: bool,
}

async fn board_report(board: &MembersBoard, succeeded: bool) -> BoardReport {
    let member_count = *board.subscribe_member_count().borrow();
    BoardReport {
        table: render_table(&board.rows().await),
        member_count,
        succeeded,
    }
}

/// Mounts a members board, applies one workflow, and renders the table.
/// A failed load still yields the (empty) table; the board has already told
/// the user about it.
async fn run_board(
    api: Arc<dyn MembersApi>,
    notifier: Arc<dyn Notifier>,
    prompter: Arc<dyn Prompter>,
    command: Command,
) -> Result<BoardReport> {
    let board = MembersBoard::new(api, notifier, prompter);
    let loaded = board.load().await.is_completed();

    let outcome = match command {
        Command::List => WorkflowOutcome::Completed,
        Command::Add { name, affiliation } => {
            board.open_create_dialog().await;
            let outcome = board.create(&name, &affiliation).await;
            if board.snapshot().await.create_dialog_open {
                board.close_create_dialog().await;
            }
            outcome
        }
        Command::ChangePosition { ids, .. } => {
            select(&board, &ids).await;
            board.change_position().await
        }
        Command::Remove { ids, .. } => {
            select(&board, &ids).await;
            board.delete_selected().await
        }
        Command::Counts { .. } | Command::Whoami => bail!("not a members table command"),
    };

    let succeeded = loaded
        && match &outcome {
            WorkflowOutcome::Completed | WorkflowOutcome::Cancelled => true,
            other => {
                info!(outcome = ?other, "workflow did not complete");
                false
            }
        };
    let report = board_report(&board, succeeded).await;
    board.dispose();
    Ok(report)
}

/// Selects each distinct id once, so repeating an id on the command line
/// does not toggle it back off.
async fn select(board: &MembersBoard, ids: &[i64]) {
    let ids: BTreeSet<MemberId> = ids.iter().copied().map(MemberId).collect();
    for id in ids {
        if !board.toggle(id).await {
            warn!(member_id = %id, "member is not selected");
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
