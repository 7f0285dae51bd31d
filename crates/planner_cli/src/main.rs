//! Planner command-line entry point.
//!
//! # Responsibility
//! - Act as the event source: one invocation is one interaction cycle.
//! - Render cycle reports as a text table or JSON.
//! - Keep showing the page when the database cannot be opened.
//!
//! Exit codes:
//! - `0` success.
//! - `1` a write (toggle or clear) failed; stored data is unchanged.
//! - `2` invalid input (config, participant or date).
//! - `3` the database could not be reached; an empty page was shown and any
//!   click was skipped.

mod render;

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use planner_core::db::open_db;
use planner_core::{
    default_log_level, init_logging, parse_date_cell, AvailabilityRepository, AvailabilityStore,
    CachedAvailabilityRepository, CycleReport, CycleWarning, InteractionContext, ParticipantId,
    ParticipantRoster, PlannerConfig, SqliteAvailabilityRepository, ToggleOutcome,
    UnreachableRepository,
};
use render::{JsonView, TableView};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_SUCCESS: u8 = 0;
const EXIT_PERSISTENCE_FAILURE: u8 = 1;
const EXIT_INVALID_INPUT: u8 = 2;
const EXIT_BACKEND_UNAVAILABLE: u8 = 3;

#[derive(Debug, Parser)]
#[command(name = "planner", version, about = "Shared availability planner")]
struct Cli {
    /// JSON configuration file; defaults apply when omitted.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides config).
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the availability table for a participant.
    Show {
        #[arg(long = "as", value_name = "PARTICIPANT")]
        viewer: String,
        #[arg(long)]
        json: bool,
    },
    /// Toggle one day for a participant, then show the table.
    Toggle {
        #[arg(long = "as", value_name = "PARTICIPANT")]
        viewer: String,
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: String,
        #[arg(long)]
        json: bool,
    },
    /// Remove every recorded availability.
    Clear,
    /// List configured participants in order.
    Participants,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match PlannerConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::from(EXIT_INVALID_INPUT);
            }
        },
        None => PlannerConfig::default(),
    };

    if let Some(log_dir) = cli.log_dir.as_ref().or(config.log_dir.as_ref()) {
        let level = config.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let stdout = io::stdout().lock();
    if let Command::Participants = cli.command {
        return ExitCode::from(list_participants(&config.roster, stdout));
    }

    let status = match open_db(&config.database_path) {
        Ok(conn) => match SqliteAvailabilityRepository::try_new(&conn, &config.sheet) {
            Ok(sqlite) => {
                let repo = CachedAvailabilityRepository::new(sqlite, config.freshness_ttl);
                run_command(cli.command, &config, repo, stdout)
            }
            Err(err) => {
                warn!(
                    "event=cli_command module=cli status=degraded error_code=sheet_unavailable error={err}"
                );
                run_command(cli.command, &config, UnreachableRepository::from(&err), stdout)
            }
        },
        Err(err) => {
            warn!(
                "event=cli_command module=cli status=degraded error_code=db_open_failed error={err}"
            );
            run_command(cli.command, &config, UnreachableRepository::from(&err), stdout)
        }
    };
    ExitCode::from(status)
}

/// Runs `command` against `repo`, writing the page to `out`.
///
/// Returns the process exit status.
fn run_command<R, W>(command: Command, config: &PlannerConfig, repo: R, mut out: W) -> u8
where
    R: AvailabilityRepository,
    W: Write,
{
    let store = AvailabilityStore::new(repo, config.roster.clone());

    match command {
        Command::Participants => list_participants(&config.roster, out),
        Command::Clear => match store.clear() {
            Ok(()) => {
                info!("event=cli_command module=cli status=ok command=clear");
                match writeln!(out, "All availability cleared.") {
                    Ok(()) => EXIT_SUCCESS,
                    Err(_) => EXIT_PERSISTENCE_FAILURE,
                }
            }
            Err(err) => {
                error!("event=cli_command module=cli status=error command=clear error={err}");
                eprintln!("error: {err}");
                EXIT_PERSISTENCE_FAILURE
            }
        },
        Command::Show { viewer, json } => {
            let Some(viewer) = resolve_viewer(&config.roster, &viewer) else {
                return EXIT_INVALID_INPUT;
            };
            finish(&store, &InteractionContext::view(viewer), json, out)
        }
        Command::Toggle { viewer, date, json } => {
            let Some(viewer) = resolve_viewer(&config.roster, &viewer) else {
                return EXIT_INVALID_INPUT;
            };
            let Some(date) = parse_date_cell(&date) else {
                eprintln!("error: invalid date `{date}`; expected YYYY-MM-DD");
                return EXIT_INVALID_INPUT;
            };
            finish(&store, &InteractionContext::click(viewer, date), json, out)
        }
    }
}

fn list_participants<W: Write>(roster: &ParticipantRoster, mut out: W) -> u8 {
    for participant in roster.participants() {
        if let Err(err) = writeln!(out, "{participant}") {
            eprintln!("error: failed to write output: {err}");
            return EXIT_PERSISTENCE_FAILURE;
        }
    }
    EXIT_SUCCESS
}

fn resolve_viewer(roster: &ParticipantRoster, name: &str) -> Option<ParticipantId> {
    let resolved = roster.resolve(name).cloned();
    if resolved.is_none() {
        let known: Vec<&str> = roster.participants().iter().map(|p| p.as_str()).collect();
        eprintln!(
            "error: unknown participant `{name}`; expected one of: {}",
            known.join(", ")
        );
    }
    resolved
}

fn finish<R: AvailabilityRepository, W: Write>(
    store: &AvailabilityStore<R>,
    ctx: &InteractionContext,
    json: bool,
    out: W,
) -> u8 {
    let rendered = if json {
        store.run_and_render(ctx, &mut JsonView::new(out))
    } else {
        store.run_and_render(ctx, &mut TableView::new(out))
    };

    match rendered {
        Ok(report) => exit_status_for(&report),
        Err(err) => {
            eprintln!("error: failed to write output: {err}");
            EXIT_PERSISTENCE_FAILURE
        }
    }
}

fn exit_status_for(report: &CycleReport) -> u8 {
    let unreachable = report
        .warnings
        .iter()
        .any(|warning| matches!(warning, CycleWarning::PersistenceUnavailable(_)));
    match report.toggle {
        ToggleOutcome::NotSaved => EXIT_PERSISTENCE_FAILURE,
        ToggleOutcome::Skipped => EXIT_BACKEND_UNAVAILABLE,
        ToggleOutcome::NoEvent | ToggleOutcome::Added | ToggleOutcome::Removed if unreachable => {
            EXIT_BACKEND_UNAVAILABLE
        }
        ToggleOutcome::NoEvent | ToggleOutcome::Added | ToggleOutcome::Removed => EXIT_SUCCESS,
    }
}
