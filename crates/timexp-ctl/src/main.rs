use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use timexp_daemon::log_manager::DEFAULT_HISTORY_DAYS;
use timexp_daemon::{Daemon, DaemonConfig};

mod auth;
mod commands;

use commands::missions::EntryFields;
use commands::resolve_date;
use commands::schedule::NewItem;

#[derive(Parser)]
#[command(name = "timexp-ctl")]
#[command(about = "TimeXP schedule and mission log control tool", long_about = None)]
struct Cli {
    #[arg(long, global = true, help = "Path to daemon.toml")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in as it
    Register {
        handle: String,
        name: String,
        #[arg(long, default_value = "student", help = "student or parent")]
        role: String,
        #[arg(long, help = "ELEMENTARY, MIDDLE, HIGH or UNIVERSITY")]
        grade: Option<String>,
        #[arg(long)]
        specific_grade: Option<u8>,
    },

    Login {
        handle: String,
    },

    Logout,

    Whoami,

    /// Edit the weekly blueprint
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },

    /// Show a day's reconciled mission log
    Today {
        #[arg(long, help = "YYYY-MM-DD, defaults to today")]
        date: Option<String>,
    },

    /// Mark a planned mission as accomplished
    Fulfill {
        planned_id: String,
        #[arg(long)]
        date: Option<String>,
    },

    /// Log an unplanned activity
    Log {
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },

    /// Remove an entry from a day's log
    Remove {
        entry_id: String,
        #[arg(long)]
        date: Option<String>,
    },

    History {
        #[arg(long, default_value_t = DEFAULT_HISTORY_DAYS)]
        days: u32,
        #[arg(long, help = "Last day shown, defaults to today")]
        end: Option<String>,
    },

    Family {
        #[command(subcommand)]
        action: FamilyAction,
    },

    /// Coaching tips for the current blueprint
    Advice,

    /// Create demo accounts with two weeks of logs
    Seed {
        #[arg(long, default_value = "MIDDLE")]
        grade: String,
        #[arg(long, default_value_t = 7)]
        specific_grade: u8,
    },

    DeleteAccount {
        #[arg(long, help = "Confirm deletion")]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ScheduleAction {
    Show {
        day: Option<String>,
    },
    Add {
        day: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long, help = "Minutes before start to send a reminder")]
        reminder: Option<u32>,
    },
    Remove {
        day: String,
        id: String,
    },
    Duration {
        day: String,
        id: String,
        minutes: u32,
    },
    Clone {
        day: String,
    },
    Conflicts {
        day: String,
    },
}

#[derive(Subcommand)]
enum FamilyAction {
    List,
    AddChild { handle: String, name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Commands::Logout = cli.command {
        return commands::account::logout();
    }

    let config = match &cli.config {
        Some(path) => DaemonConfig::load_from_path(path)?,
        None => DaemonConfig::load()?,
    };
    let daemon = Daemon::new(config).await?;

    match cli.command {
        Commands::Register { handle, name, role, grade, specific_grade } => {
            commands::account::register(
                &daemon,
                &handle,
                &name,
                &role,
                grade.as_deref(),
                specific_grade,
            )
            .await?
        }
        Commands::Login { handle } => commands::account::login(&daemon, &handle).await?,
        Commands::Logout => commands::account::logout()?,
        Commands::Whoami => commands::account::whoami(&daemon).await?,
        Commands::Schedule { action } => match action {
            ScheduleAction::Show { day } => {
                commands::schedule::show(&daemon, day.as_deref()).await?
            }
            ScheduleAction::Add { day, label, start, end, category, subject, reminder } => {
                let fields = NewItem { label, start, end, category, subject, reminder };
                commands::schedule::add(&daemon, &day, fields).await?
            }
            ScheduleAction::Remove { day, id } => {
                commands::schedule::remove(&daemon, &day, &id).await?
            }
            ScheduleAction::Duration { day, id, minutes } => {
                commands::schedule::duration(&daemon, &day, &id, minutes).await?
            }
            ScheduleAction::Clone { day } => commands::schedule::clone_day(&daemon, &day).await?,
            ScheduleAction::Conflicts { day } => {
                commands::schedule::conflicts(&daemon, &day).await?
            }
        },
        Commands::Today { date } => {
            commands::missions::today(&daemon, resolve_date(date.as_deref())?).await?
        }
        Commands::Fulfill { planned_id, date } => {
            commands::missions::fulfill(&daemon, resolve_date(date.as_deref())?, &planned_id)
                .await?
        }
        Commands::Log { label, start, end, category, subject, notes, date } => {
            let fields = EntryFields { label, start, end, category, subject, notes };
            commands::missions::log(&daemon, resolve_date(date.as_deref())?, fields).await?
        }
        Commands::Remove { entry_id, date } => {
            commands::missions::remove(&daemon, resolve_date(date.as_deref())?, &entry_id).await?
        }
        Commands::History { days, end } => {
            commands::missions::history(&daemon, resolve_date(end.as_deref())?, days).await?
        }
        Commands::Family { action } => match action {
            FamilyAction::List => commands::family::list(&daemon).await?,
            FamilyAction::AddChild { handle, name } => {
                commands::family::add_child(&daemon, &handle, &name).await?
            }
        },
        Commands::Advice => commands::advice::show(&daemon).await?,
        Commands::Seed { grade, specific_grade } => {
            commands::seed::demo(&daemon, &grade, specific_grade).await?
        }
        Commands::DeleteAccount { yes } => commands::account::delete_account(&daemon, yes).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_schedule_add() {
        let cli = Cli::parse_from([
            "timexp-ctl", "schedule", "add", "monday", "--label", "Chess", "--start", "17:00",
        ]);

        match cli.command {
            Commands::Schedule { action: ScheduleAction::Add { day, label, start, .. } } => {
                assert_eq!(day, "monday");
                assert_eq!(label.as_deref(), Some("Chess"));
                assert_eq!(start.as_deref(), Some("17:00"));
            }
            _ => panic!("expected schedule add"),
        }
    }

    #[test]
    fn test_history_default_days() {
        let cli = Cli::parse_from(["timexp-ctl", "history"]);
        assert!(matches!(cli.command, Commands::History { days: 30, end: None }));
    }
}
