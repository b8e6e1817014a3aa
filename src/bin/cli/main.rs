mod app;
mod commands;
mod render;

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mnemo_lib::ReviewOutcome;

#[derive(Parser)]
#[command(name = "mnemo-cli", about = "Spaced repetition for missed material", version)]
struct Cli {
    /// User whose cards and profiles to use
    #[arg(long, global = true, default_value = "local")]
    user: String,

    /// Data directory (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Answer {
    Correct,
    Wrong,
}

impl From<Answer> for ReviewOutcome {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Correct => ReviewOutcome::Correct,
            Answer::Wrong => ReviewOutcome::Wrong,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Add a card
    Add {
        /// Card content (use "-" to read from stdin)
        content: String,
        /// Profile id or name (default profile if omitted)
        #[arg(long)]
        profile: Option<String>,
    },

    /// List cards due today or earlier
    Due,

    /// List all cards
    List,

    /// Show a card with its history and what each answer would do
    Show {
        /// Card id (prefix match)
        card: String,
    },

    /// Record a review
    Review {
        /// Card id (prefix match)
        card: String,
        answer: Answer,
    },

    /// Push a card's due date out, leaving its level alone
    Snooze {
        /// Card id (prefix match)
        card: String,
        /// Days from today (default from config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=36500))]
        days: Option<u32>,
    },

    /// Change a card's content or profile
    Edit {
        /// Card id (prefix match)
        card: String,
        #[arg(long)]
        content: Option<String>,
        /// Profile id or name
        #[arg(long)]
        profile: Option<String>,
    },

    /// Delete a card
    Delete {
        /// Card id (prefix match)
        card: String,
    },

    /// Projected due dates of a card if every answer is correct
    Forecast {
        /// Card id (prefix match)
        card: String,
    },

    /// Projected reviews per day across all cards
    Calendar {
        /// Only show this many days ahead
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(u32).range(1..=36500))]
        days: u32,
    },

    /// Review statistics
    Stats,

    /// Export all cards and profiles as JSON
    Export,

    /// Manage scheduling profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// List profiles
    List,

    /// Add a profile
    Add {
        name: String,
        /// Comma-separated intervals in days, e.g. "0,1,2,4,7"
        #[arg(long)]
        intervals: String,
        /// Id (derived from the name if omitted)
        #[arg(long)]
        id: Option<String>,
        #[arg(long, default_value = "1")]
        regress_step: u32,
        /// Maintenance cadence once graduated; 0 retires cards
        #[arg(long, default_value = "0")]
        graduation_interval: u32,
        #[arg(long, default_value = "3")]
        overdue_tolerance: u32,
    },

    /// Edit a profile and re-schedule its cards
    Edit {
        /// Profile id or name
        profile: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        intervals: Option<String>,
        #[arg(long)]
        regress_step: Option<u32>,
        #[arg(long)]
        graduation_interval: Option<u32>,
        #[arg(long)]
        overdue_tolerance: Option<u32>,
    },

    /// Remove a profile; its cards move to the default profile
    Remove {
        /// Profile id or name
        profile: String,
    },

    /// Make a profile the default for new cards
    Default {
        /// Profile id or name
        profile: String,
    },
}

/// Resolve "-" as stdin
fn resolve_content(content: String) -> anyhow::Result<String> {
    if content == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf.trim_end().to_string())
    } else {
        Ok(content)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let app = app::App::new(cli.data_dir, &cli.user, cli.today)?;
    let format = &cli.format;

    match cli.command {
        Command::Add { content, profile } => {
            let content = resolve_content(content)?;
            commands::cards::run_add(&app, content, profile.as_deref(), format, use_color)?;
        }
        Command::Due => {
            commands::cards::run_due(&app, format, use_color)?;
        }
        Command::List => {
            commands::cards::run_list(&app, format, use_color)?;
        }
        Command::Show { card } => {
            commands::show::run(&app, &card, format, use_color)?;
        }
        Command::Review { card, answer } => {
            commands::review::run(&app, &card, answer.into(), format, use_color)?;
        }
        Command::Snooze { card, days } => {
            commands::cards::run_snooze(&app, &card, days, format, use_color)?;
        }
        Command::Edit { card, content, profile } => {
            let content = content.map(resolve_content).transpose()?;
            commands::cards::run_edit(&app, &card, content, profile.as_deref(), format, use_color)?;
        }
        Command::Delete { card } => {
            commands::cards::run_delete(&app, &card, format)?;
        }
        Command::Forecast { card } => {
            commands::forecast::run_card(&app, &card, format, use_color)?;
        }
        Command::Calendar { days } => {
            commands::forecast::run_calendar(&app, days, format, use_color)?;
        }
        Command::Stats => {
            commands::stats::run(&app, format, use_color)?;
        }
        Command::Export => {
            commands::stats::run_export(&app)?;
        }
        Command::Profile(subcmd) => {
            commands::profile::run(&app, subcmd, format, use_color)?;
        }
    }

    Ok(())
}
