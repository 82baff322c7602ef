//! `chore` CLI — expand recurrence rules and build chore agendas from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Expand a rule (stdin → stdout), one date per line
//! echo '{"type":"daily","interval":2,"startDate":"2024-01-01"}' \
//!   | chore expand --from 2024-01-01 --to 2024-01-10 --format lines
//!
//! # Expand a rule from a file as a JSON array
//! chore expand -i rule.json --from 2024-01-01 --to 2024-03-31
//!
//! # Print a short label for a rule
//! chore describe -i rule.json
//!
//! # Agenda for a chore database, only what is still pending
//! chore agenda --db chores.json --from 2024-01-01 --to 2024-01-31 --pending
//!
//! # Debug logging on stderr
//! RUST_LOG=chore_engine=debug chore expand -i rule.json --from 2024-01-01 --to 2024-12-31
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use chore_engine::{
    build_agenda, parse_date, Database, DateRange, RecurrenceRecord, RecurrenceRule,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chore",
    version,
    about = "Expand chore recurrence rules and build agendas"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a recurrence rule into occurrence dates
    Expand {
        /// Rule JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// First date of the query range (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_date)]
        from: NaiveDate,
        /// Last date of the query range (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_date)]
        to: NaiveDate,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print a short human-readable label for a rule
    Describe {
        /// Rule JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Join every chore's occurrences with completion records
    Agenda {
        /// Chore database JSON file ({members, chores, completions})
        #[arg(long, env = "CHORE_DB")]
        db: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// First date of the query range (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_date)]
        from: NaiveDate,
        /// Last date of the query range (YYYY-MM-DD, inclusive)
        #[arg(long, value_parser = parse_date)]
        to: NaiveDate,
        /// Only list occurrences that have not been completed
        #[arg(long)]
        pending: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Pretty-printed JSON array of dates
    Json,
    /// One date per line
    Lines,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Expand {
            input,
            output,
            from,
            to,
            format,
        } => {
            let rule = read_rule(input.as_deref())?;
            let range = DateRange::new(from, to).context("Invalid query range")?;
            debug!(%rule, %range, "expanding rule");

            let dates = chore_engine::expand_range(&rule, &range);
            let rendered = match format {
                Format::Json => {
                    let mut json = serde_json::to_string_pretty(&dates)?;
                    json.push('\n');
                    json
                }
                Format::Lines => dates.iter().map(|d| format!("{}\n", d)).collect(),
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Describe { input } => {
            let rule = read_rule(input.as_deref())?;
            println!("{}", rule);
        }
        Commands::Agenda {
            db,
            output,
            from,
            to,
            pending,
        } => {
            let raw = read_input(Some(&db))?;
            let database: Database = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse chore database: {}", db))?;
            let range = DateRange::new(from, to).context("Invalid query range")?;

            let mut agenda = build_agenda(&database, &range);
            if pending {
                agenda.retain(|entry| !entry.is_completed);
            }

            let mut json = serde_json::to_string_pretty(&agenda)?;
            json.push('\n');
            write_output(output.as_deref(), &json)?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read a stored rule record and validate it.
fn read_rule(path: Option<&str>) -> Result<RecurrenceRule> {
    let raw = read_input(path)?;
    let record: RecurrenceRecord =
        serde_json::from_str(&raw).context("Failed to parse recurrence rule JSON")?;
    RecurrenceRule::try_from(record).context("Rejected recurrence rule")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
