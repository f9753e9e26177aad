//! Chapel CLI - offering reports in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use chapel_core::LogEvent;
use commands::total::OutputFormat;
use commands::{config, group, log_event, logs, poll, sms, summary, total};

/// Chapel - tithe and offering reports from fetched snapshots
#[derive(Parser)]
#[command(name = "chapel", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Total each offering record
    Total {
        /// JSON snapshot (array or {"data": [...]}); reads stdin if omitted
        file: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Output as JSON (shorthand for --format json)
        #[arg(long)]
        json: bool,
    },

    /// Group offering totals by week or month
    Group {
        /// JSON snapshot; reads stdin if omitted
        file: Option<PathBuf>,
        /// Period to group by: week or month
        #[arg(long, default_value = "week")]
        by: String,
        /// List periods oldest first instead of snapshot order
        #[arg(long)]
        chronological: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Totals per offering category
    Summary {
        /// JSON snapshot; reads stdin if omitted
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Tally poll votes
    Poll {
        /// JSON snapshot of polls; reads stdin if omitted
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count SMS segments for a broadcast
    Sms {
        /// Message text; reads stdin if omitted
        message: Option<String>,
        /// Number of recipients
        #[arg(long, short, default_value = "1")]
        recipients: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Total { .. } => "total",
            Commands::Group { .. } => "group",
            Commands::Summary { .. } => "summary",
            Commands::Poll { .. } => "poll",
            Commands::Sms { .. } => "sms",
            Commands::Config { .. } => "config",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.name();
    let result = run(cli);

    // Opened after the command so `logs` never holds the database twice
    let logger = commands::get_logger();

    match result {
        Ok(record_count) => {
            let mut event = LogEvent::new("command_executed").with_command(command);
            if let Some(count) = record_count {
                event = event.with_record_count(count);
            }
            log_event(&logger, event);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command(command)
                    .with_error(e.to_string())
                    .with_error_details(format!("{:#}", e)),
            );
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Run a command; record-reading commands report how many records they saw
fn run(cli: Cli) -> Result<Option<usize>> {
    match cli.command {
        Commands::Total { file, format, json } => {
            let format = if json { OutputFormat::Json } else { format };
            total::run(file.as_deref(), format).map(Some)
        }
        Commands::Group { file, by, chronological, json } => {
            group::run(file.as_deref(), &by, chronological, json).map(Some)
        }
        Commands::Summary { file, json } => summary::run(file.as_deref(), json).map(Some),
        Commands::Poll { file, json } => poll::run(file.as_deref(), json).map(Some),
        Commands::Sms { message, recipients, json } => sms::run(message, recipients, json).map(|_| None),
        Commands::Config { json } => config::run(json).map(|_| None),
        Commands::Logs { command } => logs::run(command).map(|_| None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_format_values() {
        let cli = Cli::try_parse_from(["chapel", "total", "--format", "csv"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Total { format: OutputFormat::Csv, .. }
        ));

        let cli = Cli::try_parse_from(["chapel", "total"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Total { format: OutputFormat::Table, .. }
        ));
    }

    #[test]
    fn test_unknown_total_format_is_rejected() {
        assert!(Cli::try_parse_from(["chapel", "total", "--format", "xml"]).is_err());
    }
}
