//! Total command - per-record offering totals

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use rust_decimal::Decimal;

use chapel_core::services::{is_saturated, saturating_sum};
use chapel_core::{parse_snapshot, FinancialRecord};

use super::{get_context, read_input};
use crate::output::{create_table, format_amount, warning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

pub fn run(file: Option<&Path>, format: OutputFormat) -> Result<usize> {
    let input = read_input(file, "offering records")?;
    let records: Vec<FinancialRecord> = parse_snapshot(&input)?;

    let ctx = get_context()?;
    let totals = ctx.report_service.record_totals(&records);
    let grand_total: Decimal = saturating_sum(totals.iter().map(|t| t.total));
    let overflowed = is_saturated(grand_total) || totals.iter().any(|t| t.overflowed);

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "records": totals,
                    "total": grand_total,
                    "overflowed": overflowed,
                }))?
            );
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer.write_record(["id", "created_at", "payers", "total"])?;
            for t in &totals {
                writer.write_record([
                    t.id.as_deref().unwrap_or(""),
                    t.created_at.as_deref().unwrap_or(""),
                    t.payer_count.to_string().as_str(),
                    format_amount(t.total).as_str(),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            let mut table = create_table();
            table.set_header(vec!["ID", "Created", "Payers", "Total"]);
            for t in &totals {
                table.add_row(vec![
                    t.id.clone().unwrap_or_else(|| "-".to_string()),
                    t.created_at.clone().unwrap_or_else(|| "-".to_string()),
                    t.payer_count.to_string(),
                    format_amount(t.total),
                ]);
            }
            println!("{}", table);
            println!();
            println!(
                "{} {} across {} record(s)",
                "Grand total:".bold(),
                format_amount(grand_total),
                totals.len()
            );
            if overflowed {
                warning("Some totals exceed the representable range and are shown clamped");
            }
        }
    }

    Ok(records.len())
}
