//! Group command - offering totals per week or month

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use chapel_core::{parse_snapshot, FinancialRecord, Granularity};

use super::{get_context, read_input};
use crate::output::{create_table, format_amount, warning};

pub fn run(file: Option<&Path>, by: &str, chronological: bool, json: bool) -> Result<usize> {
    let granularity: Granularity = by.parse()?;
    let input = read_input(file, "offering records")?;
    let records: Vec<FinancialRecord> = parse_snapshot(&input)?;

    let ctx = get_context()?;
    let mut report = ctx.report_service.period_report(&records, granularity)?;
    if chronological {
        report.sort_chronologically();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(records.len());
    }

    println!("{}", format!("Offerings by {}", granularity).bold());
    println!();

    let mut table = create_table();
    table.set_header(vec!["Period", "Records", "Total"]);
    for period in &report.periods {
        table.add_row(vec![
            period.label.clone(),
            period.record_count.to_string(),
            format_amount(period.total),
        ]);
    }
    println!("{}", table);
    println!();
    println!("{} {}", "Total:".bold(), format_amount(report.total));

    if report.overflowed {
        warning("Some totals exceed the representable range and are shown clamped");
    }
    if report.skipped > 0 {
        warning(&format!(
            "{} record(s) with unreadable dates were left out",
            report.skipped
        ));
    }

    Ok(records.len())
}
