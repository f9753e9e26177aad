//! Summary command - totals per offering category

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use chapel_core::{parse_snapshot, FinancialRecord, NestedCollection, OfferingField};

use super::{get_context, read_input};
use crate::output::{create_table, format_amount, warning};

pub fn run(file: Option<&Path>, json: bool) -> Result<usize> {
    let input = read_input(file, "offering records")?;
    let records: Vec<FinancialRecord> = parse_snapshot(&input)?;

    let ctx = get_context()?;
    let breakdown = ctx.report_service.summary(&records);

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(records.len());
    }

    println!("{}", "Offering Summary".bold());
    println!();

    let mut table = create_table();
    table.set_header(vec!["Category", "Amount"]);
    for field in OfferingField::ALL {
        table.add_row(vec![field.label().to_string(), format_amount(breakdown.field(field))]);
    }
    for collection in NestedCollection::ALL {
        table.add_row(vec![
            collection.label().to_string(),
            format_amount(breakdown.nested(collection)),
        ]);
    }
    println!("{}", table);
    println!();
    println!(
        "{} {} from {} record(s)",
        "Total:".bold(),
        format_amount(breakdown.total),
        breakdown.record_count
    );
    if breakdown.overflowed {
        warning("Some totals exceed the representable range and are shown clamped");
    }

    Ok(records.len())
}
