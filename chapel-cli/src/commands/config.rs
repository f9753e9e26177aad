//! Config command - show the effective configuration

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::{get_chapel_dir, get_context};

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let config = &ctx.config;

    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("{}", "Chapel Configuration".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Directory".to_string(), get_chapel_dir().display().to_string()]);
    table.add_row(vec![
        "Week labels include year".to_string(),
        config.week_label_includes_year.to_string(),
    ]);
    table.add_row(vec!["UTC offset (minutes)".to_string(), config.utc_offset_minutes.to_string()]);
    table.add_row(vec![
        "Unreadable dates".to_string(),
        format!("{:?}", config.invalid_timestamps).to_lowercase(),
    ]);
    table.add_row(vec![
        "Max SMS segments".to_string(),
        config
            .max_sms_segments
            .map(|m| m.to_string())
            .unwrap_or_else(|| "unlimited".to_string()),
    ]);
    println!("{}", table);

    Ok(())
}
