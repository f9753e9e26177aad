//! SMS command - segment count for a broadcast message

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use chapel_core::count_segments;
use chapel_core::services::SmsEncoding;

use super::{get_context, read_input};
use crate::output::warning;

pub fn run(message: Option<String>, recipients: u64, json: bool) -> Result<()> {
    let message = match message {
        Some(m) => m,
        None => read_input(None, "message")?.trim_end_matches(['\r', '\n']).to_string(),
    };

    let ctx = get_context()?;
    let segments = count_segments(&message);
    let billable = segments.messages_for(recipients);
    let over_limit = ctx
        .config
        .max_sms_segments
        .map_or(false, |max| segments.exceeds(max));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "segments": segments,
                "recipients": recipients,
                "billableMessages": billable,
                "overLimit": over_limit,
            }))?
        );
        return Ok(());
    }

    let encoding = match segments.encoding {
        SmsEncoding::Gsm7 => "GSM-7",
        SmsEncoding::Ucs2 => "UCS-2 (unicode)",
    };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Encoding", encoding]);
    table.add_row(vec!["Characters", &segments.characters.to_string()]);
    table.add_row(vec!["Segments", &segments.segments.to_string()]);
    table.add_row(vec!["Per segment", &segments.per_segment.to_string()]);
    table.add_row(vec!["Remaining", &segments.remaining.to_string()]);
    table.add_row(vec!["Recipients", &recipients.to_string()]);
    table.add_row(vec!["Billable messages", &billable.to_string()]);
    println!("{}", table);

    if over_limit {
        warning(&format!(
            "Message is longer than the configured limit of {} segment(s)",
            ctx.config.max_sms_segments.unwrap_or_default()
        ));
    } else if segments.encoding == SmsEncoding::Ucs2 {
        println!("{}", "Unicode characters cut segment size; remove them to fit more text.".dimmed());
    }

    Ok(())
}
