//! Poll command - tally poll votes

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use chapel_core::services::PollTally;
use chapel_core::{parse_snapshot, tally, Poll};

use super::read_input;
use crate::output::{create_table, warning};

pub fn run(file: Option<&Path>, json: bool) -> Result<usize> {
    let input = read_input(file, "polls")?;
    let polls: Vec<Poll> = parse_snapshot(&input)?;
    let tallies: Vec<PollTally> = polls.iter().map(tally).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&tallies)?);
        return Ok(polls.len());
    }

    for (i, result) in tallies.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", result.question.bold());

        let mut table = create_table();
        table.set_header(vec!["Option", "Votes", "%"]);
        for option in &result.options {
            let name = if result.leaders.contains(&option.option) {
                format!("{} ★", option.option)
            } else {
                option.option.clone()
            };
            table.add_row(vec![name, option.votes.to_string(), format!("{:.2}", option.percentage)]);
        }
        println!("{}", table);
        println!("{} valid vote(s)", result.valid_votes);

        if result.invalid_votes > 0 {
            warning(&format!("{} vote(s) for undeclared options ignored", result.invalid_votes));
        }
        if result.duplicate_votes > 0 {
            warning(&format!("{} repeat vote(s) ignored", result.duplicate_votes));
        }
    }

    Ok(polls.len())
}
