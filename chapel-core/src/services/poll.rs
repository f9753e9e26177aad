//! Poll vote tallying

use std::collections::{HashMap, HashSet};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::Poll;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionTally {
    pub option: String,
    pub votes: u64,
    /// Share of valid votes, two decimal places
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollTally {
    pub question: String,
    /// One entry per declared option, in declared order
    pub options: Vec<OptionTally>,
    pub valid_votes: u64,
    /// Votes naming an option the poll never declared
    pub invalid_votes: u64,
    /// Repeat votes by a voter who already voted
    pub duplicate_votes: u64,
    /// Options tied at the highest count; empty with no valid votes
    pub leaders: Vec<String>,
}

/// Count votes per declared option
///
/// A voter's first vote counts; later votes by the same voter are
/// duplicates. Anonymous votes always count.
pub fn tally(poll: &Poll) -> PollTally {
    let mut counts: HashMap<&str, u64> = poll.options.iter().map(|o| (o.as_str(), 0)).collect();
    let mut seen_voters: HashSet<&str> = HashSet::new();
    let mut invalid_votes = 0;
    let mut duplicate_votes = 0;

    for vote in &poll.votes {
        if let Some(voter) = vote.voter.as_deref() {
            if !seen_voters.insert(voter) {
                duplicate_votes += 1;
                continue;
            }
        }
        match vote.option.as_deref().and_then(|o| counts.get_mut(o)) {
            Some(count) => *count += 1,
            None => invalid_votes += 1,
        }
    }

    let valid_votes: u64 = counts.values().sum();
    let mut seen_options = HashSet::new();
    let options: Vec<OptionTally> = poll
        .options
        .iter()
        // A repeated option label shares one counter; report it once
        .filter(|option| seen_options.insert(option.as_str()))
        .map(|option| {
            let votes = counts.get(option.as_str()).copied().unwrap_or(0);
            OptionTally {
                option: option.clone(),
                votes,
                percentage: percentage(votes, valid_votes),
            }
        })
        .collect();

    let top = options.iter().map(|o| o.votes).max().unwrap_or(0);
    let leaders = if top == 0 {
        Vec::new()
    } else {
        options
            .iter()
            .filter(|o| o.votes == top)
            .map(|o| o.option.clone())
            .collect()
    };

    PollTally {
        question: poll.question.clone(),
        options,
        valid_votes,
        invalid_votes,
        duplicate_votes,
        leaders,
    }
}

fn percentage(part: u64, whole: u64) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
