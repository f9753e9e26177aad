//! Poll domain model

use serde::{Deserialize, Serialize};

use super::lenient;

/// A members' poll with its recorded votes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    #[serde(default, alias = "_id", deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default)]
    pub question: String,
    /// Declared options, in display order
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub votes: Vec<PollVote>,
}

/// A single vote for one option
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollVote {
    #[serde(default, deserialize_with = "lenient::text")]
    pub option: Option<String>,
    /// Voter identity, when the client recorded one
    #[serde(default, alias = "userId", deserialize_with = "lenient::text")]
    pub voter: Option<String>,
}

impl PollVote {
    pub fn new(option: impl Into<String>) -> Self {
        Self {
            option: Some(option.into()),
            voter: None,
        }
    }

    pub fn by(mut self, voter: impl Into<String>) -> Self {
        self.voter = Some(voter.into());
        self
    }
}
