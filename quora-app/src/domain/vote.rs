use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Upvote,
    Downvote,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVoteType(pub String);

impl FromStr for VoteType {
    type Err = UnknownVoteType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("upvote") {
            Ok(Self::Upvote)
        } else if s.eq_ignore_ascii_case("downvote") {
            Ok(Self::Downvote)
        } else {
            Err(UnknownVoteType(s.to_string()))
        }
    }
}

/// One voter's current stance on one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub voter_id: uuid::Uuid,
    pub answer_id: uuid::Uuid,
    #[serde(rename = "type")]
    pub vote_type: VoteType,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Vote payload as decoded from the caller, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(default)]
    pub answer_id: String,
    #[serde(rename = "type", default)]
    pub vote_type: String,
}

impl VoteRequest {
    pub fn new(answer_id: impl Into<String>, vote_type: impl Into<String>) -> Self {
        Self {
            answer_id: answer_id.into(),
            vote_type: vote_type.into(),
        }
    }
}

/// A vote request whose fields have been checked and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedVote {
    pub answer_id: uuid::Uuid,
    pub vote_type: VoteType,
}

/// Signed adjustment of an answer's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallyDelta {
    pub upvote: i32,
    pub downvote: i32,
}

impl TallyDelta {
    pub fn added(vote_type: VoteType) -> Self {
        match vote_type {
            VoteType::Upvote => Self { upvote: 1, downvote: 0 },
            VoteType::Downvote => Self { upvote: 0, downvote: 1 },
        }
    }

    pub fn removed(vote_type: VoteType) -> Self {
        let added = Self::added(vote_type);
        Self {
            upvote: -added.upvote,
            downvote: -added.downvote,
        }
    }

    pub fn then(self, other: Self) -> Self {
        Self {
            upvote: self.upvote + other.upvote,
            downvote: self.downvote + other.downvote,
        }
    }
}

/// What a vote call does to the ledger of one (voter, answer) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// No record existed; one is created.
    Create(VoteType),
    /// The existing record flips to the other type.
    Switch { from: VoteType, to: VoteType },
    /// The existing record is removed.
    Withdraw(VoteType),
    /// Ledger and tally stay as they are.
    Unchanged,
}

impl VoteTransition {
    pub fn cast(current: Option<VoteType>, requested: VoteType) -> Self {
        match current {
            None => Self::Create(requested),
            Some(existing) if existing == requested => Self::Unchanged,
            Some(existing) => Self::Switch {
                from: existing,
                to: requested,
            },
        }
    }

    pub fn withdraw(current: Option<VoteType>) -> Self {
        match current {
            Some(existing) => Self::Withdraw(existing),
            None => Self::Unchanged,
        }
    }

    /// Counter adjustment matching the ledger change, `None` for a no-op.
    pub fn tally_delta(&self) -> Option<TallyDelta> {
        match *self {
            Self::Create(vote_type) => Some(TallyDelta::added(vote_type)),
            Self::Switch { from, to } => {
                Some(TallyDelta::removed(from).then(TallyDelta::added(to)))
            }
            Self::Withdraw(vote_type) => Some(TallyDelta::removed(vote_type)),
            Self::Unchanged => None,
        }
    }
}
