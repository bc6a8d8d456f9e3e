//! Consent button payloads.
//!
//! Wire format: `consent:<yes|no>:<group_id>:<member_id>`. The platform caps
//! button data at 64 bytes, which the widest pair of `i64` ids still fits.

use super::registry::PendingKey;
use crate::gateway::traits::{GroupId, MemberId};
use std::fmt;
use std::str::FromStr;

/// Tag prefixing every consent payload
pub const PAYLOAD_TAG: &str = "consent";

/// Maximum payload size accepted by the platform
pub const MAX_PAYLOAD_LEN: usize = 64;

/// The member's decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Accept,
    Decline,
}

impl Choice {
    fn as_str(self) -> &'static str {
        match self {
            Choice::Accept => "yes",
            Choice::Decline => "no",
        }
    }
}

/// Decoded button payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsentAction {
    pub choice: Choice,
    pub group_id: GroupId,
    /// Member the prompt is addressed to
    pub member_id: MemberId,
}

impl ConsentAction {
    pub fn new(choice: Choice, key: PendingKey) -> Self {
        Self {
            choice,
            group_id: key.group_id,
            member_id: key.member_id,
        }
    }

    pub fn key(&self) -> PendingKey {
        PendingKey::new(self.group_id, self.member_id)
    }
}

impl fmt::Display for ConsentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            PAYLOAD_TAG,
            self.choice.as_str(),
            self.group_id,
            self.member_id
        )
    }
}

/// Payload parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("Payload exceeds 64 bytes ({0})")]
    TooLong(usize),

    #[error("Expected 4 fields, got {0}")]
    FieldCount(usize),

    #[error("Unknown payload tag: {0}")]
    UnknownTag(String),

    #[error("Unknown choice: {0}")]
    UnknownChoice(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

impl FromStr for ConsentAction {
    type Err = PayloadError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(PayloadError::TooLong(payload.len()));
        }

        let fields: Vec<&str> = payload.split(':').collect();
        let (tag, choice, group, member) = match fields.as_slice() {
            [tag, choice, group, member] => (*tag, *choice, *group, *member),
            _ => return Err(PayloadError::FieldCount(fields.len())),
        };

        if tag != PAYLOAD_TAG {
            return Err(PayloadError::UnknownTag(tag.to_string()));
        }

        let choice = match choice {
            "yes" => Choice::Accept,
            "no" => Choice::Decline,
            other => return Err(PayloadError::UnknownChoice(other.to_string())),
        };

        let parse_id = |raw: &str| {
            raw.parse::<i64>()
                .map_err(|_| PayloadError::InvalidId(raw.to_string()))
        };

        Ok(Self {
            choice,
            group_id: GroupId(parse_id(group)?),
            member_id: MemberId(parse_id(member)?),
        })
    }
}
