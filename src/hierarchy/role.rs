//! Leadership ranks
//!
//! The four senapoti ranks form a closed set. Every lookup over them is an
//! exhaustive match, so an unrecognized rank can only appear at the parsing
//! boundary (`FromStr`), never inside the engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A leadership rank. Variants are declared from highest authority to lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadershipRole {
    /// Rank 1, reports to the district supervisor outside the forest
    MalaSenapoti,
    /// Rank 2
    MahaChakraSenapoti,
    /// Rank 3
    ChakraSenapoti,
    /// Rank 4, the lowest rank
    UpaChakraSenapoti,
}

impl LeadershipRole {
    /// Every rank, highest authority first.
    pub const ALL: [LeadershipRole; 4] = [
        LeadershipRole::MalaSenapoti,
        LeadershipRole::MahaChakraSenapoti,
        LeadershipRole::ChakraSenapoti,
        LeadershipRole::UpaChakraSenapoti,
    ];

    /// Returns the wire name of the rank.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadershipRole::MalaSenapoti => "MALA_SENAPOTI",
            LeadershipRole::MahaChakraSenapoti => "MAHA_CHAKRA_SENAPOTI",
            LeadershipRole::ChakraSenapoti => "CHAKRA_SENAPOTI",
            LeadershipRole::UpaChakraSenapoti => "UPA_CHAKRA_SENAPOTI",
        }
    }
}

impl fmt::Display for LeadershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a string does not name one of the four ranks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown leadership role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for LeadershipRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadershipRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Renders an optional role for log fields and messages.
pub(crate) fn role_label(role: Option<LeadershipRole>) -> &'static str {
    role.map(|r| r.as_str()).unwrap_or("NONE")
}
