use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::WageModelError;

/// Job level on both pay scales, in seniority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Premaster,
    Intermediate,
    Candidate,
}

impl Level {
    /// Every level, in display order.
    pub const ALL: [Level; 3] = [Level::Premaster, Level::Intermediate, Level::Candidate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Premaster => "premaster",
            Self::Intermediate => "intermediate",
            Self::Candidate => "candidate",
        }
    }

    /// Case-insensitive lookup; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "premaster" => Some(Self::Premaster),
            "intermediate" => Some(Self::Intermediate),
            "candidate" => Some(Self::Candidate),
            _ => None,
        }
    }

    /// Position of the level in [`Level::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Level {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = WageModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            WageModelError::InvalidParameter(format!(
                "entered level not valid: '{}' (expected premaster, intermediate or candidate)",
                s.trim()
            ))
        })
    }
}
