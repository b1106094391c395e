use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::WageModelError;

/// Which pay scale a raise rate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    /// The general, university-wide scale.
    Base,
    /// The department-specific scale.
    Astro,
}

impl Track {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Astro => "astro",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Some(Self::Base),
            "astro" => Some(Self::Astro),
            _ => None,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Track {
    type Err = WageModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            WageModelError::InvalidParameter(format!(
                "entered rate track not valid: '{}' (expected astro or base)",
                s.trim()
            ))
        })
    }
}
