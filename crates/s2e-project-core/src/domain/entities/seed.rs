//! Seed file naming.
//!
//! The seed searcher picks up inputs from a project's `seeds/` directory.
//! Each file is named `<index>-<priority>.pov`:
//!
//! - `index` is a unique non-negative integer, starting from 0
//! - `priority` is a non-negative integer, 0 being the highest priority

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Human-readable form of the naming convention.
pub const SEED_NAME_PATTERN: &str = "<index>-<priority>.pov";
/// File extension of seed files.
pub const SEED_EXTENSION: &str = "pov";

/// A parsed seed file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeedFile {
    pub index: u32,
    pub priority: u32,
}

impl SeedFile {
    pub const fn new(index: u32, priority: u32) -> Self {
        Self { index, priority }
    }

    /// File name for this seed, e.g. `2-0.pov`.
    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SeedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}.{SEED_EXTENSION}", self.index, self.priority)
    }
}

impl FromStr for SeedFile {
    type Err = DomainError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidSeedName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let stem = name
            .strip_suffix(".pov")
            .ok_or_else(|| invalid("missing .pov extension"))?;
        let (index, priority) = stem
            .split_once('-')
            .ok_or_else(|| invalid("expected <index>-<priority>"))?;

        let parse = |part: &str, what: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(&format!("{what} must be a non-negative integer")));
            }
            part.parse::<u32>()
                .map_err(|_| invalid(&format!("{what} is out of range")))
        };

        Ok(Self {
            index: parse(index, "index")?,
            priority: parse(priority, "priority")?,
        })
    }
}
