//! Domain value objects: BinaryFormat, Arch, SeedPolicy.
//!
//! # Design
//!
//! These are pure value types — `Copy`, equality-by-value, no identity.
//! This file defines the types, their string representations, their
//! `FromStr` parsers, and header sniffing for executables.
//!
//! # Adding New Formats
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm, the `FromStr` arm and a magic in `detect`
//! 3. Done — image descriptors refer to formats by their string name

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── BinaryFormat ──────────────────────────────────────────────────────────────

/// Executable container format of a target binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryFormat {
    /// CGC DECREE executables (`\x7fCGC`).
    Decree,
    Elf,
    Pe,
}

/// Number of header bytes needed by [`BinaryFormat::detect`].
pub const HEADER_LEN: usize = 5;

impl BinaryFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Decree => "decree",
            Self::Elf => "elf",
            Self::Pe => "pe",
        }
    }

    /// Sniff the format and architecture from the first bytes of a file.
    ///
    /// DECREE binaries are always 32-bit x86. For ELF the class byte decides;
    /// PE headers do not carry the machine type this early, so the
    /// architecture is left unknown.
    pub fn detect(header: &[u8]) -> Option<(Self, Option<Arch>)> {
        match header {
            [0x7f, b'C', b'G', b'C', ..] => Some((Self::Decree, Some(Arch::I386))),
            [0x7f, b'E', b'L', b'F', class, ..] => {
                let arch = match class {
                    1 => Some(Arch::I386),
                    2 => Some(Arch::X86_64),
                    _ => None,
                };
                Some((Self::Elf, arch))
            }
            [0x7f, b'E', b'L', b'F'] => Some((Self::Elf, None)),
            [b'M', b'Z', ..] => Some((Self::Pe, None)),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinaryFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "decree" | "cgc" => Ok(Self::Decree),
            "elf" => Ok(Self::Elf),
            "pe" => Ok(Self::Pe),
            other => Err(DomainError::UnknownBinaryFormat(other.to_string())),
        }
    }
}

// ── Arch ──────────────────────────────────────────────────────────────────────

/// CPU architecture of a target binary or guest OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    I386,
    X86_64,
}

impl Arch {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::I386 => "i386",
            Self::X86_64 => "x86_64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arch {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "i386" | "x86" | "i686" => Ok(Self::I386),
            "x86_64" | "amd64" | "x64" => Ok(Self::X86_64),
            other => Err(DomainError::UnknownArchitecture(other.to_string())),
        }
    }
}

// ── SeedPolicy ────────────────────────────────────────────────────────────────

/// Whether a project type lets the caller decide on seed-driven execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Follow the caller's choice.
    #[default]
    Optional,
    /// Seeds are always on for this project type.
    Required,
}

impl SeedPolicy {
    /// Resolve the effective seed setting for a caller request.
    pub const fn resolve(self, requested: bool) -> bool {
        match self {
            Self::Optional => requested,
            Self::Required => true,
        }
    }

    /// `true` when applying this policy would ignore the caller's request.
    pub const fn overrides(self, requested: bool) -> bool {
        matches!(self, Self::Required) && !requested
    }
}
