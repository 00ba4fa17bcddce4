//! The analysis `Target` and the guest image it runs in.
//!
//! A `Target` pairs a binary on disk with the guest OS description taken
//! from an image descriptor. The binary's own format is sniffed from its
//! header; the set of formats the guest can run is *declared* by the image
//! and is what project types validate against.
//!
//! # Domain purity
//!
//! This module must not import `tracing` or touch the filesystem. Reading
//! headers and descriptors is the job of the adapters.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Arch, BinaryFormat};

// ── Guest image ───────────────────────────────────────────────────────────────

/// Guest operating system description from an image's `image.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub name: String,
    pub arch: Arch,
    #[serde(default)]
    pub binary_formats: BTreeSet<String>,
}

impl OsInfo {
    pub fn new(
        name: impl Into<String>,
        arch: Arch,
        formats: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            arch,
            binary_formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the guest declares support for `format`.
    pub fn declares(&self, format: &str) -> bool {
        self.binary_formats.contains(format)
    }

    pub fn supports(&self, format: BinaryFormat) -> bool {
        self.declares(format.as_str())
    }
}

/// A guest image the engine can boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Directory name of the image; filled in by the catalog when the
    /// descriptor omits it.
    #[serde(default)]
    pub name: String,
    pub os: OsInfo,
}

impl ImageDescriptor {
    pub fn new(name: impl Into<String>, os: OsInfo) -> Self {
        Self {
            name: name.into(),
            os,
        }
    }
}

// ── Target ────────────────────────────────────────────────────────────────────

/// The binary under analysis and the image selected to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    path: PathBuf,
    arch: Arch,
    format: BinaryFormat,
    image: ImageDescriptor,
}

impl Target {
    pub fn new(
        path: impl Into<PathBuf>,
        arch: Arch,
        format: BinaryFormat,
        image: ImageDescriptor,
    ) -> Self {
        Self {
            path: path.into(),
            arch,
            format,
            image,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn arch(&self) -> Arch {
        self.arch
    }

    pub const fn format(&self) -> BinaryFormat {
        self.format
    }

    pub fn image(&self) -> &ImageDescriptor {
        &self.image
    }

    pub fn os(&self) -> &OsInfo {
        &self.image.os
    }

    /// File name of the binary, used as the default project name and as the
    /// `target` template variable.
    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {}) on {} [{}]",
            self.basename(),
            self.format,
            self.arch,
            self.image.name,
            self.image.os.name
        )
    }
}
