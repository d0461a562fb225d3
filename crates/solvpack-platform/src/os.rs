//! Operating system of the build target.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    Macos,
    Linux,
}

impl Os {
    /// The OS this binary was compiled for.
    pub fn host() -> Result<Self> { Self::from_rust_os(std::env::consts::OS) }

    /// Map a `std::env::consts::OS` value.
    pub fn from_rust_os(os: &str) -> Result<Self> {
        match os {
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::Macos),
            "linux" => Ok(Self::Linux),
            other => Err(Error::UnknownOs(other.to_string())),
        }
    }

    pub fn exe_suffix(self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::Macos | Self::Linux => "",
        }
    }

    /// Separator between source and destination in packager `--add-binary` pairs.
    pub fn pair_separator(self) -> char {
        match self {
            Self::Windows => ';',
            Self::Macos | Self::Linux => ':',
        }
    }

    /// Whether file names on this OS compare case-insensitively.
    pub fn case_insensitive_names(self) -> bool { matches!(self, Self::Windows) }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Macos => "macos",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Os {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win" | "win32" | "win64" => Ok(Self::Windows),
            "macos" | "darwin" | "osx" => Ok(Self::Macos),
            "linux" => Ok(Self::Linux),
            other => Err(Error::UnknownOs(other.to_string())),
        }
    }
}
