//! Architecture of the build target.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86,
    X86_64,
    Arm64,
}

impl Arch {
    /// The architecture this binary was compiled for; fails on anything without a solver build.
    pub fn host() -> Result<Self> { Self::from_rust_arch(std::env::consts::ARCH) }

    /// Map a `std::env::consts::ARCH` value.
    pub fn from_rust_arch(arch: &str) -> Result<Self> {
        match arch {
            "x86" => Ok(Self::X86),
            "x86_64" => Ok(Self::X86_64),
            "aarch64" => Ok(Self::Arm64),
            other => Err(Error::UnknownArch(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "i386" | "i686" | "win32" => Ok(Self::X86),
            "x86_64" | "amd64" | "x64" | "win64" => Ok(Self::X86_64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            other => Err(Error::UnknownArch(other.to_string())),
        }
    }
}
