use std::fmt;
use std::str::FromStr;

use crate::{Arch, Error, Os, Result};

/// The platform a bundle is being built for; may differ from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPlatform {
    pub os:   Os,
    pub arch: Arch,
}

impl TargetPlatform {
    pub fn new(os: Os, arch: Arch) -> Self { Self { os, arch } }

    pub fn host() -> Result<Self> { Ok(Self::new(Os::host()?, Arch::host()?)) }

    /// `cbc` becomes `cbc.exe` on Windows; a stem that already carries the suffix is kept.
    pub fn executable_name(&self, stem: &str) -> String {
        let suffix = self.os.exe_suffix();
        if suffix.is_empty() || stem.to_ascii_lowercase().ends_with(suffix) {
            stem.to_string()
        } else {
            format!("{stem}{suffix}")
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}-{}", self.os, self.arch) }
}

impl FromStr for TargetPlatform {
    type Err = Error;

    /// Accepts `windows`, `windows-x86_64`, `linux-arm64`, ...; a missing arch means the host's.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidTarget(s.to_string()));
        }
        match s.split_once('-') {
            Some((os, arch)) => Ok(Self::new(os.parse()?, arch.parse()?)),
            None => Ok(Self::new(s.parse()?, Arch::host()?)),
        }
    }
}
