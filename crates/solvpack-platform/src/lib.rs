pub use arch::Arch;
pub use error::{Error, Result};
pub use os::Os;
pub use platform::TargetPlatform;

pub mod arch;
mod error;
pub mod os;
mod platform;
