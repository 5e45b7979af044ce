//! Host platform detection
//!
//! Only two decisions hang off this: the default CMake generator and
//! whether log lines get colored.

use std::fmt;

/// Generator used by default on Windows hosts
pub const WINDOWS_DEFAULT_GENERATOR: &str = "NMake Makefiles";

/// Normalized host description, e.g. `linux64` or `win32`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformInfo {
    /// Lower-cased OS family; every Windows flavor collapses to `win`
    pub os_family: String,
    /// `"64"` or `"32"`
    pub address_width: &'static str,
}

impl PlatformInfo {
    /// Detect the host platform
    pub fn current() -> Self {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Classify an OS name and architecture string
    ///
    /// Never fails: unknown names are kept as-is (lower-cased) and any
    /// architecture without a `64` marker counts as 32-bit.
    pub fn from_parts(os: &str, arch: &str) -> Self {
        let os = os.trim().to_lowercase();
        let os_family = if is_windows_name(&os) {
            "win".to_string()
        } else if os.is_empty() {
            "unknown".to_string()
        } else {
            os
        };
        let address_width = if arch.contains("64") { "64" } else { "32" };
        Self {
            os_family,
            address_width,
        }
    }

    /// Whether the host belongs to the Windows family
    pub fn is_windows(&self) -> bool {
        self.os_family == "win"
    }

    /// Generator to use when none was asked for
    pub fn default_generator(&self) -> Option<&'static str> {
        if self.is_windows() {
            Some(WINDOWS_DEFAULT_GENERATOR)
        } else {
            None
        }
    }

    /// Whether log output should be ANSI-colored on this host
    pub fn supports_color(&self) -> bool {
        self.os_family.starts_with("linux")
    }
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.os_family, self.address_width)
    }
}

// "darwin" contains "win" too, so match on the known Windows spellings
// (`windows`, `win32`, `cygwin_nt-10.0`, `mingw64_nt`, `msys_nt`) instead.
fn is_windows_name(os: &str) -> bool {
    os.starts_with("win")
        || os.starts_with("cygwin")
        || os.starts_with("mingw")
        || os.starts_with("msys")
}
