//! Platform detection utilities

use log::debug;

/// Operating system family reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Android,
    Linux,
    Mac,
    Windows,
    Other,
}

impl Os {
    /// Parse a host platform name (`"android"`, `"linux"`, `"mac"`, `"win"`, ...)
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "android" => Os::Android,
            "linux" | "openbsd" | "freebsd" => Os::Linux,
            "mac" | "macos" => Os::Mac,
            "win" | "windows" => Os::Windows,
            _ => Os::Other,
        }
    }
}

/// Result of the host's platform-info probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    pub os: Os,
}

impl PlatformInfo {
    /// Probe the platform this process runs on
    ///
    /// `LINKTEXT_PLATFORM` overrides the compile-time target, which lets a
    /// desktop build behave like a mobile one.
    pub fn detect() -> Self {
        if let Ok(name) = std::env::var("LINKTEXT_PLATFORM") {
            debug!("Platform overridden to {:?}", name);
            return Self {
                os: Os::from_name(&name),
            };
        }

        let os = if cfg!(target_os = "android") {
            Os::Android
        } else if cfg!(target_os = "macos") {
            Os::Mac
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(unix) {
            Os::Linux
        } else {
            Os::Other
        };
        Self { os }
    }

    /// Whether the host offers a context menu on links
    pub fn supports_link_context_menu(&self) -> bool {
        self.os != Os::Android
    }
}
