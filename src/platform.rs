//! Where the compression binaries come from on each operating system.
//!
//! Linux relies on the distribution packages (`pngquant`, `jpegoptim` on
//! `PATH`); Windows and macOS ship their own copies next to the executable.

use crate::constants::BUNDLED_TOOLS_DIR;
use crate::error::{CompressionError, Result};
use crate::formats::ToolFormat;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
    MacOs,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Parse an `std::env::consts::OS` style identifier.
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            "macos" => Ok(Platform::MacOs),
            other => Err(CompressionError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Directory name under `tools/<format>/` holding the bundled binary.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::MacOs => "mac",
        }
    }

    pub fn uses_system_tools(&self) -> bool {
        matches!(self, Platform::Linux)
    }
}

/// Where the tool for `format` lives on `platform`.
///
/// System-tool platforms get the bare binary name, left for `PATH` lookup.
/// Everything else gets the bundled location under `base_dir`.
pub fn tool_path(platform: Platform, format: ToolFormat, base_dir: &Path) -> PathBuf {
    if platform.uses_system_tools() {
        return PathBuf::from(format.binary_name());
    }
    bundled_tool_path(platform, format, base_dir)
}

/// `<base_dir>/tools/<format>/<platform>/<binary>`
pub fn bundled_tool_path(platform: Platform, format: ToolFormat, base_dir: &Path) -> PathBuf {
    base_dir
        .join(BUNDLED_TOOLS_DIR)
        .join(format.tag())
        .join(platform.dir_name())
        .join(format.binary_name())
}

/// Directory of the running executable, the default root for bundled tools.
pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        CompressionError::Configuration(format!(
            "cannot determine directory of executable {}",
            exe.display()
        ))
    })
}
