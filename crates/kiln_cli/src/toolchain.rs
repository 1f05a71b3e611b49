//! C++ toolchain discovery.
//!
//! Kiln's scheme relies on compiler behavior that is not in any released
//! clang: the import-annotation output and the dyndep-aware ninja. A
//! release `clang++` on PATH would produce confusing failures deep into a
//! build, so `gen` checks up front and refuses it.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Command;

/// Name of the compiler binary looked up on PATH.
const CXX_NAME: &str = "clang++";

/// A discovered, usable C++ toolchain.
#[derive(Debug)]
pub struct Toolchain {
    /// Path to the `clang++` binary.
    pub cxx: PathBuf,
}

/// Errors from toolchain discovery.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// No `clang++` was found on PATH.
    #[error("clang++ not found on PATH")]
    NotFound,

    /// Running `clang++ --version` failed.
    #[error("failed to run {} --version: {source}", .cxx.display())]
    Probe {
        /// The binary that could not be probed.
        cxx: PathBuf,
        /// The underlying process error.
        #[source]
        source: std::io::Error,
    },

    /// The `clang++` on PATH is a release build.
    #[error(
        "{} is a release build of clang++, but kiln requires a patched \
         git build of clang and ninja; please see the README",
        .0.display()
    )]
    ReleaseBuild(PathBuf),
}

/// Finds `clang++` on PATH and verifies it is a patched development build.
pub fn discover() -> Result<Toolchain, ToolchainError> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    let cxx = find_in(&path_var, CXX_NAME).ok_or(ToolchainError::NotFound)?;

    let output = Command::new(&cxx)
        .arg("--version")
        .output()
        .map_err(|source| ToolchainError::Probe {
            cxx: cxx.clone(),
            source,
        })?;

    // Release tags show up as e.g. "(tags/RELEASE_xxx/final)".
    if String::from_utf8_lossy(&output.stdout).contains("RELEASE") {
        return Err(ToolchainError::ReleaseBuild(cxx));
    }

    Ok(Toolchain { cxx })
}

/// Searches a PATH-style variable for an executable file.
fn find_in(path_var: &OsStr, name: &str) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
