//! Domain primitive types used across the workspace.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory an operating-system image is assembled in.
///
/// The bind manager only ever reads this path; it never moves or removes
/// the directory itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildRoot(PathBuf);

impl BuildRoot {
    /// Creates a build root handle for the given directory.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Returns the build root directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Returns the host path of `relative` inside the build root.
    ///
    /// `relative` is a build-root-relative absolute path such as `/proc`;
    /// the result is the plain concatenation `<root>/proc`.
    #[must_use]
    pub fn host_path(&self, relative: &str) -> String {
        format!("{}{relative}", self.0.display())
    }
}

impl fmt::Display for BuildRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
