//! Configuration model for the bind manager.
//!
//! Every field has a default taken from [`crate::constants`], so a JSON file
//! only needs to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KiwiError, Result};

/// What the bind manager mounts and stages inside a build root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Host kernel filesystem paths to bind-mount, in mount order.
    pub bind_locations: Vec<String>,
    /// Host configuration files to stage via copy plus symlink.
    pub config_files: Vec<String>,
    /// Host cache directory shared with the build root.
    pub shared_location: String,
    /// Marker appended to staged config copies.
    pub config_suffix: String,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            bind_locations: to_owned(crate::constants::DEFAULT_BIND_LOCATIONS),
            config_files: to_owned(crate::constants::DEFAULT_CONFIG_FILES),
            shared_location: crate::constants::DEFAULT_SHARED_LOCATION.to_owned(),
            config_suffix: crate::constants::DEFAULT_CONFIG_SUFFIX.to_owned(),
        }
    }
}

impl BindConfig {
    /// Reads a JSON configuration file and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`BindConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KiwiError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every path is absolute and the suffix is a plain marker.
    ///
    /// # Errors
    ///
    /// Returns [`KiwiError::Config`] describing the first offending value.
    pub fn validate(&self) -> Result<()> {
        for location in self.bind_locations.iter().chain(&self.config_files) {
            require_absolute(location)?;
        }
        require_absolute(&self.shared_location)?;
        if self.config_suffix.is_empty() || self.config_suffix.contains('/') {
            return Err(KiwiError::Config {
                message: format!(
                    "config suffix must be a non-empty file name marker, got {:?}",
                    self.config_suffix
                ),
            });
        }
        Ok(())
    }
}

fn require_absolute(path: &str) -> Result<()> {
    if path.len() < 2 || !path.starts_with('/') {
        return Err(KiwiError::Config {
            message: format!("expected an absolute path below /, got {path:?}"),
        });
    }
    Ok(())
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}
