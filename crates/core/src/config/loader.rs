//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Standard configuration file locations, searched in order
const CANDIDATES: [&str; 3] = [".signet.toml", "signet.toml", ".config/signet.toml"];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or the current directory's standard locations
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from_dir(Path::new("."), path)
    }

    /// Load configuration, searching `dir` when no explicit path is given
    pub fn load_from_dir(dir: &Path, path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(dir),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Project root with `~` expanded
    pub fn project_root(&self) -> PathBuf {
        expand(&self.schema.general.project_root)
    }

    /// Location of key.properties
    pub fn properties_path(&self) -> PathBuf {
        self.properties_path_in(&self.project_root())
    }

    /// Location of key.properties under another project root
    pub fn properties_path_in(&self, root: &Path) -> PathBuf {
        root.join(expand(&self.schema.signing.properties_file))
    }

    /// Configured debug keystore, if overridden
    pub fn debug_keystore(&self) -> Option<PathBuf> {
        self.schema.signing.debug_keystore.as_deref().map(expand)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Find configuration file in standard locations
fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {}", path.display(), e))
            .with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::config_parse(format!("Failed to parse config file {}: {}", path.display(), e))
            .with_source(e)
    })
}
