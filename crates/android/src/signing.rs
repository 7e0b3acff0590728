//! Signing configurations and the container they live in
//!
//! [`SigningContext`] is the narrow capability the resolver needs from the
//! build: look configs up by name, create one, and pick which config a build
//! variant signs with. [`SigningConfigs`] is the in-memory implementation.

use crate::error::{Result, SigningError};
use secrecy::SecretString;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

/// Name of the platform-supplied debug signing config
pub const DEBUG_CONFIG: &str = "debug";

/// Password shared by the Android debug keystore and its key
const DEBUG_PASSWORD: &str = "android";

/// Alias of the key in the Android debug keystore
const DEBUG_KEY_ALIAS: &str = "androiddebugkey";

/// Fields needed to create a signing config
#[derive(Debug)]
pub struct SigningFields {
    /// Absolute keystore path
    pub store_file: PathBuf,
    /// Keystore password
    pub store_password: SecretString,
    /// Alias of the signing key
    pub key_alias: String,
    /// Key password
    pub key_password: SecretString,
}

/// A named keystore plus the credentials to open it
#[derive(Debug)]
pub struct SigningConfig {
    name: String,
    store_file: Option<PathBuf>,
    store_password: Option<SecretString>,
    key_alias: Option<String>,
    key_password: Option<SecretString>,
}

impl SigningConfig {
    /// Create a fully populated config
    pub fn new(name: impl Into<String>, fields: SigningFields) -> Self {
        Self {
            name: name.into(),
            store_file: Some(fields.store_file),
            store_password: Some(fields.store_password),
            key_alias: Some(fields.key_alias),
            key_password: Some(fields.key_password),
        }
    }

    /// The standard Android debug config.
    ///
    /// Uses `~/.android/debug.keystore` unless `store_file` overrides it. The
    /// store file stays unset when no home directory can be determined.
    pub fn android_debug(store_file: Option<PathBuf>) -> Self {
        let store_file = store_file.or_else(|| {
            dirs::home_dir().map(|home| home.join(".android").join("debug.keystore"))
        });

        Self {
            name: DEBUG_CONFIG.to_string(),
            store_file,
            store_password: Some(SecretString::from(DEBUG_PASSWORD)),
            key_alias: Some(DEBUG_KEY_ALIAS.to_string()),
            key_password: Some(SecretString::from(DEBUG_PASSWORD)),
        }
    }

    /// Same config registered under another name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name the config is registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keystore path
    pub fn store_file(&self) -> Option<&Path> {
        self.store_file.as_deref()
    }

    /// Keystore password
    pub fn store_password(&self) -> Option<&SecretString> {
        self.store_password.as_ref()
    }

    /// Alias of the signing key
    pub fn key_alias(&self) -> Option<&str> {
        self.key_alias.as_deref()
    }

    /// Key password
    pub fn key_password(&self) -> Option<&SecretString> {
        self.key_password.as_ref()
    }

    /// A config can sign only with a store file and a non-blank key alias
    pub fn is_usable(&self) -> bool {
        self.store_file.is_some()
            && self
                .key_alias
                .as_deref()
                .is_some_and(|alias| !alias.trim().is_empty())
    }
}

/// Capability interface over the build's signing configs
pub trait SigningContext {
    /// Find a config by name
    fn get_config(&self, name: &str) -> Option<&SigningConfig>;

    /// Create and register a config. Fails if the name is taken.
    fn create_config(&mut self, name: &str, fields: SigningFields) -> Result<&SigningConfig>;

    /// Make `variant` sign with the config named `config`
    fn set_active_config(&mut self, variant: &str, config: &str) -> Result<()>;

    /// Names of all registered configs, sorted
    fn config_names(&self) -> Vec<String>;
}

/// In-memory signing config container
#[derive(Debug, Default)]
pub struct SigningConfigs {
    configs: BTreeMap<String, SigningConfig>,
    active: BTreeMap<String, String>,
}

impl SigningConfigs {
    /// Empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Container with the given debug config pre-registered under its own name
    pub fn with_debug(debug: SigningConfig) -> Self {
        let mut configs = Self::new();
        configs.configs.insert(debug.name.clone(), debug);
        configs
    }

    /// Config currently applied to `variant`
    pub fn active_config(&self, variant: &str) -> Option<&SigningConfig> {
        self.active
            .get(variant)
            .and_then(|name| self.configs.get(name))
    }
}

impl SigningContext for SigningConfigs {
    fn get_config(&self, name: &str) -> Option<&SigningConfig> {
        self.configs.get(name)
    }

    fn create_config(&mut self, name: &str, fields: SigningFields) -> Result<&SigningConfig> {
        match self.configs.entry(name.to_string()) {
            Entry::Occupied(_) => Err(SigningError::DuplicateSigningConfig(name.to_string())),
            Entry::Vacant(slot) => Ok(slot.insert(SigningConfig::new(name, fields))),
        }
    }

    fn set_active_config(&mut self, variant: &str, config: &str) -> Result<()> {
        if !self.configs.contains_key(config) {
            return Err(SigningError::SigningConfigNotFound(config.to_string()));
        }
        self.active.insert(variant.to_string(), config.to_string());
        Ok(())
    }

    fn config_names(&self) -> Vec<String> {
        self.configs.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn fields(alias: &str) -> SigningFields {
        SigningFields {
            store_file: PathBuf::from("/keys/release.jks"),
            store_password: SecretString::from("abc123"),
            key_alias: alias.to_string(),
            key_password: SecretString::from("def456"),
        }
    }

    #[test]
    fn test_android_debug_defaults() {
        let debug = SigningConfig::android_debug(Some(PathBuf::from("/tmp/debug.keystore")));

        assert_eq!(debug.name(), "debug");
        assert_eq!(debug.key_alias(), Some("androiddebugkey"));
        assert_eq!(debug.store_password().unwrap().expose_secret(), "android");
        assert!(debug.is_usable());
        assert_eq!(debug.named("devDebug").name(), "devDebug");
    }

    #[test]
    fn test_debug_output_redacts_passwords() {
        let config = SigningConfig::new("release", fields("upload"));
        let rendered = format!("{config:?}");

        assert!(rendered.contains("upload"));
        assert!(!rendered.contains("abc123"));
        assert!(!rendered.contains("def456"));
    }

    #[test]
    fn test_blank_alias_is_not_usable() {
        let config = SigningConfig::new("release", fields("   "));
        assert!(!config.is_usable());
    }

    #[test]
    fn test_create_and_activate() {
        let mut configs = SigningConfigs::with_debug(SigningConfig::android_debug(None));
        configs.create_config("release", fields("upload")).unwrap();
        configs.set_active_config("release", "release").unwrap();

        assert_eq!(configs.config_names(), vec!["debug", "release"]);
        assert_eq!(configs.active_config("release").unwrap().key_alias(), Some("upload"));
    }

    #[test]
    fn test_duplicate_create_rejected() {
        let mut configs = SigningConfigs::new();
        configs.create_config("release", fields("upload")).unwrap();

        let err = configs.create_config("release", fields("other")).unwrap_err();
        assert!(matches!(err, SigningError::DuplicateSigningConfig(name) if name == "release"));
    }

    #[test]
    fn test_activate_unknown_config() {
        let mut configs = SigningConfigs::new();
        let err = configs.set_active_config("release", "debug").unwrap_err();
        assert!(matches!(err, SigningError::SigningConfigNotFound(_)));
    }
}
