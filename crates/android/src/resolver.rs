//! Release signing resolution
//!
//! Decides whether the release variant signs with a `release` config built
//! from `key.properties` or falls back to the platform's `debug` config.
//!
//! - Complete credentials with an existing keystore: `release`.
//! - Complete credentials with a missing keystore: hard error. A broken path
//!   must not quietly produce a debug-signed "release" artifact.
//! - Anything less than complete: `debug`, with a warning naming the missing
//!   fields.

use crate::credentials::{absolute, load_credentials, CredentialSet};
use crate::diagnostics::{Diagnostic, DiagnosticSink, Level, Recorder};
use crate::error::{Result, SigningError};
use crate::signing::{SigningConfig, SigningContext, SigningFields, DEBUG_CONFIG};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use signet_core::config::{Config, SigningSettings};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which signing config a variant ended up with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Signed with the config built from `key.properties`
    Release,
    /// Signed with the platform debug config
    Debug,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Release => write!(f, "release"),
            Selection::Debug => write!(f, "debug"),
        }
    }
}

/// Config and variant names used during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Name given to the config created from complete credentials
    pub release_config: String,
    /// Name of the fallback config already registered in the context
    pub debug_config: String,
    /// Variant the chosen config is applied to
    pub variant: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            release_config: "release".to_string(),
            debug_config: DEBUG_CONFIG.to_string(),
            variant: "release".to_string(),
        }
    }
}

impl From<&SigningSettings> for ResolveOptions {
    fn from(settings: &SigningSettings) -> Self {
        Self {
            release_config: settings.release_config.clone(),
            debug_config: settings.debug_config.clone(),
            variant: settings.variant.clone(),
        }
    }
}

/// Outcome of a resolution
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Release or debug
    pub selection: Selection,
    /// Name of the config applied to the variant
    pub config_name: String,
    /// Variant the config was applied to
    pub variant: String,
    /// Keystore of the applied config
    pub store_file: Option<PathBuf>,
    /// Key alias of the applied config
    pub key_alias: Option<String>,
    /// Credentials absent from `key.properties`
    pub missing: Vec<&'static str>,
    /// Everything reported while resolving, in order
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    /// The release config was applied
    pub fn is_release(&self) -> bool {
        self.selection == Selection::Release
    }

    /// Warning-level diagnostics only
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == Level::Warn)
    }
}

/// Build release fields when all four credentials are present.
///
/// Returns `Ok(None)` for an incomplete set. The keystore path is resolved
/// against `project_root`; absolute paths are kept as they are.
fn release_fields(credentials: &CredentialSet, project_root: &Path) -> Result<Option<SigningFields>> {
    let (Some(store_file), Some(store_password), Some(key_alias), Some(key_password)) = (
        credentials.store_file(),
        credentials.store_password(),
        credentials.key_alias(),
        credentials.key_password(),
    ) else {
        return Ok(None);
    };

    let store_file = absolute(&project_root.join(store_file));
    if !store_file.exists() {
        return Err(SigningError::MissingKeystoreFile(store_file));
    }

    Ok(Some(SigningFields {
        store_file,
        store_password: copy_secret(store_password),
        key_alias: key_alias.to_string(),
        key_password: copy_secret(key_password),
    }))
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_owned())
}

/// Resolve and apply the signing config for `options.variant`.
///
/// Creates the release config in `context` only when the credentials are
/// complete and the keystore exists, then points the variant at either it or
/// the debug config.
pub fn resolve_signing_config<C: SigningContext + ?Sized>(
    credentials: &CredentialSet,
    project_root: &Path,
    context: &mut C,
    options: &ResolveOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<Resolution> {
    let mut trail = Recorder::new(sink);

    let created = match release_fields(credentials, project_root)? {
        Some(fields) => {
            let config = context.create_config(&options.release_config, fields)?;
            trail.info(format!(
                "Applied {} signingConfig: file={}, keyAlias={}",
                options.release_config,
                config.store_file().map(Path::display).map_or_else(String::new, |d| d.to_string()),
                config.key_alias().unwrap_or_default(),
            ));
            true
        }
        None => {
            trail.warn(format!(
                "key.properties is incomplete (missing {}); {} signing will NOT be applied",
                credentials.missing_fields().join(", "),
                options.release_config,
            ));
            false
        }
    };

    trail.info(format!(
        "signingConfigs available: [{}]",
        context.config_names().join(", ")
    ));

    let release_usable = created
        && context
            .get_config(&options.release_config)
            .is_some_and(SigningConfig::is_usable);

    let (selection, config_name) = if release_usable {
        (Selection::Release, options.release_config.as_str())
    } else {
        (Selection::Debug, options.debug_config.as_str())
    };

    let applied = context
        .get_config(config_name)
        .ok_or_else(|| SigningError::SigningConfigNotFound(config_name.to_string()))?;
    let store_file = applied.store_file().map(Path::to_path_buf);
    let key_alias = applied.key_alias().map(String::from);

    context.set_active_config(&options.variant, config_name)?;

    match selection {
        Selection::Release => trail.info(format!(
            "Using signingConfig '{config_name}' for variant '{}'",
            options.variant
        )),
        Selection::Debug => trail.warn(format!(
            "Falling back to '{config_name}' signingConfig for variant '{}'",
            options.variant
        )),
    }

    Ok(Resolution {
        selection,
        config_name: config_name.to_string(),
        variant: options.variant.clone(),
        store_file,
        key_alias,
        missing: credentials.missing_fields(),
        diagnostics: trail.into_recorded(),
    })
}

/// Runs one resolution: load `key.properties`, then resolve.
///
/// `resolve` consumes the resolver, so each instance resolves exactly once.
#[derive(Debug, Clone)]
pub struct SigningResolver {
    project_root: PathBuf,
    properties: PathBuf,
    options: ResolveOptions,
}

impl SigningResolver {
    /// Resolver reading `<project_root>/key.properties`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let properties = project_root.join("key.properties");
        Self {
            project_root,
            properties,
            options: ResolveOptions::default(),
        }
    }

    /// Resolver driven by tool configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            project_root: config.project_root(),
            properties: config.properties_path(),
            options: ResolveOptions::from(&config.schema.signing),
        }
    }

    /// Read credentials from `path` instead
    pub fn with_properties(mut self, path: impl Into<PathBuf>) -> Self {
        self.properties = path.into();
        self
    }

    /// Replace config and variant names
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply the selected config to `variant`
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.options.variant = variant.into();
        self
    }

    /// Directory relative keystore paths resolve against
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Credentials file this resolver reads
    pub fn properties_path(&self) -> &Path {
        &self.properties
    }

    /// Config and variant names in use
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Load credentials without resolving
    pub fn load(&self, sink: &mut dyn DiagnosticSink) -> Result<CredentialSet> {
        load_credentials(&self.properties, sink)
    }

    /// Load credentials and apply the selected config to the variant.
    ///
    /// The returned trail includes the loading diagnostics.
    pub fn resolve<C: SigningContext + ?Sized>(
        self,
        context: &mut C,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Resolution> {
        let mut trail = Recorder::new(sink);
        let credentials = load_credentials(&self.properties, &mut trail)?;

        tracing::debug!(
            properties = %self.properties.display(),
            complete = credentials.is_complete(),
            "Resolving signing config"
        );

        let mut resolution = resolve_signing_config(
            &credentials,
            &self.project_root,
            context,
            &self.options,
            &mut trail,
        )?;
        resolution.diagnostics = trail.into_recorded();
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::SigningConfigs;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn context() -> SigningConfigs {
        SigningConfigs::with_debug(SigningConfig::android_debug(Some(PathBuf::from(
            "/home/dev/.android/debug.keystore",
        ))))
    }

    fn project_with_keystore() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("release.jks"), b"\xfe\xed\xfe\xed").unwrap();
        temp
    }

    fn resolve(
        credentials: &CredentialSet,
        root: &Path,
        context: &mut SigningConfigs,
    ) -> (Result<Resolution>, Vec<Diagnostic>) {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let result = resolve_signing_config(
            credentials,
            root,
            context,
            &ResolveOptions::default(),
            &mut diagnostics,
        );
        (result, diagnostics)
    }

    #[test]
    fn test_complete_credentials_select_release() {
        let project = project_with_keystore();
        let creds = CredentialSet::new(Some("release.jks"), Some("abc123"), Some("upload"), Some("def456"));
        let mut ctx = context();

        let (result, _) = resolve(&creds, project.path(), &mut ctx);
        let resolution = result.unwrap();

        assert_eq!(resolution.selection, Selection::Release);
        assert_eq!(resolution.key_alias.as_deref(), Some("upload"));
        assert!(resolution.store_file.as_ref().unwrap().is_absolute());
        assert!(resolution.missing.is_empty());
        assert_eq!(ctx.active_config("release").unwrap().name(), "release");
        assert_eq!(resolution.warnings().count(), 0);
    }

    #[test]
    fn test_partial_credentials_fall_back_with_missing_fields() {
        let project = project_with_keystore();
        let creds = CredentialSet::new(Some("release.jks"), None, Some("upload"), None);
        let mut ctx = context();

        let (result, diagnostics) = resolve(&creds, project.path(), &mut ctx);
        let resolution = result.unwrap();

        assert_eq!(resolution.selection, Selection::Debug);
        assert_eq!(resolution.config_name, "debug");
        assert_eq!(resolution.missing, vec!["storePassword", "keyPassword"]);
        assert!(ctx.get_config("release").is_none());
        assert_eq!(ctx.active_config("release").unwrap().name(), "debug");

        let warning = diagnostics
            .iter()
            .find(|d| d.level == Level::Warn && d.message.contains("incomplete"))
            .unwrap();
        assert!(warning.message.contains("storePassword"));
        assert!(warning.message.contains("keyPassword"));
        assert!(!warning.message.contains("keyAlias"));
    }

    #[test]
    fn test_missing_keystore_is_hard_error() {
        let project = TempDir::new().unwrap();
        let creds = CredentialSet::new(Some("missing.jks"), Some("abc123"), Some("upload"), Some("def456"));
        let mut ctx = context();

        let (result, _) = resolve(&creds, project.path(), &mut ctx);

        match result.unwrap_err() {
            SigningError::MissingKeystoreFile(path) => {
                assert!(path.is_absolute());
                assert!(path.ends_with("missing.jks"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(ctx.active_config("release").is_none());
    }

    #[test]
    fn test_absolute_store_file_is_kept() {
        let keystore_dir = project_with_keystore();
        let project = TempDir::new().unwrap();
        let store = keystore_dir.path().join("release.jks");
        let creds = CredentialSet::new(store.to_str(), Some("abc123"), Some("upload"), Some("def456"));
        let mut ctx = context();

        let (result, _) = resolve(&creds, project.path(), &mut ctx);

        assert_eq!(result.unwrap().store_file, Some(store));
    }

    /// Stores every created config with a blank key alias
    struct BlankAliasContext(SigningConfigs);

    impl SigningContext for BlankAliasContext {
        fn get_config(&self, name: &str) -> Option<&SigningConfig> {
            self.0.get_config(name)
        }

        fn create_config(&mut self, name: &str, fields: SigningFields) -> Result<&SigningConfig> {
            let fields = SigningFields {
                key_alias: "  ".to_string(),
                ..fields
            };
            self.0.create_config(name, fields)
        }

        fn set_active_config(&mut self, variant: &str, config: &str) -> Result<()> {
            self.0.set_active_config(variant, config)
        }

        fn config_names(&self) -> Vec<String> {
            self.0.config_names()
        }
    }

    #[test]
    fn test_unusable_release_config_falls_back_to_debug() {
        let project = project_with_keystore();
        let creds = CredentialSet::new(Some("release.jks"), Some("abc123"), Some("upload"), Some("def456"));
        let mut ctx = BlankAliasContext(context());
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let resolution = resolve_signing_config(
            &creds,
            project.path(),
            &mut ctx,
            &ResolveOptions::default(),
            &mut diagnostics,
        )
        .unwrap();

        assert_eq!(resolution.selection, Selection::Debug);
        assert_eq!(resolution.config_name, "debug");
        assert!(resolution.missing.is_empty());
        assert!(ctx.get_config("release").is_some());
        assert_eq!(ctx.0.active_config("release").unwrap().name(), "debug");
        assert!(
            diagnostics
                .iter()
                .any(|d| d.level == Level::Warn && d.message.contains("Falling back to 'debug'"))
        );
    }

    #[test]
    fn test_missing_debug_config_is_error() {
        let creds = CredentialSet::empty();
        let mut ctx = SigningConfigs::new();

        let (result, _) = resolve(&creds, Path::new("."), &mut ctx);
        assert!(matches!(result, Err(SigningError::SigningConfigNotFound(name)) if name == "debug"));
    }

    #[test]
    fn test_existing_release_config_is_not_silently_reused() {
        let project = project_with_keystore();
        let creds = CredentialSet::new(Some("release.jks"), Some("abc123"), Some("upload"), Some("def456"));
        let mut ctx = context();
        ctx.create_config(
            "release",
            SigningFields {
                store_file: PathBuf::from("/old.jks"),
                store_password: SecretString::from("x"),
                key_alias: "old".to_string(),
                key_password: SecretString::from("y"),
            },
        )
        .unwrap();

        let (result, _) = resolve(&creds, project.path(), &mut ctx);
        assert!(matches!(result, Err(SigningError::DuplicateSigningConfig(_))));
    }

    #[test]
    fn test_diagnostics_never_contain_passwords() {
        let project = project_with_keystore();
        std::fs::write(
            project.path().join("key.properties"),
            "storeFile=release.jks\nstorePassword=s3cr3t-store\nkeyAlias=upload\nkeyPassword=s3cr3t-key\n",
        )
        .unwrap();
        let mut ctx = context();
        let mut sink: Vec<Diagnostic> = Vec::new();

        let resolution = SigningResolver::new(project.path())
            .resolve(&mut ctx, &mut sink)
            .unwrap();

        assert!(resolution.is_release());
        assert_eq!(resolution.diagnostics, sink);
        for d in &sink {
            assert!(!d.message.contains("s3cr3t"), "leaked: {}", d.message);
        }
        let rendered = format!("{resolution:?} {ctx:?}");
        assert!(!rendered.contains("s3cr3t"));
    }

    #[test]
    fn test_resolver_with_only_store_file_and_alias() {
        let project = project_with_keystore();
        std::fs::write(
            project.path().join("key.properties"),
            "storeFile=release.jks\nkeyAlias=upload\n",
        )
        .unwrap();
        let mut ctx = context();

        let resolution = SigningResolver::new(project.path())
            .resolve(&mut ctx, &mut crate::diagnostics::NullSink)
            .unwrap();

        assert_eq!(resolution.selection, Selection::Debug);
        let warning = resolution.warnings().next().unwrap();
        assert!(warning.message.contains("storePassword, keyPassword"));
    }

    #[test]
    fn test_resolver_without_properties_file() {
        let project = TempDir::new().unwrap();
        let mut ctx = context();

        let resolution = SigningResolver::new(project.path())
            .with_variant("profile")
            .resolve(&mut ctx, &mut crate::diagnostics::NullSink)
            .unwrap();

        assert_eq!(resolution.selection, Selection::Debug);
        assert_eq!(resolution.variant, "profile");
        assert!(resolution.diagnostics[0].message.contains("not found"));
        assert_eq!(ctx.active_config("profile").unwrap().name(), "debug");
    }

    #[test]
    fn test_selection_serializes_lowercase() {
        assert_eq!(Selection::Release.to_string(), "release");
        assert_eq!(Selection::Debug.to_string(), "debug");
    }

    proptest! {
        #[test]
        fn release_iff_all_present_and_keystore_exists(
            store_file in any::<bool>(),
            store_password in any::<bool>(),
            key_alias in any::<bool>(),
            key_password in any::<bool>(),
            keystore_exists in any::<bool>(),
        ) {
            let project = TempDir::new().unwrap();
            if keystore_exists {
                std::fs::write(project.path().join("release.jks"), b"ks").unwrap();
            }
            let creds = CredentialSet::new(
                store_file.then_some("release.jks"),
                store_password.then_some("abc123"),
                key_alias.then_some("upload"),
                key_password.then_some("def456"),
            );
            let mut ctx = context();
            let complete = store_file && store_password && key_alias && key_password;

            let (result, _) = resolve(&creds, project.path(), &mut ctx);

            match (complete, keystore_exists) {
                (true, true) => prop_assert_eq!(result.unwrap().selection, Selection::Release),
                (true, false) => {
                    prop_assert!(
                        matches!(result, Err(SigningError::MissingKeystoreFile(_))),
                        "expected MissingKeystoreFile"
                    );
                }
                _ => prop_assert_eq!(result.unwrap().selection, Selection::Debug),
            }
        }
    }
}
