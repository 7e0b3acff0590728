//! Release signing credentials read from `key.properties`

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{Result, SigningError};
use crate::properties::Properties;
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};

/// Property holding the keystore path
pub const STORE_FILE: &str = "storeFile";
/// Property holding the keystore password
pub const STORE_PASSWORD: &str = "storePassword";
/// Property holding the key alias
pub const KEY_ALIAS: &str = "keyAlias";
/// Property holding the key password
pub const KEY_PASSWORD: &str = "keyPassword";

/// UTF-8 byte-order mark as it appears once decoded
pub const BOM: char = '\u{FEFF}';

/// Look `name` up, retrying with a leading byte-order mark.
///
/// Editors that save with a BOM glue it onto whichever key comes first in the
/// file, so `storeFile` can arrive as `\u{FEFF}storeFile`.
pub fn lookup_with_bom_fallback<'a>(properties: &'a Properties, name: &str) -> Option<&'a str> {
    properties
        .get(name)
        .or_else(|| properties.get(&format!("{BOM}{name}")))
}

/// Trim and drop blank values
fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// The four release credentials, each either present and non-blank or absent
#[derive(Debug, Default)]
pub struct CredentialSet {
    store_file: Option<String>,
    store_password: Option<SecretString>,
    key_alias: Option<String>,
    key_password: Option<SecretString>,
    source: Option<PathBuf>,
    entries: usize,
}

impl CredentialSet {
    /// A set with every field absent
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw values; values are trimmed and blanks become absent
    pub fn new(
        store_file: Option<&str>,
        store_password: Option<&str>,
        key_alias: Option<&str>,
        key_password: Option<&str>,
    ) -> Self {
        Self {
            store_file: normalize(store_file),
            store_password: normalize(store_password).map(SecretString::from),
            key_alias: normalize(key_alias),
            key_password: normalize(key_password).map(SecretString::from),
            source: None,
            entries: 0,
        }
    }

    /// Extract the four credentials from parsed properties
    pub fn from_properties(properties: &Properties) -> Self {
        let mut set = Self::new(
            lookup_with_bom_fallback(properties, STORE_FILE),
            lookup_with_bom_fallback(properties, STORE_PASSWORD),
            lookup_with_bom_fallback(properties, KEY_ALIAS),
            lookup_with_bom_fallback(properties, KEY_PASSWORD),
        );
        set.entries = properties.len();
        set
    }

    /// Keystore path as written in the file
    pub fn store_file(&self) -> Option<&str> {
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

    /// File the set was loaded from; `None` when it did not exist
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Number of distinct keys in the source file
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// All four fields present
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Property names of absent fields, in file order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            (STORE_FILE, self.store_file.is_some()),
            (STORE_PASSWORD, self.store_password.is_some()),
            (KEY_ALIAS, self.key_alias.is_some()),
            (KEY_PASSWORD, self.key_password.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect()
    }

    /// Password length as `chars`, for diagnostics
    pub fn store_password_len(&self) -> Option<usize> {
        secret_len(self.store_password.as_ref())
    }

    /// Password length as `chars`, for diagnostics
    pub fn key_password_len(&self) -> Option<usize> {
        secret_len(self.key_password.as_ref())
    }

    /// One-line summary safe for logs: passwords appear as lengths only
    pub fn summary(&self) -> String {
        format!(
            "{STORE_FILE}={}, {KEY_ALIAS}={}, {STORE_PASSWORD}.len={}, {KEY_PASSWORD}.len={}",
            display_or_none(self.store_file.as_deref()),
            display_or_none(self.key_alias.as_deref()),
            display_or_none(self.store_password_len()),
            display_or_none(self.key_password_len()),
        )
    }
}

fn secret_len(secret: Option<&SecretString>) -> Option<usize> {
    secret.map(|s| s.expose_secret().chars().count())
}

fn display_or_none<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

/// Absolute form of `path` for messages; falls back to the path as given
pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Load credentials from a `key.properties` file.
///
/// A missing file is not an error: it yields an empty set so projects without
/// release signing still build debug-signed. A file that exists but cannot be
/// read or parsed is an error.
pub fn load_credentials(path: &Path, sink: &mut dyn DiagnosticSink) -> Result<CredentialSet> {
    let display = absolute(path);

    let exists = path.try_exists().map_err(|source| SigningError::Io {
        path: display.clone(),
        source,
    })?;
    if !exists {
        sink.emit(Diagnostic::info(format!(
            "key.properties not found at {}",
            display.display()
        )));
        return Ok(CredentialSet::empty());
    }

    let properties = Properties::load(path)?;
    let mut credentials = CredentialSet::from_properties(&properties);
    credentials.source = Some(display.clone());

    sink.emit(Diagnostic::info(format!(
        "Loaded key.properties from {} size={}",
        display.display(),
        properties.len()
    )));
    sink.emit(Diagnostic::info(credentials.summary()));

    Ok(credentials)
}
