//! `key.properties` skeleton generation
//!
//! Writes the file Gradle reads for release signing, with placeholders
//! instead of credentials. Blank passwords count as absent, so a freshly
//! generated file keeps builds on debug signing until it is filled in.

use crate::credentials::{KEY_ALIAS, KEY_PASSWORD, STORE_FILE, STORE_PASSWORD};
use crate::error::{Result, SigningError};
use std::path::Path;

/// Template contents for a new `key.properties`
pub fn key_properties_template(store_file: &str, key_alias: &str) -> String {
    format!(
        "# Release signing credentials for the Android build.\n\
         # Keep this file out of version control.\n\
         # storeFile is resolved against the project root.\n\
         {STORE_FILE}={store_file}\n\
         {STORE_PASSWORD}=\n\
         {KEY_ALIAS}={key_alias}\n\
         {KEY_PASSWORD}=\n"
    )
}

/// Write the template to `path`. Refuses to replace an existing file unless
/// `force` is set.
pub fn write_key_properties_template(
    path: &Path,
    store_file: &str,
    key_alias: &str,
    force: bool,
) -> Result<()> {
    if path.exists() && !force {
        return Err(SigningError::AlreadyExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| SigningError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, key_properties_template(store_file, key_alias)).map_err(|source| {
        SigningError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::debug!("Wrote key.properties template to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{load_credentials, CredentialSet};
    use crate::diagnostics::Diagnostic;
    use tempfile::TempDir;

    #[test]
    fn test_template_contents() {
        let content = key_properties_template("upload-keystore.jks", "upload");

        assert!(content.contains("storeFile=upload-keystore.jks\n"));
        assert!(content.contains("storePassword=\n"));
        assert!(content.contains("keyAlias=upload\n"));
        assert!(content.contains("keyPassword=\n"));
    }

    #[test]
    fn test_written_template_is_incomplete() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("android/key.properties");

        write_key_properties_template(&path, "upload-keystore.jks", "upload", false).unwrap();
        let creds: CredentialSet = load_credentials(&path, &mut Vec::<Diagnostic>::new()).unwrap();

        assert!(!creds.is_complete());
        assert_eq!(creds.missing_fields(), vec!["storePassword", "keyPassword"]);
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("key.properties");
        std::fs::write(&path, "keyAlias=mine\n").unwrap();

        let err = write_key_properties_template(&path, "a.jks", "upload", false).unwrap_err();
        assert!(matches!(err, SigningError::AlreadyExists(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keyAlias=mine\n");

        write_key_properties_template(&path, "a.jks", "upload", true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("keyAlias=upload"));
    }
}
