//! Android release signing for signet
//!
//! This crate resolves which signing config an Android release build uses:
//! - `key.properties` parsing (Java properties syntax, BOM tolerant)
//! - Credential completeness checks
//! - Release/debug signing config selection through [`SigningContext`]
//! - Diagnostics that never expose passwords
//! - `key.properties` template generation
//!
//! # Example
//!
//! ```rust,no_run
//! use signet_android::{SigningConfig, SigningConfigs, SigningResolver, TracingSink};
//!
//! let mut configs = SigningConfigs::with_debug(SigningConfig::android_debug(None));
//! let resolution = SigningResolver::new("android")
//!     .resolve(&mut configs, &mut TracingSink)
//!     .expect("signing setup is broken");
//!
//! println!("release builds sign with '{}'", resolution.config_name);
//! ```

#![warn(missing_docs)]

pub mod credentials;
pub mod diagnostics;
pub mod error;
pub mod properties;
pub mod resolver;
pub mod signing;
pub mod template;

pub use credentials::{load_credentials, lookup_with_bom_fallback, CredentialSet};
pub use diagnostics::{Diagnostic, DiagnosticSink, Level, NullSink, Recorder, TracingSink};
pub use error::{Result, SigningError};
pub use properties::Properties;
pub use resolver::{resolve_signing_config, Resolution, ResolveOptions, Selection, SigningResolver};
pub use signing::{SigningConfig, SigningConfigs, SigningContext, SigningFields};
