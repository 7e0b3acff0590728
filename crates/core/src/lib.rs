//! Core utilities for signet release signing tools
//!
//! This crate provides shared functionality used by the resolver and CLI:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based tool configuration with defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use signet_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid signet configuration");
//! let properties = config.properties_path();
//! println!("reading credentials from {}", properties.display());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, SigningSettings};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result};
}
