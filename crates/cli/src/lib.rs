//! CLI utilities for signet tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Field formatting that keeps secrets out of terminal output

#![warn(missing_docs)]

pub mod output;
