//! Desktop Manager Core Library
//!
//! This crate provides shared types, errors, and path configuration for the
//! desktop manager shell.

pub mod config;
pub mod error;
pub mod types;

pub use config::AppPaths;
pub use error::{DeskError, DeskResult};
