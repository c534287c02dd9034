// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! # Braingraph Configuration
//!
//! Type-safe build configuration with:
//! - TOML file parsing
//! - Environment variable overrides
//! - Validation before a build starts
//!
//! ## Usage
//!
//! ```rust,no_run
//! use braingraph_config::{load_config, BuildConfig};
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("fiber file: {}", config.subject.fiber_path.display());
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_environment_overrides, find_config_file, load_config};
pub use types::{BuildConfig, GraphConfig, GraphVariant, SubjectConfig, SystemConfig};
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("validation failed: {0}")]
    ValidationError(#[from] ConfigValidationError),

    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
