// Copyright 2025 Open Connectome Project
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Two-tier loading:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)

use crate::{BuildConfig, ConfigError, ConfigResult, GraphVariant};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the braingraph configuration file
///
/// Search order:
/// 1. `BRAINGRAPH_CONFIG_PATH` environment variable
/// 2. Current working directory: `./braingraph.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("BRAINGRAPH_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "config file specified by BRAINGRAPH_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join("braingraph.toml"));
        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join("braingraph.toml"));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "braingraph configuration file 'braingraph.toml' not found in any of these locations:\n{}\n\nSet BRAINGRAPH_CONFIG_PATH to specify a custom location.",
        search_list
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, searches for one.
///
/// # Errors
///
/// Returns an error if the config file is not found or contains invalid TOML
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<BuildConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: BuildConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config)?;

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `BRAINGRAPH_FIBER_PATH` -> `subject.fiber_path`
/// - `BRAINGRAPH_OUTPUT_PATH` -> `subject.output_path`
/// - `BRAINGRAPH_VARIANT` -> `graph.variant`
/// - `BRAINGRAPH_MAX_EDGES` -> `graph.max_edges`
/// - `BRAINGRAPH_PROGRESS_INTERVAL` -> `graph.progress_interval`
/// - `BRAINGRAPH_LOG_LEVEL` -> `system.log_level`
pub fn apply_environment_overrides(config: &mut BuildConfig) -> ConfigResult<()> {
    if let Ok(value) = env::var("BRAINGRAPH_FIBER_PATH") {
        config.subject.fiber_path = PathBuf::from(value);
    }
    if let Ok(value) = env::var("BRAINGRAPH_OUTPUT_PATH") {
        config.subject.output_path = PathBuf::from(value);
    }
    if let Ok(value) = env::var("BRAINGRAPH_VARIANT") {
        config.graph.variant = value
            .parse::<GraphVariant>()
            .map_err(ConfigError::InvalidValue)?;
    }
    if let Ok(value) = env::var("BRAINGRAPH_MAX_EDGES") {
        if let Ok(cap) = value.parse::<u64>() {
            config.graph.max_edges = Some(cap);
        }
    }
    if let Ok(value) = env::var("BRAINGRAPH_PROGRESS_INTERVAL") {
        if let Ok(interval) = value.parse::<u64>() {
            config.graph.progress_interval = interval;
        }
    }
    if let Ok(value) = env::var("BRAINGRAPH_LOG_LEVEL") {
        config.system.log_level = value;
    }
    Ok(())
}
