use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Reads a seed list file
///
/// See [`parse_seed_list`] for the accepted format.
pub fn load_seed_paths(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_seed_list(&content))
}

/// Parses a seed list: one path or URL per line
///
/// Lines are trimmed; blank lines and lines starting with `#` are ignored.
///
/// # Example
///
/// ```
/// use doc_mirror::config::parse_seed_list;
///
/// let seeds = parse_seed_list("# api pages\n/api/\n\n  /api/units  \n");
/// assert_eq!(seeds, vec!["/api/", "/api/units"]);
/// ```
pub fn parse_seed_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
