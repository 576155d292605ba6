//! Configuration module for doc-mirror
//!
//! This module handles loading, parsing, and validating the optional TOML configuration
//! file, and reading seed lists.
//!
//! # Example
//!
//! ```no_run
//! use doc_mirror::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! println!("Mirroring {}", config.mirror.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetchConfig, MirrorConfig, OutputFormat, UserAgentConfig, DEFAULT_BASE_URL,
    DEFAULT_OUTPUT_DIR,
};

// Re-export parser functions
pub use parser::{load_config, load_seed_paths, parse_seed_list};

pub use validation::{validate, validate_base_url};
