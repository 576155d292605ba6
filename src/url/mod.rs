//! URL handling module for doc-mirror
//!
//! Everything that decides whether a reference is part of the mirror lives here:
//! resolution against a base, single-host scoping, and path percent-normalization.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::authority;
pub use normalize::{normalize_path, resolve_candidate};
