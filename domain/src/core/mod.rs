//! Core helpers shared across the domain.
//!
//! - [`string::truncate_chars`]: character-safe description previews

pub mod string;
