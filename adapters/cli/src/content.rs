//! Loading of content tables from disk.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use lane_defense_core::{Catalog, Content};

/// Reads content overrides from a TOML file, or the shipped tables when no
/// path is given, and validates them.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let content = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read content {}", path.display()))?;
            parse(&text).with_context(|| format!("invalid content {}", path.display()))?
        }
        None => Content::default(),
    };
    Catalog::new(content).context("content failed validation")
}

fn parse(text: &str) -> Result<Content> {
    Ok(toml::from_str(text)?)
}
