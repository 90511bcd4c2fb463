//! Resolved-scene file reading.

use std::fs;
use std::path::Path;

use super::ResolvedScene;
use crate::error::{Error, Result};

/// Read a resolved scene document from disk.
///
/// # Errors
/// Returns an error if the file cannot be read, the JSON is malformed, or
/// the scene resolves to zero shape nodes.
pub fn read_scene<P: AsRef<Path>>(path: P) -> Result<ResolvedScene> {
    let content = fs::read_to_string(path)?;
    parse_scene(&content)
}

/// Parse a resolved scene from JSON text.
///
/// # Errors
/// Returns an error if the JSON is malformed or the scene is empty.
pub fn parse_scene(content: &str) -> Result<ResolvedScene> {
    let scene: ResolvedScene = serde_json::from_str(content)?;
    if scene.nodes.is_empty() {
        return Err(Error::EmptyScene);
    }
    Ok(scene)
}
