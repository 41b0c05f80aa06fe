//! `_meta.json` manifests: one per content directory, ordering that
//! directory's pages and subsections in the navigation tree and naming
//! them.

use relative_path::RelativePath;

use crate::title::FallbackTitles;

/// Manifest file name inside each content directory.
pub const MANIFEST_FILE: &str = "_meta.json";

/// Label for manifest values that are not plain strings.
pub const UNKNOWN_NAME: &str = "Unknown Name";

/// One ordered entry of a directory manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// File name (with `.mdx`) or subdirectory name.
    pub id: String,
    pub display_name: String,
    pub directory: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Malformed manifest: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Manifest root must be a JSON object")]
    NotAnObject,
}

/// Parse a `_meta.json` document. Entry order follows the file; keys that
/// do not end in `.mdx` name subdirectories.
pub fn parse_manifest(text: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let Some(object) = value.as_object() else {
        return Err(ManifestError::NotAnObject);
    };
    Ok(object
        .iter()
        .map(|(id, name)| ManifestEntry {
            id: id.clone(),
            display_name: display_name_of(name),
            directory: !id.ends_with(".mdx"),
        })
        .collect())
}

// Values are either a bare string or an object carrying a `name` field.
fn display_name_of(value: &serde_json::Value) -> String {
    value
        .as_str()
        .or_else(|| value.get("name").and_then(serde_json::Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

/// Titles a manifest supplies for the documents in its directory, used when
/// a document carries no title of its own.
pub fn fallback_titles(directory: &RelativePath, entries: &[ManifestEntry]) -> FallbackTitles {
    entries
        .iter()
        .filter(|entry| !entry.directory)
        .map(|entry| (directory.join(&entry.id), entry.display_name.clone()))
        .collect()
}
