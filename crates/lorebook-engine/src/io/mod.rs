use std::fs;
use std::path::{Path, PathBuf};

use relative_path::{RelativePath, RelativePathBuf};

use crate::index::ContentIndex;
use crate::sources::DocumentSource;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid content root: {0}")]
    InvalidContentRoot(String),
}

/// Read a wiki document and return its raw text
pub fn read_document(relative_path: &RelativePath, content_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(content_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Scan for `.mdx` documents under the content root, returning sorted
/// root-relative paths
pub fn scan_documents(content_root: &Path) -> Result<Vec<RelativePathBuf>, IoError> {
    if !content_root.exists() {
        return Err(IoError::InvalidContentRoot(
            "content root not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(content_root, content_root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(
    root: &Path,
    dir: &Path,
    files: &mut Vec<RelativePathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(root, &path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "mdx"
            && let Ok(stripped) = path.strip_prefix(root)
            && let Ok(relative) = RelativePathBuf::from_path(stripped)
        {
            files.push(relative);
        }
    }

    Ok(())
}

pub fn validate_content_root(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidContentRoot(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}

/// Build the content-id index by reading every document under the root.
/// Documents are visited in sorted order, so duplicate ids resolve the same
/// way on every run.
pub fn index_documents(content_root: &Path) -> Result<ContentIndex, IoError> {
    let mut index = ContentIndex::new();
    for path in scan_documents(content_root)? {
        let text = read_document(&path, content_root)?;
        index.add_document(&path, &text);
    }
    Ok(index)
}

/// [`DocumentSource`] backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for FsDocumentSource {
    fn load(&self, path: &RelativePath) -> Option<String> {
        read_document(path, &self.root).ok()
    }
}
