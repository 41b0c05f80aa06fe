//! Collaborator seams. The engine never does I/O or game-registry lookups
//! of its own; the embedding platform supplies these.

use relative_path::{RelativePath, RelativePathBuf};
use std::collections::HashMap;

/// Supplies raw document text by path. Backed by the game's resource
/// manager in the mod, by the filesystem in tools and tests.
pub trait DocumentSource {
    fn load(&self, path: &RelativePath) -> Option<String>;
}

/// Oracle over the game's item registry: id validity and localized names.
pub trait GameObjects {
    fn contains(&self, id: &str) -> bool;

    fn display_name(&self, id: &str) -> Option<String>;
}

/// Null oracle for contexts without a running game.
pub struct NoGameObjects;

impl GameObjects for NoGameObjects {
    fn contains(&self, _id: &str) -> bool {
        false
    }

    fn display_name(&self, _id: &str) -> Option<String> {
        None
    }
}

/// In-memory document store, used by tests and by indexing runs that have
/// already read everything once.
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    documents: HashMap<RelativePathBuf, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<RelativePathBuf>, content: impl Into<String>) {
        self.documents.insert(path.into(), content.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &str)> {
        self.documents
            .iter()
            .map(|(p, c)| (p.as_relative_path(), c.as_str()))
    }
}

impl DocumentSource for InMemorySource {
    fn load(&self, path: &RelativePath) -> Option<String> {
        self.documents.get(path).cloned()
    }
}

impl<P: Into<RelativePathBuf>, C: Into<String>> FromIterator<(P, C)> for InMemorySource {
    fn from_iter<T: IntoIterator<Item = (P, C)>>(iter: T) -> Self {
        Self {
            documents: iter
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        }
    }
}
