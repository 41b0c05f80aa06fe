//! Content-id index: maps frontmatter `id` values to document paths so
//! links can address a page by the game object it documents instead of by
//! its location in the tree.

use std::collections::HashMap;

use relative_path::{RelativePath, RelativePathBuf};

use crate::frontmatter::Frontmatter;
use crate::links::LinkResolver;

#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    ids: HashMap<String, RelativePathBuf>,
}

impl ContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` under its frontmatter `id`, if it has one. When two
    /// documents claim the same id the later call wins, so feed documents
    /// in sorted order for a deterministic index.
    pub fn add_document(&mut self, path: &RelativePath, text: &str) {
        if let Some(id) = Frontmatter::parse(text).get("id")
            && !id.is_empty()
        {
            self.ids.insert(id.to_string(), path.to_relative_path_buf());
        }
    }

    pub fn get(&self, id: &str) -> Option<&RelativePath> {
        self.ids.get(id).map(RelativePathBuf::as_relative_path)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn into_resolver(self) -> LinkResolver {
        LinkResolver::new(self.ids)
    }
}

impl<P: Into<RelativePathBuf>, T: AsRef<str>> FromIterator<(P, T)> for ContentIndex {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (path, text) in iter {
            index.add_document(&path.into(), text.as_ref());
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::ResolvedLink;
    use pretty_assertions::assert_eq;

    #[test]
    fn documents_with_ids_are_indexed() {
        let mut index = ContentIndex::new();
        index.add_document(
            RelativePath::new("books/wiki/tools/wrench.mdx"),
            "---\nid: mod:wrench\ntitle: Wrench\n---\nbody\n",
        );
        assert_eq!(
            index.get("mod:wrench").map(RelativePath::as_str),
            Some("books/wiki/tools/wrench.mdx")
        );
    }

    #[test]
    fn documents_without_ids_are_skipped() {
        let mut index = ContentIndex::new();
        index.add_document(
            RelativePath::new("books/wiki/intro.mdx"),
            "---\ntitle: Intro\n---\nbody\n",
        );
        assert!(index.is_empty());
    }

    #[test]
    fn duplicate_ids_keep_the_last_document() {
        let index: ContentIndex = [
            ("books/a.mdx", "---\nid: mod:x\n---\n"),
            ("books/b.mdx", "---\nid: mod:x\n---\n"),
        ]
        .into_iter()
        .collect();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("mod:x").map(RelativePath::as_str), Some("books/b.mdx"));
    }

    #[test]
    fn index_feeds_the_link_resolver() {
        let index: ContentIndex =
            [("books/m/pump.mdx", "---\nid: mod:pump\n---\n")].into_iter().collect();
        let resolver = index.into_resolver();
        assert_eq!(
            resolver.resolve("@mod:pump", "wiki", RelativePath::new("books/wiki/a.mdx")),
            ResolvedLink::Document(RelativePathBuf::from("books/m/pump.mdx"))
        );
    }
}
