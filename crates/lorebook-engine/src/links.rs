//! Link resolution for wiki documents.
//!
//! Three addressing schemes, tried in order: content ids (`@id` or anything
//! with a `:` in it), `$`-prefixed paths rooted under the current wiki, and
//! plain paths relative to the linking document's directory. External http
//! links are a typed outcome so the navigation layer can hand them to the
//! OS after confirmation.

use relative_path::{RelativePath, RelativePathBuf};
use std::collections::HashMap;

/// Root directory of all wiki content inside a resource tree.
pub const DOC_ROOT: &str = "books";

const DOC_SUFFIX: &str = ".mdx";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLink {
    /// An http(s) URL. Not a document; the caller decides what to do.
    External(String),
    /// A document path inside the resource tree.
    Document(RelativePathBuf),
    /// Nothing this string could refer to. The caller renders a visible
    /// error label instead of a clickable link.
    Unresolved,
}

/// Resolves raw link strings against the content-id index and the identity
/// of the document the link appears in. Stateless apart from the index.
#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    content_ids: HashMap<String, RelativePathBuf>,
}

impl LinkResolver {
    pub fn new(content_ids: HashMap<String, RelativePathBuf>) -> Self {
        Self { content_ids }
    }

    /// Resolve `raw` as it appears inside the document `current_doc` of the
    /// wiki `wiki_id`. Never fails; malformed input comes back
    /// [`ResolvedLink::Unresolved`].
    pub fn resolve(
        &self,
        raw: &str,
        wiki_id: &str,
        current_doc: &RelativePath,
    ) -> ResolvedLink {
        if raw.starts_with("http") {
            return ResolvedLink::External(raw.to_string());
        }

        // Content ids. A leading `@` is stripped and the remainder, colon
        // included, is the id: `@oritech:pump` looks up `oritech:pump`.
        if let Some(id) = raw.strip_prefix('@') {
            return self.lookup_content_id(id);
        }
        if raw.contains(':') {
            return self.lookup_content_id(raw);
        }

        // Wiki-rooted paths.
        if let Some(rooted) = raw.strip_prefix('$') {
            let path = RelativePathBuf::from(format!("{DOC_ROOT}/{wiki_id}/{rooted}"));
            return ResolvedLink::Document(with_doc_suffix(path));
        }

        // Relative paths: anchors are not supported and are dropped before
        // resolution.
        let without_anchor = raw.split('#').next().unwrap_or_default();
        if without_anchor.is_empty() {
            return ResolvedLink::Unresolved;
        }
        let parent = current_doc.parent().unwrap_or_else(|| RelativePath::new(""));
        let resolved = parent.join_normalized(without_anchor);
        ResolvedLink::Document(with_doc_suffix(resolved))
    }

    fn lookup_content_id(&self, id: &str) -> ResolvedLink {
        match self.content_ids.get(id) {
            Some(path) => ResolvedLink::Document(path.clone()),
            None => ResolvedLink::Unresolved,
        }
    }
}

fn with_doc_suffix(path: RelativePathBuf) -> RelativePathBuf {
    if path.as_str().ends_with(DOC_SUFFIX) {
        path
    } else {
        RelativePathBuf::from(format!("{}{}", path, DOC_SUFFIX))
    }
}
