//! Books: the top-level units of content under `books/`. Each book has an
//! id (its directory name), metadata from its `book.json`, and optional
//! translations under `.translated/<language>/`.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use relative_path::{RelativePath, RelativePathBuf};
use serde::Deserialize;

use crate::links::DOC_ROOT;

/// Language all untranslated content is authored in.
pub const DEFAULT_LANGUAGE: &str = "en_us";

/// Metadata file at the root of each book directory.
pub const BOOK_FILE: &str = "book.json";

/// Deserialized `book.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookMetadata {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    /// Document shown when the book opens, relative to the book root.
    /// Defaults to `index.mdx`.
    #[serde(default)]
    pub landing_page: Option<String>,
}

impl BookMetadata {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub book_id: String,
    pub metadata: BookMetadata,
    languages: BTreeSet<String>,
}

impl Book {
    pub fn new(book_id: impl Into<String>, metadata: BookMetadata) -> Self {
        Self {
            book_id: book_id.into(),
            metadata,
            languages: BTreeSet::new(),
        }
    }

    pub fn add_language(&mut self, language: impl Into<String>) {
        self.languages.insert(language.into());
    }

    pub fn has_language(&self, language: &str) -> bool {
        language == DEFAULT_LANGUAGE || self.languages.contains(language)
    }

    /// Translations available beyond [`DEFAULT_LANGUAGE`], sorted.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(String::as_str)
    }

    pub fn root(&self) -> RelativePathBuf {
        RelativePathBuf::from(format!("{DOC_ROOT}/{}", self.book_id))
    }

    /// Path of the document the book opens on, in the given language.
    pub fn entry_path(&self, language: &str) -> RelativePathBuf {
        let landing = self
            .metadata
            .landing_page
            .as_deref()
            .unwrap_or("index.mdx");
        localize_path(&self.root().join(landing), language)
    }
}

// Books sort and deduplicate by id alone; metadata differences between two
// packs providing the same book are resolved elsewhere.
impl Ord for Book {
    fn cmp(&self, other: &Self) -> Ordering {
        self.book_id.cmp(&other.book_id)
    }
}

impl PartialOrd for Book {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn book_prefix_regex() -> &'static Regex {
    static BOOK_PREFIX: OnceLock<Regex> = OnceLock::new();
    BOOK_PREFIX.get_or_init(|| {
        Regex::new(r"^books/([^/]+)/(?:\.translated/[^/]+/)?")
            .expect("Invalid book prefix regex")
    })
}

/// Rewrite a document path into the given language's tree. The default
/// language maps to the untranslated tree, so localizing is idempotent and
/// can also switch a path between languages.
pub fn localize_path(path: &RelativePath, language: &str) -> RelativePathBuf {
    let replacement = if language == DEFAULT_LANGUAGE {
        "books/$1/".to_string()
    } else {
        format!("books/$1/.translated/{language}/")
    };
    RelativePathBuf::from(
        book_prefix_regex()
            .replace(path.as_str(), replacement.as_str())
            .into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn metadata(name: &str) -> BookMetadata {
        BookMetadata {
            name: name.to_string(),
            icon: None,
            landing_page: None,
        }
    }

    #[test]
    fn book_json_round_trip() {
        let parsed =
            BookMetadata::parse(r#"{"name": "Oritech Guide", "icon": "oritech:wrench"}"#).unwrap();
        assert_eq!(parsed.name, "Oritech Guide");
        assert_eq!(parsed.icon.as_deref(), Some("oritech:wrench"));
        assert_eq!(parsed.landing_page, None);
    }

    #[test]
    fn entry_path_defaults_to_index() {
        let book = Book::new("wiki", metadata("Wiki"));
        assert_eq!(book.entry_path(DEFAULT_LANGUAGE).as_str(), "books/wiki/index.mdx");
    }

    #[test]
    fn entry_path_honours_landing_page_and_language() {
        let mut meta = metadata("Wiki");
        meta.landing_page = Some("start/here.mdx".to_string());
        let mut book = Book::new("wiki", meta);
        book.add_language("de_de");
        assert_eq!(
            book.entry_path("de_de").as_str(),
            "books/wiki/.translated/de_de/start/here.mdx"
        );
    }

    #[test]
    fn default_language_is_always_available() {
        let book = Book::new("wiki", metadata("Wiki"));
        assert!(book.has_language(DEFAULT_LANGUAGE));
        assert!(!book.has_language("fr_fr"));
    }

    #[rstest]
    #[case("books/wiki/tools/wrench.mdx", "de_de", "books/wiki/.translated/de_de/tools/wrench.mdx")]
    #[case(
        "books/wiki/.translated/fr_fr/tools/wrench.mdx",
        "de_de",
        "books/wiki/.translated/de_de/tools/wrench.mdx"
    )]
    #[case("books/wiki/.translated/de_de/intro.mdx", "en_us", "books/wiki/intro.mdx")]
    #[case("books/wiki/intro.mdx", "en_us", "books/wiki/intro.mdx")]
    fn path_localization(#[case] input: &str, #[case] language: &str, #[case] expected: &str) {
        assert_eq!(
            localize_path(RelativePath::new(input), language).as_str(),
            expected
        );
    }

    #[test]
    fn books_order_by_id() {
        let a = Book::new("alpha", metadata("Z"));
        let b = Book::new("beta", metadata("A"));
        assert!(a < b);
    }
}
