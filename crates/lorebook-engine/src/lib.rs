pub mod book;
pub mod frontmatter;
pub mod index;
pub mod io;
pub mod links;
pub mod lower;
pub mod manifest;
pub mod page;
pub mod parsing;
pub mod render;
pub mod sources;
pub mod title;

// Re-export key types for easier usage
pub use book::{BOOK_FILE, Book, BookMetadata, DEFAULT_LANGUAGE, localize_path};
pub use frontmatter::Frontmatter;
pub use index::ContentIndex;
pub use io::*;
pub use links::{DOC_ROOT, LinkResolver, ResolvedLink};
pub use lower::{INVALID_LINK_TEXT, RenderContext, lower_document};
pub use manifest::{MANIFEST_FILE, ManifestEntry, ManifestError, fallback_titles, parse_manifest};
pub use page::{Page, PageEnvironment, render_page};
pub use parsing::{AssetTag, Block, Inline, ListItem, RecipeTag, parse_document};
pub use render::{
    Margin, RenderNode, Rgb, StyledText, TextRun, TextStyle, convert_width,
};
pub use sources::{DocumentSource, GameObjects, InMemorySource, NoGameObjects};
pub use title::{FallbackTitles, NO_TITLE, TitlePanel, resolve_title};
