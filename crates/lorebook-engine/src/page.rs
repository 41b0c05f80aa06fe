//! The page facade: raw document text in, a fully derived page out.

use relative_path::{RelativePath, RelativePathBuf};

use crate::frontmatter::Frontmatter;
use crate::links::LinkResolver;
use crate::lower::{RenderContext, lower_document};
use crate::parsing::parse_document;
use crate::render::RenderNode;
use crate::sources::{DocumentSource, GameObjects};
use crate::title::{FallbackTitles, TitlePanel, resolve_title};

/// A rendered wiki page. Rendering never fails; a malformed document
/// degrades into whatever could be derived from it.
#[derive(Debug, Clone)]
pub struct Page {
    pub path: RelativePathBuf,
    pub frontmatter: Frontmatter,
    pub title: String,
    pub panel: TitlePanel,
    pub nodes: Vec<RenderNode>,
}

/// Everything a page render draws on besides the document itself.
pub struct PageEnvironment<'a> {
    pub resolver: &'a LinkResolver,
    pub game: &'a dyn GameObjects,
    pub source: &'a dyn DocumentSource,
    pub wiki_id: &'a str,
    pub fallback_titles: &'a FallbackTitles,
}

/// Run the whole pipeline for one document: frontmatter extraction, block
/// parsing, title derivation, lowering.
pub fn render_page(raw: &str, path: &RelativePath, env: &PageEnvironment) -> Page {
    let (frontmatter, body_start) = Frontmatter::extract(raw);
    let blocks = parse_document(&raw[body_start..]);
    let title = resolve_title(&frontmatter, path, env.game, env.fallback_titles);
    let panel = TitlePanel::derive(title.clone(), &frontmatter, env.game);

    let ctx = RenderContext {
        resolver: env.resolver,
        game: env.game,
        source: env.source,
        wiki_id: env.wiki_id,
        current_doc: path,
        fallback_titles: env.fallback_titles,
    };
    let nodes = lower_document(&blocks, &ctx);

    Page {
        path: path.to_relative_path_buf(),
        frontmatter,
        title,
        panel,
        nodes,
    }
}
