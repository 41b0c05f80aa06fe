//! Block parsing for wiki documents: CommonMark via pulldown-cmark, with the
//! MDX-style custom tags split out ahead of it by a line scanner.

pub mod ast;
pub(crate) mod attrs;
pub(crate) mod custom;
mod markdown;

pub use ast::{Block, Inline, ListItem};
pub use attrs::{AssetTag, RecipeTag};

use custom::{Segment, TagBlock};

/// Bare structural HTML tags that show up in hand-authored content. The
/// grammar does not model them and they must not corrupt block boundaries,
/// so they are removed verbatim before parsing.
const REMOVED_TAGS: &[&str] = &["<center>", "</center>", "<div>", "</div>", "<span>", "</span>"];

/// Parse a document body (frontmatter already stripped) into a block tree.
///
/// Never fails: malformed custom tags degrade to defaults and unterminated
/// blocks close at end of input.
pub fn parse_document(body: &str) -> Vec<Block> {
    let mut text = body.to_string();
    for tag in REMOVED_TAGS {
        text = text.replace(tag, "");
    }
    parse_blocks(&text)
}

fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    for segment in custom::scan_segments(text) {
        match segment {
            Segment::Markdown(md) => blocks.extend(markdown::parse_markdown(&md)),
            Segment::Tag(TagBlock::CraftingRecipe { raw }) => {
                blocks.push(Block::CraftingRecipe(attrs::parse_recipe(&raw)));
            }
            Segment::Tag(TagBlock::Asset { raw, mod_asset }) => {
                blocks.push(Block::Asset(attrs::parse_asset(&raw, mod_asset)));
            }
            Segment::Tag(TagBlock::PrefabObtaining) => blocks.push(Block::PrefabObtaining),
            Segment::Tag(TagBlock::Callout { opening, body }) => {
                blocks.push(Block::Callout {
                    variant: attrs::parse_callout_variant(&opening),
                    // Container content re-enters block parsing, so callouts
                    // can hold paragraphs, lists, even further custom tags.
                    children: parse_blocks(&body),
                });
            }
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn denylisted_html_tags_are_stripped() {
        let blocks = parse_document("<center>\n# Heading\n</center>\n");
        assert!(matches!(&blocks[0], Block::Heading { level: 1, .. }));
    }

    #[test]
    fn callout_contains_parsed_blocks() {
        let text = "<Callout variant=\"warning\">\nSome text.\n\n- a\n- b\n</Callout>";
        let blocks = parse_document(text);
        assert_eq!(blocks.len(), 1);
        let Block::Callout { variant, children } = &blocks[0] else {
            panic!("expected callout, got {:?}", blocks[0]);
        };
        assert_eq!(variant, "warning");
        assert_eq!(children.len(), 2);
        assert!(matches!(&children[0], Block::Paragraph { .. }));
        assert!(matches!(&children[1], Block::BulletList { items } if items.len() == 2));
    }

    #[test]
    fn callout_can_nest_custom_tags() {
        let text = "<Callout>\n<Asset location=\"pic\"/>\n</Callout>";
        let blocks = parse_document(text);
        let Block::Callout { children, .. } = &blocks[0] else {
            panic!("expected callout");
        };
        assert!(matches!(&children[0], Block::Asset(tag) if tag.location == "pic"));
    }

    #[test]
    fn callout_inside_callout() {
        let text = "<Callout variant=\"outer\">\ntext\n<Callout variant=\"inner\">\ndeep\n</Callout>\n</Callout>";
        let blocks = parse_document(text);
        let Block::Callout { variant, children } = &blocks[0] else {
            panic!("expected callout");
        };
        assert_eq!(variant, "outer");
        assert!(matches!(
            &children[1],
            Block::Callout { variant, .. } if variant == "inner"
        ));
    }

    #[test]
    fn recipe_between_paragraphs() {
        let text = "before\n\n<CraftingRecipe slots={['a','b','c','d','e','f','g','h','i']} result=\"x\"/>\n\nafter\n";
        let blocks = parse_document(text);
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[1], Block::CraftingRecipe(r) if r.slots.len() == 9));
    }

    #[test]
    fn prefab_obtaining_is_recognised_but_opaque() {
        let blocks = parse_document("<PrefabObtaining id=\"x\"/>\ntext\n");
        assert!(matches!(blocks[0], Block::PrefabObtaining));
        assert!(matches!(&blocks[1], Block::Paragraph { .. }));
    }

    #[test]
    fn indentation_inside_custom_tags_is_not_code() {
        // The scanner captures the indented attribute lines; nothing reaches
        // the markdown parser to be mistaken for an indented code block.
        let text = "<CraftingRecipe\n        slots={['a','b','c','d','e','f','g','h','i']}\n        result=\"x\"\n/>\n";
        let blocks = parse_document(text);
        assert_eq!(blocks.len(), 1);
        assert!(matches!(&blocks[0], Block::CraftingRecipe(_)));
    }
}
