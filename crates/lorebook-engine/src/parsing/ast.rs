use crate::parsing::attrs::{AssetTag, RecipeTag};

/// Block-level node of a parsed wiki document.
///
/// This is a closed tree: the standard CommonMark blocks the wiki grammar
/// enables, plus the four MDX-style custom tags. Keeping it a sum type means
/// the lowering pass matches exhaustively and an intentionally unhandled
/// variant (`PrefabObtaining`) is a visible arm, not a silent no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph { content: Vec<Inline> },
    BulletList { items: Vec<ListItem> },
    OrderedList { start: u64, items: Vec<ListItem> },
    FencedCodeBlock { literal: String },
    BlockQuote { children: Vec<Block> },
    ThematicBreak,
    HtmlBlock { literal: String },
    CraftingRecipe(RecipeTag),
    Asset(AssetTag),
    Callout { variant: String, children: Vec<Block> },
    /// Recognised so it does not corrupt surrounding blocks, but otherwise
    /// an unimplemented downstream feature.
    PrefabObtaining,
}

/// One item of a bullet or ordered list. Items hold full blocks, so nested
/// lists and multi-paragraph items keep their structure.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

/// Inline node inside a paragraph, heading or list item.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    /// Inline backtick span. Carries its literal directly; no nested styling.
    Code(String),
    Link {
        destination: String,
        title: String,
        children: Vec<Inline>,
    },
    /// Bare markdown image. The alt text is discarded, matching the wiki
    /// renderer which only ever uses the destination.
    Image { destination: String },
    SoftBreak,
    HardBreak,
}
