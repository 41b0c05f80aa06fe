//! Lowering: block tree in, flat render-node sequence out.
//!
//! Inline runs accumulate in a buffer and flush into one [`StyledText`]
//! per visual paragraph. Styles flow downward by value, so sibling spans
//! can never contaminate each other, and list depth travels as a plain
//! traversal parameter instead of mutable state.

use std::mem;

use relative_path::RelativePath;

use crate::frontmatter::Frontmatter;
use crate::links::{LinkResolver, ResolvedLink};
use crate::parsing::{Block, Inline, ListItem};
use crate::render::{Margin, RenderNode, Rgb, StyledText, TextRun, TextStyle, convert_width};
use crate::sources::{DocumentSource, GameObjects};
use crate::title::{FallbackTitles, resolve_title};

/// Shown in place of link text when a bare `[]()` link points at nothing
/// a title can be derived from.
pub const INVALID_LINK_TEXT: &str = "<invalid link>";

/// Everything lowering needs to know about the world outside the document.
pub struct RenderContext<'a> {
    pub resolver: &'a LinkResolver,
    pub game: &'a dyn GameObjects,
    pub source: &'a dyn DocumentSource,
    /// Wiki the current document belongs to; anchors `$`-rooted links.
    pub wiki_id: &'a str,
    pub current_doc: &'a RelativePath,
    pub fallback_titles: &'a FallbackTitles,
}

impl RenderContext<'_> {
    /// Display text for a link that was authored without any: the target
    /// document's derived title (same chain as the page header, so an
    /// `id`-only target shows its item name), or the URL itself for
    /// external links.
    pub fn display_text_for(&self, raw: &str) -> String {
        match self.resolver.resolve(raw, self.wiki_id, self.current_doc) {
            ResolvedLink::External(url) => url,
            ResolvedLink::Document(path) => self
                .source
                .load(&path)
                .map(|text| {
                    resolve_title(
                        &Frontmatter::parse(&text),
                        &path,
                        self.game,
                        self.fallback_titles,
                    )
                })
                .unwrap_or_else(|| INVALID_LINK_TEXT.to_string()),
            ResolvedLink::Unresolved => INVALID_LINK_TEXT.to_string(),
        }
    }
}

/// Lower a parsed document body into render nodes.
pub fn lower_document(blocks: &[Block], ctx: &RenderContext) -> Vec<RenderNode> {
    let mut lowerer = Lowerer::new(ctx);
    lowerer.blocks(blocks, 0);
    lowerer.finish()
}

struct Lowerer<'a, 'c> {
    ctx: &'a RenderContext<'c>,
    buffer: Vec<TextRun>,
    out: Vec<RenderNode>,
}

impl<'a, 'c> Lowerer<'a, 'c> {
    fn new(ctx: &'a RenderContext<'c>) -> Self {
        Self {
            ctx,
            buffer: Vec::new(),
            out: Vec::new(),
        }
    }

    fn finish(mut self) -> Vec<RenderNode> {
        self.flush(1.0, text_margin(0));
        self.out
    }

    fn blocks(&mut self, blocks: &[Block], depth: usize) {
        for block in blocks {
            self.block(block, depth);
        }
    }

    fn block(&mut self, block: &Block, depth: usize) {
        match block {
            Block::Heading { level, content } => {
                // A pending run (a list marker, say) must not be absorbed
                // into the heading node.
                self.flush(1.0, text_margin(depth));
                let style = TextStyle::default().with_color(Rgb::GRAY);
                self.inlines(content, &style);
                self.flush(heading_scale(*level), Margin::of(10, 5, 0, 0));
            }
            Block::Paragraph { content } => {
                self.inlines(content, &TextStyle::default());
                self.flush(1.0, text_margin(depth));
            }
            Block::BulletList { items } => self.list(items, depth + 1, None),
            Block::OrderedList { start, items } => self.list(items, depth + 1, Some(*start)),
            Block::FencedCodeBlock { literal } => {
                self.flush(1.0, text_margin(depth));
                self.out.push(RenderNode::Code {
                    literal: literal.clone(),
                    margin: Margin::bottom(5),
                });
            }
            Block::BlockQuote { children } => self.blocks(children, depth),
            Block::ThematicBreak => {}
            Block::HtmlBlock { .. } => {}
            Block::CraftingRecipe(tag) => {
                self.flush(1.0, text_margin(depth));
                if tag.slots.len() == 9 {
                    self.out.push(RenderNode::Recipe {
                        slots: tag.slots.clone(),
                        result: tag.result.clone(),
                        count: tag.count,
                        margin: Margin::DEFAULT,
                    });
                } else {
                    self.out.push(error_text(format!(
                        "Invalid crafting recipe: expected 9 slots, got {}",
                        tag.slots.len()
                    )));
                }
            }
            Block::Asset(tag) => {
                self.flush(1.0, text_margin(depth));
                self.emit_asset(&tag.location, &tag.width, tag.mod_asset);
            }
            Block::Callout { variant, children } => {
                self.flush(1.0, text_margin(depth));
                // Isolate the callout body so its nodes nest instead of
                // interleaving with the surrounding document.
                let outer = mem::take(&mut self.out);
                self.blocks(children, depth);
                self.flush(1.0, text_margin(depth));
                let inner = mem::replace(&mut self.out, outer);
                self.out.push(RenderNode::Callout {
                    variant: variant.clone(),
                    children: inner,
                    margin: Margin::bottom(4),
                });
            }
            // Recognised at parse time; rendering it is a separate feature
            // that does not exist yet.
            Block::PrefabObtaining => {}
        }
    }

    fn list(&mut self, items: &[ListItem], depth: usize, start: Option<u64>) {
        let marker_style = TextStyle::default().with_color(Rgb::DARK_GRAY);
        for (index, item) in items.iter().enumerate() {
            let marker = match start {
                Some(first) => format!("{}. ", first + index as u64),
                None => "\u{2022} ".to_string(),
            };
            self.buffer.push(TextRun {
                text: marker,
                style: marker_style.clone(),
            });
            self.blocks(&item.blocks, depth);
            // Items whose content produced no paragraph still show their
            // marker.
            self.flush(1.0, text_margin(depth));
        }
    }

    fn inlines(&mut self, inlines: &[Inline], style: &TextStyle) {
        for inline in inlines {
            match inline {
                Inline::Text(text) => self.run(text.clone(), style.clone()),
                Inline::Emphasis(children) => self.inlines(children, &style.clone().with_italic()),
                Inline::Strong(children) => self.inlines(children, &style.clone().with_bold()),
                // Inline code is styled from scratch: it does not inherit
                // surrounding emphasis or link colouring.
                Inline::Code(literal) => {
                    self.run(literal.clone(), TextStyle::default().with_color(Rgb::RED));
                }
                Inline::Link {
                    destination,
                    title,
                    children,
                } => {
                    let link_style = style
                        .clone()
                        .with_color(Rgb::BLUE)
                        .with_underline()
                        .with_click_target(destination.clone());
                    if !children.is_empty() {
                        self.inlines(children, &link_style);
                    } else if !title.is_empty() {
                        self.run(title.clone(), link_style);
                    } else {
                        let text = self.ctx.display_text_for(destination);
                        self.run(text, link_style);
                    }
                }
                Inline::Image { destination } => {
                    self.flush(1.0, text_margin(0));
                    self.emit_asset(destination, "60%", true);
                }
                Inline::SoftBreak => self.run(" ".to_string(), TextStyle::default()),
                Inline::HardBreak => self.run("\n".to_string(), TextStyle::default()),
            }
        }
    }

    fn emit_asset(&mut self, location: &str, width: &str, mod_asset: bool) {
        let parsed = convert_width(width);
        let width = if parsed > 0.0 { parsed } else { 0.5 };
        let id = location.strip_prefix('@').unwrap_or(location);
        if self.ctx.game.contains(id) {
            // Item icons at the stock asset width render far too large.
            let width = if (width - 0.5).abs() < f32::EPSILON {
                0.1
            } else {
                width
            };
            self.out.push(RenderNode::ItemIcon {
                item_id: id.to_string(),
                width,
                margin: Margin::DEFAULT,
            });
        } else {
            self.out.push(RenderNode::Image {
                location: id.to_string(),
                width,
                mod_asset,
                margin: Margin::DEFAULT,
            });
        }
    }

    fn run(&mut self, text: String, style: TextStyle) {
        self.buffer.push(TextRun { text, style });
    }

    fn flush(&mut self, scale: f32, margin: Margin) {
        if self.buffer.is_empty() {
            return;
        }
        self.out.push(RenderNode::Text(StyledText {
            runs: mem::take(&mut self.buffer),
            scale,
            margin,
        }));
    }
}

fn heading_scale(level: u8) -> f32 {
    (2.0 - 0.2 * f32::from(level)).max(1.0)
}

fn text_margin(depth: usize) -> Margin {
    Margin::of(0, 5, (depth * 6) as i32, 0)
}

fn error_text(message: String) -> RenderNode {
    RenderNode::Text(StyledText {
        runs: vec![TextRun {
            text: message,
            style: TextStyle::default().with_color(Rgb::RED),
        }],
        scale: 1.0,
        margin: Margin::DEFAULT,
    })
}
