//! Rebuilds pulldown-cmark's event stream into the closed [`Block`] tree.
//!
//! The builder keeps one stack of open frames and routes every event to the
//! innermost frame. End events are handled by frame type, not by inspecting
//! the tag payload, which keeps the builder honest about nesting.
//!
//! Two departures from stock CommonMark, both inherited from the wiki
//! grammar: indented code blocks are demoted to plain paragraphs
//! (indentation in hand-authored content is cosmetic), and image alt text is
//! dropped because only the destination is ever rendered.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::parsing::ast::{Block, Inline, ListItem};

pub(crate) fn parse_markdown(text: &str) -> Vec<Block> {
    let mut builder = Builder::default();
    for event in Parser::new_ext(text, Options::empty()) {
        match event {
            Event::Start(tag) => builder.start(tag),
            Event::End(end) => builder.end(end),
            Event::Text(t) => builder.text(&t),
            Event::Code(t) => builder.inline(Inline::Code(t.to_string())),
            Event::Html(h) => builder.html(&h),
            Event::SoftBreak => builder.inline(Inline::SoftBreak),
            Event::HardBreak => builder.inline(Inline::HardBreak),
            Event::Rule => builder.block(Block::ThematicBreak),
            // Inline HTML, footnotes, math, task markers: not part of the
            // wiki grammar, ignored.
            _ => {}
        }
    }
    builder.finish()
}

#[derive(Default)]
struct Builder {
    root: Vec<Block>,
    frames: Vec<Frame>,
}

enum Frame {
    Paragraph {
        content: Vec<Inline>,
        /// Opened by the builder for inline events inside tight list items,
        /// where pulldown emits no paragraph of its own.
        implicit: bool,
    },
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    Quote(Vec<Block>),
    List {
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Item(Vec<Block>),
    Code {
        literal: String,
        indented: bool,
    },
    Html(String),
    Span {
        kind: SpanKind,
        children: Vec<Inline>,
    },
    /// Image span: the destination is kept, inline children (alt text) are
    /// swallowed.
    Image(String),
    /// Anything the wiki grammar has no use for; contents are discarded.
    Skip,
}

enum SpanKind {
    Emphasis,
    Strong,
    Link { destination: String, title: String },
}

impl Builder {
    fn start(&mut self, tag: Tag) {
        // A block-level tag opening inside a tight list item ends the item's
        // implicit paragraph; otherwise the paragraph text would attach
        // after the nested block.
        let inline_tag = matches!(
            tag,
            Tag::Emphasis | Tag::Strong | Tag::Link { .. } | Tag::Image { .. }
        );
        if !inline_tag
            && matches!(
                self.frames.last(),
                Some(Frame::Paragraph { implicit: true, .. })
            )
        {
            self.close_top();
        }

        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph {
                content: Vec::new(),
                implicit: false,
            },
            Tag::Heading { level, .. } => Frame::Heading {
                level: heading_level(level),
                content: Vec::new(),
            },
            Tag::BlockQuote(..) => Frame::Quote(Vec::new()),
            Tag::CodeBlock(kind) => Frame::Code {
                literal: String::new(),
                indented: matches!(kind, CodeBlockKind::Indented),
            },
            Tag::HtmlBlock => Frame::Html(String::new()),
            Tag::List(start) => Frame::List {
                start,
                items: Vec::new(),
            },
            Tag::Item => Frame::Item(Vec::new()),
            Tag::Emphasis => Frame::Span {
                kind: SpanKind::Emphasis,
                children: Vec::new(),
            },
            Tag::Strong => Frame::Span {
                kind: SpanKind::Strong,
                children: Vec::new(),
            },
            Tag::Link {
                dest_url, title, ..
            } => Frame::Span {
                kind: SpanKind::Link {
                    destination: dest_url.to_string(),
                    title: title.to_string(),
                },
                children: Vec::new(),
            },
            Tag::Image { dest_url, .. } => Frame::Image(dest_url.to_string()),
            _ => Frame::Skip,
        };
        self.frames.push(frame);
    }

    fn end(&mut self, end: TagEnd) {
        // An implicit paragraph has no matching End event; close it when its
        // surrounding frame ends.
        if !matches!(end, TagEnd::Paragraph)
            && matches!(
                self.frames.last(),
                Some(Frame::Paragraph { implicit: true, .. })
            )
        {
            self.close_top();
        }
        self.close_top();
    }

    fn close_top(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        match frame {
            Frame::Paragraph { content, .. } => {
                if !content.is_empty() {
                    self.block(Block::Paragraph { content });
                }
            }
            Frame::Heading { level, content } => self.block(Block::Heading { level, content }),
            Frame::Quote(children) => self.block(Block::BlockQuote { children }),
            Frame::List { start, items } => {
                let list = match start {
                    Some(start) => Block::OrderedList { start, items },
                    None => Block::BulletList { items },
                };
                self.block(list);
            }
            Frame::Item(blocks) => {
                if let Some(Frame::List { items, .. }) = self.frames.last_mut() {
                    items.push(ListItem { blocks });
                }
            }
            Frame::Code { literal, indented } => {
                if indented {
                    // Indented code is disabled in the wiki grammar; keep the
                    // text as an ordinary paragraph.
                    let text = literal.trim_end().to_string();
                    if !text.is_empty() {
                        self.block(Block::Paragraph {
                            content: vec![Inline::Text(text)],
                        });
                    }
                } else {
                    self.block(Block::FencedCodeBlock { literal });
                }
            }
            Frame::Html(literal) => self.block(Block::HtmlBlock { literal }),
            Frame::Span { kind, children } => {
                let inline = match kind {
                    SpanKind::Emphasis => Inline::Emphasis(children),
                    SpanKind::Strong => Inline::Strong(children),
                    SpanKind::Link { destination, title } => Inline::Link {
                        destination,
                        title,
                        children,
                    },
                };
                self.inline(inline);
            }
            Frame::Image(destination) => self.inline(Inline::Image { destination }),
            Frame::Skip => {}
        }
    }

    /// Attach a finished block to the innermost block container.
    fn block(&mut self, block: Block) {
        for frame in self.frames.iter_mut().rev() {
            match frame {
                Frame::Quote(children) | Frame::Item(children) => {
                    children.push(block);
                    return;
                }
                Frame::Skip => return,
                _ => {}
            }
        }
        self.root.push(block);
    }

    /// Attach a finished inline to the innermost inline sink, opening an
    /// implicit paragraph for tight list items.
    fn inline(&mut self, inline: Inline) {
        match self.frames.last_mut() {
            Some(
                Frame::Paragraph { content, .. }
                | Frame::Heading { content, .. }
                | Frame::Span {
                    children: content, ..
                },
            ) => content.push(inline),
            Some(Frame::Image(_)) | Some(Frame::Skip) => {}
            Some(Frame::Code { literal, .. }) | Some(Frame::Html(literal)) => {
                if let Inline::Text(t) = inline {
                    literal.push_str(&t);
                }
            }
            _ => {
                self.frames.push(Frame::Paragraph {
                    content: vec![inline],
                    implicit: true,
                });
            }
        }
    }

    fn text(&mut self, text: &str) {
        match self.frames.last_mut() {
            Some(Frame::Code { literal, .. }) | Some(Frame::Html(literal)) => {
                literal.push_str(text);
            }
            _ => self.inline(Inline::Text(text.to_string())),
        }
    }

    fn html(&mut self, html: &str) {
        if let Some(Frame::Html(literal)) = self.frames.last_mut() {
            literal.push_str(html);
        }
        // Html events outside an HtmlBlock frame are leftovers the wiki
        // grammar does not render; dropped.
    }

    fn finish(mut self) -> Vec<Block> {
        while !self.frames.is_empty() {
            self.close_top();
        }
        self.root
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
