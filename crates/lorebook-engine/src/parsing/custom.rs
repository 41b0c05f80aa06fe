//! Line-prefix scanner for the MDX-style custom tag blocks.
//!
//! Runs ahead of the markdown parser and splits a document body into plain
//! markdown runs and custom tag blocks. Leaf tags (`CraftingRecipe`, `Asset`,
//! `ModAsset`, `PrefabObtaining`) capture their lines verbatim until a
//! closing pattern; the `Callout` container captures only its opening line
//! for attributes and hands the enclosed lines back for normal block
//! parsing. A block that never closes is closed at end of input: wiki
//! content is user-authored and has to degrade, not fail.

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Segment {
    Markdown(String),
    Tag(TagBlock),
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TagBlock {
    CraftingRecipe { raw: String },
    Asset { raw: String, mod_asset: bool },
    PrefabObtaining,
    Callout { opening: String, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    CraftingRecipe,
    ModAsset,
    Asset,
    PrefabObtaining,
    Callout,
}

impl TagKind {
    /// Fixed-prefix dispatch. Order matters: `<ModAsset` must be tried
    /// before `<Asset` shares its prefix check.
    fn dispatch(line: &str) -> Option<TagKind> {
        let trimmed = line.trim_start();
        if trimmed.starts_with("<CraftingRecipe") {
            Some(TagKind::CraftingRecipe)
        } else if trimmed.starts_with("<ModAsset") {
            Some(TagKind::ModAsset)
        } else if trimmed.starts_with("<Asset") {
            Some(TagKind::Asset)
        } else if trimmed.starts_with("<PrefabObtaining") {
            Some(TagKind::PrefabObtaining)
        } else if trimmed.starts_with("<Callout") {
            Some(TagKind::Callout)
        } else {
            None
        }
    }

    fn name(self) -> &'static str {
        match self {
            TagKind::CraftingRecipe => "CraftingRecipe",
            TagKind::ModAsset => "ModAsset",
            TagKind::Asset => "Asset",
            TagKind::PrefabObtaining => "PrefabObtaining",
            TagKind::Callout => "Callout",
        }
    }
}

pub(crate) fn scan_segments(body: &str) -> Vec<Segment> {
    let lines: Vec<&str> = body.lines().collect();
    let mut segments = Vec::new();
    let mut markdown_run: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(kind) = TagKind::dispatch(lines[i]) else {
            markdown_run.push(lines[i]);
            i += 1;
            continue;
        };

        flush_markdown(&mut segments, &mut markdown_run);

        match kind {
            TagKind::Callout => {
                let (block, next) = scan_container(&lines, i, kind);
                segments.push(Segment::Tag(block));
                i = next;
            }
            _ => {
                let (raw, next) = scan_leaf(&lines, i, kind);
                let block = match kind {
                    TagKind::CraftingRecipe => TagBlock::CraftingRecipe { raw },
                    TagKind::ModAsset => TagBlock::Asset {
                        raw,
                        mod_asset: true,
                    },
                    TagKind::Asset => TagBlock::Asset {
                        raw,
                        mod_asset: false,
                    },
                    TagKind::PrefabObtaining => TagBlock::PrefabObtaining,
                    TagKind::Callout => unreachable!(),
                };
                segments.push(Segment::Tag(block));
                i = next;
            }
        }
    }

    flush_markdown(&mut segments, &mut markdown_run);
    segments
}

/// Accumulate the leaf tag's lines verbatim, opening line included, through
/// the first line containing `/>` or `</Tag>`. Returns the raw text and the
/// index of the line after the block.
fn scan_leaf(lines: &[&str], start: usize, kind: TagKind) -> (String, usize) {
    let closing = format!("</{}>", kind.name().to_ascii_lowercase());
    let mut raw = String::new();
    let mut i = start;
    while i < lines.len() {
        raw.push_str(lines[i]);
        raw.push('\n');
        if leaf_terminates(lines[i], &closing) {
            return (raw, i + 1);
        }
        i += 1;
    }
    // Ran off the end of the document: close here.
    (raw, i)
}

fn leaf_terminates(line: &str, lowercase_closing: &str) -> bool {
    line.contains("/>") || line.to_ascii_lowercase().contains(lowercase_closing)
}

/// Container tags take their attributes from the opening line and hand the
/// enclosed lines back for ordinary block parsing.
fn scan_container(lines: &[&str], start: usize, kind: TagKind) -> (TagBlock, usize) {
    let closing = format!("</{}>", kind.name().to_ascii_lowercase());
    let opening = lines[start];

    // Single-line form: `<Callout variant="x">content</Callout>`.
    if let Some(close_at) = opening.to_ascii_lowercase().find(&closing) {
        let inner_start = opening.find('>').map(|p| p + 1).unwrap_or(close_at);
        let body = opening[inner_start.min(close_at)..close_at].to_string();
        return (
            TagBlock::Callout {
                opening: opening.to_string(),
                body,
            },
            start + 1,
        );
    }

    let opening_prefix = format!("<{}", kind.name());

    let mut body = String::new();
    let mut depth = 1usize;
    let mut i = start + 1;
    while i < lines.len() {
        let line = lines[i];
        // Containers nest: an inner opening line deepens, its closing line
        // only unwinds back to the inner level. A line that both opens and
        // closes is net zero.
        let opens = line.trim_start().starts_with(&opening_prefix);
        let closes = line.to_ascii_lowercase().contains(&closing);
        if opens && !closes {
            depth += 1;
        } else if closes && !opens {
            depth -= 1;
            if depth == 0 {
                i += 1;
                break;
            }
        }
        body.push_str(line);
        body.push('\n');
        i += 1;
    }

    (
        TagBlock::Callout {
            opening: opening.to_string(),
            body,
        },
        i,
    )
}

fn flush_markdown(segments: &mut Vec<Segment>, run: &mut Vec<&str>) {
    if run.is_empty() {
        return;
    }
    let text = run.join("\n");
    run.clear();
    if !text.trim().is_empty() {
        segments.push(Segment::Markdown(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_markdown_is_one_segment() {
        let segments = scan_segments("# Title\n\nA paragraph.\n");
        assert_eq!(segments.len(), 1);
        assert!(matches!(&segments[0], Segment::Markdown(md) if md.contains("# Title")));
    }

    #[test]
    fn single_line_self_closing_asset() {
        let segments = scan_segments("before\n<Asset location=\"x\"/>\nafter");
        assert_eq!(segments.len(), 3);
        assert!(matches!(
            &segments[1],
            Segment::Tag(TagBlock::Asset { mod_asset: false, .. })
        ));
        assert!(matches!(&segments[2], Segment::Markdown(md) if md == "after"));
    }

    #[test]
    fn mod_asset_dispatches_before_asset() {
        let segments = scan_segments("<ModAsset location=\"oritech:pump\"/>");
        assert!(matches!(
            &segments[0],
            Segment::Tag(TagBlock::Asset { mod_asset: true, .. })
        ));
    }

    #[test]
    fn multi_line_leaf_captures_through_closing_line() {
        let text = "<CraftingRecipe\n  slots={['a']}\n  result=\"x\"\n/>\ntail";
        let segments = scan_segments(text);
        assert_eq!(segments.len(), 2);
        let Segment::Tag(TagBlock::CraftingRecipe { raw }) = &segments[0] else {
            panic!("expected recipe, got {:?}", segments[0]);
        };
        assert!(raw.contains("slots={['a']}"));
        assert!(raw.trim_end().ends_with("/>"));
    }

    #[test]
    fn leaf_with_named_closing_tag() {
        let text = "<PrefabObtaining>\nsomething\n</PrefabObtaining>\nrest";
        let segments = scan_segments(text);
        assert_eq!(segments.len(), 2);
        assert!(matches!(&segments[0], Segment::Tag(TagBlock::PrefabObtaining)));
        assert!(matches!(&segments[1], Segment::Markdown(md) if md == "rest"));
    }

    #[test]
    fn unterminated_leaf_closes_at_end_of_input() {
        let segments = scan_segments("<Asset location=\"x\"\nstill inside");
        assert_eq!(segments.len(), 1);
        let Segment::Tag(TagBlock::Asset { raw, .. }) = &segments[0] else {
            panic!("expected asset");
        };
        assert!(raw.contains("still inside"));
    }

    #[test]
    fn callout_collects_body_and_opening_separately() {
        let text = "<Callout variant=\"warning\">\nDanger ahead.\n\n- point\n</Callout>\nafter";
        let segments = scan_segments(text);
        assert_eq!(segments.len(), 2);
        let Segment::Tag(TagBlock::Callout { opening, body }) = &segments[0] else {
            panic!("expected callout");
        };
        assert_eq!(opening, "<Callout variant=\"warning\">");
        assert_eq!(body, "Danger ahead.\n\n- point\n");
    }

    #[test]
    fn unterminated_callout_runs_to_end_of_input() {
        let segments = scan_segments("<Callout>\nleft open");
        let Segment::Tag(TagBlock::Callout { body, .. }) = &segments[0] else {
            panic!("expected callout");
        };
        assert_eq!(body, "left open\n");
    }

    #[test]
    fn nested_callouts_keep_their_closing_lines_paired() {
        let text = "<Callout variant=\"outer\">\nbefore\n<Callout variant=\"inner\">\ndeep\n</Callout>\nafter\n</Callout>\ntail";
        let segments = scan_segments(text);
        assert_eq!(segments.len(), 2);
        let Segment::Tag(TagBlock::Callout { body, .. }) = &segments[0] else {
            panic!("expected callout");
        };
        assert_eq!(
            body,
            "before\n<Callout variant=\"inner\">\ndeep\n</Callout>\nafter\n"
        );
        assert!(matches!(&segments[1], Segment::Markdown(md) if md == "tail"));
    }

    #[test]
    fn single_line_callout() {
        let segments = scan_segments("<Callout variant=\"tip\">quick note</Callout>");
        let Segment::Tag(TagBlock::Callout { body, .. }) = &segments[0] else {
            panic!("expected callout");
        };
        assert_eq!(body, "quick note");
    }

    #[test]
    fn closing_tag_matching_is_case_insensitive() {
        let segments = scan_segments("<Callout>\ninner\n</CALLOUT>");
        let Segment::Tag(TagBlock::Callout { body, .. }) = &segments[0] else {
            panic!("expected callout");
        };
        assert_eq!(body, "inner\n");
    }

    #[test]
    fn indented_tags_still_dispatch() {
        let segments = scan_segments("  <Asset location=\"x\"/>");
        assert!(matches!(&segments[0], Segment::Tag(TagBlock::Asset { .. })));
    }
}
