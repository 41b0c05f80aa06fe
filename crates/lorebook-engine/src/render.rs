//! The render-node model: typed, styled output units ready for a layout
//! layer. The engine never draws anything; it hands this tree to whichever
//! frontend is embedding it.

use serde::Serialize;

/// Margin hint in layout units. The layout layer treats an all-zero margin
/// as "apply your own default", so nodes built here carry explicit non-zero
/// hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margin {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Margin {
    /// Fallback spacing for nodes with no spacing of their own.
    pub const DEFAULT: Margin = Margin::of(4, 1, 0, 0);

    pub const fn of(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub const fn bottom(bottom: i32) -> Self {
        Self::of(0, bottom, 0, 0)
    }
}

/// 24-bit colour. The palette constants match the vanilla text formatting
/// colours the original wiki styling is calibrated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GRAY: Rgb = Rgb(0xAA, 0xAA, 0xAA);
    pub const DARK_GRAY: Rgb = Rgb(0x55, 0x55, 0x55);
    pub const BLUE: Rgb = Rgb(0x55, 0x55, 0xFF);
    pub const RED: Rgb = Rgb(0xFF, 0x55, 0x55);
}

/// Composable text style. Entering a span derives a new value from the
/// parent's; styles are never mutated in place across siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Option<Rgb>,
    /// Raw link destination this run navigates to when clicked.
    pub click_target: Option<String>,
}

impl TextStyle {
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_click_target(mut self, target: impl Into<String>) -> Self {
        self.click_target = Some(target.into());
        self
    }
}

/// One styled run of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
}

/// An ordered sequence of styled runs forming one visual paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledText {
    pub runs: Vec<TextRun>,
    /// Font scale relative to body text; headings scale up.
    pub scale: f32,
    pub margin: Margin,
}

impl StyledText {
    /// Concatenated run text, styling discarded.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A typed unit of renderable output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RenderNode {
    Text(StyledText),
    Image {
        location: String,
        /// Width as a fraction of the content area.
        width: f32,
        mod_asset: bool,
        margin: Margin,
    },
    /// An asset whose location resolved to a known game item; rendered as
    /// the item's own icon with tooltip instead of a texture lookup.
    ItemIcon {
        item_id: String,
        width: f32,
        margin: Margin,
    },
    Recipe {
        slots: Vec<String>,
        result: String,
        count: u32,
        margin: Margin,
    },
    Callout {
        variant: String,
        children: Vec<RenderNode>,
        margin: Margin,
    },
    Code {
        literal: String,
        margin: Margin,
    },
}

/// Convert a width expression from a tag attribute into a 0.0–1.0 fraction.
///
/// `"50%"` → 0.5, `"{256}"` and `"256"` → 0.256 (pixels over a nominal
/// thousand). Anything unparseable yields 0.0; callers substitute their own
/// default for that.
pub fn convert_width(input: &str) -> f32 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(percent) = trimmed.strip_suffix('%') {
        percent
            .trim()
            .parse::<i32>()
            .map(|n| n as f32 / 100.0)
            .unwrap_or(0.0)
    } else if let Some(braced) = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
    {
        braced
            .trim()
            .parse::<i32>()
            .map(|n| n as f32 / 1000.0)
            .unwrap_or(0.0)
    } else {
        trimmed
            .parse::<i32>()
            .map(|n| n as f32 / 1000.0)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("50%", 0.5)]
    #[case("100%", 1.0)]
    #[case("{256}", 0.256)]
    #[case("256", 0.256)]
    #[case(" 30% ", 0.3)]
    #[case("", 0.0)]
    #[case("wide", 0.0)]
    #[case("%", 0.0)]
    #[case("{}", 0.0)]
    #[case("12.5%", 0.0)]
    fn width_conversion(#[case] input: &str, #[case] expected: f32) {
        assert_eq!(convert_width(input), expected);
    }

    #[test]
    fn plain_text_concatenates_runs() {
        let text = StyledText {
            runs: vec![
                TextRun {
                    text: "Hello ".into(),
                    style: TextStyle::default(),
                },
                TextRun {
                    text: "world".into(),
                    style: TextStyle::default().with_bold(),
                },
            ],
            scale: 1.0,
            margin: Margin::DEFAULT,
        };
        assert_eq!(text.plain_text(), "Hello world");
    }

    #[test]
    fn styles_derive_without_mutating_parent() {
        let parent = TextStyle::default().with_color(Rgb::GRAY);
        let child = parent.clone().with_bold();
        assert!(!parent.bold);
        assert!(child.bold);
        assert_eq!(child.color, Some(Rgb::GRAY));
    }
}
