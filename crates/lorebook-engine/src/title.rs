//! Title and title-panel derivation for a parsed document.

use std::collections::HashMap;

use relative_path::{RelativePath, RelativePathBuf};

use crate::frontmatter::Frontmatter;
use crate::sources::GameObjects;

/// Placeholder shown when no title can be derived at all.
pub const NO_TITLE: &str = "No title found";

/// Titles supplied by book manifests for documents whose own content does
/// not carry one.
pub type FallbackTitles = HashMap<RelativePathBuf, String>;

/// Derive the display title of a document.
///
/// Priority: the frontmatter `title` key, then the `id` key (the game's
/// localized name for it when the id is known, the raw id otherwise), then
/// a manifest-supplied fallback, then [`NO_TITLE`].
pub fn resolve_title(
    frontmatter: &Frontmatter,
    path: &RelativePath,
    game: &dyn GameObjects,
    fallbacks: &FallbackTitles,
) -> String {
    if let Some(title) = frontmatter.get("title")
        && !title.is_empty()
    {
        return title.to_string();
    }
    if let Some(id) = frontmatter.get("id")
        && !id.is_empty()
    {
        return game.display_name(id).unwrap_or_else(|| id.to_string());
    }
    if let Some(fallback) = fallbacks.get(path) {
        return fallback.clone();
    }
    NO_TITLE.to_string()
}

/// Header block shown above a rendered page: the document title plus an
/// optional item whose icon decorates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitlePanel {
    pub title: String,
    /// A valid game item id, if the document names one.
    pub icon: Option<String>,
}

impl TitlePanel {
    /// Build the panel from frontmatter. The `icon` key wins over the `id`
    /// key; a blank value counts as absent, and either is used only if the
    /// game actually knows the item.
    pub fn derive(
        title: String,
        frontmatter: &Frontmatter,
        game: &dyn GameObjects,
    ) -> Self {
        let icon = frontmatter
            .get("icon")
            .filter(|v| !v.is_empty())
            .or_else(|| frontmatter.get("id").filter(|v| !v.is_empty()))
            .filter(|id| game.contains(id))
            .map(str::to_string);
        Self { title, icon }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::NoGameObjects;
    use pretty_assertions::assert_eq;

    struct NamedItems(&'static [(&'static str, &'static str)]);

    impl GameObjects for NamedItems {
        fn contains(&self, id: &str) -> bool {
            self.0.iter().any(|(known, _)| *known == id)
        }

        fn display_name(&self, id: &str) -> Option<String> {
            self.0
                .iter()
                .find(|(known, _)| *known == id)
                .map(|(_, name)| name.to_string())
        }
    }

    fn doc(path: &str) -> RelativePathBuf {
        RelativePathBuf::from(path)
    }

    #[test]
    fn frontmatter_title_wins_over_id() {
        let (fm, _) = Frontmatter::extract("---\ntitle: From Frontmatter\nid: mod:wrench\n---\n");
        let game = NamedItems(&[("mod:wrench", "Localized Wrench")]);
        assert_eq!(
            resolve_title(&fm, &doc("books/w/a.mdx"), &game, &FallbackTitles::new()),
            "From Frontmatter"
        );
    }

    #[test]
    fn known_id_titles_with_the_localized_name() {
        let (fm, _) = Frontmatter::extract("---\nid: mod:wrench\n---\n");
        let game = NamedItems(&[("mod:wrench", "Localized Wrench")]);
        assert_eq!(
            resolve_title(&fm, &doc("books/w/a.mdx"), &game, &FallbackTitles::new()),
            "Localized Wrench"
        );
    }

    #[test]
    fn unknown_id_titles_with_the_raw_id() {
        let (fm, _) = Frontmatter::extract("---\nid: mod:ghost\n---\n");
        assert_eq!(
            resolve_title(&fm, &doc("books/w/a.mdx"), &NoGameObjects, &FallbackTitles::new()),
            "mod:ghost"
        );
    }

    #[test]
    fn manifest_fallback_is_third_choice() {
        let fm = Frontmatter::default();
        let mut fallbacks = FallbackTitles::new();
        fallbacks.insert(doc("books/w/a.mdx"), "Manifest Name".to_string());
        assert_eq!(
            resolve_title(&fm, &doc("books/w/a.mdx"), &NoGameObjects, &fallbacks),
            "Manifest Name"
        );
    }

    #[test]
    fn id_beats_the_manifest_fallback() {
        let (fm, _) = Frontmatter::extract("---\nid: mod:wrench\n---\n");
        let mut fallbacks = FallbackTitles::new();
        fallbacks.insert(doc("books/w/a.mdx"), "Manifest Name".to_string());
        assert_eq!(
            resolve_title(&fm, &doc("books/w/a.mdx"), &NoGameObjects, &fallbacks),
            "mod:wrench"
        );
    }

    #[test]
    fn placeholder_when_nothing_matches() {
        let fm = Frontmatter::default();
        assert_eq!(
            resolve_title(&fm, &doc("books/w/a.mdx"), &NoGameObjects, &FallbackTitles::new()),
            NO_TITLE
        );
    }

    #[test]
    fn blank_keys_count_as_absent() {
        let (fm, _) = Frontmatter::extract("---\ntitle:\nid: mod:wrench\n---\n");
        let game = NamedItems(&[("mod:wrench", "Localized Wrench")]);
        assert_eq!(
            resolve_title(&fm, &doc("books/w/a.mdx"), &game, &FallbackTitles::new()),
            "Localized Wrench"
        );
    }

    #[test]
    fn icon_key_beats_id_key() {
        let (fm, _) = Frontmatter::extract("---\nid: mod:block\nicon: mod:item\n---\n");
        let game = NamedItems(&[("mod:block", "Block"), ("mod:item", "Item")]);
        let panel = TitlePanel::derive("T".to_string(), &fm, &game);
        assert_eq!(panel.icon.as_deref(), Some("mod:item"));
    }

    #[test]
    fn blank_icon_falls_back_to_id() {
        let (fm, _) = Frontmatter::extract("---\nicon:\nid: mod:block\n---\n");
        let game = NamedItems(&[("mod:block", "Block")]);
        let panel = TitlePanel::derive("T".to_string(), &fm, &game);
        assert_eq!(panel.icon.as_deref(), Some("mod:block"));
    }

    #[test]
    fn unknown_ids_leave_the_panel_bare() {
        let (fm, _) = Frontmatter::extract("---\nid: mod:ghost\n---\n");
        let panel = TitlePanel::derive("T".to_string(), &fm, &NoGameObjects);
        assert_eq!(panel.icon, None);
    }
}
