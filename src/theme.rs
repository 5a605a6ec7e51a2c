//! Semantic style roles for the TUI.
//!
//! Widgets ask for a role name (`"story_selected"`) instead of hard-coding
//! colors. There is a single palette; [`StyleMap`] resolves role names to
//! concrete ratatui styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

/// Every role the renderer uses, paired with its style.
fn palette() -> [(&'static str, Style); 24] {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let selected = Style::default().bg(Color::DarkGray).fg(Color::White);

    [
        // Header
        ("brand", bold.fg(Color::Magenta)),
        ("nav_item", Style::default().fg(Color::Gray)),
        ("nav_active", bold.fg(Color::White).add_modifier(Modifier::UNDERLINED)),
        ("search_box", dim),
        ("search_focused", Style::default().fg(Color::White)),
        ("address_bar", Style::default().fg(Color::Yellow)),
        // Hero zone
        ("hero_title", bold.fg(Color::White)),
        ("hero_meta", Style::default().fg(Color::Gray)),
        ("badge", bold.fg(Color::Black).bg(Color::Cyan)),
        ("indicator", dim),
        ("indicator_active", bold.fg(Color::White)),
        // Story list
        ("section_heading", bold.fg(Color::Cyan)),
        ("story_title", Style::default()),
        ("story_selected", selected),
        ("story_meta", dim),
        ("highlight", bold.fg(Color::Black).bg(Color::Yellow)),
        ("pagination", Style::default().fg(Color::Cyan)),
        ("empty", dim.add_modifier(Modifier::ITALIC)),
        // Article view
        ("reader_heading", bold.fg(Color::Cyan)),
        ("reader_body", Style::default()),
        ("reader_metadata", dim),
        ("reader_quote", Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)),
        // Chrome
        ("status_bar", selected),
        ("panel_border_focused", Style::default().fg(Color::Cyan)),
    ]
}

/// Role name → style lookup.
#[derive(Debug, Clone)]
pub struct StyleMap {
    styles: HashMap<&'static str, Style>,
}

impl Default for StyleMap {
    fn default() -> Self {
        Self {
            styles: palette().into_iter().collect(),
        }
    }
}

impl StyleMap {
    /// Style for `role`, or the terminal default for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.styles.get(role).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_map_resolves_known_roles() {
        let sm = StyleMap::default();
        assert_eq!(sm.resolve("story_selected").bg, Some(Color::DarkGray));
        assert!(sm.resolve("hero_title").add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        assert_eq!(StyleMap::default().resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn role_names_are_unique() {
        let roles = palette();
        let map = StyleMap::default();
        assert_eq!(map.styles.len(), roles.len());
    }
}
