//! Search box controller.
//!
//! The box is seeded from the location's `q` and only writes back through
//! navigation: submit produces `/?q=<term>`, clear produces `/`. Typing
//! never touches the network.

use crate::feed::Location;
use crossterm::event::{KeyCode, KeyModifiers};

/// Longest query the box accepts, in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    #[default]
    Idle,
    /// The user has edited the text since focusing the box.
    Typing,
    /// A submit is navigating; ends when the navigation settles.
    Submitting,
}

/// What a key press in the box asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Nothing beyond the local text change.
    None,
    Navigate(Location),
    Blurred,
    AtMaxLength,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBox {
    text: String,
    focused: bool,
    phase: SearchPhase,
}

/// `Ctrl+K`, or `Cmd+K` on terminals that report the super key.
pub fn is_focus_shortcut(code: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Char('k') | KeyCode::Char('K'))
        && modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
}

impl SearchBox {
    /// Box seeded with the current location's query.
    pub fn seeded(q: Option<&str>) -> Self {
        Self {
            text: q.unwrap_or_default().to_string(),
            focused: false,
            phase: SearchPhase::Idle,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Follow a navigation to a location whose query is `q`. Text being
    /// typed is left alone.
    pub fn reseed(&mut self, q: Option<&str>) {
        if self.phase == SearchPhase::Typing {
            return;
        }
        self.text = q.unwrap_or_default().to_string();
    }

    /// The navigation started by submit has finished.
    pub fn settle(&mut self) {
        if self.phase == SearchPhase::Submitting {
            self.phase = SearchPhase::Idle;
        }
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
        if self.phase == SearchPhase::Typing {
            self.phase = SearchPhase::Idle;
        }
    }

    /// Append a character. Returns false when the box is full.
    pub fn insert(&mut self, c: char) -> bool {
        if self.text.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
            return false;
        }
        self.text.push(c);
        self.phase = SearchPhase::Typing;
        true
    }

    pub fn backspace(&mut self) {
        self.text.pop();
        self.phase = SearchPhase::Typing;
    }

    /// Submit the trimmed text. Blank text does nothing.
    pub fn submit(&mut self) -> Option<Location> {
        let term = self.text.trim();
        if term.is_empty() {
            return None;
        }
        let location = Location::search(term);
        self.phase = SearchPhase::Submitting;
        self.focused = false;
        Some(location)
    }

    /// Empty the box and drop the filter.
    pub fn clear(&mut self) -> Location {
        self.text.clear();
        self.phase = SearchPhase::Idle;
        Location::home()
    }

    /// Esc: empty a non-empty box in place, otherwise leave it.
    pub fn escape(&mut self) -> SearchOutcome {
        if self.text.is_empty() {
            self.blur();
            SearchOutcome::Blurred
        } else {
            self.text.clear();
            self.phase = SearchPhase::Typing;
            SearchOutcome::None
        }
    }

    /// Key handling while focused.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> SearchOutcome {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if code == KeyCode::Char('u') {
                self.text.clear();
                self.phase = SearchPhase::Typing;
            }
            return SearchOutcome::None;
        }

        match code {
            KeyCode::Enter => match self.submit() {
                Some(location) => SearchOutcome::Navigate(location),
                None => SearchOutcome::None,
            },
            KeyCode::Esc => self.escape(),
            KeyCode::Backspace => {
                self.backspace();
                SearchOutcome::None
            }
            KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SUPER) => {
                if self.insert(c) {
                    SearchOutcome::None
                } else {
                    SearchOutcome::AtMaxLength
                }
            }
            _ => SearchOutcome::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> SearchBox {
        let mut search = SearchBox::seeded(None);
        search.focus();
        for c in text.chars() {
            search.insert(c);
        }
        search
    }

    #[test]
    fn test_seeded_from_query() {
        assert_eq!(SearchBox::seeded(Some("ai")).text(), "ai");
        assert_eq!(SearchBox::seeded(None).text(), "");
    }

    #[test]
    fn test_submit_trims_and_drops_page() {
        let mut search = typed("  ai  ");
        let location = search.submit().unwrap();
        assert_eq!(location.to_string(), "/?q=ai");
        assert_eq!(search.phase(), SearchPhase::Submitting);
        assert!(!search.is_focused());

        search.settle();
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut search = typed("   ");
        assert_eq!(search.submit(), None);
        assert!(search.is_focused());
        assert_eq!(search.phase(), SearchPhase::Typing);
    }

    #[test]
    fn test_escape_clears_then_blurs() {
        let mut search = typed("rust");
        assert_eq!(search.escape(), SearchOutcome::None);
        assert_eq!(search.text(), "");
        assert!(search.is_focused());

        assert_eq!(search.escape(), SearchOutcome::Blurred);
        assert!(!search.is_focused());
    }

    #[test]
    fn test_clear_navigates_home() {
        let mut search = SearchBox::seeded(Some("ai"));
        assert_eq!(search.clear(), Location::home());
        assert_eq!(search.text(), "");
    }

    #[test]
    fn test_reseed_skips_active_typing() {
        let mut search = typed("draft");
        search.reseed(Some("other"));
        assert_eq!(search.text(), "draft");

        search.blur();
        search.reseed(Some("other"));
        assert_eq!(search.text(), "other");
    }

    #[test]
    fn test_reseed_after_submit() {
        let mut search = typed(" chips ");
        search.submit();
        search.reseed(Some("chips"));
        assert_eq!(search.text(), "chips");
    }

    #[test]
    fn test_focus_shortcut() {
        assert!(is_focus_shortcut(KeyCode::Char('k'), KeyModifiers::CONTROL));
        assert!(is_focus_shortcut(KeyCode::Char('k'), KeyModifiers::SUPER));
        assert!(!is_focus_shortcut(KeyCode::Char('k'), KeyModifiers::NONE));
        assert!(!is_focus_shortcut(KeyCode::Char('j'), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_handle_key_enter_navigates() {
        let mut search = typed("ai");
        assert_eq!(
            search.handle_key(KeyCode::Enter, KeyModifiers::NONE),
            SearchOutcome::Navigate(Location::search("ai"))
        );
    }

    #[test]
    fn test_handle_key_ctrl_u_empties_box() {
        let mut search = typed("ai");
        search.handle_key(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(search.text(), "");
    }

    #[test]
    fn test_max_length() {
        let mut search = typed(&"a".repeat(MAX_SEARCH_QUERY_LENGTH));
        assert_eq!(
            search.handle_key(KeyCode::Char('b'), KeyModifiers::NONE),
            SearchOutcome::AtMaxLength
        );
        assert_eq!(search.text().len(), MAX_SEARCH_QUERY_LENGTH);
    }
}
