//! Keybinding registry: maps key events to actions per context, with
//! overrides from `config.toml`.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    Select,
    Back,
    NextPage,
    PrevPage,
    CarouselPrev,
    CarouselNext,
    FocusSearch,
    ClearSearch,
    NextSection,
    PrevSection,
    GoHome,
    OpenInBrowser,
    Reload,
    EditLocation,
    ShowHelp,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ExitReader,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Select next story",
            Self::NavUp => "Select previous story",
            Self::Select => "Open story",
            Self::Back => "Back to previous location",
            Self::NextPage => "Next page",
            Self::PrevPage => "Previous page",
            Self::CarouselPrev => "Previous hero slide",
            Self::CarouselNext => "Next hero slide",
            Self::FocusSearch => "Focus search box",
            Self::ClearSearch => "Clear search",
            Self::NextSection => "Next section",
            Self::PrevSection => "Previous section",
            Self::GoHome => "Front page",
            Self::OpenInBrowser => "Open original in browser",
            Self::Reload => "Reload current location",
            Self::EditLocation => "Edit location",
            Self::ShowHelp => "Show help",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::ExitReader => "Close article",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Feed,
    Reader,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "General",
            Self::Feed => "Feed",
            Self::Reader => "Article",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    /// Build a spec, dropping SHIFT where the key code already carries it
    /// (`'R'` arrives as `Char('R')` + SHIFT, Shift-Tab as `BackTab` + SHIFT).
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let mut modifiers = modifiers;
        if matches!(code, KeyCode::Char(_) | KeyCode::BackTab) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub const fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub const fn super_key(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::SUPER,
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "[", "/"
/// - Named keys: "Enter", "Esc", "Tab", "BackTab", "Up", "PageDown", ...
/// - Modifier combos: "Ctrl+d", "Cmd+k" (also "Super+k")
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        return single_char(rest.trim()).map(KeySpec::ctrl);
    }
    if let Some(rest) = s.strip_prefix("Cmd+").or_else(|| s.strip_prefix("Super+")) {
        return single_char(rest.trim()).map(KeySpec::super_key);
    }

    // Named keys (case-insensitive)
    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" | "shift+tab" => Some(KeyCode::BackTab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    // Function keys
    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|n| n.parse::<u8>().ok())
    {
        if (1..=12).contains(&n) {
            return Some(KeySpec::plain(KeyCode::F(n)));
        }
    }

    single_char(s).map(|c| KeySpec::plain(KeyCode::Char(c)))
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else if key.modifiers.contains(KeyModifiers::SUPER) {
        "Cmd+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// try the active context first and then Global.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn bind_all(&mut self, context: Context, keys: &[KeySpec], action: Action) {
        for key in keys {
            self.bind(context, *key, action);
        }
    }

    fn register_defaults(&mut self) {
        use KeyCode::*;

        // === Global ===
        self.bind(Context::Global, KeySpec::plain(Char('q')), Action::Quit);
        self.bind(Context::Global, KeySpec::plain(Char('?')), Action::ShowHelp);
        // Ctrl+K and Cmd+K are handled ahead of the registry
        self.bind(Context::Global, KeySpec::plain(Char('/')), Action::FocusSearch);
        self.bind(Context::Global, KeySpec::plain(Char('g')), Action::EditLocation);
        self.bind(Context::Global, KeySpec::plain(Char('r')), Action::Reload);
        self.bind(Context::Global, KeySpec::plain(Char('H')), Action::GoHome);
        self.bind(Context::Global, KeySpec::plain(Tab), Action::NextSection);
        self.bind(Context::Global, KeySpec::plain(BackTab), Action::PrevSection);

        // === Feed view ===
        self.bind_all(
            Context::Feed,
            &[KeySpec::plain(Char('j')), KeySpec::plain(Down)],
            Action::NavDown,
        );
        self.bind_all(
            Context::Feed,
            &[KeySpec::plain(Char('k')), KeySpec::plain(Up)],
            Action::NavUp,
        );
        self.bind(Context::Feed, KeySpec::plain(Enter), Action::Select);
        self.bind_all(
            Context::Feed,
            &[KeySpec::plain(Backspace), KeySpec::plain(Esc)],
            Action::Back,
        );
        self.bind_all(
            Context::Feed,
            &[KeySpec::plain(Char('n')), KeySpec::plain(Right)],
            Action::NextPage,
        );
        self.bind_all(
            Context::Feed,
            &[KeySpec::plain(Char('p')), KeySpec::plain(Left)],
            Action::PrevPage,
        );
        self.bind(Context::Feed, KeySpec::plain(Char('[')), Action::CarouselPrev);
        self.bind(Context::Feed, KeySpec::plain(Char(']')), Action::CarouselNext);
        self.bind(Context::Feed, KeySpec::plain(Char('x')), Action::ClearSearch);
        self.bind(Context::Feed, KeySpec::plain(Char('o')), Action::OpenInBrowser);

        // === Article view ===
        self.bind_all(
            Context::Reader,
            &[KeySpec::plain(Char('j')), KeySpec::plain(Down)],
            Action::ScrollDown,
        );
        self.bind_all(
            Context::Reader,
            &[KeySpec::plain(Char('k')), KeySpec::plain(Up)],
            Action::ScrollUp,
        );
        self.bind_all(
            Context::Reader,
            &[
                KeySpec::ctrl('d'),
                KeySpec::plain(PageDown),
                KeySpec::plain(Char(' ')),
            ],
            Action::PageDown,
        );
        self.bind_all(
            Context::Reader,
            &[KeySpec::ctrl('u'), KeySpec::plain(PageUp)],
            Action::PageUp,
        );
        self.bind_all(
            Context::Reader,
            &[KeySpec::plain(Esc), KeySpec::plain(Backspace), KeySpec::plain(Char('b'))],
            Action::ExitReader,
        );
        self.bind(Context::Reader, KeySpec::plain(Char('o')), Action::OpenInBrowser);
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "next_page").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    /// An override replaces every default key of that action, in each
    /// context the action was bound in.
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }
        if context != Context::Global {
            return self.lookup.get(&(Context::Global, key)).copied();
        }
        None
    }

    /// Get all bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "select" | "open_story" => Some(Action::Select),
        "back" => Some(Action::Back),
        "next_page" => Some(Action::NextPage),
        "prev_page" | "previous_page" => Some(Action::PrevPage),
        "carousel_prev" => Some(Action::CarouselPrev),
        "carousel_next" => Some(Action::CarouselNext),
        "focus_search" | "search" => Some(Action::FocusSearch),
        "clear_search" => Some(Action::ClearSearch),
        "next_section" => Some(Action::NextSection),
        "prev_section" | "previous_section" => Some(Action::PrevSection),
        "go_home" | "home" => Some(Action::GoHome),
        "open_in_browser" | "open" => Some(Action::OpenInBrowser),
        "reload" | "refresh" => Some(Action::Reload),
        "edit_location" | "goto" => Some(Action::EditLocation),
        "show_help" | "help" => Some(Action::ShowHelp),
        "scroll_down" => Some(Action::ScrollDown),
        "scroll_up" => Some(Action::ScrollUp),
        "page_down" => Some(Action::PageDown),
        "page_up" => Some(Action::PageUp),
        "exit_reader" | "close_article" => Some(Action::ExitReader),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_quit() {
        let reg = KeybindingRegistry::new();
        let action = reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Feed);
        assert_eq!(action, Some(Action::Quit));
    }

    #[test]
    fn test_feed_and_reader_share_keys_differently() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('j'), KeyModifiers::NONE, Context::Feed),
            Some(Action::NavDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('j'), KeyModifiers::NONE, Context::Reader),
            Some(Action::ScrollDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Esc, KeyModifiers::NONE, Context::Reader),
            Some(Action::ExitReader)
        );
    }

    #[test]
    fn test_search_focus_shortcuts() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('/'), KeyModifiers::NONE, Context::Reader),
            Some(Action::FocusSearch)
        );
        // Reserved outside the registry so overrides cannot unbind them
        assert_eq!(
            reg.action_for_key(KeyCode::Char('k'), KeyModifiers::CONTROL, Context::Reader),
            None
        );
    }

    #[test]
    fn test_shift_is_ignored_for_chars_and_backtab() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('H'), KeyModifiers::SHIFT, Context::Feed),
            Some(Action::GoHome)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::BackTab, KeyModifiers::SHIFT, Context::Feed),
            Some(Action::PrevSection)
        );
    }

    #[test]
    fn test_carousel_keys_only_in_feed() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char(']'), KeyModifiers::NONE, Context::Feed),
            Some(Action::CarouselNext)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char(']'), KeyModifiers::NONE, Context::Reader),
            None
        );
    }

    #[test]
    fn test_parse_key_strings() {
        assert_eq!(parse_key_string("q"), Some(KeySpec::plain(KeyCode::Char('q'))));
        assert_eq!(parse_key_string("Ctrl+d"), Some(KeySpec::ctrl('d')));
        assert_eq!(parse_key_string("Cmd+k"), Some(KeySpec::super_key('k')));
        assert_eq!(parse_key_string("pagedown"), Some(KeySpec::plain(KeyCode::PageDown)));
        assert_eq!(parse_key_string("F5"), Some(KeySpec::plain(KeyCode::F(5))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Ctrl+ab"), None);
        assert_eq!(parse_key_string("word"), None);
    }

    #[test]
    fn test_format_key() {
        assert_eq!(format_key(&KeySpec::super_key('k')), "Cmd+k");
        assert_eq!(format_key(&KeySpec::ctrl('d')), "Ctrl+d");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::BackTab)), "Shift+Tab");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char(' '))), "Space");
    }

    #[test]
    fn test_override_replaces_every_default_key() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("next_page".to_string(), "l".to_string())]);
        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());

        assert_eq!(
            reg.action_for_key(KeyCode::Char('l'), KeyModifiers::NONE, Context::Feed),
            Some(Action::NextPage)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('n'), KeyModifiers::NONE, Context::Feed),
            None
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Right, KeyModifiers::NONE, Context::Feed),
            None
        );
    }

    #[test]
    fn test_override_warnings() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([
            ("teleport".to_string(), "t".to_string()),
            ("quit".to_string(), "Ctrl+".to_string()),
        ]);
        let mut warnings = reg.apply_overrides(&overrides);
        warnings.sort();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("Cannot parse key"));
        assert!(warnings[1].contains("Unknown action 'teleport'"));
        // Failed override keeps the default
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Global),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_context_labels_for_help_headings() {
        assert_eq!(Context::Global.label(), "General");
        assert_eq!(Context::Feed.label(), "Feed");
        assert_eq!(Context::Reader.label(), "Article");
    }

    #[test]
    fn test_all_bindings_cover_help() {
        let reg = KeybindingRegistry::new();
        let bindings = reg.all_bindings();
        assert!(bindings
            .iter()
            .any(|(ctx, key, action, _)| *ctx == Context::Global
                && key == "/"
                && *action == Action::FocusSearch));
        assert!(bindings.iter().all(|(_, _, _, desc)| !desc.is_empty()));
    }
}
