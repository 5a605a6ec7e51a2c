//! Input handling for the TUI.
//!
//! `Ctrl+K`/`Cmd+K` focuses search from anywhere. Other keys go to the
//! first layer that claims them: help overlay, address bar, focused search
//! box, then the keybinding registry for the current view.

use crate::app::{App, AppEvent, View};
use crate::feed::Location;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::search::{self, SearchOutcome};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use tokio::sync::mpsc;

use super::helpers::{go_back, navigate, open_in_browser, open_selected, reload};
use super::Action;

/// Longest location accepted in the address bar.
const MAX_LOCATION_LENGTH: usize = 2048;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if search::is_focus_shortcut(code, modifiers) {
        app.show_help = false;
        app.help_scroll_offset = 0;
        app.address_bar = None;
        app.search.focus();
        return Ok(Action::Continue);
    }

    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.address_bar.is_some() {
        handle_address_input(app, code, modifiers, event_tx);
        return Ok(Action::Continue);
    }

    if app.search.is_focused() {
        handle_search_input(app, code, modifiers, event_tx);
        return Ok(Action::Continue);
    }

    let context = match app.view {
        View::Feed => KbContext::Feed,
        View::Article | View::NotFound => KbContext::Reader,
    };

    if context == KbContext::Feed && modifiers.is_empty() {
        if let KeyCode::Char(c @ '1'..='9') = code {
            select_slide(app, c);
            return Ok(Action::Continue);
        }
    }

    if app.view == View::NotFound && code == KeyCode::Enter {
        navigate(app, Location::home(), true, event_tx);
        return Ok(Action::Continue);
    }

    match app.keybindings.action_for_key(code, modifiers, context) {
        Some(action) => dispatch(app, action, event_tx),
        None => Ok(Action::Continue),
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_address_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let Some(text) = app.address_bar.as_mut() else {
        return;
    };

    if modifiers.contains(KeyModifiers::CONTROL) {
        if code == KeyCode::Char('u') {
            text.clear();
        }
        return;
    }

    match code {
        KeyCode::Esc => app.address_bar = None,
        KeyCode::Enter => {
            if let Some(text) = app.address_bar.take() {
                navigate(app, Location::parse(&text), true, event_tx);
            }
        }
        KeyCode::Backspace => {
            text.pop();
        }
        KeyCode::Char(c) if !c.is_control() => {
            if text.chars().count() < MAX_LOCATION_LENGTH {
                text.push(c);
            }
        }
        _ => {}
    }
}

fn handle_search_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match app.search.handle_key(code, modifiers) {
        SearchOutcome::Navigate(location) => {
            tracing::debug!(location = %location, "Search submitted");
            navigate(app, location, true, event_tx);
        }
        SearchOutcome::AtMaxLength => app.set_status("Search query too long"),
        SearchOutcome::None | SearchOutcome::Blurred => {}
    }
}

/// `1`-`9` pick a carousel slide; keys past the slide count are ignored.
fn select_slide(app: &mut App, digit: char) {
    let Some(index) = digit.to_digit(10).map(|d| d as usize) else {
        return;
    };
    if let Some(carousel) = app.carousel.as_mut() {
        if carousel.select(index - 1) {
            app.selected = 0;
        }
    }
}

fn dispatch(app: &mut App, action: KbAction, event_tx: &mpsc::Sender<AppEvent>) -> Result<Action> {
    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::FocusSearch => app.search.focus(),
        KbAction::EditLocation => app.address_bar = Some(app.location.to_string()),
        KbAction::Reload => reload(app, event_tx),
        KbAction::GoHome => navigate(app, Location::home(), true, event_tx),
        KbAction::NextSection => {
            let target = app.adjacent_section(true);
            navigate(app, target, true, event_tx);
        }
        KbAction::PrevSection => {
            let target = app.adjacent_section(false);
            navigate(app, target, true, event_tx);
        }

        // Feed view
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::Select => open_selected(app, event_tx),
        KbAction::Back => go_back(app, event_tx),
        KbAction::NextPage => match app.page_nav().next {
            Some(target) => navigate(app, Location::parse(&target), true, event_tx),
            None => app.set_status("No more stories"),
        },
        KbAction::PrevPage => match app.page_nav().prev {
            Some(target) => navigate(app, Location::parse(&target), true, event_tx),
            None => app.set_status("Already on the first page"),
        },
        KbAction::CarouselNext => {
            if let Some(carousel) = app.carousel.as_mut() {
                carousel.next();
            }
        }
        KbAction::CarouselPrev => {
            if let Some(carousel) = app.carousel.as_mut() {
                carousel.prev();
            }
        }
        KbAction::ClearSearch => {
            let target = app.search.clear();
            navigate(app, target, true, event_tx);
        }
        KbAction::OpenInBrowser => {
            let url = match app.view {
                View::Feed => app.selected_article().map(|a| a.url.clone()),
                View::Article | View::NotFound => app.article.as_ref().map(|a| a.url.clone()),
            };
            match url {
                Some(url) => open_in_browser(app, &url),
                None => app.set_status("Nothing to open"),
            }
        }

        // Article view
        KbAction::ScrollDown => {
            app.scroll_down(1);
            app.clamp_reader_scroll();
        }
        KbAction::ScrollUp => app.scroll_up(1),
        KbAction::PageDown => {
            app.scroll_down(app.reader_page_size());
            app.clamp_reader_scroll();
        }
        KbAction::PageUp => app.scroll_up(app.reader_page_size()),
        KbAction::ExitReader => {
            if app.history.is_empty() {
                navigate(app, Location::home(), false, event_tx);
            } else {
                go_back(app, event_tx);
            }
        }
    }
    Ok(Action::Continue)
}

/// Mouse movement over the hero zone pauses the carousel; the wheel
/// scrolls the article view.
pub(super) fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            let position = Position::new(mouse.column, mouse.row);
            let inside = app.view == View::Feed
                && app.hero_area.is_some_and(|area| area.contains(position));
            app.set_hero_hover(inside);
        }
        MouseEventKind::ScrollDown if app.view == View::Article => {
            app.scroll_down(3);
            app.clamp_reader_scroll();
            app.needs_redraw = true;
        }
        MouseEventKind::ScrollUp if app.view == View::Article => {
            app.scroll_up(3);
            app.needs_redraw = true;
        }
        _ => {}
    }
}
