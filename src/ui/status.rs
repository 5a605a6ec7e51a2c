use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.address_bar.is_some() {
        Cow::Borrowed("Type a location | ENTER go | ESC cancel | Ctrl+U clear")
    } else if app.search.is_focused() {
        Cow::Borrowed("Type to search | ENTER submit | ESC cancel")
    } else if app.loading {
        Cow::Owned(format!("Loading {} ...", app.location))
    } else {
        match app.view {
            View::Feed => Cow::Borrowed(
                "[j/k]move [Enter]open [n/p]page [/]search [Tab]section [g]go [?]help [q]uit",
            ),
            View::Article => {
                Cow::Borrowed("[j/k]scroll [Ctrl+d/u]page [o]original [Esc]back [?]help [q]uit")
            }
            View::NotFound => Cow::Borrowed("[Enter]home [Esc]back [q]uit"),
        }
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
