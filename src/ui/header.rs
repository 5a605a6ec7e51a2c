use crate::app::{App, SECTIONS};
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Height of the header, bottom border included.
pub(super) const HEADER_HEIGHT: u16 = 3;

/// Render the section bar and the search box (or the address bar while it
/// is open).
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(app.style("story_meta"));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    f.render_widget(Paragraph::new(nav_line(app)), rows[0]);
    f.render_widget(Paragraph::new(input_line(app, rows[1].width)), rows[1]);
}

fn nav_line(app: &App) -> Line<'static> {
    let active = app.current_section();
    let mut spans = vec![Span::styled(" ULTRA ", app.style("brand")), Span::raw(" ")];
    for (i, section) in SECTIONS.iter().enumerate() {
        let role = if Some(i) == active { "nav_active" } else { "nav_item" };
        spans.push(Span::styled(section.label, app.style(role)));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

fn input_line(app: &App, width: u16) -> Line<'static> {
    let width = width as usize;

    if let Some(text) = &app.address_bar {
        let prefix = " Go to: ";
        let text = truncate_to_width(text, width.saturating_sub(prefix.len() + 1));
        return Line::from(vec![
            Span::styled(prefix, app.style("address_bar")),
            Span::styled(format!("{}_", text), app.style("address_bar")),
        ]);
    }

    let location = app.location.to_string();
    let focused = app.search.is_focused();
    let label = if focused { " Search: " } else { " Search (/): " };
    let room = width.saturating_sub(label.len() + location.len() + 4);

    let text = if app.search.text().is_empty() && !focused {
        "Search news...".into()
    } else {
        truncate_to_width(app.search.text(), room)
    };
    let cursor = if focused { "_" } else { "" };
    let role = if focused { "search_focused" } else { "search_box" };

    let used = label.len() + text.chars().count() + cursor.len();
    let padding = width.saturating_sub(used + location.len() + 1);

    Line::from(vec![
        Span::styled(label, app.style(role)),
        Span::styled(format!("{}{}", text, cursor), app.style(role)),
        Span::raw(" ".repeat(padding)),
        Span::styled(location, app.style("story_meta")),
    ])
}
