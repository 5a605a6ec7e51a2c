//! Help overlay: scrollable keybinding table.
//!
//! Shows the live bindings, user overrides included, grouped by context.

use crate::app::App;
use crate::keybindings::Context;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

const CONTEXT_ORDER: [Context; 3] = [Context::Global, Context::Feed, Context::Reader];

/// Keys handled outside the registry.
const FIXED_KEYS: [(Context, &str, &str); 3] = [
    (Context::Global, "Ctrl+K / Cmd+K", "Focus search box"),
    (Context::Feed, "1-5", "Select hero slide"),
    (Context::Reader, "Enter", "Return home (not found)"),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let rows = help_rows(app);
    let total_rows = rows.len();

    // -2 border -2 header and margin
    let visible_height = overlay.height.saturating_sub(4) as usize;
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}) ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let table = Table::new(visible_rows, [Constraint::Length(16), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(app.style("reader_body"));
    f.render_widget(table, overlay);

    if scroll < max_scroll {
        let hint = Line::from(Span::styled(
            " j/k to scroll, ? or Esc to close ",
            app.style("reader_metadata"),
        ));
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}

fn help_rows(app: &App) -> Vec<Row<'static>> {
    let bindings = app.keybindings.all_bindings();
    let mut rows = Vec::new();

    for ctx in CONTEXT_ORDER {
        let mut group: Vec<Row> = bindings
            .iter()
            .filter(|(c, _, _, _)| *c == ctx)
            .map(|(_, key, _, description)| {
                Row::new(vec![format!("  {}", key), description.to_string()])
            })
            .collect();
        group.extend(
            FIXED_KEYS
                .iter()
                .filter(|(c, _, _)| *c == ctx)
                .map(|(_, key, what)| Row::new(vec![format!("  {}", key), what.to_string()])),
        );
        if group.is_empty() {
            continue;
        }

        rows.push(
            Row::new(vec![format!("-- {} --", ctx.label()), String::new()])
                .style(app.style("section_heading")),
        );
        rows.extend(group);
        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    rows.pop();
    rows
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
