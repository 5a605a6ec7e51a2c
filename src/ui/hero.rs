//! Hero zone: the rotating carousel, a single lead story, or a lead story
//! over a featured grid.

use crate::app::App;
use crate::feed::{Article, Partition};
use crate::util::{format_relative_time, truncate_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows taken by the lead card, borders included.
pub(super) const CARD_HEIGHT: u16 = 7;
/// Rows taken by the featured grid, borders included.
pub(super) const GRID_HEIGHT: u16 = 4;

/// Rows the hero zone needs for `zones`; zero when it has nothing to show.
pub(super) fn height(zones: &Partition<'_>) -> u16 {
    let card = if !zones.carousel.is_empty() || zones.hero.is_some() {
        CARD_HEIGHT
    } else {
        0
    };
    let grid = if zones.featured.is_empty() { 0 } else { GRID_HEIGHT };
    card + grid
}

/// Thumbnail stand-in: `▣` for stories with an image, otherwise the
/// source initial.
pub(super) fn badge(article: &Article) -> String {
    if article.image_url.is_some() {
        " ▣ ".to_string()
    } else {
        format!(" {} ", article.source.initial())
    }
}

pub(super) fn byline(article: &Article, now: DateTime<Utc>) -> String {
    format!(
        "{} · {}",
        article.source.name,
        format_relative_time(article.published_date, now)
    )
}

/// Render the hero zone for `zones` into `area`.
pub fn render(f: &mut Frame, app: &App, zones: &Partition<'_>, area: Rect) {
    if area.width < 4 || area.height < 3 {
        return;
    }
    let now = Utc::now();

    let (card_area, grid_area) = if zones.featured.is_empty() {
        (area, None)
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(CARD_HEIGHT), Constraint::Min(0)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    };

    let lead_selected = app.selected == 0;

    if !zones.carousel.is_empty() {
        let index = app.carousel_index().min(zones.carousel.len() - 1);
        let slide = &zones.carousel[index];
        let mut title = String::from(" Top Stories ");
        if app.carousel.as_ref().is_some_and(|c| c.state().is_paused()) {
            title.push_str("(paused) ");
        }
        let footer = indicators(app, zones.carousel.len(), index);
        render_card(f, app, slide, &title, Some(footer), lead_selected, card_area, now);
    } else if let Some(hero) = zones.hero {
        render_card(f, app, hero, " Top Story ", None, lead_selected, card_area, now);
    }

    if let Some(grid_area) = grid_area {
        render_grid(f, app, zones.featured, grid_area, now);
    }
}

/// `● ○ ○ ○ ○` with the active slide filled.
fn indicators(app: &App, len: usize, active: usize) -> Line<'static> {
    let mut spans = Vec::with_capacity(len * 2 + 1);
    for i in 0..len {
        let (dot, role) = if i == active {
            ("●", "indicator_active")
        } else {
            ("○", "indicator")
        };
        spans.push(Span::styled(dot, app.style(role)));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(" [ ] or 1-5", app.style("indicator")));
    Line::from(spans)
}

#[allow(clippy::too_many_arguments)]
fn render_card(
    f: &mut Frame,
    app: &App,
    article: &Article,
    title: &str,
    footer: Option<Line<'static>>,
    selected: bool,
    area: Rect,
    now: DateTime<Utc>,
) {
    let border = if selected { "panel_border_focused" } else { "story_meta" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style(border))
        .title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width as usize;
    let mut lines = vec![
        Line::from(vec![
            Span::styled(badge(article), app.style("badge")),
            Span::raw(" "),
            Span::styled(
                truncate_to_width(&article.title, width.saturating_sub(5)).into_owned(),
                app.style("hero_title"),
            ),
        ]),
        Line::from(Span::styled(byline(article, now), app.style("hero_meta"))),
    ];
    if let Some(summary) = article.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(Line::from(truncate_to_width(summary, width).into_owned()));
    }

    let body_height = inner.height.saturating_sub(u16::from(footer.is_some()));
    let body = Rect {
        height: body_height,
        ..inner
    };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), body);

    if let Some(footer) = footer {
        let footer_area = Rect {
            y: inner.y + body_height,
            height: 1,
            ..inner
        };
        f.render_widget(Paragraph::new(footer), footer_area);
    }
}

fn render_grid(f: &mut Frame, app: &App, featured: &[Article], area: Rect, now: DateTime<Utc>) {
    let n = featured.len().max(1) as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, n); featured.len()])
        .split(area);

    for (i, (article, column)) in featured.iter().zip(columns.iter()).enumerate() {
        // Featured entries follow the lead story in the selection order
        let selected = app.selected == i + 1;
        let border = if selected { "panel_border_focused" } else { "story_meta" };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(app.style(border));
        let inner = block.inner(*column);
        f.render_widget(block, *column);

        let width = inner.width as usize;
        let lines = vec![
            Line::from(Span::styled(
                truncate_to_width(&article.title, width).into_owned(),
                app.style("story_title"),
            )),
            Line::from(Span::styled(
                truncate_to_width(&byline(article, now), width).into_owned(),
                app.style("story_meta"),
            )),
        ];
        f.render_widget(Paragraph::new(lines), inner);
    }
}
