use crate::app::App;
use crate::feed::{Article, PageNav};
use crate::util::{capitalize, match_ranges, truncate_to_width};
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::hero;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Render the feed view: heading, hero zone, story list and pagination.
///
/// Returns the area the hero zone was drawn in, if any, so mouse movement
/// can be matched against it.
pub fn render(f: &mut Frame, app: &App, area: Rect) -> Option<Rect> {
    if area.width < 10 || area.height < 4 {
        return None;
    }

    let zones = app.partition();
    let hero_height = hero::height(&zones);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(hero_height),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    f.render_widget(Paragraph::new(page_heading(app)), chunks[0]);

    if app.page.is_empty() {
        let text = if app.loading {
            format!("Loading {}", SPINNER[app.spinner_frame % SPINNER.len()])
        } else {
            empty_message(app)
        };
        let message = Paragraph::new(Span::styled(text, app.style("empty")))
            .alignment(Alignment::Center);
        f.render_widget(message, chunks[3]);
        return None;
    }

    let hero_area = (hero_height > 0).then(|| {
        hero::render(f, app, &zones, chunks[1]);
        chunks[1]
    });

    f.render_widget(
        Paragraph::new(Span::styled(list_heading(app), app.style("section_heading"))),
        chunks[2],
    );

    let offset = app.hero_zone_len();
    render_list(f, app, zones.list, offset, chunks[3]);
    f.render_widget(Paragraph::new(pagination_line(app, &app.page_nav())), chunks[4]);

    hero_area
}

/// "The Feed · 47 Stories", the category name, or the active search.
fn page_heading(app: &App) -> Line<'static> {
    let title = match (&app.query.category, app.query.search_term()) {
        (_, Some(q)) => format!("Results for \"{}\"", q.trim()),
        (Some(category), None) => capitalize(category),
        (None, None) => "The Feed".to_string(),
    };
    let mut spans = vec![Span::styled(title, app.style("section_heading"))];
    if !app.loading {
        spans.push(Span::styled(
            format!("  {} Stories", app.page.total_count),
            app.style("story_meta"),
        ));
    }
    Line::from(spans)
}

/// Shown for an empty page, whether the backend had nothing or failed.
fn empty_message(app: &App) -> String {
    match &app.query.category {
        Some(category) => format!("No stories in {} yet", capitalize(category)),
        None => "No stories yet".to_string(),
    }
}

fn list_heading(app: &App) -> String {
    if app.query.page > 1 {
        format!("Latest Wire (Page {})", app.query.page)
    } else {
        "Latest Wire".to_string()
    }
}

fn render_list(f: &mut Frame, app: &App, list: &[Article], offset: usize, area: Rect) {
    let now = Utc::now();
    let search_term = app.query.search_term();

    let items: Vec<ListItem> = list
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let selected = offset + i == app.selected;
            let title_style = if selected {
                app.style("story_selected")
            } else {
                app.style("story_title")
            };

            let meta = format!("  {}", hero::byline(article, now));
            let room = (area.width as usize).saturating_sub(meta.chars().count() + 5);
            let title = truncate_to_width(&article.title, room);

            let mut spans = vec![
                Span::styled(hero::badge(article), app.style("badge")),
                Span::raw(" "),
            ];
            spans.extend(highlighted(&title, search_term, title_style, app.style("highlight")));
            spans.push(Span::styled(meta, app.style("story_meta")));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default();
    state.select(app.selected.checked_sub(offset).filter(|&i| i < list.len()));
    f.render_stateful_widget(List::new(items), area, &mut state);
}

/// Split `title` into spans, marking case-insensitive matches of `term`.
fn highlighted(title: &str, term: Option<&str>, base: Style, mark: Style) -> Vec<Span<'static>> {
    let ranges = term.map(|t| match_ranges(title, t.trim())).unwrap_or_default();
    if ranges.is_empty() {
        return vec![Span::styled(title.to_string(), base)];
    }

    let mut spans = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;
    for range in ranges {
        if range.start > cursor {
            spans.push(Span::styled(title[cursor..range.start].to_string(), base));
        }
        spans.push(Span::styled(title[range.clone()].to_string(), mark));
        cursor = range.end;
    }
    if cursor < title.len() {
        spans.push(Span::styled(title[cursor..].to_string(), base));
    }
    spans
}

fn pagination_line(app: &App, nav: &PageNav) -> Line<'static> {
    let prev = if nav.prev.is_some() { "← [p] Previous" } else { "" };
    let next = if nav.next.is_some() { "[n] Next →" } else { "" };
    Line::from(vec![
        Span::styled(prev, app.style("pagination")),
        Span::styled(format!("   Page {}   ", nav.current), app.style("story_meta")),
        Span::styled(next, app.style("pagination")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Modifier};

    fn text(spans: &[Span<'_>]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_marks_matches_case_insensitively() {
        let base = Style::default();
        let mark = Style::default().bg(Color::Yellow);
        let spans = highlighted("AI chips and more ai", Some("ai"), base, mark);
        assert_eq!(text(&spans), vec!["AI", " chips and more ", "ai"]);
        assert_eq!(spans[0].style, mark);
        assert_eq!(spans[1].style, base);
    }

    #[test]
    fn test_highlight_without_term_is_one_span() {
        let base = Style::default().add_modifier(Modifier::BOLD);
        let spans = highlighted("Markets", None, base, Style::default());
        assert_eq!(text(&spans), vec!["Markets"]);

        let spans = highlighted("Markets", Some("  "), base, Style::default());
        assert_eq!(spans.len(), 1);
    }
}
