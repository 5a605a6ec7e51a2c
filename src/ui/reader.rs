use crate::app::{App, View};
use crate::content::{read_time_minutes, word_count, Block as TextBlock};
use crate::feed::ArticleDetail;
use crate::util::display_width;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the article view, or the not-found view when the lookup failed.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    if app.view == View::NotFound {
        render_not_found(f, app, area);
        return;
    }

    let Some(article) = app.article.as_ref() else {
        let paragraph = Paragraph::new("Loading article...")
            .block(Block::default().borders(Borders::ALL).title("Article"));
        f.render_widget(paragraph, area);
        return;
    };

    let lines = article_lines(app, article, &app.article_blocks);
    let title = format!(" {} ", article.source.name);

    // Clamp before drawing so a resize never renders past the end
    let inner_width = area.width.saturating_sub(2) as usize;
    app.reader_visible_lines = area.height.saturating_sub(2) as usize;
    app.reader_line_count = wrapped_line_count(&lines, inner_width);
    app.clamp_reader_scroll();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(crate::app::MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, area);
}

fn article_lines(app: &App, article: &ArticleDetail, blocks: &[TextBlock]) -> Vec<Line<'static>> {
    let minutes = read_time_minutes(word_count(blocks));
    let mut lines = vec![
        Line::from(Span::styled(article.title.clone(), app.style("reader_heading"))),
        Line::from(Span::styled(
            format!(
                "{} · {} · {} min read",
                article.source.name,
                article.published_date.format("%B %d, %Y"),
                minutes
            ),
            app.style("reader_metadata"),
        )),
        Line::from(""),
    ];

    if blocks.is_empty() {
        lines.push(Line::from(Span::styled(
            "Full content not available in this preview.",
            app.style("reader_metadata"),
        )));
        lines.push(Line::from(""));
    }

    for block in blocks {
        let line = match block {
            TextBlock::Heading(text) => {
                Line::from(Span::styled(text.clone(), app.style("reader_heading")))
            }
            TextBlock::Paragraph(text) => {
                Line::from(Span::styled(text.clone(), app.style("reader_body")))
            }
            TextBlock::Quote(text) => {
                Line::from(Span::styled(format!("│ {}", text), app.style("reader_quote")))
            }
            TextBlock::ListItem(text) => {
                Line::from(Span::styled(format!("  • {}", text), app.style("reader_body")))
            }
        };
        lines.push(line);
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        format!("Continue reading on {} ([o] Read Original)", article.source.name),
        app.style("pagination"),
    )));
    lines
}

/// Display rows after wrapping `lines` at `width` columns.
fn wrapped_line_count(lines: &[Line<'_>], width: usize) -> usize {
    if width == 0 {
        return lines.len();
    }
    lines
        .iter()
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| display_width(&s.content)).sum();
            w.div_ceil(width).max(1)
        })
        .sum()
}

fn render_not_found(f: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Article not found", app.style("reader_heading"))),
        Line::from(""),
        Line::from(Span::styled(
            "The story you're looking for doesn't exist or has been removed.",
            app.style("reader_metadata"),
        )),
        Line::from(""),
        Line::from(Span::styled("[Enter] Return Home", app.style("pagination"))),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
