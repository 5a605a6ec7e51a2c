//! Background task event processing.

use crate::app::{App, AppEvent};
use tokio::sync::mpsc;

/// Apply one event from a background task to the app state.
///
/// Sets `needs_redraw` only when the event changed what is on screen.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::FeedLoaded { generation, page } => {
            let items = page.items.len();
            let total = page.total_count;
            if app.apply_feed_page(generation, page, event_tx) {
                app.needs_redraw = true;
                tracing::debug!(items, total, location = %app.location, "Feed page shown");
            } else {
                tracing::debug!(
                    generation,
                    current = app.navigation_generation,
                    "Dropping stale feed page"
                );
            }
        }
        AppEvent::ArticleLoaded {
            generation,
            slug,
            article,
        } => {
            let found = article.is_some();
            if app.apply_article(generation, article) {
                app.needs_redraw = true;
                tracing::debug!(slug, found, "Article shown");
            } else {
                tracing::debug!(slug, generation, "Dropping stale article");
            }
        }
        AppEvent::CarouselTick { generation, arm } => {
            if app
                .carousel
                .as_mut()
                .is_some_and(|carousel| carousel.on_tick(generation, arm))
            {
                app.needs_redraw = true;
            }
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.loading = false;
            app.needs_redraw = true;
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::feed::{fixtures, FeedClient, Location};

    fn test_app() -> App {
        let client = FeedClient::new(reqwest::Client::new(), "http://127.0.0.1:9").unwrap();
        App::new(client, &Config::default())
    }

    #[tokio::test]
    async fn test_tick_advances_current_carousel_only() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        let generation = app.begin_navigation(Location::home(), false);
        handle_app_event(
            &mut app,
            AppEvent::FeedLoaded {
                generation,
                page: fixtures::page(&["A", "B", "C"], 3),
            },
            &tx,
        );
        let carousel_generation = app.carousel_generation;
        let arm = app.carousel.as_ref().map_or(0, |c| c.arm());
        app.needs_redraw = false;

        let stale = AppEvent::CarouselTick {
            generation: carousel_generation + 1,
            arm,
        };
        handle_app_event(&mut app, stale, &tx);
        assert_eq!(app.carousel_index(), 0);
        assert!(!app.needs_redraw);

        let current = AppEvent::CarouselTick {
            generation: carousel_generation,
            arm,
        };
        handle_app_event(&mut app, current, &tx);
        assert_eq!(app.carousel_index(), 1);
        assert!(app.needs_redraw);
    }

    #[tokio::test]
    async fn test_panicked_task_clears_loading() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        app.begin_navigation(Location::home(), false);
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "feed fetch",
                error: "boom".to_string(),
            },
            &tx,
        );
        assert!(!app.loading);
        assert!(app.status_message.is_some());
    }
}
