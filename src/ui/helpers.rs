//! Shared helpers for the UI: navigation task spawning, panic capture and
//! opening links.

use crate::app::{App, AppEvent};
use crate::feed::{ArticleLink, Location, Route};
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Run a future, turning a panic into its message.
///
/// Background tasks wrap their work in this so that a panic is reported
/// through [`AppEvent::TaskPanicked`] instead of silently killing the task
/// and leaving the view stuck in its loading state.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

async fn send_event(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
    if let Err(e) = tx.send(event).await {
        tracing::warn!(error = %e, "Channel send failed (receiver dropped)");
    }
}

/// Navigate to `location` and spawn the fetch it needs.
///
/// Feed routes fetch a listing page, article routes fetch the article. The
/// result comes back as an [`AppEvent`] tagged with the navigation
/// generation; an earlier fetch still in flight is aborted.
pub fn navigate(
    app: &mut App,
    location: Location,
    push_history: bool,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let generation = app.begin_navigation(location, push_history);
    let client = app.feed_client.clone();
    let route = app.location.route.clone();
    let query = app.query.clone();
    let tx = event_tx.clone();

    app.load_handle = Some(tokio::spawn(async move {
        match route {
            Route::Article(slug) => {
                match catch_task_panic(client.fetch_article(&slug)).await {
                    Ok(article) => {
                        send_event(
                            &tx,
                            AppEvent::ArticleLoaded {
                                generation,
                                slug,
                                article,
                            },
                        )
                        .await;
                    }
                    Err(error) => {
                        tracing::error!(error = %error, "Article fetch task panicked");
                        send_event(
                            &tx,
                            AppEvent::TaskPanicked {
                                task: "article fetch",
                                error,
                            },
                        )
                        .await;
                    }
                }
            }
            Route::Home | Route::Category(_) => {
                let fetch = client.fetch_page(
                    query.category.as_deref(),
                    query.search_term(),
                    query.page,
                );
                match catch_task_panic(fetch).await {
                    Ok(page) => send_event(&tx, AppEvent::FeedLoaded { generation, page }).await,
                    Err(error) => {
                        tracing::error!(error = %error, "Feed fetch task panicked");
                        send_event(
                            &tx,
                            AppEvent::TaskPanicked {
                                task: "feed fetch",
                                error,
                            },
                        )
                        .await;
                    }
                }
            }
        }
    }));
}

/// Return to the previous location, if there is one.
pub(super) fn go_back(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    match app.go_back() {
        Some(previous) => navigate(app, previous, false, event_tx),
        None => app.set_status("No previous location"),
    }
}

/// Fetch the current location again.
pub(super) fn reload(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let location = app.location.clone();
    navigate(app, location, false, event_tx);
}

/// Open the selected story: internal stories load in the article view,
/// stories without a slug go to their source in the browser.
pub(super) fn open_selected(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(link) = app.selected_article().map(|a| a.link()) else {
        return;
    };
    match link {
        ArticleLink::Internal(path) => navigate(app, Location::parse(&path), true, event_tx),
        ArticleLink::External(url) => open_in_browser(app, &url),
    }
}

/// Hand a link to the system browser after validating it.
pub(super) fn open_in_browser(app: &mut App, url: &str) {
    match validate_url_for_open(url) {
        Err(e) => {
            tracing::warn!(url, error = %e, "Refusing to open URL");
            app.set_status(format!("Cannot open link: {}", e));
        }
        Ok(url) => match open::that(url.as_str()) {
            Ok(()) => app.set_status("Opened in browser"),
            Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catch_task_panic_passes_value_through() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_reports_message() {
        let result = catch_task_panic(async {
            if true {
                panic!("boom");
            }
        })
        .await;
        assert_eq!(result, Err("boom".to_string()));
    }
}
