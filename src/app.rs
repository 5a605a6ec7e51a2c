use crate::carousel::Carousel;
use crate::config::Config;
use crate::content::{extract_blocks, Block};
use crate::feed::{
    partition, Article, ArticleDetail, FeedClient, FeedPage, HeroMode, Location, NavigationQuery,
    PageNav, Partition, Route, PAGE_SIZE,
};
use crate::keybindings::KeybindingRegistry;
use crate::search::SearchBox;
use crate::theme::StyleMap;
use anyhow::Result;
use ratatui::layout::Rect;
use ratatui::style::Style;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Maximum scroll offset for the article view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// Locations kept for back navigation.
pub const MAX_HISTORY: usize = 100;

// ============================================================================
// Sections
// ============================================================================

/// One entry of the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub label: &'static str,
    /// Route segment; `None` is the front page.
    pub category: Option<&'static str>,
}

impl Section {
    pub fn location(&self) -> Location {
        match self.category {
            Some(category) => Location::parse(&format!("/{category}")),
            None => Location::home(),
        }
    }
}

pub const SECTIONS: [Section; 6] = [
    Section { label: "Home", category: None },
    Section { label: "Tech", category: Some("tech") },
    Section { label: "Politics", category: Some("politics") },
    Section { label: "Business", category: Some("business") },
    Section { label: "Science", category: Some("science") },
    Section { label: "Culture", category: Some("entertainment") },
];

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Redirect policy: at most 3 hops, loops rejected, chain logged.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// The shared HTTP client: pooled connections, keepalive, 30 s request
/// timeout.
pub fn build_http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

// ============================================================================
// View and Event Types
// ============================================================================

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Front page or a category listing.
    Feed,
    /// Article detail (loading or loaded).
    Article,
    /// The article lookup failed.
    NotFound,
}

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// A listing fetch finished. Failures arrive as an empty page.
    FeedLoaded { generation: u64, page: FeedPage },
    /// An article fetch finished; `None` means not found.
    ArticleLoaded {
        generation: u64,
        slug: String,
        article: Option<ArticleDetail>,
    },
    /// Autoplay tick for the carousel of hero set `generation`, from the
    /// timer armed `arm`-th within that set.
    CarouselTick { generation: u64, arm: u64 },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub feed_client: FeedClient,
    pub keybindings: KeybindingRegistry,
    pub theme: StyleMap,
    pub hero_mode: HeroMode,
    pub carousel_interval: Duration,

    // Navigation
    pub location: Location,
    pub query: NavigationQuery,
    pub history: Vec<Location>,
    pub view: View,
    pub loading: bool,
    /// Loading indicator animation frame, advanced by the housekeeping tick.
    pub spinner_frame: usize,
    pub navigation_generation: u64,
    pub load_handle: Option<JoinHandle<()>>,

    // Feed view
    pub page: FeedPage,
    pub selected: usize,
    pub carousel: Option<Carousel>,
    pub carousel_generation: u64,
    /// Screen area of the hero zone from the last frame, for mouse hover.
    pub hero_area: Option<Rect>,
    pub hero_hovered: bool,

    // Header inputs
    pub search: SearchBox,
    /// Location being edited; `Some` while the address bar is open.
    pub address_bar: Option<String>,

    // Article view
    pub article: Option<ArticleDetail>,
    pub article_blocks: Vec<Block>,
    pub scroll_offset: usize,
    pub reader_line_count: usize,
    pub reader_visible_lines: usize,

    // Chrome
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
    pub show_help: bool,
    pub help_scroll_offset: usize,
}

impl App {
    pub fn new(feed_client: FeedClient, config: &Config) -> Self {
        let mut keybindings = KeybindingRegistry::new();
        let warnings = keybindings.apply_overrides(&config.keybindings);
        for warning in &warnings {
            tracing::warn!(warning = %warning, "Keybinding override ignored");
        }

        let mut app = Self {
            feed_client,
            keybindings,
            theme: StyleMap::default(),
            hero_mode: config.hero_mode,
            carousel_interval: config.carousel_interval(),
            location: Location::home(),
            query: NavigationQuery::default(),
            history: Vec::new(),
            view: View::Feed,
            loading: false,
            spinner_frame: 0,
            navigation_generation: 0,
            load_handle: None,
            page: FeedPage::empty(),
            selected: 0,
            carousel: None,
            carousel_generation: 0,
            hero_area: None,
            hero_hovered: false,
            search: SearchBox::default(),
            address_bar: None,
            article: None,
            article_blocks: Vec::new(),
            scroll_offset: 0,
            reader_line_count: 0,
            reader_visible_lines: 0,
            status_message: None,
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
        };
        if let Some(first) = warnings.into_iter().next() {
            app.set_status(first);
        }
        app
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Move to `location` and reset everything derived from the previous
    /// one. Returns the generation the caller must tag its fetch with.
    ///
    /// Any in-flight load is aborted and the carousel (with its timer) is
    /// dropped.
    pub fn begin_navigation(&mut self, location: Location, push_history: bool) -> u64 {
        if push_history && location != self.location {
            let previous = std::mem::replace(&mut self.location, location);
            self.history.push(previous);
            if self.history.len() > MAX_HISTORY {
                self.history.remove(0);
            }
        } else {
            self.location = location;
        }

        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted superseded load");
        }
        self.navigation_generation = self.navigation_generation.wrapping_add(1);

        self.query = self.location.navigation_query();
        self.search.reseed(self.query.q.as_deref());
        self.address_bar = None;

        self.carousel = None;
        self.hero_hovered = false;
        self.page = FeedPage::empty();
        self.selected = 0;

        self.article = None;
        self.article_blocks.clear();
        self.scroll_offset = 0;
        self.reader_line_count = 0;

        self.loading = true;
        self.view = match self.location.route {
            Route::Article(_) => View::Article,
            Route::Home | Route::Category(_) => View::Feed,
        };
        self.needs_redraw = true;

        tracing::debug!(
            location = %self.location,
            generation = self.navigation_generation,
            "Navigating"
        );
        self.navigation_generation
    }

    /// Install a fetched page. Returns false for a superseded fetch.
    ///
    /// A page with a carousel zone gets a fresh [`Carousel`] at index 0
    /// under a new carousel generation.
    pub fn apply_feed_page(
        &mut self,
        generation: u64,
        page: FeedPage,
        event_tx: &mpsc::Sender<AppEvent>,
    ) -> bool {
        if generation != self.navigation_generation || !self.location.route.is_feed() {
            return false;
        }

        self.page = page;
        self.loading = false;
        self.selected = 0;
        self.search.settle();

        self.carousel = None;
        let slides = self.partition().carousel.len();
        if slides > 0 {
            self.carousel_generation = self.carousel_generation.wrapping_add(1);
            self.carousel = Some(Carousel::new(
                slides,
                self.carousel_generation,
                self.carousel_interval,
                event_tx.clone(),
            ));
        }
        true
    }

    /// Install a fetched article. Returns false for a superseded fetch.
    pub fn apply_article(&mut self, generation: u64, article: Option<ArticleDetail>) -> bool {
        if generation != self.navigation_generation {
            return false;
        }

        self.loading = false;
        self.search.settle();
        self.scroll_offset = 0;
        match article {
            Some(article) => {
                self.article_blocks = extract_blocks(&article.content);
                self.article = Some(article);
                self.view = View::Article;
            }
            None => {
                self.article_blocks.clear();
                self.view = View::NotFound;
            }
        }
        true
    }

    /// Pop the previous location, if any.
    pub fn go_back(&mut self) -> Option<Location> {
        self.history.pop()
    }

    /// Previous/next page targets for the current listing.
    pub fn page_nav(&self) -> PageNav {
        PageNav::new(
            &self.location.base_path(),
            self.query.page,
            PAGE_SIZE,
            self.page.total_count,
            &self.location.params,
        )
    }

    /// Index into [`SECTIONS`] of the current route, if it is one.
    pub fn current_section(&self) -> Option<usize> {
        match &self.location.route {
            Route::Home => Some(0),
            Route::Category(category) => SECTIONS
                .iter()
                .position(|s| s.category == Some(category.as_str())),
            Route::Article(_) => None,
        }
    }

    /// The section after (or before) the current one, wrapping.
    pub fn adjacent_section(&self, forward: bool) -> Location {
        let n = SECTIONS.len();
        let target = match (self.current_section(), forward) {
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
            (None, true) => 0,
            (None, false) => n - 1,
        };
        SECTIONS[target].location()
    }

    // ------------------------------------------------------------------
    // Feed layout and selection
    // ------------------------------------------------------------------

    /// Zones of the current page.
    pub fn partition(&self) -> Partition<'_> {
        partition(&self.page, self.query.page, self.hero_mode)
    }

    pub fn carousel_index(&self) -> usize {
        self.carousel.as_ref().map_or(0, Carousel::index)
    }

    /// Stories the cursor can land on, in screen order: the visible
    /// carousel slide or hero, the featured grid, then the list.
    pub fn selectable(&self) -> Vec<&Article> {
        let zones = self.partition();
        let mut items = Vec::with_capacity(self.page.items.len());
        items.extend(zones.carousel.get(self.carousel_index()));
        items.extend(zones.hero);
        items.extend(zones.featured);
        items.extend(zones.list);
        items
    }

    /// Number of selectable entries that sit above the list.
    pub fn hero_zone_len(&self) -> usize {
        let zones = self.partition();
        usize::from(!zones.carousel.is_empty() || zones.hero.is_some()) + zones.featured.len()
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.selectable().get(self.selected).copied()
    }

    pub fn nav_down(&mut self) {
        let count = self.selectable().len();
        if self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Track the mouse entering or leaving the hero zone.
    pub fn set_hero_hover(&mut self, hovered: bool) {
        if hovered == self.hero_hovered {
            return;
        }
        self.hero_hovered = hovered;
        if let Some(carousel) = self.carousel.as_mut() {
            if hovered {
                carousel.hover_enter();
            } else {
                carousel.hover_leave();
            }
            self.needs_redraw = true;
        }
    }

    // ------------------------------------------------------------------
    // Article view scrolling
    // ------------------------------------------------------------------

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Clamp the scroll offset so the last line stays on screen.
    pub fn clamp_scroll(&mut self, content_lines: usize, visible_lines: usize) {
        let max_scroll = content_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    pub fn clamp_reader_scroll(&mut self) {
        self.clamp_scroll(self.reader_line_count, self.reader_visible_lines);
    }

    /// Lines moved by PageDown/PageUp.
    pub fn reader_page_size(&self) -> usize {
        self.reader_visible_lines.saturating_sub(2).max(1)
    }

    // ------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort the in-flight load on drop; the carousel timer releases itself.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted load task on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fixtures;
    use pretty_assertions::assert_eq;
    use tokio::time::{self, Duration};

    fn test_app() -> App {
        let client = FeedClient::new(reqwest::Client::new(), "http://127.0.0.1:9").unwrap();
        App::new(client, &Config::default())
    }

    fn titles(articles: &[&Article]) -> Vec<String> {
        articles.iter().map(|a| a.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        time::pause();
        let mut app = test_app();
        app.set_status("Loaded");

        time::advance(Duration::from_secs(3)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_status_not_expired_before_3_seconds() {
        time::pause();
        let mut app = test_app();
        app.set_status("Loaded");

        time::advance(Duration::from_millis(2900)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_navigation_pushes_history_and_bumps_generation() {
        let mut app = test_app();
        let first = app.begin_navigation(Location::parse("/tech"), true);
        let second = app.begin_navigation(Location::parse("/tech?page=2"), true);

        assert!(second > first);
        assert_eq!(app.query.page, 2);
        assert_eq!(app.query.category.as_deref(), Some("tech"));
        assert_eq!(
            app.history.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["/", "/tech"]
        );
        assert_eq!(app.go_back().map(|l| l.to_string()), Some("/tech".to_string()));
    }

    #[tokio::test]
    async fn test_reload_does_not_grow_history() {
        let mut app = test_app();
        app.begin_navigation(Location::parse("/science"), true);
        app.begin_navigation(Location::parse("/science"), true);
        assert_eq!(app.history.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_feed_page_is_dropped() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        let stale = app.begin_navigation(Location::parse("/tech"), true);
        let current = app.begin_navigation(Location::parse("/business"), true);

        assert!(!app.apply_feed_page(stale, fixtures::page(&["Old"], 1), &tx));
        assert!(app.loading);
        assert!(app.page.is_empty());

        assert!(app.apply_feed_page(current, fixtures::page(&["New"], 1), &tx));
        assert!(!app.loading);
        assert_eq!(app.page.items[0].title, "New");
    }

    #[tokio::test]
    async fn test_first_page_starts_carousel() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        let generation = app.begin_navigation(Location::home(), false);
        let page = fixtures::page(&["A", "B", "C", "D", "E", "F", "G"], 47);
        app.apply_feed_page(generation, page, &tx);

        let carousel = app.carousel.as_ref().unwrap();
        assert_eq!(carousel.state().len(), 5);
        assert!(carousel.is_timer_armed());
        assert_eq!(app.hero_zone_len(), 1);
        assert_eq!(titles(&app.selectable()), vec!["A", "F", "G"]);

        app.carousel.as_mut().unwrap().next();
        assert_eq!(app.selected_article().map(|a| a.title.as_str()), Some("B"));
    }

    #[tokio::test]
    async fn test_later_pages_have_no_carousel() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        let generation = app.begin_navigation(Location::parse("/?page=2"), false);
        app.apply_feed_page(generation, fixtures::page(&["A", "B", "C"], 47), &tx);

        assert!(app.carousel.is_none());
        assert_eq!(app.hero_zone_len(), 0);
        assert_eq!(titles(&app.selectable()), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_navigation_releases_carousel() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        let generation = app.begin_navigation(Location::home(), false);
        app.apply_feed_page(generation, fixtures::page(&["A", "B"], 2), &tx);
        assert!(app.carousel.is_some());

        app.begin_navigation(Location::article("a"), true);
        assert!(app.carousel.is_none());
        assert_eq!(app.view, View::Article);
    }

    #[tokio::test]
    async fn test_featured_grid_selection_order() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        app.hero_mode = HeroMode::FeaturedGrid;
        let generation = app.begin_navigation(Location::parse("/tech"), false);
        app.apply_feed_page(generation, fixtures::page(&["A", "B", "C", "D", "E", "F"], 6), &tx);

        assert!(app.carousel.is_none());
        assert_eq!(app.hero_zone_len(), 5);
        assert_eq!(titles(&app.selectable()), vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[tokio::test]
    async fn test_nav_stays_in_bounds() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();
        let generation = app.begin_navigation(Location::parse("/?page=3"), false);
        app.apply_feed_page(generation, fixtures::page(&["A", "B"], 42), &tx);

        app.nav_up();
        assert_eq!(app.selected, 0);
        app.nav_down();
        app.nav_down();
        assert_eq!(app.selected, 1);
    }

    #[tokio::test]
    async fn test_missing_article_shows_not_found() {
        let mut app = test_app();
        let generation = app.begin_navigation(Location::article("gone"), true);
        assert!(app.apply_article(generation, None));
        assert_eq!(app.view, View::NotFound);
        assert!(!app.loading);
    }

    #[tokio::test]
    async fn test_page_nav_keeps_other_params() {
        let mut app = test_app();
        app.begin_navigation(Location::parse("/tech?page=2&sort=new"), false);
        app.page.total_count = 47;

        let nav = app.page_nav();
        assert_eq!(nav.prev.as_deref(), Some("/tech?sort=new&page=1"));
        assert_eq!(nav.next.as_deref(), Some("/tech?sort=new&page=3"));
    }

    #[tokio::test]
    async fn test_section_cycle_wraps() {
        let mut app = test_app();
        assert_eq!(app.current_section(), Some(0));
        assert_eq!(app.adjacent_section(false).to_string(), "/entertainment");

        app.begin_navigation(Location::parse("/entertainment"), false);
        assert_eq!(app.adjacent_section(true).to_string(), "/");

        app.begin_navigation(Location::parse("/local"), false);
        assert_eq!(app.current_section(), None);
        assert_eq!(app.adjacent_section(true).to_string(), "/");
    }

    #[test]
    fn test_clamp_scroll() {
        let client = FeedClient::new(reqwest::Client::new(), "http://127.0.0.1:9").unwrap();
        let mut app = App::new(client, &Config::default());
        app.scroll_down(500);
        app.clamp_scroll(100, 30);
        assert_eq!(app.scroll_offset, 70);
        app.scroll_up(1000);
        assert_eq!(app.scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_bad_keybinding_override_sets_status() {
        let client = FeedClient::new(reqwest::Client::new(), "http://127.0.0.1:9").unwrap();
        let mut config = Config::default();
        config
            .keybindings
            .insert("levitate".to_string(), "l".to_string());
        let app = App::new(client, &config);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("levitate"));
    }
}
