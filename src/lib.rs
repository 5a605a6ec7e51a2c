//! Ultra News: feed composition and navigation for a terminal news reader.

pub mod app;
pub mod carousel;
pub mod config;
pub mod content;
pub mod feed;
pub mod keybindings;
pub mod search;
pub mod theme;
pub mod ui;
pub mod util;
