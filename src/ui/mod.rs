//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse input handling
//! - `events` - Background task event processing
//! - `helpers` - Navigation task spawning and shared helpers
//! - `render` - View rendering dispatch
//! - `header` - Section bar, search box and address bar
//! - `hero` - Carousel, single hero and featured grid
//! - `articles` - Story list with pagination footer
//! - `reader` - Article detail and not-found views
//! - `status` - Status bar
//! - `help` - Keybinding overlay

mod articles;
mod events;
mod header;
mod help;
mod helpers;
mod hero;
mod input;
mod loop_runner;
mod reader;
mod render;
mod status;

pub use helpers::navigate;
pub use loop_runner::{run, Action};
