//! Small helpers shared by the UI and the content extractor.
//!
//! - **Text**: terminal width, truncation, control-character stripping,
//!   search-term matching and relative timestamps
//! - **URLs**: validation of links before they are opened in a browser

mod text;
mod url_validator;

pub use text::{
    capitalize, display_width, format_relative_time, match_ranges, normalize_whitespace,
    strip_control_chars, truncate_to_width,
};
pub use url_validator::{validate_url_for_open, UrlValidationError};
