//! Article body handling: HTML to plain text blocks and read-time estimates.

mod extract;

pub use extract::{extract_blocks, read_time_minutes, word_count, Block, WORDS_PER_MINUTE};
