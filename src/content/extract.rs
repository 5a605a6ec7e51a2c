use crate::util::{normalize_whitespace, strip_control_chars};
use scraper::{ElementRef, Html, Selector};

const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre",
];

/// Reading speed used for the read-time estimate.
pub const WORDS_PER_MINUTE: usize = 200;

/// One readable block of an article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
    Quote(String),
    ListItem(String),
}

impl Block {
    pub fn text(&self) -> &str {
        match self {
            Block::Heading(t) | Block::Paragraph(t) | Block::Quote(t) | Block::ListItem(t) => t,
        }
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    let raw = el.text().collect::<String>();
    normalize_whitespace(&strip_control_chars(&raw))
}

fn inside_block(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(|node| node.value().as_element())
        .any(|parent| BLOCK_TAGS.contains(&parent.name()))
}

/// Turn an HTML article body into plain text blocks.
///
/// Block elements nested in other block elements are folded into their
/// outermost ancestor. Markup without any block elements becomes a single
/// paragraph of its text.
pub fn extract_blocks(html: &str) -> Vec<Block> {
    if html.trim().is_empty() {
        return Vec::new();
    }
    let fragment = Html::parse_fragment(html);

    let Ok(selector) = Selector::parse(&BLOCK_TAGS.join(", ")) else {
        return Vec::new();
    };

    let mut blocks: Vec<Block> = fragment
        .select(&selector)
        .filter(|el| !inside_block(*el))
        .filter_map(|el| {
            let text = element_text(el);
            if text.is_empty() {
                return None;
            }
            Some(match el.value().name() {
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Block::Heading(text),
                "blockquote" => Block::Quote(text),
                "li" => Block::ListItem(text),
                _ => Block::Paragraph(text),
            })
        })
        .collect();

    if blocks.is_empty() {
        let text = element_text(fragment.root_element());
        if !text.is_empty() {
            blocks.push(Block::Paragraph(text));
        }
    }
    blocks
}

/// Words across all blocks.
pub fn word_count(blocks: &[Block]) -> usize {
    blocks
        .iter()
        .map(|b| b.text().split_whitespace().count())
        .sum()
}

/// Minutes to read `words` words; never less than one.
pub fn read_time_minutes(words: usize) -> usize {
    (words / WORDS_PER_MINUTE).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracts_paragraphs_and_headings() {
        let html = concat!(
            "<h2>Markets</h2><p>Chips   are <b>up</b>.</p>",
            "<p>\n</p><blockquote>Quote</blockquote>",
        );
        assert_eq!(
            extract_blocks(html),
            vec![
                Block::Heading("Markets".into()),
                Block::Paragraph("Chips are up.".into()),
                Block::Quote("Quote".into()),
            ]
        );
    }

    #[test]
    fn test_nested_blocks_are_not_duplicated() {
        let html = "<ul><li><p>One</p></li><li>Two</li></ul>";
        assert_eq!(
            extract_blocks(html),
            vec![Block::ListItem("One".into()), Block::ListItem("Two".into())]
        );
    }

    #[test]
    fn test_plain_text_falls_back_to_one_paragraph() {
        assert_eq!(
            extract_blocks("Just <em>some</em> text"),
            vec![Block::Paragraph("Just some text".into())]
        );
    }

    #[test]
    fn test_empty_body() {
        assert!(extract_blocks("").is_empty());
        assert!(extract_blocks("   ").is_empty());
    }

    #[test]
    fn test_control_chars_removed() {
        let blocks = extract_blocks("<p>safe\x1b[31m text</p>");
        assert_eq!(blocks, vec![Block::Paragraph("safe text".into())]);
    }

    #[test]
    fn test_read_time() {
        assert_eq!(read_time_minutes(0), 1);
        assert_eq!(read_time_minutes(199), 1);
        assert_eq!(read_time_minutes(450), 2);
        let blocks = vec![Block::Paragraph("one two three".into())];
        assert_eq!(word_count(&blocks), 3);
    }
}
