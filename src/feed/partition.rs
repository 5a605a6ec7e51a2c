//! Positional layout of one fetched page into hero, carousel, featured and
//! list zones.

use super::types::{Article, FeedPage};
use serde::{Deserialize, Serialize};

/// Maximum number of slides in the hero carousel, and the end of the
/// featured grid in [`HeroMode::FeaturedGrid`].
pub const CAROUSEL_SIZE: usize = 5;

/// How the top of page 1 is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroMode {
    /// One lead story, everything else in the list.
    Single,
    /// Up to five rotating slides.
    #[default]
    Carousel,
    /// One lead story followed by a grid of up to four.
    FeaturedGrid,
}

/// Borrowed view of a page split into zones. Every article of the page
/// lands in exactly one zone, in original order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partition<'a> {
    pub hero: Option<&'a Article>,
    pub carousel: &'a [Article],
    pub featured: &'a [Article],
    pub list: &'a [Article],
}

impl<'a> Partition<'a> {
    fn list_only(items: &'a [Article]) -> Self {
        Self {
            hero: None,
            carousel: &[],
            featured: &[],
            list: items,
        }
    }

    /// True when a hero zone (single story or carousel) was produced.
    pub fn has_hero(&self) -> bool {
        self.hero.is_some() || !self.carousel.is_empty()
    }
}

/// Split `page` for display. Only page 1 with at least one item gets a hero
/// zone; every other page is all list.
pub fn partition(page: &FeedPage, page_number: u32, mode: HeroMode) -> Partition<'_> {
    let items = page.items.as_slice();
    if page_number != 1 || items.is_empty() {
        return Partition::list_only(items);
    }

    let lead = CAROUSEL_SIZE.min(items.len());
    match mode {
        HeroMode::Single => Partition {
            hero: items.first(),
            carousel: &[],
            featured: &[],
            list: &items[1..],
        },
        HeroMode::Carousel => Partition {
            hero: None,
            carousel: &items[..lead],
            featured: &[],
            list: &items[lead..],
        },
        HeroMode::FeaturedGrid => Partition {
            hero: items.first(),
            carousel: &[],
            featured: &items[1..lead],
            list: &items[lead..],
        },
    }
}
