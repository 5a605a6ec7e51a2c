//! Feed composition and navigation state.
//!
//! - [`query`] parses location strings and resolves them into a
//!   [`NavigationQuery`]
//! - [`fetcher`] talks to the news backend and absorbs every failure
//! - [`partition`] lays one page out into hero, carousel, featured and list
//! - [`pagination`] computes page boundaries and neighbouring locations
//!
//! The flow for a feed location is resolve, fetch, partition, paginate.

mod fetcher;
pub mod pagination;
pub mod partition;
pub mod query;
mod types;

pub use fetcher::{FeedClient, FetchError};
pub use pagination::{build_page_url, has_next, has_prev, PageNav};
pub use partition::{partition, HeroMode, Partition, CAROUSEL_SIZE};
pub use query::{
    parse_query_string, resolve, Location, NavigationQuery, ParamValue, RawParams, Route,
};
pub use types::{Article, ArticleDetail, ArticleLink, FeedPage, Source, PAGE_SIZE};

#[cfg(test)]
pub(crate) use types::fixtures;
