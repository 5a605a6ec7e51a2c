//! Page boundaries and the locations of neighbouring pages.

use super::query::{append_params, RawParams};
use url::form_urlencoded;

/// Whether a page after `page` exists given `total` results overall.
pub fn has_next(page: u32, page_size: u32, total: u64) -> bool {
    u64::from(page) * u64::from(page_size) < total
}

pub fn has_prev(page: u32) -> bool {
    page > 1
}

/// Location of `target_page`, keeping every other parameter.
///
/// Existing keys come first in key order, multi-valued keys keep all of
/// their values, and `page` is appended once at the end. `target_page` is
/// not clamped.
pub fn build_page_url(base_url: &str, target_page: u32, params: &RawParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    append_params(&mut serializer, params, Some("page"));
    serializer.append_pair("page", &target_page.to_string());
    format!("{}?{}", base_url, serializer.finish())
}

/// Previous/next targets for the pagination footer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageNav {
    pub current: u32,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl PageNav {
    pub fn new(base_url: &str, page: u32, page_size: u32, total: u64, params: &RawParams) -> Self {
        let prev = has_prev(page).then(|| build_page_url(base_url, page - 1, params));
        let next = has_next(page, page_size, total)
            .then(|| build_page_url(base_url, page.saturating_add(1), params));
        Self {
            current: page,
            prev,
            next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::query::parse_query_string;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_has_next_boundaries() {
        assert!(has_next(1, 20, 25));
        assert!(!has_next(2, 20, 25));
        assert!(!has_next(1, 20, 20));
        assert!(!has_next(1, 20, 0));
        assert!(has_next(2, 20, 47));
        assert!(!has_next(3, 20, 47));
    }

    #[test]
    fn test_has_next_does_not_overflow() {
        assert!(!has_next(u32::MAX, u32::MAX, 0));
        assert!(has_next(u32::MAX, 2, u64::MAX));
    }

    #[test]
    fn test_has_prev() {
        assert!(!has_prev(1));
        assert!(has_prev(2));
    }

    #[test]
    fn test_build_page_url_replaces_page_once() {
        let params = parse_query_string("q=ai&page=2&sort=new");
        assert_eq!(build_page_url("/", 3, &params), "/?q=ai&sort=new&page=3");
    }

    #[test]
    fn test_build_page_url_keeps_repeated_keys() {
        let params = parse_query_string("tag=a&tag=b");
        assert_eq!(build_page_url("/tech", 2, &params), "/tech?tag=a&tag=b&page=2");
    }

    #[test]
    fn test_build_page_url_encodes_values() {
        let params = parse_query_string("q=rust+%26+go");
        assert_eq!(build_page_url("/", 2, &params), "/?q=rust+%26+go&page=2");
    }

    #[test]
    fn test_page_nav_middle_page() {
        let params = parse_query_string("page=2");
        let nav = PageNav::new("/", 2, 20, 47, &params);
        assert_eq!(nav.prev.as_deref(), Some("/?page=1"));
        assert_eq!(nav.next.as_deref(), Some("/?page=3"));
    }

    #[test]
    fn test_page_nav_first_and_last() {
        let nav = PageNav::new("/", 1, 20, 20, &RawParams::new());
        assert_eq!(nav, PageNav { current: 1, prev: None, next: None });
    }

    proptest! {
        #[test]
        fn prop_page_appears_once(target in 0u32..10_000, existing in 0u32..100) {
            let params = parse_query_string(&format!("page={existing}&x=1"));
            let url = build_page_url("/", target, &params);
            let query = url.split_once('?').map(|(_, q)| q).unwrap_or_default();
            let pages: Vec<_> = form_urlencoded::parse(query.as_bytes())
                .filter(|(k, _)| k == "page")
                .collect();
            prop_assert_eq!(pages.len(), 1);
            prop_assert_eq!(pages[0].1.as_ref(), target.to_string());
        }

        #[test]
        fn prop_has_next_matches_last_page(total in 0u64..10_000, size in 1u32..50) {
            let last_page = total.div_ceil(u64::from(size)).max(1) as u32;
            prop_assert!(!has_next(last_page, size, total));
            if last_page > 1 {
                prop_assert!(has_next(last_page - 1, size, total));
            }
        }
    }
}
