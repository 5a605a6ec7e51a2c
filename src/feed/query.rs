//! Location strings and the navigation query they resolve to.
//!
//! A location looks like a URL path plus query (`/tech?page=2`,
//! `/?q=ai&page=3`, `/article/some-slug`). It is the only navigation state
//! the client keeps: everything the feed view shows is derived from it.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::BTreeMap;
use std::fmt;
use url::form_urlencoded;

/// Bytes escaped when a route segment is written back into a path.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// One raw query value. A key repeated in the query string becomes `Multi`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    Multi(Vec<String>),
}

impl ParamValue {
    /// The value, only when it appeared exactly once.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ParamValue::Single(v) => Some(v),
            ParamValue::Multi(_) => None,
        }
    }

    /// Every value in order of appearance.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            ParamValue::Single(v) => std::slice::from_ref(v),
            ParamValue::Multi(vs) => vs,
        };
        slice.iter().map(String::as_str)
    }

    fn push(&mut self, value: String) {
        match self {
            ParamValue::Single(first) => {
                let first = std::mem::take(first);
                *self = ParamValue::Multi(vec![first, value]);
            }
            ParamValue::Multi(vs) => vs.push(value),
        }
    }
}

/// Query parameters keyed by name. Sorted so that rebuilt locations are stable.
pub type RawParams = BTreeMap<String, ParamValue>;

/// Decode a form-urlencoded query string (without the leading `?`).
pub fn parse_query_string(query: &str) -> RawParams {
    let mut params = RawParams::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key.is_empty() {
            continue;
        }
        match params.get_mut(key.as_ref()) {
            Some(existing) => existing.push(value.into_owned()),
            None => {
                params.insert(key.into_owned(), ParamValue::Single(value.into_owned()));
            }
        }
    }
    params
}

/// Serialize `params` in key order, skipping `except`. Multi-valued keys
/// emit every value.
pub(crate) fn append_params(
    serializer: &mut form_urlencoded::Serializer<'_, String>,
    params: &RawParams,
    except: Option<&str>,
) {
    for (key, value) in params {
        if Some(key.as_str()) == except {
            continue;
        }
        for v in value.values() {
            serializer.append_pair(key, v);
        }
    }
}

/// Which view a location addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: the front page, optionally filtered by `q`.
    Home,
    /// `/{segment}`: one category, segment kept verbatim.
    Category(String),
    /// `/article/{slug}`
    Article(String),
}

impl Route {
    /// Category filter carried by the route, if any.
    pub fn category(&self) -> Option<&str> {
        match self {
            Route::Category(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_feed(&self) -> bool {
        !matches!(self, Route::Article(_))
    }
}

/// A parsed location: route plus raw query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    pub params: RawParams,
}

impl Default for Location {
    fn default() -> Self {
        Self::home()
    }
}

impl Location {
    pub fn home() -> Self {
        Self {
            route: Route::Home,
            params: RawParams::new(),
        }
    }

    /// `/?q=<query>`, with no page so results start at page 1.
    pub fn search(query: &str) -> Self {
        let mut params = RawParams::new();
        params.insert("q".to_string(), ParamValue::Single(query.to_string()));
        Self {
            route: Route::Home,
            params,
        }
    }

    pub fn article(slug: &str) -> Self {
        Self {
            route: Route::Article(slug.to_string()),
            params: RawParams::new(),
        }
    }

    /// Parse a location string. Never fails: anything that is not a known
    /// route shape becomes the bare home location.
    ///
    /// Full URLs (`https://host/tech?page=2`) are accepted and reduced to
    /// their path and query. Fragments are dropped.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        let (path, query) = if input.contains("://") {
            match url::Url::parse(input) {
                Ok(parsed) => (
                    parsed.path().to_string(),
                    parsed.query().unwrap_or_default().to_string(),
                ),
                Err(_) => return Self::home(),
            }
        } else {
            let without_fragment = input.split('#').next().unwrap_or_default();
            match without_fragment.split_once('?') {
                Some((p, q)) => (p.to_string(), q.to_string()),
                None => (without_fragment.to_string(), String::new()),
            }
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Route::Home,
            ["article", slug] => Route::Article(decode_segment(slug)),
            [segment] if *segment != "article" => Route::Category(decode_segment(segment)),
            _ => {
                tracing::debug!(location = %input, "Unrecognized location, using home");
                return Self::home();
            }
        };

        Self {
            route,
            params: parse_query_string(&query),
        }
    }

    /// Path part without the query (`/`, `/tech`, `/article/x`), with the
    /// route segment percent-encoded.
    pub fn base_path(&self) -> String {
        match &self.route {
            Route::Home => "/".to_string(),
            Route::Category(c) => format!("/{}", encode_segment(c)),
            Route::Article(slug) => format!("/article/{}", encode_segment(slug)),
        }
    }

    /// Encoded query string without the leading `?`; empty when there are
    /// no parameters.
    pub fn query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        append_params(&mut serializer, &self.params, None);
        serializer.finish()
    }

    /// Resolve into the typed query that drives fetching and layout.
    pub fn navigation_query(&self) -> NavigationQuery {
        resolve(self.route.category(), &self.params)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self.query();
        if query.is_empty() {
            write!(f, "{}", self.base_path())
        } else {
            write!(f, "{}?{}", self.base_path(), query)
        }
    }
}

/// Typed navigation state. `page` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub page: u32,
}

impl Default for NavigationQuery {
    fn default() -> Self {
        Self {
            category: None,
            q: None,
            page: 1,
        }
    }
}

impl NavigationQuery {
    /// Search term worth highlighting or sending: present and not blank.
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.trim().is_empty())
    }
}

/// Resolve raw route and query values into a [`NavigationQuery`].
///
/// `page` takes the leading integer of the value (`"3abc"` is 3, `"2.5"` is
/// 2) and falls back to 1 when missing, repeated, without leading digits,
/// zero or out of range. `q`
/// is kept only when it appeared exactly once. `category` comes from the
/// route segment alone; a `category=` query key is left alone.
pub fn resolve(route_category: Option<&str>, params: &RawParams) -> NavigationQuery {
    let page = params
        .get("page")
        .and_then(ParamValue::as_single)
        .and_then(leading_integer)
        .filter(|&p| p >= 1)
        .unwrap_or(1);

    let q = params
        .get("q")
        .and_then(ParamValue::as_single)
        .map(str::to_string);

    NavigationQuery {
        category: route_category.map(str::to_string),
        q,
        page,
    }
}

/// Integer prefix of `raw` after trimming and an optional `+`.
fn leading_integer(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse().ok()
}
