use super::types::{ArticleDetail, FeedPage, PAGE_SIZE};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Errors from a single request to the news backend.
///
/// These never reach the UI: [`FeedClient::fetch_page`] turns them into an
/// empty page and [`FeedClient::fetch_article`] into `None`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 5MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not the expected JSON shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// The API base could not be turned into a request URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Client for the listing and article-detail endpoints.
///
/// Cloning is cheap (`reqwest::Client` is reference counted), so background
/// tasks take their own copy.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    api_base: Url,
}

impl FeedClient {
    /// Build a client for `api_base` (e.g. `http://backend:8000`).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when the base is not an absolute
    /// http(s) URL.
    pub fn new(client: reqwest::Client, api_base: &str) -> Result<Self, FetchError> {
        let api_base = Url::parse(api_base.trim())
            .map_err(|e| FetchError::InvalidUrl(format!("{api_base}: {e}")))?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "{api_base}: scheme must be http or https"
            )));
        }
        Ok(Self { client, api_base })
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_str()
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        let base = self.api_base.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }

    /// `GET /api/news` URL for one page. Blank `q` and absent `category`
    /// are omitted.
    pub fn news_url(
        &self,
        category: Option<&str>,
        q: Option<&str>,
        page: u32,
    ) -> Result<Url, FetchError> {
        let mut url = self.endpoint("/api/news")?;
        let offset = u64::from(page.max(1) - 1) * u64::from(PAGE_SIZE);
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(category) = category {
                pairs.append_pair("category", category);
            }
            if let Some(q) = q.filter(|q| !q.is_empty()) {
                pairs.append_pair("q", q);
            }
            pairs.append_pair("limit", &PAGE_SIZE.to_string());
            pairs.append_pair("offset", &offset.to_string());
        }
        Ok(url)
    }

    /// `GET /api/articles/{slug}` URL; the slug is percent-encoded as one
    /// path segment.
    pub fn article_url(&self, slug: &str) -> Result<Url, FetchError> {
        let mut url = self.endpoint("/api/articles")?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.api_base.to_string()))?
            .push(slug);
        Ok(url)
    }

    /// Fetch one page of the listing.
    ///
    /// Never fails: any error is logged and yields [`FeedPage::empty`], so
    /// an unreachable backend looks the same as an empty result set.
    pub async fn fetch_page(&self, category: Option<&str>, q: Option<&str>, page: u32) -> FeedPage {
        match self.try_fetch_page(category, q, page).await {
            Ok(feed) => feed,
            Err(e) => {
                match &e {
                    FetchError::HttpStatus(status) => {
                        tracing::warn!(
                            status = *status,
                            page,
                            category = ?category,
                            "Failed to fetch feed page"
                        );
                    }
                    _ => tracing::warn!(
                        error = %e,
                        page,
                        category = ?category,
                        "Failed to fetch feed page"
                    ),
                }
                FeedPage::empty()
            }
        }
    }

    /// Like [`fetch_page`](Self::fetch_page) but surfaces the error.
    pub async fn try_fetch_page(
        &self,
        category: Option<&str>,
        q: Option<&str>,
        page: u32,
    ) -> Result<FeedPage, FetchError> {
        let url = self.news_url(category, q, page)?;
        let feed: FeedPage = self.get_json(url).await?;
        tracing::debug!(
            items = feed.items.len(),
            total = feed.total_count,
            page,
            "Fetched feed page"
        );
        Ok(feed)
    }

    /// Fetch the full article behind `slug`. Any failure, including 404,
    /// is `None`.
    pub async fn fetch_article(&self, slug: &str) -> Option<ArticleDetail> {
        let result = match self.article_url(slug) {
            Ok(url) => self.get_json(url).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(article) => Some(article),
            Err(FetchError::HttpStatus(status)) => {
                tracing::info!(slug, status, "Article not available");
                None
            }
            Err(e) => {
                tracing::warn!(slug, error = %e, "Failed to fetch article");
                None
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }
        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
