use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
}

/// Check a URL taken from article data before handing it to the system
/// opener. Only absolute http(s) URLs with a host pass; anything else
/// (`file:`, `javascript:`, relative paths, strings that look like
/// command-line flags) is rejected.
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlValidationError::MissingHost),
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_article_links() {
        let url = validate_url_for_open("https://example.com/story?id=1").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert!(validate_url_for_open("http://news.example.org").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        for bad in ["file:///etc/passwd", "javascript:alert(1)", "ftp://example.com"] {
            assert!(
                matches!(validate_url_for_open(bad), Err(UrlValidationError::UnsupportedScheme(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_rejects_relative_and_flags() {
        assert!(validate_url_for_open("/article/x").is_err());
        assert!(validate_url_for_open("--help").is_err());
    }
}
