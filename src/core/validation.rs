//! URL validation utilities
//!
//! Provides validation for user inputs:
//! - URL shape validation (scheme prefix, length, parseability)
//! - Platform allow-list (whitelist-based, subdomains included)

use thiserror::Error;
use url::Url;

use crate::core::config;

/// Validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Text is not an http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL is longer than the accepted maximum
    #[error("URL too long: {0} characters")]
    UrlTooLong(usize),

    /// Host is not on the allow-list
    #[error("Unsupported host: {0}")]
    UnsupportedHost(String),
}

/// A video platform accepted by the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Human-readable name shown to users
    pub name: String,
    /// Registrable domains; subdomains of each are accepted too
    pub domains: Vec<String>,
}

impl Platform {
    pub fn new(name: &str, domains: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            domains: domains.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Builds one platform per domain from a comma-separated list
    /// (`ALLOWED_DOMAINS=vimeo.com,example.org`). The domain doubles as the name.
    pub fn from_domain_list(raw: &str) -> Vec<Self> {
        raw.split([',', ' ', '\n', '\t'])
            .map(|part| part.trim().trim_start_matches("www.").to_lowercase())
            .filter(|part| !part.is_empty())
            .map(|domain| Self {
                name: domain.clone(),
                domains: vec![domain],
            })
            .collect()
    }

    /// Whether `host` is one of this platform's domains or a subdomain of one.
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_lowercase();
        self.domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
    }
}

/// The built-in allow-list of video platforms.
pub fn default_platforms() -> Vec<Platform> {
    vec![
        Platform::new("YouTube", &["youtube.com", "youtu.be", "youtube-nocookie.com"]),
        Platform::new("Vimeo", &["vimeo.com"]),
        Platform::new("Dailymotion", &["dailymotion.com", "dai.ly"]),
        Platform::new("TikTok", &["tiktok.com"]),
        Platform::new("Instagram", &["instagram.com"]),
        Platform::new("Twitter / X", &["twitter.com", "x.com"]),
        Platform::new("Facebook", &["facebook.com", "fb.watch"]),
        Platform::new("Twitch", &["twitch.tv"]),
        Platform::new("Reddit", &["reddit.com", "redd.it"]),
    ]
}

/// Validates that `text` is an http(s) URL and parses it.
///
/// The text must literally start with `http://` or `https://` (after trimming
/// surrounding whitespace); anything else is rejected before parsing.
///
/// # Examples
/// ```
/// use vidgrab::core::validation::validate_url;
///
/// assert!(validate_url("https://youtube.com/watch?v=dQw4w9WgXcQ").is_ok());
/// assert!(validate_url("  http://vimeo.com/1  ").is_ok());
/// assert!(validate_url("hello").is_err());
/// assert!(validate_url("ftp://youtube.com/video").is_err());
/// ```
pub fn validate_url(text: &str) -> Result<Url, ValidationError> {
    let text = text.trim();

    if !(text.starts_with("http://") || text.starts_with("https://")) {
        return Err(ValidationError::InvalidUrl(text.to_string()));
    }

    let length = text.chars().count();
    if length > config::validation::MAX_URL_LENGTH {
        return Err(ValidationError::UrlTooLong(length));
    }

    let url = Url::parse(text).map_err(|_| ValidationError::InvalidUrl(text.to_string()))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::InvalidUrl(format!("{} (no host)", text)));
    }

    Ok(url)
}

/// Checks the URL host against the allow-list. `None` accepts every host.
///
/// Returns the matched platform, if any.
pub fn check_allowed_host<'a>(
    url: &Url,
    platforms: Option<&'a [Platform]>,
) -> Result<Option<&'a Platform>, ValidationError> {
    let Some(platforms) = platforms else {
        return Ok(None);
    };

    let host = url.host_str().unwrap_or_default();
    platforms
        .iter()
        .find(|p| p.matches_host(host))
        .map(Some)
        .ok_or_else(|| ValidationError::UnsupportedHost(host.to_string()))
}
