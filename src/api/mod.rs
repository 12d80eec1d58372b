//! xkcd and What If? clients: endpoints, the fetch seam, and shared JSON helpers.

mod client;
mod error;

pub mod comic;
pub mod whatif;

pub use client::{HttpClient, HttpClientBuilder};
pub use error::XkcdError;

use serde::Deserialize;
use serde_json::Value;

/// Retrieve the bytes behind a URL. Fails on network or HTTP error.
///
/// [HttpClient] is the real implementation; tests substitute an in-memory one.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, XkcdError>;
}

/// Client for comics and What If? articles. Generic over the fetch seam.
#[derive(Debug, Clone)]
pub struct XkcdClient<F = HttpClient> {
    fetcher: F,
    endpoints: Endpoints,
}

impl XkcdClient<HttpClient> {
    /// Client over a default [HttpClient] and the live site URLs.
    pub fn new() -> Result<Self, XkcdError> {
        let http = HttpClient::new().map_err(|e| XkcdError::Client { source: e })?;
        Ok(Self::with_fetcher(http, Endpoints::default()))
    }
}

impl<F: Fetch> XkcdClient<F> {
    pub fn with_fetcher(fetcher: F, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

/// Site URLs and archive markers. Defaults point at the live sites.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Endpoints {
    /// Comic page URL is this followed by the number.
    pub comic_base: String,
    /// Host prefix stripped from image URLs to get the image name.
    pub image_prefix: String,
    pub explain_base: String,
    pub whatif_archive: String,
    /// Scheme-relative prefix of archive links, stripped before parsing the number.
    pub whatif_href_prefix: String,
    /// Scheme prepended to scheme-relative archive links.
    pub whatif_scheme: String,
    pub archive_container_tag: String,
    pub archive_container_attr: String,
    pub archive_container_value: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            comic_base: "https://xkcd.com/".to_string(),
            image_prefix: "https://imgs.xkcd.com/comics/".to_string(),
            explain_base: "https://www.explainxkcd.com/wiki/index.php/".to_string(),
            whatif_archive: "https://what-if.xkcd.com/archive/".to_string(),
            whatif_href_prefix: "//what-if.xkcd.com/".to_string(),
            whatif_scheme: "https:".to_string(),
            archive_container_tag: "div".to_string(),
            archive_container_attr: "class".to_string(),
            archive_container_value: "archive-entry".to_string(),
        }
    }
}

impl Endpoints {
    pub fn comic_url(&self, number: i64) -> String {
        format!("{}{}", self.comic_base, number)
    }

    pub fn comic_json_url(&self, number: i64) -> String {
        format!("{}/info.0.json", self.comic_url(number))
    }

    pub fn latest_json_url(&self) -> String {
        format!("{}info.0.json", self.comic_base)
    }

    pub fn explain_url(&self, number: i64) -> String {
        format!("{}{}", self.explain_base, number)
    }
}

/// Parse a user-supplied comic or article number. Surrounding whitespace is ignored.
pub fn parse_number(input: &str) -> Result<i64, XkcdError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|e| XkcdError::Validation {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

pub(crate) fn fetch_json(fetcher: &dyn Fetch, url: &str) -> Result<Value, XkcdError> {
    let bytes = fetcher.fetch(url)?;
    serde_json::from_slice(&bytes).map_err(|e| XkcdError::Decode {
        url: url.to_string(),
        source: e,
    })
}

pub(crate) fn str_field(value: &Value, url: &str, key: &str) -> Result<String, XkcdError> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| missing(url, key))
}

/// Integer field; the comic JSON carries dates as strings, so numeric strings are accepted.
pub(crate) fn int_field(value: &Value, url: &str, key: &str) -> Result<i64, XkcdError> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| missing(url, key)),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| missing(url, key)),
        _ => Err(missing(url, key)),
    }
}

fn missing(url: &str, key: &str) -> XkcdError {
    XkcdError::MissingField {
        url: url.to_string(),
        field: key.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::FixtureFetcher;
    use super::*;

    #[test]
    fn default_urls() {
        let e = Endpoints::default();
        assert_eq!(e.comic_url(869), "https://xkcd.com/869");
        assert_eq!(e.comic_json_url(869), "https://xkcd.com/869/info.0.json");
        assert_eq!(e.latest_json_url(), "https://xkcd.com/info.0.json");
        assert_eq!(
            e.explain_url(869),
            "https://www.explainxkcd.com/wiki/index.php/869"
        );
    }

    #[test]
    fn parse_number_accepts_numeric_strings() -> Result<(), XkcdError> {
        assert_eq!(parse_number("869")?, 869);
        assert_eq!(parse_number(" 42 ")?, 42);
        assert_eq!(parse_number("-100")?, -100);
        Ok(())
    }

    #[test]
    fn parse_number_rejects_non_numeric() -> Result<(), String> {
        match parse_number("eight") {
            Err(XkcdError::Validation { input, .. }) if input == "eight" => Ok(()),
            other => Err(format!("expected Validation, got {:?}", other)),
        }
    }

    #[test]
    fn int_field_accepts_numbers_and_numeric_strings() -> Result<(), XkcdError> {
        let v: Value = serde_json::json!({"num": 869, "day": "1", "bad": "x"});
        assert_eq!(int_field(&v, "u", "num")?, 869);
        assert_eq!(int_field(&v, "u", "day")?, 1);
        assert!(int_field(&v, "u", "bad").is_err());
        assert!(int_field(&v, "u", "absent").is_err());
        Ok(())
    }

    #[test]
    fn fetch_json_reports_malformed_body_as_decode_error() {
        let fetcher = FixtureFetcher::new().with("https://x/info.0.json", "{not json");
        let err = fetch_json(&fetcher, "https://x/info.0.json").unwrap_err();
        assert!(err.is_decode());
        assert!(!err.is_fetch());
    }

    #[test]
    fn fetch_json_propagates_fetch_error() {
        let fetcher = FixtureFetcher::new();
        let err = fetch_json(&fetcher, "https://x/missing").unwrap_err();
        assert!(err.is_fetch());
    }
}
