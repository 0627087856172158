//! Search API Page Fetcher
//!
//! One blocking GET per page, no retries, no caching. The `PageSource`
//! trait is what the collector walks, so tests can script pages.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use serde_json::Value;
use tracing::debug;

use crate::error::{RankingsError, Result};
use crate::settings::Settings;

/// Browser headers the listing endpoint expects. Compression is negotiated
/// by reqwest itself so `accept-encoding` is left out.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("sec-ch-ua", "\" Not A;Brand\";v=\"99\", \"Chromium\";v=\"101\", \"Google Chrome\";v=\"101\""),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
];

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/101.0.4951.54 Safari/537.36";

/// Anything that can hand back one decoded search page
pub trait PageSource {
    fn fetch_page(&self, page: u32) -> Result<Value>;
}

pub struct RankingsClient {
    http: Client,
    endpoint: String,
    program: String,
    specialty: String,
}

impl RankingsClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut builder = Client::builder().default_headers(browser_headers());
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(RankingsError::Client)?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            program: settings.program.clone(),
            specialty: settings.specialty.clone(),
        })
    }
}

impl PageSource for RankingsClient {
    fn fetch_page(&self, page: u32) -> Result<Value> {
        if page == 0 {
            return Err(RankingsError::InvalidPage(page));
        }
        debug!(page, endpoint = %self.endpoint, "fetching rankings page");

        let page_param = page.to_string();
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("program", self.program.as_str()),
                ("specialty", self.specialty.as_str()),
                ("_page", page_param.as_str()),
            ])
            .send()
            .map_err(|source| RankingsError::Network { page, source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RankingsError::HttpStatus {
                page,
                status: status.as_u16(),
            });
        }

        resp.json::<Value>()
            .map_err(|source| RankingsError::Decode { page, source })
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    for &(name, value) in BROWSER_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_headers_complete() {
        let headers = browser_headers();
        assert_eq!(headers.len(), BROWSER_HEADERS.len() + 3);
        assert_eq!(headers.get("sec-fetch-mode").unwrap(), "navigate");
        assert!(headers.get(USER_AGENT).unwrap().to_str().unwrap().contains("Chrome/101"));
    }

    #[test]
    fn test_page_zero_rejected() {
        let client = RankingsClient::new(&Settings::default()).unwrap();
        assert!(matches!(client.fetch_page(0), Err(RankingsError::InvalidPage(0))));
    }
}
