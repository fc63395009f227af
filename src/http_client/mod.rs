//! HTTP client wrapper used for the index fetch and file transfers.

mod response;
mod user_agent;

pub use response::{HeadResponse, HttpResponse};
pub use user_agent::{resolve_user_agent, BROWSER_USER_AGENTS};

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;

/// HTTP client with a browser user agent and a fixed request timeout.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client.
    /// - `user_agent` None: impersonate a desktop browser
    /// - `user_agent` Some(custom): use the custom string
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> Result<Self, reqwest::Error> {
        let user_agent = resolve_user_agent(user_agent);
        let client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Make a GET request, returning the wrapped streaming response.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let headers = header_map(&response);

        Ok(HttpResponse {
            status: response.status(),
            headers,
            response,
        })
    }

    /// Get page content as text, failing on error statuses.
    pub async fn get_text(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.text().await
    }

    /// Make a HEAD request to check headers without downloading content.
    pub async fn head(&self, url: &str) -> Result<HeadResponse, reqwest::Error> {
        let response = self.client.head(url).send().await?;

        Ok(HeadResponse {
            status: response.status(),
            headers: header_map(&response),
        })
    }
}

/// Collect response headers into a lower-cased name map.
fn header_map(response: &reqwest::Response) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for (name, value) in response.headers() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.to_string(), v.to_string());
        }
    }
    headers
}
