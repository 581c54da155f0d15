//! HTTP client construction and anti-detection request shaping.

use std::time::Duration;

use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT};
use reqwest::{Client, Proxy};
use thiserror::Error;

use storescout_core::ProxyConfig;

/// Desktop browser user agents, one drawn at random per request so request
/// fingerprints do not correlate across the run.
pub(crate) const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
];

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Builds the shared reqwest client: request timeout from config, a short
/// connect timeout, cookies enabled (the marketplace sets session cookies on
/// the listing redirect), and an optional upstream proxy.
pub(crate) fn build_http_client(
    timeout_secs: u64,
    proxy: Option<&ProxyConfig>,
) -> Result<Client, ClientError> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .cookie_store(true);

    if let Some(cfg) = proxy {
        let mut upstream = Proxy::all(format!("http://{}:{}", cfg.host, cfg.port))?;
        if let (Some(user), Some(pass)) = (cfg.user.as_deref(), cfg.pass.as_deref()) {
            upstream = upstream.basic_auth(user, pass);
        }
        builder = builder.proxy(upstream);
    }

    Ok(builder.build()?)
}

/// Browser-shaped headers for one request, with a user agent drawn from the pool.
pub(crate) fn browser_headers() -> HeaderMap {
    let user_agent = USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0]);

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(user_agent));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_carry_a_pool_user_agent() {
        let headers = browser_headers();
        let ua = headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(USER_AGENTS.contains(&ua));
        assert!(headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .starts_with("pt-BR"));
    }

    #[test]
    fn client_builds_without_proxy() {
        assert!(build_http_client(5, None).is_ok());
    }

    #[test]
    fn client_builds_with_authenticated_proxy() {
        let proxy = ProxyConfig {
            host: "p.example.io".to_string(),
            port: 80,
            user: Some("scout".to_string()),
            pass: Some("secret".to_string()),
        };
        assert!(build_http_client(5, Some(&proxy)).is_ok());
    }
}
