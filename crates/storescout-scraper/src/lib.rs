//! MercadoLivre extraction boundary: HTTP fetch + HTML extraction.
//!
//! Implements [`PageSource`] over plain HTTP with browser-shaped headers.
//! The crawler owns retries-never/drop-on-failure semantics, so every
//! failure here is surfaced as a single [`SourceError::Navigation`].

mod client;
mod search;
mod seller;

pub use client::ClientError;
pub use search::parse_product_refs;
pub use seller::parse_seller;

use storescout_core::{PageSource, ProxyConfig, SearchPage, SellerCandidate, SourceError};

pub struct MercadoLivreSource {
    client: reqwest::Client,
}

impl MercadoLivreSource {
    /// Builds the source with the configured request timeout and optional proxy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g. invalid proxy or TLS config).
    pub fn new(timeout_secs: u64, proxy: Option<&ProxyConfig>) -> Result<Self, ClientError> {
        let client = client::build_http_client(timeout_secs, proxy)?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns `(final_url, body)`. The final URL reflects
    /// redirects — the marketplace rewrites seed searches into
    /// category-qualified listing URLs.
    async fn fetch_html(&self, url: &str) -> Result<(String, String), SourceError> {
        let navigation = |reason: String| SourceError::Navigation {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .headers(client::browser_headers())
            .send()
            .await
            .map_err(|e| navigation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(navigation(format!("unexpected HTTP status {status}")));
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| navigation(e.to_string()))?;

        Ok((final_url, body))
    }
}

impl PageSource for MercadoLivreSource {
    async fn search_page(&self, url: &str) -> Result<SearchPage, SourceError> {
        let (final_url, body) = self.fetch_html(url).await?;
        let products = search::parse_product_refs(&body);
        tracing::debug!(url, %final_url, products = products.len(), "search page fetched");
        Ok(SearchPage {
            final_url,
            products,
        })
    }

    async fn seller_page(&self, url: &str) -> Result<SellerCandidate, SourceError> {
        let (_, body) = self.fetch_html(url).await?;
        let candidate = seller::parse_seller(&body);
        tracing::debug!(
            url,
            name = candidate.name.as_deref().unwrap_or("<none>"),
            sales = candidate.sales_count,
            mercado_lider = candidate.mercado_lider,
            green = candidate.green_reputation,
            "seller page fetched"
        );
        Ok(candidate)
    }
}
