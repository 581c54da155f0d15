/// Upstream HTTP proxy for marketplace requests.
///
/// Credentials are optional; some providers authenticate by source IP.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub pass: Option<String>,
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    /// Search term used to build the seed URL and recorded on every saved row.
    pub search_term: String,
    /// Free-form category label stamped on saved rows (not the marketplace category).
    pub category_label: String,
    /// Success stop: abort the run once this many storefronts are saved.
    pub target_stores: usize,
    pub min_sales: u64,
    pub require_green_reputation: bool,
    /// Stall stop: abort after this many consecutive zero-product result pages.
    pub empty_page_threshold: u32,
    pub max_concurrency: usize,
    pub request_timeout_secs: u64,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    pub proxy: Option<ProxyConfig>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("search_term", &self.search_term)
            .field("category_label", &self.category_label)
            .field("target_stores", &self.target_stores)
            .field("min_sales", &self.min_sales)
            .field("require_green_reputation", &self.require_green_reputation)
            .field("empty_page_threshold", &self.empty_page_threshold)
            .field("max_concurrency", &self.max_concurrency)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("delay_min_ms", &self.delay_min_ms)
            .field("delay_max_ms", &self.delay_max_ms)
            .field("proxy", &self.proxy)
            .finish()
    }
}
