//! Crawl requests, labels, and pagination-URL generation.

/// Base URL of the marketplace's search-listing host.
pub const LIST_BASE_URL: &str = "https://lista.mercadolivre.com.br/";

/// Number of additional result pages generated from the initial search.
///
/// This is a fixed lookahead, independent of how many results the landing
/// page returned; paged handlers never generate further pages themselves.
const PAGE_LOOKAHEAD: u32 = 3;

/// Results per page on the marketplace listing; drives the `_Desde_` offset.
const PAGE_SIZE: u32 = 50;

/// What a crawl request is expected to produce. Closed set: every request
/// is routed through an exhaustive match, so an unknown label cannot fall
/// through to a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestLabel {
    InitialSearch,
    PagedSearch,
    ProductDetail,
}

impl std::fmt::Display for RequestLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestLabel::InitialSearch => write!(f, "initial_search"),
            RequestLabel::PagedSearch => write!(f, "paged_search"),
            RequestLabel::ProductDetail => write!(f, "product_detail"),
        }
    }
}

/// Pagination context derived from the landing URL after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContext {
    /// Category path segments, empty when the marketplace did not
    /// categorize the search.
    pub category: String,
    /// Normalized search term (hyphenated slug).
    pub term: String,
}

/// One unit of crawl work. Immutable once enqueued.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub url: String,
    pub label: RequestLabel,
    /// Result-page index this request came from (0 for the landing page).
    pub page: u32,
    pub context: Option<SearchContext>,
}

impl CrawlRequest {
    #[must_use]
    pub fn initial(url: String) -> Self {
        Self {
            url,
            label: RequestLabel::InitialSearch,
            page: 1,
            context: None,
        }
    }

    #[must_use]
    pub fn product(url: String, page: u32) -> Self {
        Self {
            url,
            label: RequestLabel::ProductDetail,
            page,
            context: None,
        }
    }
}

/// Normalizes a search term into the marketplace's URL slug.
#[must_use]
pub fn slugify(term: &str) -> String {
    term.trim().replace(' ', "-").to_lowercase()
}

/// Builds the seed URL for a crawl run.
#[must_use]
pub fn seed_url(search_term: &str) -> String {
    format!("{LIST_BASE_URL}{}", slugify(search_term))
}

/// Derives the pagination context from the landing URL the marketplace
/// redirected to.
///
/// `lista.mercadolivre.com.br/<cat>/<sub>/<term>_<qualifiers>` yields
/// category `<cat>/<sub>` and term `<term>`; a single path segment means the
/// search was not categorized. A final URL off the listing host falls back
/// to the seed term with no category.
#[must_use]
pub fn parse_search_context(final_url: &str, seed_term: &str) -> SearchContext {
    let Some(path) = final_url.strip_prefix(LIST_BASE_URL) else {
        return SearchContext {
            category: String::new(),
            term: seed_term.to_string(),
        };
    };

    let segments: Vec<&str> = path.split('/').collect();
    let (category, last) = match segments.as_slice() {
        [] | [""] => {
            return SearchContext {
                category: String::new(),
                term: seed_term.to_string(),
            }
        }
        [only] => (String::new(), *only),
        [init @ .., last] => (init.join("/"), *last),
    };

    let term = last.split('_').next().unwrap_or_default();
    SearchContext {
        category,
        term: if term.is_empty() {
            seed_term.to_string()
        } else {
            term.to_string()
        },
    }
}

/// Generates the fixed 3-page lookahead: pages 2..=4 with `_Desde_` offsets
/// 51, 101, 151. Always exactly three requests, even when the landing page
/// had no results.
#[must_use]
pub fn paged_requests(context: &SearchContext) -> Vec<CrawlRequest> {
    (1..=PAGE_LOOKAHEAD)
        .map(|p| {
            let offset = p * PAGE_SIZE + 1;
            let url = if context.category.is_empty() {
                format!(
                    "{LIST_BASE_URL}{}_Desde_{offset}_NoIndex_True",
                    context.term
                )
            } else {
                format!(
                    "{LIST_BASE_URL}{}/{}_Desde_{offset}_NoIndex_True",
                    context.category, context.term
                )
            };
            CrawlRequest {
                url,
                label: RequestLabel::PagedSearch,
                page: p + 1,
                context: Some(context.clone()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_url_is_hyphenated_lowercase() {
        assert_eq!(
            seed_url("Kit Bolsa Maternidade"),
            "https://lista.mercadolivre.com.br/kit-bolsa-maternidade"
        );
    }

    #[test]
    fn context_from_categorized_landing_url() {
        let ctx = parse_search_context(
            "https://lista.mercadolivre.com.br/bebes/bolsas/kit-bolsa-maternidade_NoIndex_True",
            "kit-bolsa-maternidade",
        );
        assert_eq!(ctx.category, "bebes/bolsas");
        assert_eq!(ctx.term, "kit-bolsa-maternidade");
    }

    #[test]
    fn context_from_uncategorized_landing_url() {
        let ctx = parse_search_context(
            "https://lista.mercadolivre.com.br/kit-bolsa-maternidade_OrderId_PRICE",
            "kit-bolsa-maternidade",
        );
        assert_eq!(ctx.category, "");
        assert_eq!(ctx.term, "kit-bolsa-maternidade");
    }

    #[test]
    fn context_falls_back_to_seed_term_off_listing_host() {
        let ctx = parse_search_context("https://www.mercadolivre.com.br/ofertas", "kit-bolsa");
        assert_eq!(ctx.category, "");
        assert_eq!(ctx.term, "kit-bolsa");
    }

    #[test]
    fn lookahead_is_exactly_three_pages() {
        let ctx = SearchContext {
            category: "bebes".to_string(),
            term: "kit-bolsa".to_string(),
        };
        let requests = paged_requests(&ctx);
        assert_eq!(requests.len(), 3);
        let urls: Vec<&str> = requests.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://lista.mercadolivre.com.br/bebes/kit-bolsa_Desde_51_NoIndex_True",
                "https://lista.mercadolivre.com.br/bebes/kit-bolsa_Desde_101_NoIndex_True",
                "https://lista.mercadolivre.com.br/bebes/kit-bolsa_Desde_151_NoIndex_True",
            ]
        );
        let pages: Vec<u32> = requests.iter().map(|r| r.page).collect();
        assert_eq!(pages, vec![2, 3, 4]);
        assert!(requests
            .iter()
            .all(|r| r.label == RequestLabel::PagedSearch));
    }

    #[test]
    fn lookahead_without_category_omits_path_segment() {
        let ctx = SearchContext {
            category: String::new(),
            term: "kit-bolsa".to_string(),
        };
        let requests = paged_requests(&ctx);
        assert_eq!(
            requests[0].url,
            "https://lista.mercadolivre.com.br/kit-bolsa_Desde_51_NoIndex_True"
        );
    }
}
