//! Product-reference extraction from search-result pages.
//!
//! The marketplace renders results as cards; each card links to a product
//! page whose URL embeds an `MLB` listing id. Sponsored placements route
//! through click-tracking hosts and are skipped — their ids do not resolve
//! on the product host.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use storescout_core::ProductRef;

static PRODUCT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"MLB-?(\d+)").expect("product id regex"));

static RESULT_CARDS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".ui-search-result__wrapper, .ui-search-layout__item")
        .expect("result card selector")
});

static ANY_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector"));

const TRACKING_MARKERS: [&str; 4] = ["click1.mercadolivre", "/clicks/", "/count", "mclics"];

/// Extracts the finite, de-duplicated product list from a result page.
///
/// Primary path walks the result cards; when no card yields a product (the
/// marketplace periodically reshuffles card class names) every anchor in the
/// document is scanned instead.
#[must_use]
pub fn parse_product_refs(html: &str) -> Vec<ProductRef> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut products = Vec::new();

    for card in document.select(&RESULT_CARDS) {
        for anchor in card.select(&ANY_ANCHOR) {
            if let Some(href) = anchor.value().attr("href") {
                push_product(href, &mut seen, &mut products);
            }
        }
    }

    if products.is_empty() {
        for anchor in document.select(&ANY_ANCHOR) {
            if let Some(href) = anchor.value().attr("href") {
                push_product(href, &mut seen, &mut products);
            }
        }
    }

    products
}

fn push_product(href: &str, seen: &mut HashSet<String>, products: &mut Vec<ProductRef>) {
    if !href.contains("/MLB") && !href.contains("MLB-") {
        return;
    }
    if TRACKING_MARKERS.iter().any(|marker| href.contains(marker)) {
        return;
    }
    let Some(id) = PRODUCT_ID
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
    else {
        return;
    };
    if !seen.insert(id.clone()) {
        return;
    }
    products.push(ProductRef {
        url: format!("https://produto.mercadolivre.com.br/MLB-{id}"),
        id,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_products_from_result_cards() {
        let html = r#"
            <div class="ui-search-result__wrapper">
              <a href="https://produto.mercadolivre.com.br/MLB-123456789-bolsa">x</a>
            </div>
            <div class="ui-search-layout__item">
              <a href="https://www.mercadolivre.com.br/MLB987654321?src=search">y</a>
            </div>
        "#;
        let products = parse_product_refs(html);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "123456789");
        assert_eq!(
            products[0].url,
            "https://produto.mercadolivre.com.br/MLB-123456789"
        );
        assert_eq!(products[1].id, "987654321");
    }

    #[test]
    fn skips_tracking_links() {
        let html = r#"
            <div class="ui-search-result__wrapper">
              <a href="https://click1.mercadolivre.com.br/MLB-111?x">tracked</a>
              <a href="https://www.mercadolivre.com.br/clicks/MLB-222">tracked</a>
            </div>
        "#;
        assert!(parse_product_refs(html).is_empty());
    }

    #[test]
    fn dedupes_repeated_ids_within_a_page() {
        let html = r#"
            <div class="ui-search-result__wrapper">
              <a href="https://produto.mercadolivre.com.br/MLB-333">a</a>
              <a href="https://produto.mercadolivre.com.br/MLB-333?variant=2">b</a>
            </div>
        "#;
        assert_eq!(parse_product_refs(html).len(), 1);
    }

    #[test]
    fn falls_back_to_document_anchors_when_no_card_matches() {
        let html = r#"
            <main>
              <a href="https://produto.mercadolivre.com.br/MLB-444">plain link</a>
            </main>
        "#;
        let products = parse_product_refs(html);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "444");
    }

    #[test]
    fn empty_page_yields_empty_list() {
        assert!(parse_product_refs("<html><body></body></html>").is_empty());
    }
}
