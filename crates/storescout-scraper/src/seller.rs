//! Seller-candidate extraction from product-detail pages.
//!
//! The marketplace renders sellers in two shapes: the e-shop card
//! (`ui-seller-data-*` classes) and the older classic layout (`_CustId_`
//! profile links, free-text sales). Every field falls back from the e-shop
//! shape to the classic one; anything still missing stays at its zero value.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use storescout_core::{CrossBorderReason, SellerCandidate};

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect(concat!("selector: ", $css)));
    };
}

selector!(ESHOP_TITLE, ".ui-seller-data-header__title");
selector!(ESHOP_LOGO_LINK, ".ui-seller-data-header__logo-container a");
selector!(ESHOP_FOOTER_LINK, ".ui-seller-data-footer__container a");
selector!(ESHOP_SUBTITLE, ".ui-seller-data-header__subtitle");
selector!(CUSTID_LINK, r#"a[href*="_CustId_"]"#);
selector!(PAGINA_LINK, r#"a[href*="/pagina/"]"#);
selector!(STATUS_INFO, ".ui-seller-data-status__info");
selector!(STATUS_INFO_SUBTITLE, ".ui-seller-data-status__info-subtitle");
selector!(STATUS_INFO_TITLE, ".ui-seller-data-status__info-title");
selector!(STATUS_TITLE, ".ui-seller-data-status__title");
selector!(CLASSIC_SELLER_INFO, ".ui-pdp-seller__header__info, .ui-box-component-seller-data");
selector!(GREEN_TEXT, ".ui-pdp-color--GREEN");
selector!(THERMOMETER_LEVEL_5, ".thermometer__level--5");
selector!(THERMOMETER_VALUE_5, r#".ui-seller-data-status__thermometer[value="5"]"#);
selector!(
    CBT_SUMMARY,
    r#"#cbt_summary, .ui-pdp-container__row--cbt-summary, [class*="cbt-summary"], [class*="cbt_summary"]"#
);

static CLASSIC_SALES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\+?\d+(?:[.,]\d+)?)\s*(mil)?\s*vendas?").expect("classic sales regex")
});

const NAME_PREFIXES: [&str; 5] = [
    "Vendido por ",
    "Vendido por: ",
    "Por ",
    "Loja oficial ",
    "Loja Oficial ",
];
const NAME_SUFFIXES: [&str; 3] = [" | Mercado Livre", " - Mercado Livre", " | MercadoLivre"];

/// Extracts a seller candidate from a product page.
///
/// Never fails: fields the page does not expose are left at their zero
/// value and surface later as a `missing-data` rejection.
#[must_use]
pub fn parse_seller(html: &str) -> SellerCandidate {
    let document = Html::parse_document(html);
    let mut candidate = SellerCandidate::default();

    candidate.name = document
        .select(&ESHOP_TITLE)
        .next()
        .and_then(|el| clean_name(&element_text(el)))
        .or_else(|| first_text(&document, &CUSTID_LINK).and_then(|t| clean_name(&t)))
        .or_else(|| first_text(&document, &PAGINA_LINK).and_then(|t| clean_name(&t)));

    candidate.profile_link = first_href(&document, &ESHOP_LOGO_LINK)
        .or_else(|| first_href(&document, &CUSTID_LINK))
        .or_else(|| first_href(&document, &ESHOP_FOOTER_LINK))
        .or_else(|| first_href(&document, &PAGINA_LINK));

    candidate.sales_count = eshop_sales(&document).unwrap_or_else(|| classic_sales(&document));

    if let Some(title) = first_text(&document, &STATUS_TITLE) {
        let lowered = title.to_lowercase();
        if lowered.contains("mercadolíder") || lowered.contains("mercadolider") {
            candidate.mercado_lider = true;
            candidate.reputation_tier = Some(title);
        }
    }

    candidate.green_reputation = candidate.mercado_lider
        || document.select(&GREEN_TEXT).next().is_some()
        || document.select(&THERMOMETER_LEVEL_5).next().is_some()
        || document.select(&THERMOMETER_VALUE_5).next().is_some();

    candidate.location = first_text(&document, &ESHOP_SUBTITLE).filter(|loc| !loc.is_empty());

    if let Some(summary) = first_text(&document, &CBT_SUMMARY) {
        if summary.to_lowercase().contains("compra internacional") {
            candidate.cross_border = Some(CrossBorderReason::InternationalPurchase);
        }
    }

    candidate
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

fn first_href(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string)
        .filter(|h| !h.is_empty())
}

/// Strips marketplace boilerplate from a scraped seller name.
fn clean_name(raw: &str) -> Option<String> {
    let mut name = raw.trim();
    for prefix in NAME_PREFIXES {
        if let Some(stripped) = name.strip_prefix(prefix) {
            name = stripped.trim();
        }
    }
    for suffix in NAME_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.trim();
        }
    }
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Sales from the e-shop status card: the info box whose subtitle mentions
/// "venda". `None` when the card is absent (classic layout).
fn eshop_sales(document: &Html) -> Option<u64> {
    for info in document.select(&STATUS_INFO) {
        let Some(subtitle) = info.select(&STATUS_INFO_SUBTITLE).next() else {
            continue;
        };
        if !element_text(subtitle).to_lowercase().contains("venda") {
            continue;
        }
        return info
            .select(&STATUS_INFO_TITLE)
            .next()
            .map(|title| parse_sales_figure(&element_text(title)));
    }
    None
}

/// Sales from classic-layout free text, e.g. "+5 mil vendas".
fn classic_sales(document: &Html) -> u64 {
    let Some(info) = document.select(&CLASSIC_SELLER_INFO).next() else {
        return 0;
    };
    let text = info.text().collect::<String>();
    let Some(caps) = CLASSIC_SALES.captures(&text) else {
        return 0;
    };
    let number: f64 = caps[1].replace('+', "").replace(',', ".").parse().unwrap_or(0.0);
    if caps.get(2).is_some() {
        round_to_u64(number * 1000.0)
    } else {
        round_to_u64(number)
    }
}

/// Parses a sales figure like "500", "+5 mil" or "2,5mil".
fn parse_sales_figure(text: &str) -> u64 {
    let lowered = text.trim().to_lowercase();
    if lowered.contains("mil") {
        let numeric: String = lowered
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
            .collect();
        let value: f64 = numeric.replace(',', ".").parse().unwrap_or(0.0);
        round_to_u64(value * 1000.0)
    } else {
        let digits: String = lowered.chars().filter(char::is_ascii_digit).collect();
        digits.parse().unwrap_or(0)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u64(value: f64) -> u64 {
    if value.is_sign_negative() {
        0
    } else {
        value.round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESHOP_PAGE: &str = r#"
        <div class="ui-seller-data">
          <div class="ui-seller-data-header__logo-container">
            <a href="https://www.mercadolivre.com.br/pagina/superloja">logo</a>
          </div>
          <h2 class="ui-seller-data-header__title">Loja oficial SuperLoja</h2>
          <p class="ui-seller-data-header__subtitle">São Paulo, SP</p>
          <div class="ui-seller-data-status__title">MercadoLíder Platinum</div>
          <div class="ui-seller-data-status__info">
            <span class="ui-seller-data-status__info-title">+5 mil</span>
            <span class="ui-seller-data-status__info-subtitle">Vendas concluídas</span>
          </div>
        </div>
    "#;

    #[test]
    fn extracts_eshop_seller_card() {
        let seller = parse_seller(ESHOP_PAGE);
        assert_eq!(seller.name.as_deref(), Some("SuperLoja"));
        assert_eq!(
            seller.profile_link.as_deref(),
            Some("https://www.mercadolivre.com.br/pagina/superloja")
        );
        assert_eq!(seller.sales_count, 5000);
        assert!(seller.mercado_lider);
        assert_eq!(seller.reputation_tier.as_deref(), Some("MercadoLíder Platinum"));
        // MercadoLíder implies green reputation even without a thermometer node.
        assert!(seller.green_reputation);
        assert_eq!(seller.location.as_deref(), Some("São Paulo, SP"));
        assert!(seller.cross_border.is_none());
    }

    #[test]
    fn extracts_classic_seller_layout() {
        let html = r#"
            <div class="ui-pdp-seller__header__info">
              <a href="https://www.mercadolivre.com.br/perfil/X_CustId_12345">Vendido por LojaClassica</a>
              +2,5 mil vendas
            </div>
            <div class="thermometer__level--5"></div>
        "#;
        let seller = parse_seller(html);
        assert_eq!(seller.name.as_deref(), Some("LojaClassica"));
        assert_eq!(
            seller.profile_link.as_deref(),
            Some("https://www.mercadolivre.com.br/perfil/X_CustId_12345")
        );
        assert_eq!(seller.sales_count, 2500);
        assert!(!seller.mercado_lider);
        assert!(seller.green_reputation);
    }

    #[test]
    fn classic_sales_without_mil_multiplier() {
        let html = r#"
            <div class="ui-box-component-seller-data">
              <a href="/pagina/loja-miuda">Loja Miuda</a>
              342 vendas
            </div>
        "#;
        let seller = parse_seller(html);
        assert_eq!(seller.sales_count, 342);
    }

    #[test]
    fn missing_card_yields_zero_values() {
        let seller = parse_seller("<html><body><p>sem vendedor</p></body></html>");
        assert!(seller.name.is_none());
        assert!(seller.profile_link.is_none());
        assert_eq!(seller.sales_count, 0);
        assert!(!seller.green_reputation);
        assert!(!seller.mercado_lider);
        assert!(seller.location.is_none());
        assert!(seller.cross_border.is_none());
    }

    #[test]
    fn flags_international_purchase_as_cross_border() {
        let html = r#"
            <div id="cbt_summary">Compra Internacional — chega em 30 dias</div>
            <h2 class="ui-seller-data-header__title">Global Stuff</h2>
        "#;
        let seller = parse_seller(html);
        assert_eq!(
            seller.cross_border,
            Some(CrossBorderReason::InternationalPurchase)
        );
    }

    #[test]
    fn cleans_name_prefixes_and_suffixes() {
        assert_eq!(clean_name("Vendido por Loja X | Mercado Livre").as_deref(), Some("Loja X"));
        assert_eq!(clean_name("Loja Oficial Acme").as_deref(), Some("Acme"));
        assert_eq!(clean_name("   "), None);
    }

    #[test]
    fn parses_sales_figures() {
        assert_eq!(parse_sales_figure("500"), 500);
        assert_eq!(parse_sales_figure("+5 mil"), 5000);
        assert_eq!(parse_sales_figure("2,5mil"), 2500);
        assert_eq!(parse_sales_figure("sem vendas"), 0);
    }
}
