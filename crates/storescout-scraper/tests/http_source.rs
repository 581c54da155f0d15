//! Integration tests for `MercadoLivreSource` over a local wiremock server.
//!
//! No real network traffic: each test stands up its own `MockServer` and
//! asserts the typed `PageSource` results, including redirect handling and
//! the navigation-failure mapping.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storescout_core::{PageSource, SourceError};
use storescout_scraper::MercadoLivreSource;

fn test_source() -> MercadoLivreSource {
    MercadoLivreSource::new(5, None).expect("failed to build test source")
}

fn search_body() -> &'static str {
    r#"
    <div class="ui-search-result__wrapper">
      <a href="https://produto.mercadolivre.com.br/MLB-100200300-kit">item</a>
    </div>
    <div class="ui-search-result__wrapper">
      <a href="https://click1.mercadolivre.com.br/MLB-999">sponsored</a>
    </div>
    "#
}

#[tokio::test]
async fn search_page_extracts_products_and_reports_final_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lista/kit-bolsa"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_body()))
        .mount(&server)
        .await;

    let source = test_source();
    let url = format!("{}/lista/kit-bolsa", server.uri());
    let page = source.search_page(&url).await.expect("search page");

    assert_eq!(page.final_url, url);
    assert_eq!(page.products.len(), 1, "tracking link must be skipped");
    assert_eq!(page.products[0].id, "100200300");
}

#[tokio::test]
async fn search_page_follows_redirect_and_reports_redirected_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/seed"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", "/bolsas/kit-bolsa_NoIndex_True"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bolsas/kit-bolsa_NoIndex_True"))
        .respond_with(ResponseTemplate::new(200).set_body_string(search_body()))
        .mount(&server)
        .await;

    let source = test_source();
    let page = source
        .search_page(&format!("{}/seed", server.uri()))
        .await
        .expect("redirected search page");

    assert_eq!(
        page.final_url,
        format!("{}/bolsas/kit-bolsa_NoIndex_True", server.uri())
    );
    assert_eq!(page.products.len(), 1);
}

#[tokio::test]
async fn non_success_status_maps_to_navigation_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let source = test_source();
    let result = source
        .search_page(&format!("{}/blocked", server.uri()))
        .await;

    let err = result.expect_err("403 must be a navigation failure");
    let SourceError::Navigation { url, reason } = err;
    assert!(url.ends_with("/blocked"));
    assert!(reason.contains("403"), "reason should carry the status: {reason}");
}

#[tokio::test]
async fn seller_page_extracts_candidate() {
    let server = MockServer::start().await;

    let body = r#"
        <h2 class="ui-seller-data-header__title">Vendido por Loja Teste</h2>
        <div class="ui-seller-data-header__logo-container">
          <a href="https://www.mercadolivre.com.br/pagina/loja-teste">logo</a>
        </div>
        <div class="ui-seller-data-status__info">
          <span class="ui-seller-data-status__info-title">1234</span>
          <span class="ui-seller-data-status__info-subtitle">Vendas</span>
        </div>
        <span class="ui-pdp-color--GREEN">Ótimo</span>
    "#;

    Mock::given(method("GET"))
        .and(path("/MLB-100"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let source = test_source();
    let candidate = source
        .seller_page(&format!("{}/MLB-100", server.uri()))
        .await
        .expect("seller page");

    assert_eq!(candidate.name.as_deref(), Some("Loja Teste"));
    assert_eq!(
        candidate.profile_link.as_deref(),
        Some("https://www.mercadolivre.com.br/pagina/loja-teste")
    );
    assert_eq!(candidate.sales_count, 1234);
    assert!(candidate.green_reputation);
    assert!(!candidate.mercado_lider);
}

#[tokio::test]
async fn unreachable_server_maps_to_navigation_error() {
    // Bind-then-drop leaves a port that refuses connections.
    let server = MockServer::start().await;
    let dead_url = format!("{}/MLB-1", server.uri());
    drop(server);

    let source = test_source();
    let result = source.seller_page(&dead_url).await;
    assert!(matches!(result, Err(SourceError::Navigation { .. })));
}
