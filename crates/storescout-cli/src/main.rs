//! Command line entry point: loads configuration, connects to Postgres,
//! runs one crawl, and prints the run summary plus store totals.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use storescout_core::{AppConfig, StorefrontStore};
use storescout_crawler::Crawler;
use storescout_db::PgStorefronts;
use storescout_scraper::MercadoLivreSource;

#[derive(Debug, Parser)]
#[command(name = "storescout")]
#[command(about = "MercadoLivre seller-storefront crawler")]
struct Cli {
    /// Search term seeding the crawl (overrides STORESCOUT_SEARCH_TERM).
    #[arg(long)]
    term: Option<String>,

    /// Category label stamped on saved storefronts.
    #[arg(long)]
    category: Option<String>,

    /// Stop once this many storefronts are saved.
    #[arg(long)]
    target: Option<usize>,

    /// Minimum estimated sales a seller must show.
    #[arg(long)]
    min_sales: Option<u64>,

    /// Stop after this many consecutive empty result pages.
    #[arg(long)]
    stall_pages: Option<u32>,

    /// Number of concurrent crawl workers.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Accept sellers without a green reputation badge.
    #[arg(long)]
    any_reputation: bool,

    /// Print the effective configuration and exit without crawling.
    #[arg(long)]
    dry_run: bool,
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(term) = &cli.term {
        config.search_term.clone_from(term);
    }
    if let Some(category) = &cli.category {
        config.category_label.clone_from(category);
    }
    if let Some(target) = cli.target {
        config.target_stores = target;
    }
    if let Some(min_sales) = cli.min_sales {
        config.min_sales = min_sales;
    }
    if let Some(stall_pages) = cli.stall_pages {
        config.empty_page_threshold = stall_pages;
    }
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrency = concurrency.max(1);
    }
    if cli.any_reputation {
        config.require_green_reputation = false;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut config = storescout_core::load_app_config()?;
    apply_overrides(&mut config, &cli);

    if cli.dry_run {
        println!("{config:#?}");
        return Ok(());
    }

    let pool = storescout_db::connect_pool(&config.database_url, storescout_db::PoolConfig::from_env())
        .await
        .context("failed to connect to the database")?;

    let result = run_crawl(pool.clone(), Arc::new(config)).await;
    pool.close().await;
    result
}

async fn run_crawl(pool: PgPool, config: Arc<AppConfig>) -> anyhow::Result<()> {
    // Fail before any crawling if the database is not usable.
    storescout_db::ping(&pool)
        .await
        .context("database ping failed")?;
    storescout_db::run_migrations(&pool)
        .await
        .context("database migrations failed")?;

    let source = MercadoLivreSource::new(config.request_timeout_secs, config.proxy.as_ref())
        .context("failed to build the marketplace client")?;
    let store = PgStorefronts::new(pool);
    let crawler = Crawler::new(source, store.clone(), Arc::clone(&config));

    let cancel = crawler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping crawl");
            cancel.cancel();
        }
    });

    tracing::info!(
        term = %config.search_term,
        target = config.target_stores,
        workers = config.max_concurrency,
        "starting crawl"
    );
    let report = crawler.run().await;

    println!(
        "saved {} storefronts ({} products visited, {} sellers rejected)",
        report.saved,
        report.products_seen,
        report.rejected_total()
    );
    log_store_stats(&store).await?;
    Ok(())
}

async fn log_store_stats<P: StorefrontStore>(store: &P) -> anyhow::Result<()> {
    let total = store.count(None).await?;
    let leaders = store.count_mercado_lider().await?;
    println!("store now holds {total} storefronts ({leaders} MercadoLíder)");
    for entry in store.aggregate_by_category().await? {
        println!("  {}: {}", entry.category, entry.count);
    }
    Ok(())
}
