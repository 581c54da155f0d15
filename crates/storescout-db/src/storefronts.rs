//! Postgres implementation of the storefront persistence contract.

use sqlx::PgPool;

use storescout_core::{CategoryCount, StoreError, StorefrontRecord, StorefrontStore};

/// [`StorefrontStore`] backed by the `storefronts` table.
///
/// Clone is cheap: the pool is reference-counted.
#[derive(Clone)]
pub struct PgStorefronts {
    pool: PgPool,
}

impl PgStorefronts {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(op: &'static str, err: sqlx::Error) -> StoreError {
    StoreError::Backend {
        op,
        reason: err.to_string(),
    }
}

// BIGINT columns are signed; scraped counts that somehow exceed i64 are clamped.
fn as_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl StorefrontStore for PgStorefronts {
    /// Upserts a storefront by its unique `seller_link`.
    ///
    /// A conflict refreshes the scraped observation fields in place but keeps
    /// the first-seen `sequence` and `created_at`. `(xmax = 0)` distinguishes
    /// a fresh insert from a conflict update in a single round-trip, so
    /// same-key concurrent calls can never create two rows.
    async fn upsert(&self, record: &StorefrontRecord) -> Result<bool, StoreError> {
        let newly_saved: bool = sqlx::query_scalar(
            "INSERT INTO storefronts \
                 (sequence, origin_term, category, seller_name, seller_link, \
                  sales_estimate, mercado_lider, green_reputation, location, \
                  regional_confidence, platform, extracted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (seller_link) DO UPDATE SET \
                 seller_name         = EXCLUDED.seller_name, \
                 sales_estimate      = EXCLUDED.sales_estimate, \
                 mercado_lider       = EXCLUDED.mercado_lider, \
                 green_reputation    = EXCLUDED.green_reputation, \
                 location            = EXCLUDED.location, \
                 regional_confidence = EXCLUDED.regional_confidence, \
                 extracted_at        = EXCLUDED.extracted_at \
             RETURNING (xmax = 0)",
        )
        .bind(as_i64(record.sequence))
        .bind(&record.origin_term)
        .bind(&record.category)
        .bind(&record.seller_name)
        .bind(&record.seller_link)
        .bind(as_i64(record.sales_estimate))
        .bind(record.mercado_lider)
        .bind(record.green_reputation)
        .bind(&record.location)
        .bind(record.regional_confidence)
        .bind(&record.platform)
        .bind(record.extracted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| backend("upsert", e))?;

        Ok(newly_saved)
    }

    async fn count(&self, category: Option<&str>) -> Result<i64, StoreError> {
        let count: i64 = match category {
            Some(category) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM storefronts WHERE category = $1")
                    .bind(category)
                    .fetch_one(&self.pool)
                    .await
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM storefronts")
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(|e| backend("count", e))?;

        Ok(count)
    }

    async fn count_mercado_lider(&self) -> Result<i64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM storefronts WHERE mercado_lider")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| backend("count_mercado_lider", e))?;

        Ok(count)
    }

    async fn aggregate_by_category(&self) -> Result<Vec<CategoryCount>, StoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT category, COUNT(*) \
             FROM storefronts \
             GROUP BY category \
             ORDER BY COUNT(*) DESC, category",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| backend("aggregate_by_category", e))?;

        Ok(rows
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect())
    }
}
