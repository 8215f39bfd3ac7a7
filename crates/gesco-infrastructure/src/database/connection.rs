//! Database connection pool

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// `pool_size` + `max_overflow` borne le nombre total de connexions ; chaque
/// requête HTTP en détient exactement une, le temps de sa transaction.
pub async fn create_pool(
    url: &str,
    pool_size: u32,
    max_overflow: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(pool_size + max_overflow)
        .acquire_timeout(Duration::from_secs(3))
        .connect(url)
        .await
}
