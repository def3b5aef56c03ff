//! PostgreSQL storage layer, used when `DATABASE_URL` is set.

pub mod shortlist;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Connect to PostgreSQL and run the embedded migrations.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(database_url)
        .await?;

    sqlx::migrate!("../../migrations/postgres").run(&pool).await?;
    Ok(pool)
}
