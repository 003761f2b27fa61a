//! Store health probe.

use sqlx::AnyPool;

/// Whether the database answers a trivial query.
pub async fn health_check(pool: &AnyPool) -> bool {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .is_ok()
}
