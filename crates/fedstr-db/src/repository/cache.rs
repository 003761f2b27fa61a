//! Cache repository: transient fetch results with an explicit expiration.
//!
//! Every write carries its own expiration instant (unix seconds). Reads only
//! return rows that have not expired; the expiry task removes the rest.

use sqlx::AnyPool;

/// Read a cached value, ignoring rows whose expiration is before `now`.
pub async fn get(pool: &AnyPool, key: &str, now: i64) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT value FROM cache WHERE key = $1 AND expiration >= $2")
        .bind(key)
        .bind(now)
        .fetch_optional(pool)
        .await
}

/// Insert or replace a cached value.
pub async fn put(pool: &AnyPool, key: &str, value: &str, expiration: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO cache (key, value, expiration)
        VALUES ($1, $2, $3)
        ON CONFLICT (key) DO UPDATE SET
            value = excluded.value,
            expiration = excluded.expiration
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(expiration)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete every row whose expiration is strictly before `now`.
/// Returns the number of rows removed.
pub async fn delete_expired(pool: &AnyPool, now: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cache WHERE expiration < $1")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
