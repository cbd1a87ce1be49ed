//! Quantity price tiers per category

use shared::models::{PriceTier, PriceTierInput};
use shared::util::snowflake_id;
use sqlx::PgPool;

use super::BoxError;

pub async fn list_for_category(pool: &PgPool, category_id: i64) -> Result<Vec<PriceTier>, BoxError> {
    let rows = sqlx::query_as(
        r#"
        SELECT id, category_id, min_quantity, discount_percent
        FROM price_tiers
        WHERE category_id = $1
        ORDER BY min_quantity
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Replace all tiers of a category. Input must already be validated.
pub async fn replace(
    pool: &PgPool,
    category_id: i64,
    tiers: &[PriceTierInput],
) -> Result<Vec<PriceTier>, BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM price_tiers WHERE category_id = $1")
        .bind(category_id)
        .execute(&mut *tx)
        .await?;

    let rows: Vec<PriceTier> = if tiers.is_empty() {
        vec![]
    } else {
        let ids: Vec<i64> = tiers.iter().map(|_| snowflake_id()).collect();
        let mins: Vec<i32> = tiers.iter().map(|t| t.min_quantity).collect();
        let pcts: Vec<rust_decimal::Decimal> = tiers.iter().map(|t| t.discount_percent).collect();

        sqlx::query_as(
            r#"
            INSERT INTO price_tiers (id, category_id, min_quantity, discount_percent)
            SELECT u.id, $2::bigint, u.min_quantity, u.discount_percent
            FROM UNNEST($1::bigint[], $3::integer[], $4::numeric[]) AS u(id, min_quantity, discount_percent)
            RETURNING id, category_id, min_quantity, discount_percent
            "#,
        )
        .bind(&ids)
        .bind(category_id)
        .bind(&mins)
        .bind(&pcts)
        .fetch_all(&mut *tx)
        .await?
    };

    tx.commit().await?;

    let mut rows = rows;
    rows.sort_by_key(|t| t.min_quantity);
    Ok(rows)
}
