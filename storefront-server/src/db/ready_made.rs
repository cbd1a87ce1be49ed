//! Ready-made homepage curation

use shared::i18n::LocalizedText;
use shared::models::{ReadyMadeEntry, ReadyMadeItem};
use shared::util::snowflake_id;
use sqlx::PgPool;
use sqlx::types::Json;

use super::BoxError;

pub async fn list(pool: &PgPool) -> Result<Vec<ReadyMadeItem>, BoxError> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: i64,
        product_id: i64,
        sort_order: i32,
        badge: Json<LocalizedText>,
    }

    let rows: Vec<Row> = sqlx::query_as(
        "SELECT id, product_id, sort_order, badge FROM ready_made_items ORDER BY sort_order, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| ReadyMadeItem {
            id: r.id,
            product_id: r.product_id,
            sort_order: r.sort_order,
            badge: r.badge.0,
        })
        .collect())
}

/// Replace the whole curated list; list position becomes sort order.
pub async fn replace(pool: &PgPool, entries: &[ReadyMadeEntry]) -> Result<(), BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM ready_made_items")
        .execute(&mut *tx)
        .await?;

    if !entries.is_empty() {
        let ids: Vec<i64> = entries.iter().map(|_| snowflake_id()).collect();
        let product_ids: Vec<i64> = entries.iter().map(|e| e.product_id).collect();
        let orders: Vec<i32> = (0..entries.len() as i32).collect();
        let badges: Vec<serde_json::Value> = entries
            .iter()
            .map(|e| serde_json::to_value(&e.badge))
            .collect::<Result<_, _>>()?;

        sqlx::query(
            r#"
            INSERT INTO ready_made_items (id, product_id, sort_order, badge)
            SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::integer[], $4::jsonb[])
            "#,
        )
        .bind(&ids)
        .bind(&product_ids)
        .bind(&orders)
        .bind(&badges)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
