//! Navigation menu item database operations

use shared::models::{
    LinkType, NavMenu, NavigationItem, NavigationItemCreate, NavigationItemTranslation,
    NavigationItemUpdate, SortOrderItem,
};
use sqlx::{PgConnection, PgPool};

use super::{BoxError, patch, translations_for};

#[derive(sqlx::FromRow)]
struct Row {
    id: i64,
    menu: String,
    parent_id: Option<i64>,
    link_type: String,
    target: String,
    sort_order: i32,
    is_active: bool,
    open_in_new_tab: bool,
}

const SELECT: &str = r#"
    SELECT id, menu, parent_id, link_type, target, sort_order, is_active, open_in_new_tab
    FROM navigation_items
"#;

const TRANSLATIONS: &str = r#"
    SELECT item_id AS owner_id, lang_code, label
    FROM navigation_item_translations
    WHERE item_id = ANY($1)
    ORDER BY lang_code
"#;

async fn assemble(pool: &PgPool, rows: Vec<Row>) -> Result<Vec<NavigationItem>, BoxError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut translations =
        translations_for::<NavigationItemTranslation>(pool, TRANSLATIONS, &ids).await?;

    let mut items = Vec::with_capacity(rows.len());
    for r in rows {
        // Rows written by an older build may carry values this one does not know
        let (Some(menu), Some(link_type)) = (NavMenu::parse(&r.menu), LinkType::parse(&r.link_type))
        else {
            tracing::warn!(id = r.id, menu = %r.menu, link_type = %r.link_type, "Skipping navigation item with unknown menu or link type");
            continue;
        };
        items.push(NavigationItem {
            translations: translations.remove(&r.id).unwrap_or_default(),
            id: r.id,
            menu,
            parent_id: r.parent_id,
            link_type,
            target: r.target,
            sort_order: r.sort_order,
            is_active: r.is_active,
            open_in_new_tab: r.open_in_new_tab,
        });
    }
    Ok(items)
}

pub async fn list(
    pool: &PgPool,
    menu: NavMenu,
    active_only: bool,
) -> Result<Vec<NavigationItem>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!(
        "{SELECT} WHERE menu = $1 AND (NOT $2 OR is_active) ORDER BY sort_order, id"
    ))
    .bind(menu.as_str())
    .bind(active_only)
    .fetch_all(pool)
    .await?;
    assemble(pool, rows).await
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<NavigationItem>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} WHERE id = $1"))
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(assemble(pool, rows).await?.pop())
}

async fn replace_translations(
    conn: &mut PgConnection,
    item_id: i64,
    translations: &[NavigationItemTranslation],
) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM navigation_item_translations WHERE item_id = $1")
        .bind(item_id)
        .execute(&mut *conn)
        .await?;

    if translations.is_empty() {
        return Ok(());
    }
    let langs: Vec<&str> = translations.iter().map(|t| t.lang_code.as_str()).collect();
    let labels: Vec<&str> = translations.iter().map(|t| t.label.trim()).collect();

    sqlx::query(
        r#"
        INSERT INTO navigation_item_translations (item_id, lang_code, label)
        SELECT $1::bigint, * FROM UNNEST($2::text[], $3::text[])
        "#,
    )
    .bind(item_id)
    .bind(&langs)
    .bind(&labels)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn create(pool: &PgPool, id: i64, data: &NavigationItemCreate) -> Result<(), BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO navigation_items (
            id, menu, parent_id, link_type, target, sort_order, is_active, open_in_new_tab
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(data.menu.as_str())
    .bind(data.parent_id)
    .bind(data.link_type.as_str())
    .bind(data.target.trim())
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_active)
    .bind(data.open_in_new_tab)
    .execute(&mut *tx)
    .await?;

    replace_translations(&mut tx, id, &data.translations).await?;

    tx.commit().await?;
    Ok(())
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &NavigationItemUpdate,
) -> Result<bool, BoxError> {
    let (set_parent, parent_id) = patch(&data.parent_id);

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE navigation_items SET
            parent_id = CASE WHEN $2 THEN $3 ELSE parent_id END,
            link_type = COALESCE($4, link_type),
            target = COALESCE($5, target),
            sort_order = COALESCE($6, sort_order),
            is_active = COALESCE($7, is_active),
            open_in_new_tab = COALESCE($8, open_in_new_tab)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(set_parent)
    .bind(parent_id)
    .bind(data.link_type.map(|l| l.as_str()))
    .bind(data.target.as_deref().map(str::trim))
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(data.open_in_new_tab)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    if let Some(translations) = &data.translations {
        replace_translations(&mut tx, id, translations).await?;
    }

    tx.commit().await?;
    Ok(true)
}

/// Children go with their parent (ON DELETE CASCADE)
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM navigation_items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn batch_update_sort_order(
    pool: &PgPool,
    items: &[SortOrderItem],
) -> Result<u64, BoxError> {
    super::batch_sort_order(pool, "navigation_items", items).await
}
