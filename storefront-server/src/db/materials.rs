//! Print material catalog (paper stocks, laminations, finishes)

use rust_decimal::Decimal;
use shared::models::{Material, MaterialCreate, MaterialKind, MaterialTranslation, MaterialUpdate};
use sqlx::{PgConnection, PgPool};

use super::{BoxError, patch, translations_for};

#[derive(sqlx::FromRow)]
struct Row {
    id: i64,
    kind: String,
    code: String,
    unit_price: Decimal,
    gsm: Option<i32>,
    sort_order: i32,
    is_active: bool,
}

const SELECT: &str = r#"
    SELECT id, kind, code, unit_price, gsm, sort_order, is_active
    FROM materials
"#;

const TRANSLATIONS: &str = r#"
    SELECT material_id AS owner_id, lang_code, name, description
    FROM material_translations
    WHERE material_id = ANY($1)
    ORDER BY lang_code
"#;

async fn assemble(pool: &PgPool, rows: Vec<Row>) -> Result<Vec<Material>, BoxError> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut translations =
        translations_for::<MaterialTranslation>(pool, TRANSLATIONS, &ids).await?;

    let mut materials = Vec::with_capacity(rows.len());
    for r in rows {
        let Some(kind) = MaterialKind::parse(&r.kind) else {
            tracing::warn!(id = r.id, kind = %r.kind, "Skipping material with unknown kind");
            continue;
        };
        materials.push(Material {
            translations: translations.remove(&r.id).unwrap_or_default(),
            id: r.id,
            kind,
            code: r.code,
            unit_price: r.unit_price,
            gsm: r.gsm,
            sort_order: r.sort_order,
            is_active: r.is_active,
        });
    }
    Ok(materials)
}

pub async fn list(
    pool: &PgPool,
    kind: Option<MaterialKind>,
    active_only: bool,
) -> Result<Vec<Material>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!(
        "{SELECT} WHERE ($1::text IS NULL OR kind = $1) AND (NOT $2 OR is_active) \
         ORDER BY kind, sort_order, id"
    ))
    .bind(kind.map(|k| k.as_str()))
    .bind(active_only)
    .fetch_all(pool)
    .await?;
    assemble(pool, rows).await
}

/// Active paper stocks, the choices of `paper_type` template fields
pub async fn list_active_papers(pool: &PgPool) -> Result<Vec<Material>, BoxError> {
    list(pool, Some(MaterialKind::Paper), true).await
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Material>, BoxError> {
    let rows: Vec<Row> = sqlx::query_as(&format!("{SELECT} WHERE id = $1"))
        .bind(id)
        .fetch_all(pool)
        .await?;
    Ok(assemble(pool, rows).await?.pop())
}

async fn replace_translations(
    conn: &mut PgConnection,
    material_id: i64,
    translations: &[MaterialTranslation],
) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM material_translations WHERE material_id = $1")
        .bind(material_id)
        .execute(&mut *conn)
        .await?;

    if translations.is_empty() {
        return Ok(());
    }
    let langs: Vec<&str> = translations.iter().map(|t| t.lang_code.as_str()).collect();
    let names: Vec<&str> = translations.iter().map(|t| t.name.trim()).collect();
    let descriptions: Vec<Option<&str>> =
        translations.iter().map(|t| t.description.as_deref()).collect();

    sqlx::query(
        r#"
        INSERT INTO material_translations (material_id, lang_code, name, description)
        SELECT $1::bigint, * FROM UNNEST($2::text[], $3::text[], $4::text[])
        "#,
    )
    .bind(material_id)
    .bind(&langs)
    .bind(&names)
    .bind(&descriptions)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn create(pool: &PgPool, id: i64, data: &MaterialCreate) -> Result<(), BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO materials (id, kind, code, unit_price, gsm, sort_order, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(data.kind.as_str())
    .bind(data.code.trim())
    .bind(data.unit_price)
    .bind(data.gsm)
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_active)
    .execute(&mut *tx)
    .await?;

    replace_translations(&mut tx, id, &data.translations).await?;

    tx.commit().await?;
    Ok(())
}

pub async fn update(pool: &PgPool, id: i64, data: &MaterialUpdate) -> Result<bool, BoxError> {
    let (set_gsm, gsm) = patch(&data.gsm);

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE materials SET
            kind = COALESCE($2, kind),
            code = COALESCE($3, code),
            unit_price = COALESCE($4, unit_price),
            gsm = CASE WHEN $5 THEN $6 ELSE gsm END,
            sort_order = COALESCE($7, sort_order),
            is_active = COALESCE($8, is_active)
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(data.kind.map(|k| k.as_str()))
    .bind(data.code.as_deref().map(str::trim))
    .bind(data.unit_price)
    .bind(set_gsm)
    .bind(gsm)
    .bind(data.sort_order)
    .bind(data.is_active)
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

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query("DELETE FROM materials WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
