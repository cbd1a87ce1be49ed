//! Catalog endpoints: mega-menu, categories, products, forms and quotes

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::i18n::Lang;
use shared::models::{
    Category, LocalizedCategory, Product, ProductCard, ProductDetail, ProductListQuery, Quote,
    QuoteRequest, RenderedField,
};
use shared::pagination::{PageQuery, PaginatedResponse};

use super::VisibleCatalog;
use crate::api::{ApiResult, ReqLang, internal, load_papers};
use crate::catalog::{
    MegaMenuColumn, TreeNode, breadcrumb, build_mega_menu, descendant_ids, find,
    menu_category_ids,
};
use crate::db;
use crate::db::products::ProductFilter;
use crate::pricing::compute_quote;
use crate::state::AppState;
use crate::template::{render_display, render_form, validate_values, values_error};

/// GET /api/menu
pub async fn menu(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
) -> ApiResult<Vec<MegaMenuColumn>> {
    let categories = db::categories::list_all(&state.pool)
        .await
        .map_err(internal)?;
    let ids = menu_category_ids(&categories);
    let products = db::products::list_active_in(&state.pool, &ids)
        .await
        .map_err(internal)?;

    Ok(Json(build_mega_menu(
        categories,
        &products,
        lang,
        state.mega_menu_preview_limit,
    )))
}

/// GET /api/categories
pub async fn category_tree(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
) -> ApiResult<Vec<TreeNode<LocalizedCategory>>> {
    let catalog = VisibleCatalog::load(&state).await?;
    Ok(Json(
        catalog
            .forest
            .into_iter()
            .map(|node| node.map(&|c: Category| c.localize(lang)))
            .collect(),
    ))
}

#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category: LocalizedCategory,
    pub breadcrumb: Vec<LocalizedCategory>,
    pub children: Vec<TreeNode<LocalizedCategory>>,
    /// Products of the category and everything below it
    pub products: PaginatedResponse<ProductCard>,
}

fn localized_breadcrumb(rows: &[Category], id: i64, lang: Lang) -> Vec<LocalizedCategory> {
    breadcrumb(rows, id)
        .into_iter()
        .map(|c| c.localize(lang))
        .collect()
}

/// GET /api/categories/{slug}
pub async fn category_page(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Path(slug): Path<String>,
    Query(page): Query<PageQuery>,
) -> ApiResult<CategoryPage> {
    let catalog = VisibleCatalog::load(&state).await?;
    let id = catalog
        .rows
        .iter()
        .find(|c| c.slug == slug)
        .map(|c| c.id)
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    let node = find(&catalog.forest, id).ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;

    let filter = ProductFilter {
        category_ids: Some(descendant_ids(&catalog.forest, id)),
        active_only: true,
        ..Default::default()
    };
    let (products, total) = db::products::list(&state.pool, &filter, page.limit(), page.offset())
        .await
        .map_err(internal)?;

    Ok(Json(CategoryPage {
        category: node.item.localize(lang),
        breadcrumb: localized_breadcrumb(&catalog.rows, id, lang),
        children: node
            .children
            .iter()
            .cloned()
            .map(|child| child.map(&|c: Category| c.localize(lang)))
            .collect(),
        products: PaginatedResponse::new(products, total, page).map(|p| p.card(lang)),
    }))
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Query(query): Query<ProductListQuery>,
) -> ApiResult<PaginatedResponse<ProductCard>> {
    let catalog = VisibleCatalog::load(&state).await?;

    let category_ids = match query.category.as_deref().filter(|s| !s.is_empty()) {
        Some(slug) => {
            let id = catalog
                .rows
                .iter()
                .find(|c| c.slug == slug)
                .map(|c| c.id)
                .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
            let ids = descendant_ids(&catalog.forest, id);
            if ids.is_empty() {
                return Err(AppError::new(ErrorCode::CategoryNotFound));
            }
            ids
        }
        None => catalog.visible_ids(),
    };

    let filter = ProductFilter {
        category_ids: Some(category_ids),
        featured: query.featured,
        search: query.q.clone(),
        active_only: true,
    };
    let page = query.page_query();
    let (products, total) = db::products::list(&state.pool, &filter, page.limit(), page.offset())
        .await
        .map_err(internal)?;

    Ok(Json(
        PaginatedResponse::new(products, total, page).map(|p| p.card(lang)),
    ))
}

/// An active product whose category is visible, with that category
async fn visible_product(
    state: &AppState,
    slug: &str,
) -> Result<(Product, Category, VisibleCatalog), AppError> {
    let product = db::products::find_by_slug(&state.pool, slug)
        .await
        .map_err(internal)?
        .filter(|p| p.is_active)
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let catalog = VisibleCatalog::load(state).await?;
    let category = find(&catalog.forest, product.category_id)
        .map(|node| node.item.clone())
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    Ok((product, category, catalog))
}

/// GET /api/products/{slug}
pub async fn product_detail(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Path(slug): Path<String>,
) -> ApiResult<ProductDetail> {
    let (product, category, catalog) = visible_product(&state, &slug).await?;
    let papers = load_papers(&state, lang).await?;

    Ok(Json(ProductDetail {
        card: product.card(lang),
        sku: product.sku.clone(),
        description: product.description(lang),
        gallery: product.gallery.clone(),
        category: category.localize(lang),
        breadcrumb: localized_breadcrumb(&catalog.rows, category.id, lang),
        specs: render_display(&category.template_schema, &product.attributes, lang, &papers),
    }))
}

#[derive(Debug, Serialize)]
pub struct ProductForm {
    pub product: ProductCard,
    pub fields: Vec<RenderedField>,
}

/// GET /api/products/{slug}/form
///
/// The product's stored attributes prefill the form.
pub async fn product_form(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Path(slug): Path<String>,
) -> ApiResult<ProductForm> {
    let (product, category, _) = visible_product(&state, &slug).await?;
    let papers = load_papers(&state, lang).await?;

    Ok(Json(ProductForm {
        product: product.card(lang),
        fields: render_form(&category.template_schema, &product.attributes, lang, &papers),
    }))
}

/// POST /api/products/{slug}/quote
pub async fn product_quote(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Path(slug): Path<String>,
    Json(req): Json<QuoteRequest>,
) -> ApiResult<Quote> {
    let (product, category, _) = visible_product(&state, &slug).await?;
    let papers = load_papers(&state, lang).await?;

    let values = validate_values(&category.template_schema, &req.values, &papers)
        .map_err(|errors| values_error(errors, lang))?;
    let tiers = db::price_tiers::list_for_category(&state.pool, category.id)
        .await
        .map_err(internal)?;

    let quote = compute_quote(
        &product,
        &category.template_schema,
        &values,
        &papers,
        &tiers,
        req.quantity,
        lang,
    )?;
    Ok(Json(quote))
}
