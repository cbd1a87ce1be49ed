//! Editorial content: blog, testimonials, services, navigation, settings, home page

use std::collections::{BTreeMap, HashMap, HashSet};

use axum::Json;
use axum::extract::{Path, Query, State};
use shared::error::{AppError, ErrorCode};
use shared::i18n::{self, Lang};
use shared::models::{
    BlogPostSummary, BlogPostView, HomePage, LocalizedNavItem, LocalizedService,
    LocalizedTestimonial, NavMenu, NavigationItem, PublicSettings, ReadyMadeCard,
};
use shared::pagination::{PageQuery, PaginatedResponse};

use super::VisibleCatalog;
use crate::api::{ApiResult, ReqLang, internal};
use crate::catalog::{TreeNode, build_tree, prune};
use crate::db;
use crate::state::AppState;

/// Featured products shown on the home page
const HOME_FEATURED_LIMIT: i64 = 8;

/// GET /api/i18n/{lang}
pub async fn i18n_catalog(Path(lang): Path<String>) -> ApiResult<BTreeMap<&'static str, String>> {
    let lang = Lang::parse(&lang).ok_or_else(|| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("unsupported language '{lang}'"))
    })?;
    Ok(Json(i18n::catalog(lang)))
}

/// GET /api/blog - published posts, newest first
pub async fn list_blog(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Query(page): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<BlogPostSummary>> {
    let (posts, total) = db::blog::list(&state.pool, true, page.limit(), page.offset())
        .await
        .map_err(internal)?;
    Ok(Json(
        PaginatedResponse::new(posts, total, page).map(|p| p.summary(lang)),
    ))
}

/// GET /api/blog/{slug}
pub async fn get_blog_post(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Path(slug): Path<String>,
) -> ApiResult<BlogPostView> {
    let post = db::blog::find_published_by_slug(&state.pool, &slug)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::BlogPostNotFound))?;
    Ok(Json(post.view(lang)))
}

/// GET /api/testimonials
pub async fn list_testimonials(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
) -> ApiResult<Vec<LocalizedTestimonial>> {
    let testimonials = db::testimonials::list(&state.pool, true)
        .await
        .map_err(internal)?;
    Ok(Json(testimonials.iter().map(|t| t.localize(lang)).collect()))
}

/// GET /api/services
pub async fn list_services(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
) -> ApiResult<Vec<LocalizedService>> {
    let services = db::services::list(&state.pool, true)
        .await
        .map_err(internal)?;
    Ok(Json(services.iter().map(|s| s.localize(lang)).collect()))
}

/// GET /api/services/{slug}
pub async fn get_service(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Path(slug): Path<String>,
) -> ApiResult<LocalizedService> {
    let service = db::services::find_active_by_slug(&state.pool, &slug)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ServiceNotFound))?;
    Ok(Json(service.localize(lang)))
}

/// GET /api/navigation/{menu}
///
/// Items under an inactive parent are hidden with it.
pub async fn navigation(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
    Path(menu): Path<String>,
) -> ApiResult<Vec<TreeNode<LocalizedNavItem>>> {
    let menu = NavMenu::parse(&menu).ok_or_else(|| {
        AppError::with_message(ErrorCode::NavigationMenuInvalid, format!("unknown menu '{menu}'"))
    })?;
    let items = db::navigation::list(&state.pool, menu, false)
        .await
        .map_err(internal)?;

    let forest = prune(build_tree(items), &|i: &NavigationItem| i.is_active);
    Ok(Json(
        forest
            .into_iter()
            .map(|node| node.map(&|i: NavigationItem| i.localize(lang)))
            .collect(),
    ))
}

/// GET /api/settings
pub async fn settings(
    State(state): State<AppState>,
    ReqLang(lang): ReqLang,
) -> ApiResult<PublicSettings> {
    let rows = db::settings::list_all(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(PublicSettings::resolve(&rows, lang)))
}

/// GET /api/home
///
/// Ready-made and featured products are limited to visible categories.
pub async fn home(State(state): State<AppState>, ReqLang(lang): ReqLang) -> ApiResult<HomePage> {
    let catalog = VisibleCatalog::load(&state).await?;
    let visible_ids = catalog.visible_ids();
    let visible: HashSet<i64> = visible_ids.iter().copied().collect();

    let curated = db::ready_made::list(&state.pool).await.map_err(internal)?;
    let ids: Vec<i64> = curated.iter().map(|item| item.product_id).collect();
    let products = db::products::list_by_ids(&state.pool, &ids, true)
        .await
        .map_err(internal)?;
    let badges: HashMap<i64, &i18n::LocalizedText> =
        curated.iter().map(|item| (item.product_id, &item.badge)).collect();

    let ready_made = products
        .iter()
        .filter(|p| visible.contains(&p.category_id))
        .map(|p| ReadyMadeCard {
            product: p.card(lang),
            badge: badges
                .get(&p.id)
                .and_then(|b| b.get(lang))
                .map(str::to_string),
        })
        .collect();

    let featured = db::products::list_featured(&state.pool, &visible_ids, HOME_FEATURED_LIMIT)
        .await
        .map_err(internal)?
        .iter()
        .map(|p| p.card(lang))
        .collect();

    let testimonials = db::testimonials::list(&state.pool, true)
        .await
        .map_err(internal)?;
    let services = db::services::list(&state.pool, true)
        .await
        .map_err(internal)?;

    Ok(Json(HomePage {
        ready_made,
        featured,
        testimonials: testimonials.iter().map(|t| t.localize(lang)).collect(),
        services: services.iter().map(|s| s.localize(lang)).collect(),
    }))
}
