//! Header/footer menu management

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    LinkType, NavMenu, NavigationItem, NavigationItemCreate, NavigationItemTranslation,
    NavigationItemUpdate,
};

use super::{BatchSortOrderRequest, BatchSortOrderResult, check_translations};
use crate::api::{ApiResult, internal};
use crate::catalog::{self, ParentError, TreeNode, build_tree};
use crate::db;
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, validate_required_text, validate_slug, validate_url};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tree).post(create))
        .route("/sort-order", put(batch_update_sort_order))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub menu: String,
}

fn parse_menu(menu: &str) -> Result<NavMenu, AppError> {
    NavMenu::parse(menu).ok_or_else(|| {
        AppError::with_message(ErrorCode::NavigationMenuInvalid, format!("unknown menu '{menu}'"))
    })
}

fn check_target(link_type: LinkType, target: &str) -> Result<(), AppError> {
    match link_type {
        LinkType::Url => validate_url(target, "target"),
        _ => validate_slug(target),
    }
}

fn check_nav_translations(rows: &[NavigationItemTranslation]) -> Result<(), AppError> {
    check_translations(rows, true, |t| validate_required_text(&t.label, "label", MAX_NAME_LEN))
}

/// The parent must sit in `menu` and must not be `id` or one of its descendants.
fn check_nav_parent(
    items: Vec<NavigationItem>,
    menu: NavMenu,
    id: Option<i64>,
    parent_id: i64,
) -> Result<(), AppError> {
    let items: Vec<NavigationItem> = items.into_iter().filter(|i| i.menu == menu).collect();
    catalog::check_parent(items, id, parent_id).map_err(|e| {
        let message = match e {
            ParentError::Missing(_) => format!("parent {parent_id} is not in the {} menu", menu.as_str()),
            ParentError::Cycle { .. } => "an item cannot be moved below itself".to_string(),
        };
        AppError::with_message(ErrorCode::InvalidRequest, message).with_detail("field", "parent_id")
    })
}

async fn check_parent(
    state: &AppState,
    menu: NavMenu,
    id: Option<i64>,
    parent_id: i64,
) -> Result<(), AppError> {
    let items = db::navigation::list(&state.pool, menu, false)
        .await
        .map_err(internal)?;
    check_nav_parent(items, menu, id, parent_id)
}

async fn load(state: &AppState, id: i64) -> Result<NavigationItem, AppError> {
    db::navigation::find(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::NavigationItemNotFound))
}

/// GET /api/admin/navigation?menu=header - inactive items included
pub async fn tree(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> ApiResult<Vec<TreeNode<NavigationItem>>> {
    let menu = parse_menu(&query.menu)?;
    let items = db::navigation::list(&state.pool, menu, false)
        .await
        .map_err(internal)?;
    Ok(Json(build_tree(items)))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<NavigationItem> {
    Ok(Json(load(&state, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<NavigationItemCreate>,
) -> ApiResult<NavigationItem> {
    check_nav_translations(&data.translations)?;
    check_target(data.link_type, data.target.trim())?;
    if let Some(parent_id) = data.parent_id {
        check_parent(&state, data.menu, None, parent_id).await?;
    }

    let id = shared::util::snowflake_id();
    db::navigation::create(&state.pool, id, &data)
        .await
        .map_err(internal)?;
    Ok(Json(load(&state, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<NavigationItemUpdate>,
) -> ApiResult<NavigationItem> {
    let existing = load(&state, id).await?;

    if let Some(translations) = &data.translations {
        check_nav_translations(translations)?;
    }
    if data.link_type.is_some() || data.target.is_some() {
        let link_type = data.link_type.unwrap_or(existing.link_type);
        let target = data.target.as_deref().unwrap_or(&existing.target);
        check_target(link_type, target.trim())?;
    }
    if let Some(Some(parent_id)) = data.parent_id {
        check_parent(&state, existing.menu, Some(id), parent_id).await?;
    }

    let updated = db::navigation::update(&state.pool, id, &data)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(AppError::new(ErrorCode::NavigationItemNotFound));
    }
    Ok(Json(load(&state, id).await?))
}

/// Children go with their parent
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<bool> {
    let deleted = db::navigation::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::NavigationItemNotFound));
    }
    Ok(Json(true))
}

pub async fn batch_update_sort_order(
    State(state): State<AppState>,
    Json(req): Json<BatchSortOrderRequest>,
) -> ApiResult<BatchSortOrderResult> {
    let updated = db::navigation::batch_update_sort_order(&state.pool, &req.items)
        .await
        .map_err(internal)?;
    Ok(Json(BatchSortOrderResult { updated }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_by_link_type() {
        assert!(check_target(LinkType::Url, "https://example.com/x").is_ok());
        assert!(check_target(LinkType::Url, "/tr/iletisim").is_ok());
        assert!(check_target(LinkType::Url, "javascript:alert(1)").is_err());
        assert!(check_target(LinkType::Url, "//evil.example/phish").is_err());
        assert!(check_target(LinkType::Url, "/\\evil.example").is_err());
        assert!(check_target(LinkType::Category, "kartvizit").is_ok());
        assert!(check_target(LinkType::Product, "https://example.com").is_err());
    }

    fn item(id: i64, menu: NavMenu, parent_id: Option<i64>) -> NavigationItem {
        NavigationItem {
            id,
            menu,
            parent_id,
            link_type: LinkType::Url,
            target: "/".into(),
            sort_order: 0,
            is_active: true,
            open_in_new_tab: false,
            translations: vec![],
        }
    }

    fn items() -> Vec<NavigationItem> {
        vec![
            item(1, NavMenu::Header, None),
            item(2, NavMenu::Header, Some(1)),
            item(3, NavMenu::Header, Some(2)),
            item(10, NavMenu::Footer, None),
        ]
    }

    #[test]
    fn test_nav_parent_rules() {
        assert!(check_nav_parent(items(), NavMenu::Header, None, 3).is_ok());
        assert!(check_nav_parent(items(), NavMenu::Header, Some(3), 1).is_ok());
        assert!(check_nav_parent(items(), NavMenu::Footer, None, 10).is_ok());

        // missing, self, descendant, other menu
        for (menu, id, parent_id) in [
            (NavMenu::Header, None, 99),
            (NavMenu::Header, Some(2), 2),
            (NavMenu::Header, Some(1), 3),
            (NavMenu::Header, Some(2), 10),
            (NavMenu::Footer, None, 1),
        ] {
            let err = check_nav_parent(items(), menu, id, parent_id).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidRequest);
            assert_eq!(err.details.unwrap()["field"], "parent_id");
        }
    }

    #[test]
    fn test_parse_menu() {
        assert_eq!(parse_menu("header").unwrap(), NavMenu::Header);
        assert_eq!(
            parse_menu("sidebar").unwrap_err().code,
            ErrorCode::NavigationMenuInvalid
        );
    }
}
