//! Public storefront API
//!
//! Every endpoint is localized through [`ReqLang`](super::ReqLang). Inactive
//! categories hide their whole subtree, and products only show when their
//! category is visible.

mod catalog;
mod contact;
mod content;

use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::models::Category;

use crate::auth::rate_limit::contact_rate_limit;
use crate::catalog::{TreeNode, build_tree, flatten, prune};
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let contact = Router::new()
        .route("/api/contact", post(contact::submit))
        .layer(middleware::from_fn_with_state(state, contact_rate_limit));

    Router::new()
        .route("/api/i18n/{lang}", get(content::i18n_catalog))
        .route("/api/menu", get(catalog::menu))
        .route("/api/categories", get(catalog::category_tree))
        .route("/api/categories/{slug}", get(catalog::category_page))
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/{slug}", get(catalog::product_detail))
        .route("/api/products/{slug}/form", get(catalog::product_form))
        .route("/api/products/{slug}/quote", post(catalog::product_quote))
        .route("/api/blog", get(content::list_blog))
        .route("/api/blog/{slug}", get(content::get_blog_post))
        .route("/api/testimonials", get(content::list_testimonials))
        .route("/api/services", get(content::list_services))
        .route("/api/services/{slug}", get(content::get_service))
        .route("/api/navigation/{menu}", get(content::navigation))
        .route("/api/settings", get(content::settings))
        .route("/api/home", get(content::home))
        .merge(contact)
}

/// Category rows plus the forest with inactive subtrees removed
struct VisibleCatalog {
    rows: Vec<Category>,
    forest: Vec<TreeNode<Category>>,
}

impl VisibleCatalog {
    async fn load(state: &AppState) -> ServiceResult<Self> {
        let rows = db::categories::list_all(&state.pool).await?;
        Ok(Self::from_rows(rows))
    }

    fn from_rows(rows: Vec<Category>) -> Self {
        let forest = prune(build_tree(rows.clone()), &|c: &Category| c.is_active);
        Self { rows, forest }
    }

    fn visible_ids(&self) -> Vec<i64> {
        flatten(&self.forest).into_iter().map(|(_, c)| c.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, parent_id: Option<i64>, is_active: bool) -> Category {
        Category {
            id,
            parent_id,
            slug: format!("c{id}"),
            image_url: None,
            icon: None,
            sort_order: 0,
            is_active,
            show_in_menu: true,
            template_schema: vec![],
            created_at: 0,
            updated_at: 0,
            translations: vec![],
        }
    }

    #[test]
    fn test_inactive_category_hides_subtree() {
        let catalog = VisibleCatalog::from_rows(vec![
            category(1, None, true),
            category(2, Some(1), false),
            category(3, Some(2), true),
            category(4, Some(1), true),
        ]);
        let mut ids = catalog.visible_ids();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(catalog.rows.len(), 4);
    }
}
