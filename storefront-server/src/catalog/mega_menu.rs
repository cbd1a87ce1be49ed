//! Mega-menu assembly
//!
//! One column per active root category flagged `show_in_menu`: the localized
//! category, its localized child tree, and preview products collected from
//! the category and all of its descendants.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use shared::i18n::Lang;
use shared::models::{Category, LocalizedCategory, Product, ProductCard};

use super::tree::{TreeNode, build_tree, flatten, prune};

#[derive(Debug, Clone, Serialize)]
pub struct MegaMenuColumn {
    pub category: LocalizedCategory,
    pub children: Vec<TreeNode<LocalizedCategory>>,
    pub products: Vec<ProductCard>,
}

/// Build the mega-menu from all categories and the candidate products.
///
/// Inactive categories are pruned with their subtrees. Preview products are
/// active, distinct, and ordered featured first, then by how deep their
/// category sits under the column root, then `sort_order`, then id.
pub fn build_mega_menu(
    categories: Vec<Category>,
    products: &[Product],
    lang: Lang,
    preview_limit: usize,
) -> Vec<MegaMenuColumn> {
    let forest = prune(build_tree(categories), &|c: &Category| c.is_active);

    forest
        .into_iter()
        .filter(|root| root.item.show_in_menu)
        .map(|root| {
            let depth: HashMap<i64, usize> = flatten(std::slice::from_ref(&root))
                .into_iter()
                .map(|(d, c)| (c.id, d))
                .collect();

            MegaMenuColumn {
                category: root.item.localize(lang),
                products: preview_products(products, &depth, lang, preview_limit),
                children: root
                    .children
                    .into_iter()
                    .map(|child| child.map(&|c: Category| c.localize(lang)))
                    .collect(),
            }
        })
        .collect()
}

/// Products whose category is in `depth`, best first
fn preview_products(
    products: &[Product],
    depth: &HashMap<i64, usize>,
    lang: Lang,
    limit: usize,
) -> Vec<ProductCard> {
    let mut seen = HashSet::new();
    let mut picked: Vec<(&Product, usize)> = products
        .iter()
        .filter(|p| p.is_active)
        .filter_map(|p| depth.get(&p.category_id).map(|d| (p, *d)))
        .filter(|(p, _)| seen.insert(p.id))
        .collect();

    picked.sort_by_key(|(p, d)| (!p.is_featured, *d, p.sort_order, p.id));

    picked
        .into_iter()
        .take(limit)
        .map(|(p, _)| p.card(lang))
        .collect()
}

/// Ids of every category that can appear in the menu (used to narrow the product query)
pub fn menu_category_ids(categories: &[Category]) -> Vec<i64> {
    let forest = prune(build_tree(categories.to_vec()), &|c: &Category| c.is_active);
    forest
        .iter()
        .filter(|root| root.item.show_in_menu)
        .flat_map(|root| flatten(std::slice::from_ref(root)))
        .map(|(_, c)| c.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::{CategoryTranslation, ProductTranslation};

    fn category(id: i64, parent_id: Option<i64>, show_in_menu: bool) -> Category {
        Category {
            id,
            parent_id,
            slug: format!("cat-{id}"),
            image_url: None,
            icon: None,
            sort_order: 0,
            is_active: true,
            show_in_menu,
            template_schema: Vec::new(),
            created_at: 0,
            updated_at: 0,
            translations: vec![CategoryTranslation {
                lang_code: "en".into(),
                name: format!("Category {id}"),
                description: None,
            }],
        }
    }

    fn product(id: i64, category_id: i64, sort_order: i32, featured: bool) -> Product {
        Product {
            id,
            category_id,
            slug: format!("p-{id}"),
            sku: None,
            base_price: Decimal::ONE,
            image_url: None,
            gallery: vec![],
            attributes: Default::default(),
            sort_order,
            is_active: true,
            is_featured: featured,
            created_at: 0,
            updated_at: 0,
            translations: vec![ProductTranslation {
                lang_code: "tr".into(),
                name: format!("Ürün {id}"),
                short_description: None,
                description: None,
            }],
        }
    }

    fn product_ids(column: &MegaMenuColumn) -> Vec<i64> {
        column.products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_only_menu_roots_get_columns() {
        let categories = vec![
            category(1, None, true),
            category(2, None, false),
            category(3, Some(1), true),
        ];
        let menu = build_mega_menu(categories, &[], Lang::En, 6);
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].category.name, "Category 1");
        assert_eq!(menu[0].children.len(), 1);
        assert_eq!(menu[0].children[0].item.id, 3);
    }

    #[test]
    fn test_products_aggregate_from_descendants() {
        let categories = vec![
            category(1, None, true),
            category(2, Some(1), false),
            category(3, Some(2), false),
            category(9, None, true),
        ];
        let products = vec![
            product(100, 3, 0, false),
            product(101, 1, 5, false),
            product(102, 2, 0, false),
            product(103, 9, 0, false),
        ];
        let menu = build_mega_menu(categories, &products, Lang::En, 10);
        // own category first, then by depth
        assert_eq!(product_ids(&menu[0]), vec![101, 102, 100]);
        assert_eq!(product_ids(&menu[1]), vec![103]);
    }

    #[test]
    fn test_featured_first_and_limit() {
        let categories = vec![category(1, None, true), category(2, Some(1), false)];
        let products = vec![
            product(10, 1, 0, false),
            product(11, 1, 1, false),
            product(12, 2, 9, true),
        ];
        let menu = build_mega_menu(categories, &products, Lang::En, 2);
        assert_eq!(product_ids(&menu[0]), vec![12, 10]);
    }

    #[test]
    fn test_inactive_products_and_duplicates_skipped() {
        let categories = vec![category(1, None, true)];
        let mut hidden = product(20, 1, 0, true);
        hidden.is_active = false;
        let products = vec![hidden, product(21, 1, 0, false), product(21, 1, 0, false)];
        let menu = build_mega_menu(categories, &products, Lang::En, 6);
        assert_eq!(product_ids(&menu[0]), vec![21]);
    }

    #[test]
    fn test_inactive_subtree_is_pruned() {
        let mut hidden = category(2, Some(1), false);
        hidden.is_active = false;
        let categories = vec![category(1, None, true), hidden, category(3, Some(2), false)];
        let products = vec![product(30, 3, 0, false)];

        let menu = build_mega_menu(categories.clone(), &products, Lang::En, 6);
        assert!(menu[0].children.is_empty());
        assert!(menu[0].products.is_empty());
        assert_eq!(menu_category_ids(&categories), vec![1]);
    }

    #[test]
    fn test_zero_limit() {
        let menu = build_mega_menu(
            vec![category(1, None, true)],
            &[product(1, 1, 0, false)],
            Lang::Tr,
            0,
        );
        assert!(menu[0].products.is_empty());
    }

    #[test]
    fn test_product_names_are_localized_with_fallback() {
        let menu = build_mega_menu(
            vec![category(1, None, true)],
            &[product(1, 1, 0, false)],
            Lang::De,
            6,
        );
        assert_eq!(menu[0].products[0].name, "Ürün 1");
        assert_eq!(menu[0].category.name, "Category 1");
    }
}
