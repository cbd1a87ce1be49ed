//! Catalog structure: category/navigation trees and the mega-menu

pub mod mega_menu;
pub mod tree;

pub use mega_menu::{MegaMenuColumn, build_mega_menu, menu_category_ids};
pub use tree::{
    ParentError, TreeItem, TreeNode, breadcrumb, build_tree, check_parent, descendant_ids, find,
    flatten, prune,
};
