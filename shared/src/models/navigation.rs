//! Navigation Item Model (header / footer menus)

use serde::{Deserialize, Serialize};

use super::{default_true, double_option};
use crate::i18n::{Lang, Translation, pick_translation};

/// Which menu an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavMenu {
    Header,
    Footer,
}

impl NavMenu {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "header" => Some(Self::Header),
            "footer" => Some(Self::Footer),
            _ => None,
        }
    }
}

/// What `target` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Free URL (absolute or site-relative)
    Url,
    /// Category slug
    Category,
    /// Product slug
    Product,
    /// Service slug
    Service,
    /// Blog post slug
    Blog,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Category => "category",
            Self::Product => "product",
            Self::Service => "service",
            Self::Blog => "blog",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "url" => Some(Self::Url),
            "category" => Some(Self::Category),
            "product" => Some(Self::Product),
            "service" => Some(Self::Service),
            "blog" => Some(Self::Blog),
            _ => None,
        }
    }

    /// Storefront path for `target` in `lang`
    pub fn href(&self, target: &str, lang: Lang) -> String {
        match self {
            Self::Url => target.to_string(),
            Self::Category => format!("/{lang}/categories/{target}"),
            Self::Product => format!("/{lang}/products/{target}"),
            Self::Service => format!("/{lang}/services/{target}"),
            Self::Blog => format!("/{lang}/blog/{target}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationItem {
    pub id: i64,
    pub menu: NavMenu,
    pub parent_id: Option<i64>,
    pub link_type: LinkType,
    pub target: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub open_in_new_tab: bool,
    #[serde(default)]
    pub translations: Vec<NavigationItemTranslation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct NavigationItemTranslation {
    pub lang_code: String,
    pub label: String,
}

impl Translation for NavigationItemTranslation {
    fn lang_code(&self) -> &str {
        &self.lang_code
    }
}

impl NavigationItem {
    pub fn localize(&self, lang: Lang) -> LocalizedNavItem {
        LocalizedNavItem {
            id: self.id,
            parent_id: self.parent_id,
            label: pick_translation(&self.translations, lang)
                .map_or_else(|| self.target.clone(), |t| t.label.clone()),
            href: self.link_type.href(&self.target, lang),
            open_in_new_tab: self.open_in_new_tab,
            sort_order: self.sort_order,
        }
    }
}

/// Create navigation item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationItemCreate {
    pub menu: NavMenu,
    pub parent_id: Option<i64>,
    pub link_type: LinkType,
    pub target: String,
    pub sort_order: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub open_in_new_tab: bool,
    pub translations: Vec<NavigationItemTranslation>,
}

/// Update navigation item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationItemUpdate {
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i64>>,
    pub link_type: Option<LinkType>,
    pub target: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub open_in_new_tab: Option<bool>,
    pub translations: Option<Vec<NavigationItemTranslation>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedNavItem {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub label: String,
    pub href: String,
    pub open_in_new_tab: bool,
    pub sort_order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href() {
        assert_eq!(LinkType::Category.href("kartvizit", Lang::En), "/en/categories/kartvizit");
        assert_eq!(LinkType::Url.href("https://x.com", Lang::De), "https://x.com");
    }

    #[test]
    fn test_localize_label_falls_back_to_target() {
        let item = NavigationItem {
            id: 1,
            menu: NavMenu::Header,
            parent_id: None,
            link_type: LinkType::Blog,
            target: "haberler".into(),
            sort_order: 0,
            is_active: true,
            open_in_new_tab: false,
            translations: vec![],
        };
        let nav = item.localize(Lang::Tr);
        assert_eq!(nav.label, "haberler");
        assert_eq!(nav.href, "/tr/blog/haberler");
    }

    #[test]
    fn test_menu_parse() {
        assert_eq!(NavMenu::parse("footer"), Some(NavMenu::Footer));
        assert_eq!(NavMenu::parse("sidebar"), None);
    }
}
