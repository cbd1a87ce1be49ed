//! Site Settings Model
//!
//! Settings are stored as one JSON document per key in `site_settings`.
//! Known keys have a typed shape that is checked on write; the public
//! storefront only ever sees [`PublicSettings`], resolved for one language.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::i18n::{Lang, LocalizedText};
use crate::util::is_safe_link;

/// Stored setting row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SiteSetting {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: i64,
}

/// Known setting keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    General,
    Contact,
    SocialLinks,
    Footer,
    Seo,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct SettingValueError(pub String);

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::General,
        SettingKey::Contact,
        SettingKey::SocialLinks,
        SettingKey::Footer,
        SettingKey::Seo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Contact => "contact",
            Self::SocialLinks => "social_links",
            Self::Footer => "footer",
            Self::Seo => "seo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Check a value against the key's shape and return it re-serialized
    /// (unknown fields dropped, defaults filled in).
    pub fn normalize(&self, value: serde_json::Value) -> Result<serde_json::Value, SettingValueError> {
        match self {
            Self::General => reshape::<GeneralSettings>(value),
            Self::Contact => reshape::<ContactSettings>(value),
            Self::SocialLinks => reshape::<Vec<SocialLink>>(value),
            Self::Footer => reshape::<FooterSettings>(value),
            Self::Seo => reshape::<SeoSettings>(value),
        }
    }
}

trait CheckSetting {
    fn check(&self) -> Result<(), SettingValueError> {
        Ok(())
    }
}

fn reshape<T>(value: serde_json::Value) -> Result<serde_json::Value, SettingValueError>
where
    T: DeserializeOwned + Serialize + CheckSetting,
{
    let typed: T = serde_json::from_value(value).map_err(|e| SettingValueError(e.to_string()))?;
    typed.check()?;
    serde_json::to_value(&typed).map_err(|e| SettingValueError(e.to_string()))
}

/// Absolute http(s) URL or site-relative path
fn check_link(field: &str, url: &str) -> Result<(), SettingValueError> {
    let url = url.trim();
    if is_safe_link(url) {
        Ok(())
    } else {
        Err(SettingValueError(format!("{field}: invalid link '{url}'")))
    }
}

// ── general ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralSettings {
    #[serde(default)]
    pub site_name: LocalizedText,
    #[serde(default)]
    pub tagline: LocalizedText,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub default_lang: Lang,
}

impl CheckSetting for GeneralSettings {
    fn check(&self) -> Result<(), SettingValueError> {
        if self.site_name.is_blank() {
            return Err(SettingValueError("site_name is required".into()));
        }
        Ok(())
    }
}

// ── contact ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSettings {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub address: LocalizedText,
    #[serde(default)]
    pub working_hours: LocalizedText,
    pub map_embed_url: Option<String>,
}

impl CheckSetting for ContactSettings {
    fn check(&self) -> Result<(), SettingValueError> {
        if let Some(email) = &self.email
            && !email.contains('@')
        {
            return Err(SettingValueError(format!("email: invalid address '{email}'")));
        }
        if let Some(url) = &self.map_embed_url {
            check_link("map_embed_url", url)?;
        }
        Ok(())
    }
}

// ── social links ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// e.g. "instagram", "facebook", "linkedin"
    pub platform: String,
    pub url: String,
}

impl CheckSetting for Vec<SocialLink> {
    fn check(&self) -> Result<(), SettingValueError> {
        for link in self {
            if link.platform.trim().is_empty() {
                return Err(SettingValueError("platform is required".into()));
            }
            check_link(&link.platform, &link.url)?;
        }
        Ok(())
    }
}

// ── footer ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterLink {
    pub label: LocalizedText,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterColumn {
    pub title: LocalizedText,
    #[serde(default)]
    pub links: Vec<FooterLink>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FooterSettings {
    #[serde(default)]
    pub columns: Vec<FooterColumn>,
    #[serde(default)]
    pub copyright: LocalizedText,
}

impl CheckSetting for FooterSettings {
    fn check(&self) -> Result<(), SettingValueError> {
        for column in &self.columns {
            for link in &column.links {
                check_link("footer link", &link.url)?;
            }
        }
        Ok(())
    }
}

// ── seo ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeoSettings {
    #[serde(default)]
    pub meta_title: LocalizedText,
    #[serde(default)]
    pub meta_description: LocalizedText,
    pub og_image: Option<String>,
}

impl CheckSetting for SeoSettings {}

// ── public view ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicContact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub address: Option<String>,
    pub working_hours: Option<String>,
    pub map_embed_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicFooterLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicFooterColumn {
    pub title: String,
    pub links: Vec<PublicFooterLink>,
}

/// `GET /api/settings`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicSettings {
    pub site_name: Option<String>,
    pub tagline: Option<String>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub default_lang: Lang,
    pub contact: PublicContact,
    pub social_links: Vec<SocialLink>,
    pub footer_columns: Vec<PublicFooterColumn>,
    pub copyright: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_image: Option<String>,
}

impl PublicSettings {
    /// Resolve stored settings for `lang`. Missing or malformed keys fall back to defaults.
    pub fn resolve(rows: &[SiteSetting], lang: Lang) -> Self {
        let general: GeneralSettings = typed(rows, SettingKey::General);
        let contact: ContactSettings = typed(rows, SettingKey::Contact);
        let social_links: Vec<SocialLink> = typed(rows, SettingKey::SocialLinks);
        let footer: FooterSettings = typed(rows, SettingKey::Footer);
        let seo: SeoSettings = typed(rows, SettingKey::Seo);

        let text = |t: &LocalizedText| t.get(lang).map(str::to_string);

        Self {
            site_name: text(&general.site_name),
            tagline: text(&general.tagline),
            logo_url: general.logo_url,
            favicon_url: general.favicon_url,
            default_lang: general.default_lang,
            contact: PublicContact {
                email: contact.email,
                phone: contact.phone,
                whatsapp: contact.whatsapp,
                address: text(&contact.address),
                working_hours: text(&contact.working_hours),
                map_embed_url: contact.map_embed_url,
            },
            social_links,
            footer_columns: footer
                .columns
                .iter()
                .map(|col| PublicFooterColumn {
                    title: text(&col.title).unwrap_or_default(),
                    links: col
                        .links
                        .iter()
                        .map(|l| PublicFooterLink {
                            label: text(&l.label).unwrap_or_default(),
                            url: l.url.clone(),
                        })
                        .collect(),
                })
                .collect(),
            copyright: text(&footer.copyright),
            meta_title: text(&seo.meta_title),
            meta_description: text(&seo.meta_description),
            og_image: seo.og_image,
        }
    }
}

fn typed<T: DeserializeOwned + Default>(rows: &[SiteSetting], key: SettingKey) -> T {
    rows.iter()
        .find(|r| r.key == key.as_str())
        .and_then(|r| serde_json::from_value(r.value.clone()).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_keys() {
        assert_eq!(SettingKey::parse("social_links"), Some(SettingKey::SocialLinks));
        assert_eq!(SettingKey::parse("unknown"), None);
    }

    #[test]
    fn test_normalize_general_requires_site_name() {
        let err = SettingKey::General.normalize(json!({"tagline": "x"})).unwrap_err();
        assert!(err.0.contains("site_name"));

        let ok = SettingKey::General
            .normalize(json!({"site_name": {"tr": "Baskı Atölyesi"}, "extra": 1}))
            .unwrap();
        assert!(ok.get("extra").is_none());
        assert_eq!(ok["default_lang"], "tr");
    }

    #[test]
    fn test_normalize_social_links_rejects_bad_url() {
        let err = SettingKey::SocialLinks
            .normalize(json!([{"platform": "instagram", "url": "javascript:alert(1)"}]))
            .unwrap_err();
        assert!(err.0.contains("instagram"));
        assert!(
            SettingKey::SocialLinks
                .normalize(json!([{"platform": "x", "url": "//evil.example"}]))
                .is_err()
        );

        assert!(
            SettingKey::SocialLinks
                .normalize(json!([{"platform": "instagram", "url": "https://instagram.com/x"}]))
                .is_ok()
        );
    }

    #[test]
    fn test_normalize_rejects_wrong_shape() {
        assert!(SettingKey::Footer.normalize(json!("not an object")).is_err());
    }

    #[test]
    fn test_public_settings_resolve() {
        let rows = vec![
            SiteSetting {
                key: "general".into(),
                value: json!({"site_name": {"tr": "Matbaa", "en": "Print Shop"}}),
                updated_at: 0,
            },
            SiteSetting {
                key: "footer".into(),
                value: json!({"columns": [{"title": "Kurumsal",
                    "links": [{"label": {"tr": "Hakkımızda", "de": "Über uns"}, "url": "/about"}]}]}),
                updated_at: 0,
            },
            SiteSetting {
                key: "contact".into(),
                value: json!(42),
                updated_at: 0,
            },
        ];

        let s = PublicSettings::resolve(&rows, Lang::De);
        assert_eq!(s.site_name.as_deref(), Some("Print Shop"));
        assert_eq!(s.footer_columns[0].title, "Kurumsal");
        assert_eq!(s.footer_columns[0].links[0].label, "Über uns");
        // malformed contact falls back to empty
        assert!(s.contact.email.is_none());
    }
}
