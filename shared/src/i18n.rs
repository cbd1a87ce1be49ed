//! Languages, translation-row selection and UI string tables
//!
//! Every translatable entity stores one row per language (`lang_code` +
//! text fields). Readers never index those rows directly; they go through
//! [`pick_translation`], which applies the storefront fallback chain:
//!
//! requested language → English → Turkish → first available row.
//!
//! The same chain is used by [`LocalizedText`] (inline per-language maps such
//! as template field labels) and by the UI string table [`t`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Supported storefront languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Turkish (site default)
    #[default]
    Tr,
    /// English
    En,
    /// German
    De,
}

/// Fallback chain after the requested language
const FALLBACK_CHAIN: [&str; 2] = ["en", "tr"];

impl Lang {
    pub const ALL: [Lang; 3] = [Lang::Tr, Lang::En, Lang::De];

    pub const fn code(self) -> &'static str {
        match self {
            Self::Tr => "tr",
            Self::En => "en",
            Self::De => "de",
        }
    }

    /// Parse a language tag, case-insensitive, tolerant of region suffixes (`en-US`, `de_AT`).
    pub fn parse(value: &str) -> Option<Self> {
        let primary = value
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "tr" => Some(Self::Tr),
            "en" => Some(Self::En),
            "de" => Some(Self::De),
            _ => None,
        }
    }

    /// Pick the first supported language of an `Accept-Language` header.
    ///
    /// Entries are taken in header order; `q` weights of zero are skipped.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header.split(',').find_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            let rejected = parts.any(|p| {
                p.trim()
                    .strip_prefix("q=")
                    .and_then(|q| q.parse::<f32>().ok())
                    .is_some_and(|q| q <= 0.0)
            });
            if rejected { None } else { Self::parse(tag) }
        })
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A per-language text row joined to a base entity
pub trait Translation {
    fn lang_code(&self) -> &str;
}

/// Select the translation row for `lang` following the fallback chain.
pub fn pick_translation<T: Translation>(rows: &[T], lang: Lang) -> Option<&T> {
    std::iter::once(lang.code())
        .chain(FALLBACK_CHAIN)
        .find_map(|code| rows.iter().find(|r| r.lang_code() == code))
        .or_else(|| rows.first())
}

/// Inline per-language text (`{"tr": "...", "en": "..."}`).
///
/// Deserializes from either an object or a plain string; a plain string is
/// stored under Turkish and therefore served for every language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocalizedText(pub BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, lang: Lang, text: impl Into<String>) -> Self {
        self.0.insert(lang.code().to_string(), text.into());
        self
    }

    /// Resolve the text for `lang` (requested → en → tr → first non-empty).
    pub fn get(&self, lang: Lang) -> Option<&str> {
        let non_empty = |code: &str| {
            self.0
                .get(code)
                .map(String::as_str)
                .filter(|s| !s.trim().is_empty())
        };
        std::iter::once(lang.code())
            .chain(FALLBACK_CHAIN)
            .find_map(non_empty)
            .or_else(|| {
                self.0
                    .values()
                    .map(String::as_str)
                    .find(|s| !s.trim().is_empty())
            })
    }

    pub fn is_blank(&self) -> bool {
        self.0.values().all(|s| s.trim().is_empty())
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Plain(String),
            Map(BTreeMap<String, String>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Plain(s) => Self(BTreeMap::from([(Lang::Tr.code().to_string(), s)])),
            Raw::Map(m) => Self(m),
        })
    }
}

// ── UI string tables ──

type Table = HashMap<&'static str, &'static str>;

const TR: &[(&str, &str)] = &[
    ("common.yes", "Evet"),
    ("common.no", "Hayır"),
    ("contact.success", "Mesajınız alındı. En kısa sürede size dönüş yapacağız."),
    ("contact.name_required", "Lütfen adınızı girin."),
    ("contact.email_invalid", "Lütfen geçerli bir e-posta adresi girin."),
    ("contact.message_required", "Lütfen mesajınızı yazın."),
    ("contact.too_long", "Metin çok uzun."),
    ("template.required", "Bu alan zorunludur."),
    ("template.not_a_number", "Lütfen bir sayı girin."),
    ("template.out_of_range", "Değer izin verilen aralığın dışında."),
    ("template.too_long", "Metin çok uzun."),
    ("template.invalid_option", "Lütfen listeden bir seçenek seçin."),
    ("template.not_a_boolean", "Geçersiz onay değeri."),
    ("template.unknown_paper", "Seçilen kağıt türü mevcut değil."),
    ("template.invalid_value", "Geçersiz değer."),
    ("quote.unit_price", "Birim fiyat"),
    ("quote.discount", "İndirim"),
    ("quote.total", "Toplam"),
    ("blog.read_more", "Devamını oku"),
    ("menu.all_products", "Tüm ürünler"),
];

const EN: &[(&str, &str)] = &[
    ("common.yes", "Yes"),
    ("common.no", "No"),
    ("contact.success", "Your message has been received. We will get back to you shortly."),
    ("contact.name_required", "Please enter your name."),
    ("contact.email_invalid", "Please enter a valid email address."),
    ("contact.message_required", "Please write your message."),
    ("contact.too_long", "Text is too long."),
    ("template.required", "This field is required."),
    ("template.not_a_number", "Please enter a number."),
    ("template.out_of_range", "Value is outside the allowed range."),
    ("template.too_long", "Text is too long."),
    ("template.invalid_option", "Please pick an option from the list."),
    ("template.not_a_boolean", "Invalid checkbox value."),
    ("template.unknown_paper", "The selected paper type is not available."),
    ("template.invalid_value", "Invalid value."),
    ("quote.unit_price", "Unit price"),
    ("quote.discount", "Discount"),
    ("quote.total", "Total"),
    ("blog.read_more", "Read more"),
    ("menu.all_products", "All products"),
];

const DE: &[(&str, &str)] = &[
    ("common.yes", "Ja"),
    ("common.no", "Nein"),
    ("contact.success", "Ihre Nachricht ist eingegangen. Wir melden uns in Kürze."),
    ("contact.name_required", "Bitte geben Sie Ihren Namen ein."),
    ("contact.email_invalid", "Bitte geben Sie eine gültige E-Mail-Adresse ein."),
    ("contact.message_required", "Bitte schreiben Sie Ihre Nachricht."),
    ("template.required", "Dieses Feld ist erforderlich."),
    ("template.not_a_number", "Bitte geben Sie eine Zahl ein."),
    ("template.out_of_range", "Der Wert liegt außerhalb des zulässigen Bereichs."),
    ("template.invalid_option", "Bitte wählen Sie eine Option aus der Liste."),
    ("template.invalid_value", "Ungültiger Wert."),
    ("quote.unit_price", "Stückpreis"),
    ("quote.discount", "Rabatt"),
    ("quote.total", "Gesamt"),
    ("blog.read_more", "Weiterlesen"),
    ("menu.all_products", "Alle Produkte"),
];

fn tables() -> &'static HashMap<Lang, Table> {
    static TABLES: OnceLock<HashMap<Lang, Table>> = OnceLock::new();
    TABLES.get_or_init(|| {
        HashMap::from([
            (Lang::Tr, TR.iter().copied().collect()),
            (Lang::En, EN.iter().copied().collect()),
            (Lang::De, DE.iter().copied().collect()),
        ])
    })
}

/// Look up a UI string (requested → en → tr → the key itself).
pub fn t(lang: Lang, key: &str) -> String {
    std::iter::once(lang)
        .chain([Lang::En, Lang::Tr])
        .find_map(|l| tables().get(&l).and_then(|table| table.get(key)))
        .map(|s| (*s).to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Full UI string table for a language, with missing keys filled from the fallback chain.
pub fn catalog(lang: Lang) -> BTreeMap<&'static str, String> {
    let mut out = BTreeMap::new();
    for key in TR.iter().chain(EN).map(|(k, _)| *k) {
        out.entry(key).or_insert_with(|| t(lang, key));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        lang: &'static str,
        name: &'static str,
    }

    impl Translation for Row {
        fn lang_code(&self) -> &str {
            self.lang
        }
    }

    fn row(lang: &'static str, name: &'static str) -> Row {
        Row { lang, name }
    }

    #[test]
    fn test_lang_parse() {
        assert_eq!(Lang::parse("tr"), Some(Lang::Tr));
        assert_eq!(Lang::parse("EN"), Some(Lang::En));
        assert_eq!(Lang::parse("en-US"), Some(Lang::En));
        assert_eq!(Lang::parse("de_AT"), Some(Lang::De));
        assert_eq!(Lang::parse("fr"), None);
        assert_eq!(Lang::parse(""), None);
    }

    #[test]
    fn test_accept_language() {
        assert_eq!(
            Lang::from_accept_language("fr-FR,fr;q=0.9,de;q=0.8,en;q=0.7"),
            Some(Lang::De)
        );
        assert_eq!(Lang::from_accept_language("en;q=0,tr"), Some(Lang::Tr));
        assert_eq!(Lang::from_accept_language("ja"), None);
    }

    #[test]
    fn test_pick_requested_language() {
        let rows = [row("tr", "Kartvizit"), row("en", "Business card"), row("de", "Visitenkarte")];
        assert_eq!(pick_translation(&rows, Lang::De).unwrap().name, "Visitenkarte");
    }

    #[test]
    fn test_pick_falls_back_to_english_then_turkish() {
        let rows = [row("tr", "Kartvizit"), row("en", "Business card")];
        assert_eq!(pick_translation(&rows, Lang::De).unwrap().name, "Business card");

        let rows = [row("tr", "Kartvizit")];
        assert_eq!(pick_translation(&rows, Lang::De).unwrap().name, "Kartvizit");
    }

    #[test]
    fn test_pick_falls_back_to_first_available() {
        let rows = [row("ar", "بطاقة"), row("fr", "Carte")];
        assert_eq!(pick_translation(&rows, Lang::En).unwrap().name, "بطاقة");

        let empty: [Row; 0] = [];
        assert!(pick_translation(&empty, Lang::En).is_none());
    }

    #[test]
    fn test_localized_text_from_plain_string() {
        let text: LocalizedText = serde_json::from_str("\"Kağıt\"").unwrap();
        assert_eq!(text.get(Lang::En), Some("Kağıt"));
    }

    #[test]
    fn test_localized_text_fallback_skips_blank() {
        let text: LocalizedText =
            serde_json::from_str(r#"{"tr": "Adet", "en": "  ", "de": ""}"#).unwrap();
        assert_eq!(text.get(Lang::De), Some("Adet"));
        assert!(!text.is_blank());
        assert!(LocalizedText::new().is_blank());
    }

    #[test]
    fn test_ui_string_fallback() {
        assert_eq!(t(Lang::Tr, "common.yes"), "Evet");
        // not translated to German -> English
        assert_eq!(t(Lang::De, "template.unknown_paper"), t(Lang::En, "template.unknown_paper"));
        assert_eq!(t(Lang::En, "missing.key"), "missing.key");
    }

    #[test]
    fn test_catalog_is_complete_for_every_language() {
        let tr = catalog(Lang::Tr);
        for lang in Lang::ALL {
            let table = catalog(lang);
            assert_eq!(table.len(), tr.len());
            assert!(table.values().all(|v| !v.is_empty()));
        }
    }
}
