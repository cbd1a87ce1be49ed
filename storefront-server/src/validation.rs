//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! admin CRUD handlers and the public contact form.

use std::collections::HashSet;

use shared::error::{AppError, ErrorCode};
use shared::i18n::{Lang, t};
use shared::models::ContactSubmit;
use shared::util::is_safe_link;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, service, navigation label, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Slugs and material codes
pub const MAX_SLUG_LEN: usize = 120;

/// Short descriptions, excerpts, testimonial titles
pub const MAX_SHORT_TEXT_LEN: usize = 500;

/// Long-form content (blog posts, product descriptions)
pub const MAX_CONTENT_LEN: usize = 100_000;

/// Contact form message
pub const MAX_MESSAGE_LEN: usize = 5_000;

/// Phone numbers, SKUs
pub const MAX_PHONE_LEN: usize = 40;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Lowercase ASCII letters, digits and single inner dashes
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("slug '{slug}' must be lowercase letters, digits and dashes"),
        )
        .with_detail("field", "slug"))
    }
}

/// Minimal shape check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Translation rows must name supported, distinct languages
pub fn validate_lang_codes<'a>(
    codes: impl IntoIterator<Item = &'a str>,
    required: bool,
) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for code in codes {
        if Lang::parse(code).map(Lang::code) != Some(code) {
            return Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("unsupported language code '{code}'"),
            ));
        }
        if !seen.insert(code) {
            return Err(AppError::with_message(
                ErrorCode::InvalidRequest,
                format!("duplicate translation for '{code}'"),
            ));
        }
    }
    if required && seen.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "at least one translation is required",
        ));
    }
    Ok(())
}

/// An http(s) URL or a site-relative path (not `//host`)
pub fn validate_url(url: &str, field: &str) -> Result<(), AppError> {
    if url.chars().count() > MAX_URL_LEN {
        return Err(AppError::validation(format!("{field} is too long (max {MAX_URL_LEN})"))
            .with_detail("field", field));
    }
    if !is_safe_link(url) {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("{field} must be an http(s) URL or a site path"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

pub fn validate_optional_url(value: &Option<String>, field: &str) -> Result<(), AppError> {
    match value {
        Some(url) => validate_url(url, field),
        None => Ok(()),
    }
}

// ── Contact form ────────────────────────────────────────────────────

/// Validate a contact submission; messages are localized for the visitor.
pub fn validate_contact(form: &ContactSubmit, lang: Lang) -> Result<(), AppError> {
    let mut fields: Vec<(&str, String)> = Vec::new();

    if form.name.trim().is_empty() {
        fields.push(("name", t(lang, "contact.name_required")));
    } else if form.name.chars().count() > MAX_NAME_LEN {
        fields.push(("name", t(lang, "contact.too_long")));
    }
    if !is_valid_email(&form.email) {
        fields.push(("email", t(lang, "contact.email_invalid")));
    }
    if form.message.trim().is_empty() {
        fields.push(("message", t(lang, "contact.message_required")));
    } else if form.message.chars().count() > MAX_MESSAGE_LEN {
        fields.push(("message", t(lang, "contact.too_long")));
    }
    for (field, value, max) in [
        ("phone", &form.phone, MAX_PHONE_LEN),
        ("subject", &form.subject, MAX_NAME_LEN),
        ("product_slug", &form.product_slug, MAX_SLUG_LEN),
    ] {
        if value.as_ref().is_some_and(|v| v.chars().count() > max) {
            fields.push((field, t(lang, "contact.too_long")));
        }
    }

    if fields.is_empty() {
        return Ok(());
    }

    let message = fields
        .iter()
        .map(|(_, msg)| msg.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let details: serde_json::Map<String, serde_json::Value> = fields
        .into_iter()
        .map(|(field, msg)| (field.to_string(), serde_json::Value::String(msg)))
        .collect();
    Err(AppError::with_message(ErrorCode::ContactFormInvalid, message)
        .with_detail("fields", serde_json::Value::Object(details)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactSubmit {
        ContactSubmit {
            name: name.into(),
            email: email.into(),
            phone: None,
            subject: None,
            message: message.into(),
            product_slug: None,
        }
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Kartvizit", "name", 10).is_ok());
        assert_eq!(
            validate_required_text("  ", "name", 10).unwrap_err().code,
            ErrorCode::RequiredField
        );
        assert_eq!(
            validate_required_text("abcdefghijk", "name", 10).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
        // counts characters, not bytes
        assert!(validate_required_text("ğğğğğ", "name", 5).is_ok());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "x", 1).is_ok());
        assert!(validate_optional_text(&Some("ab".into()), "x", 1).is_err());
    }

    #[test]
    fn test_slug() {
        assert!(is_valid_slug("business-cards-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Business"));
        assert!(!is_valid_slug("-x"));
        assert!(!is_valid_slug("a--b"));
        assert!(!is_valid_slug("kağıt"));
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("info@matbaa.com.tr"));
        assert!(is_valid_email("  a@b.de "));
        assert!(!is_valid_email("no-at.example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));
    }

    #[test]
    fn test_lang_codes() {
        assert!(validate_lang_codes(["tr", "en", "de"], true).is_ok());
        assert!(validate_lang_codes(["fr"], false).is_err());
        assert!(validate_lang_codes(["EN"], false).is_err());
        assert!(validate_lang_codes(["tr", "tr"], false).is_err());
        assert!(validate_lang_codes([], true).is_err());
        assert!(validate_lang_codes([], false).is_ok());
    }

    #[test]
    fn test_optional_url() {
        assert!(validate_optional_url(&Some("/media/a.jpg".into()), "image_url").is_ok());
        assert!(validate_optional_url(&Some("https://cdn.x/a.jpg".into()), "image_url").is_ok());
        assert!(validate_optional_url(&Some("javascript:void(0)".into()), "image_url").is_err());
        assert!(validate_optional_url(&None, "image_url").is_ok());
    }

    #[test]
    fn test_url_rejects_protocol_relative() {
        let err = validate_url("//evil.example/phish", "target").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert!(validate_url("/\\evil.example", "target").is_err());
        assert!(validate_url("/tr/urunler", "target").is_ok());
    }

    #[test]
    fn test_contact_ok() {
        assert!(validate_contact(&form("Ayşe", "ayse@example.com", "Merhaba"), Lang::Tr).is_ok());
    }

    #[test]
    fn test_contact_errors_are_localized_per_field() {
        let err = validate_contact(&form(" ", "nope", ""), Lang::De).unwrap_err();
        assert_eq!(err.code, ErrorCode::ContactFormInvalid);
        let fields = &err.details.unwrap()["fields"];
        assert_eq!(fields["name"], "Bitte geben Sie Ihren Namen ein.");
        assert_eq!(fields["email"], "Bitte geben Sie eine gültige E-Mail-Adresse ein.");
        assert_eq!(fields["message"], "Bitte schreiben Sie Ihre Nachricht.");
    }

    #[test]
    fn test_contact_too_long() {
        let mut f = form("Ali", "ali@example.com", &"x".repeat(MAX_MESSAGE_LEN + 1));
        f.phone = Some("1".repeat(MAX_PHONE_LEN + 1));
        let err = validate_contact(&f, Lang::En).unwrap_err();
        let fields = &err.details.unwrap()["fields"];
        assert_eq!(fields["message"], "Text is too long.");
        assert_eq!(fields["phone"], "Text is too long.");
    }
}
