//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Catalog errors
/// - 4xxx: Content errors
/// - 5xxx: Contact errors
/// - 6xxx: Template errors
/// - 7xxx: Pricing errors
/// - 8xxx: Media errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Catalog errors (3xxx)
    Catalog,
    /// Content errors (4xxx)
    Content,
    /// Contact form errors (5xxx)
    Contact,
    /// Template schema errors (6xxx)
    Template,
    /// Material & pricing errors (7xxx)
    Pricing,
    /// Media errors (8xxx)
    Media,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Catalog,
            4000..5000 => Self::Content,
            5000..6000 => Self::Contact,
            6000..7000 => Self::Template,
            7000..8000 => Self::Pricing,
            8000..9000 => Self::Media,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Catalog => "catalog",
            Self::Content => "content",
            Self::Contact => "contact",
            Self::Template => "template",
            Self::Pricing => "pricing",
            Self::Media => "media",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Content);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Contact);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Template);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Pricing);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::Media);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenExpired.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::ProductNotFound.category(), ErrorCategory::Catalog);
        assert_eq!(ErrorCode::SettingInvalid.category(), ErrorCategory::Content);
        assert_eq!(ErrorCode::ContactFormInvalid.category(), ErrorCategory::Contact);
        assert_eq!(
            ErrorCode::TemplateSchemaInvalid.category(),
            ErrorCategory::Template
        );
        assert_eq!(ErrorCode::MaterialInUse.category(), ErrorCategory::Pricing);
        assert_eq!(ErrorCode::FileTooLarge.category(), ErrorCategory::Media);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Catalog).unwrap();
        assert_eq!(json, "\"catalog\"");

        let category: ErrorCategory = serde_json::from_str("\"media\"").unwrap();
        assert_eq!(category, ErrorCategory::Media);
    }
}
