//! Unified error codes for the storefront
//!
//! Error codes are shared by the storefront API, the admin panel and the
//! frontend. They are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalog errors (categories, products)
//! - 4xxx: Content errors (blog, testimonials, services, navigation, settings)
//! - 5xxx: Contact form errors
//! - 6xxx: Template schema errors
//! - 7xxx: Material & pricing errors
//! - 8xxx: Media errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Too many requests from the same client
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 3xxx: Catalog ====================
    /// Category not found
    CategoryNotFound = 3001,
    /// Category slug already exists
    CategorySlugExists = 3002,
    /// Category still has products
    CategoryHasProducts = 3003,
    /// Category still has child categories
    CategoryHasChildren = 3004,
    /// Category parent would create a cycle
    CategoryParentInvalid = 3005,
    /// Product not found
    ProductNotFound = 3101,
    /// Product slug already exists
    ProductSlugExists = 3102,
    /// Product has invalid price
    ProductInvalidPrice = 3103,

    // ==================== 4xxx: Content ====================
    /// Blog post not found
    BlogPostNotFound = 4001,
    /// Blog post slug already exists
    BlogPostSlugExists = 4002,
    /// Testimonial not found
    TestimonialNotFound = 4101,
    /// Service not found
    ServiceNotFound = 4201,
    /// Service slug already exists
    ServiceSlugExists = 4202,
    /// Navigation item not found
    NavigationItemNotFound = 4301,
    /// Unknown navigation menu
    NavigationMenuInvalid = 4302,
    /// Site setting key not found
    SettingNotFound = 4401,
    /// Site setting value has the wrong shape
    SettingInvalid = 4402,

    // ==================== 5xxx: Contact ====================
    /// Contact message not found
    ContactMessageNotFound = 5001,
    /// Contact form invalid
    ContactFormInvalid = 5002,

    // ==================== 6xxx: Template ====================
    /// Template schema is invalid
    TemplateSchemaInvalid = 6001,
    /// Product attribute values do not match the template schema
    TemplateValuesInvalid = 6002,
    /// Template field not found
    TemplateFieldNotFound = 6003,
    /// Template field key already in use
    TemplateFieldKeyExists = 6004,

    // ==================== 7xxx: Materials & pricing ====================
    /// Material not found
    MaterialNotFound = 7001,
    /// Material code already exists
    MaterialCodeExists = 7002,
    /// Material is referenced by products
    MaterialInUse = 7003,
    /// Price tier set is invalid
    PriceTierInvalid = 7101,
    /// Quote quantity out of range
    QuoteQuantityInvalid = 7102,

    // ==================== 8xxx: Media ====================
    /// Media asset not found
    MediaNotFound = 8001,
    /// File too large
    FileTooLarge = 8002,
    /// Unsupported file format
    UnsupportedFileFormat = 8003,
    /// Invalid/corrupted image file
    InvalidImageFile = 8004,
    /// No file provided in request
    NoFileProvided = 8005,
    /// Empty file provided
    EmptyFile = 8006,
    /// File storage failed
    FileStorageFailed = 8007,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Catalog
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategorySlugExists => "Category slug already exists",
            ErrorCode::CategoryHasProducts => "Category still has products",
            ErrorCode::CategoryHasChildren => "Category still has child categories",
            ErrorCode::CategoryParentInvalid => "Category parent is invalid",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductSlugExists => "Product slug already exists",
            ErrorCode::ProductInvalidPrice => "Product price is invalid",

            // Content
            ErrorCode::BlogPostNotFound => "Blog post not found",
            ErrorCode::BlogPostSlugExists => "Blog post slug already exists",
            ErrorCode::TestimonialNotFound => "Testimonial not found",
            ErrorCode::ServiceNotFound => "Service not found",
            ErrorCode::ServiceSlugExists => "Service slug already exists",
            ErrorCode::NavigationItemNotFound => "Navigation item not found",
            ErrorCode::NavigationMenuInvalid => "Unknown navigation menu",
            ErrorCode::SettingNotFound => "Setting not found",
            ErrorCode::SettingInvalid => "Setting value is invalid",

            // Contact
            ErrorCode::ContactMessageNotFound => "Contact message not found",
            ErrorCode::ContactFormInvalid => "Contact form is invalid",

            // Template
            ErrorCode::TemplateSchemaInvalid => "Template schema is invalid",
            ErrorCode::TemplateValuesInvalid => "Attribute values do not match the template",
            ErrorCode::TemplateFieldNotFound => "Template field not found",
            ErrorCode::TemplateFieldKeyExists => "Template field key already exists",

            // Materials & pricing
            ErrorCode::MaterialNotFound => "Material not found",
            ErrorCode::MaterialCodeExists => "Material code already exists",
            ErrorCode::MaterialInUse => "Material is in use",
            ErrorCode::PriceTierInvalid => "Price tiers are invalid",
            ErrorCode::QuoteQuantityInvalid => "Quantity is out of range",

            // Media
            ErrorCode::MediaNotFound => "Media not found",
            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::FileStorageFailed => "Failed to store file",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),

            // Catalog
            3001 => Ok(ErrorCode::CategoryNotFound),
            3002 => Ok(ErrorCode::CategorySlugExists),
            3003 => Ok(ErrorCode::CategoryHasProducts),
            3004 => Ok(ErrorCode::CategoryHasChildren),
            3005 => Ok(ErrorCode::CategoryParentInvalid),
            3101 => Ok(ErrorCode::ProductNotFound),
            3102 => Ok(ErrorCode::ProductSlugExists),
            3103 => Ok(ErrorCode::ProductInvalidPrice),

            // Content
            4001 => Ok(ErrorCode::BlogPostNotFound),
            4002 => Ok(ErrorCode::BlogPostSlugExists),
            4101 => Ok(ErrorCode::TestimonialNotFound),
            4201 => Ok(ErrorCode::ServiceNotFound),
            4202 => Ok(ErrorCode::ServiceSlugExists),
            4301 => Ok(ErrorCode::NavigationItemNotFound),
            4302 => Ok(ErrorCode::NavigationMenuInvalid),
            4401 => Ok(ErrorCode::SettingNotFound),
            4402 => Ok(ErrorCode::SettingInvalid),

            // Contact
            5001 => Ok(ErrorCode::ContactMessageNotFound),
            5002 => Ok(ErrorCode::ContactFormInvalid),

            // Template
            6001 => Ok(ErrorCode::TemplateSchemaInvalid),
            6002 => Ok(ErrorCode::TemplateValuesInvalid),
            6003 => Ok(ErrorCode::TemplateFieldNotFound),
            6004 => Ok(ErrorCode::TemplateFieldKeyExists),

            // Materials & pricing
            7001 => Ok(ErrorCode::MaterialNotFound),
            7002 => Ok(ErrorCode::MaterialCodeExists),
            7003 => Ok(ErrorCode::MaterialInUse),
            7101 => Ok(ErrorCode::PriceTierInvalid),
            7102 => Ok(ErrorCode::QuoteQuantityInvalid),

            // Media
            8001 => Ok(ErrorCode::MediaNotFound),
            8002 => Ok(ErrorCode::FileTooLarge),
            8003 => Ok(ErrorCode::UnsupportedFileFormat),
            8004 => Ok(ErrorCode::InvalidImageFile),
            8005 => Ok(ErrorCode::NoFileProvided),
            8006 => Ok(ErrorCode::EmptyFile),
            8007 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::TooManyRequests.code(), 9);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::CategoryNotFound.code(), 3001);
        assert_eq!(ErrorCode::ProductNotFound.code(), 3101);
        assert_eq!(ErrorCode::BlogPostNotFound.code(), 4001);
        assert_eq!(ErrorCode::ContactFormInvalid.code(), 5002);
        assert_eq!(ErrorCode::TemplateValuesInvalid.code(), 6002);
        assert_eq!(ErrorCode::QuoteQuantityInvalid.code(), 7102);
        assert_eq!(ErrorCode::FileTooLarge.code(), 8002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(3003), Ok(ErrorCode::CategoryHasProducts));
        assert_eq!(ErrorCode::try_from(6001), Ok(ErrorCode::TemplateSchemaInvalid));
        assert_eq!(ErrorCode::try_from(9005), Ok(ErrorCode::ConfigError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::NotFound).unwrap();
        assert_eq!(json, "3");

        let json = serde_json::to_string(&ErrorCode::ProductNotFound).unwrap();
        assert_eq!(json, "3101");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("6002").unwrap();
        assert_eq!(code, ErrorCode::TemplateValuesInvalid);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_every_code_roundtrips_through_u16() {
        for raw in 0..10_000u16 {
            if let Ok(code) = ErrorCode::try_from(raw) {
                assert_eq!(code.code(), raw);
            }
        }
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(ErrorCode::CategoryNotFound.message(), "Category not found");
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
