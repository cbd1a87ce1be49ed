//! Dynamic product templates
//!
//! A category's template schema describes the attribute fields of its
//! products. This module keeps schemas well-formed ([`schema`],
//! [`builder`]), checks product values against them ([`validate`]) and
//! turns them into form fields or spec tables ([`render`]).

pub mod builder;
pub mod render;
pub mod schema;
pub mod validate;

pub use builder::{BuilderError, TemplateBuilder};
pub use render::{render_display, render_form};
pub use schema::{SchemaError, schema_error, validate_schema};
pub use validate::{Values, validate_values, values_error};
