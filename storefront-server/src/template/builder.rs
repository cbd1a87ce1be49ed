//! Incremental template editing for the admin panel

use shared::error::{AppError, ErrorCode};
use shared::models::{FieldDescriptor, TemplateSchema};
use shared::util::slugify;

use super::schema::{MAX_KEY_LEN, SchemaError, validate_schema};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("field key '{0}' already exists")]
    KeyExists(String),
    #[error("field '{0}' not found")]
    FieldNotFound(String),
}

impl From<BuilderError> for AppError {
    fn from(e: BuilderError) -> Self {
        let code = match &e {
            BuilderError::KeyExists(_) => ErrorCode::TemplateFieldKeyExists,
            BuilderError::FieldNotFound(_) => ErrorCode::TemplateFieldNotFound,
        };
        AppError::with_message(code, e.to_string())
    }
}

/// Ordered field list under edit. Key uniqueness is kept on every step;
/// the remaining invariants are checked by [`TemplateBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct TemplateBuilder {
    fields: Vec<FieldDescriptor>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_schema(schema: TemplateSchema) -> Self {
        Self { fields: schema }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    /// Append a field
    pub fn add_field(&mut self, field: FieldDescriptor) -> Result<&mut Self, BuilderError> {
        if self.position(&field.key).is_some() {
            return Err(BuilderError::KeyExists(field.key));
        }
        self.fields.push(field);
        Ok(self)
    }

    /// Replace the field stored under `key`, keeping its position. The new
    /// descriptor may carry a different key as long as it stays unique.
    pub fn update_field(
        &mut self,
        key: &str,
        field: FieldDescriptor,
    ) -> Result<&mut Self, BuilderError> {
        let index = self
            .position(key)
            .ok_or_else(|| BuilderError::FieldNotFound(key.to_string()))?;
        if field.key != key && self.position(&field.key).is_some() {
            return Err(BuilderError::KeyExists(field.key));
        }
        self.fields[index] = field;
        Ok(self)
    }

    pub fn remove_field(&mut self, key: &str) -> Result<FieldDescriptor, BuilderError> {
        let index = self
            .position(key)
            .ok_or_else(|| BuilderError::FieldNotFound(key.to_string()))?;
        Ok(self.fields.remove(index))
    }

    /// Move a field to `to` (clamped to the end of the list)
    pub fn move_field(&mut self, key: &str, to: usize) -> Result<&mut Self, BuilderError> {
        let from = self
            .position(key)
            .ok_or_else(|| BuilderError::FieldNotFound(key.to_string()))?;
        let field = self.fields.remove(from);
        let to = to.min(self.fields.len());
        self.fields.insert(to, field);
        Ok(self)
    }

    /// Derive a free, valid key from a label (`"Kağıt Türü"` → `kagit_turu`)
    pub fn suggest_key(&self, label: &str) -> String {
        let mut base = slugify(label).replace('-', "_");
        if !base.starts_with(|c: char| c.is_ascii_lowercase()) {
            base = format!("field_{base}");
        }
        base.truncate(MAX_KEY_LEN);
        let base = base.trim_end_matches('_').to_string();

        if self.position(&base).is_none() {
            return base;
        }
        (2..)
            .map(|n| {
                let suffix = format!("_{n}");
                let mut key = base.clone();
                key.truncate(MAX_KEY_LEN - suffix.len());
                key + &suffix
            })
            .find(|candidate| self.position(candidate).is_none())
            .unwrap_or(base)
    }

    /// Validate and return the finished schema
    pub fn build(self) -> Result<TemplateSchema, Vec<SchemaError>> {
        validate_schema(&self.fields)?;
        Ok(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::i18n::{Lang, LocalizedText};
    use shared::models::FieldType;

    fn field(key: &str) -> FieldDescriptor {
        FieldDescriptor::new(key, LocalizedText::new().with(Lang::En, key), FieldType::Text)
    }

    fn keys(builder: &TemplateBuilder) -> Vec<&str> {
        builder.fields().iter().map(|f| f.key.as_str()).collect()
    }

    #[test]
    fn test_add_and_duplicate() {
        let mut b = TemplateBuilder::new();
        b.add_field(field("a")).unwrap().add_field(field("b")).unwrap();
        assert_eq!(keys(&b), vec!["a", "b"]);
        assert_eq!(b.add_field(field("a")).unwrap_err(), BuilderError::KeyExists("a".into()));
    }

    #[test]
    fn test_update_keeps_position_and_checks_rename() {
        let mut b = TemplateBuilder::from_schema(vec![field("a"), field("b"), field("c")]);
        b.update_field("b", field("bb")).unwrap();
        assert_eq!(keys(&b), vec!["a", "bb", "c"]);

        assert_eq!(
            b.update_field("bb", field("a")).unwrap_err(),
            BuilderError::KeyExists("a".into())
        );
        assert_eq!(
            b.update_field("zz", field("zz")).unwrap_err(),
            BuilderError::FieldNotFound("zz".into())
        );
        // same key, new content
        b.update_field("a", field("a").required()).unwrap();
        assert!(b.fields()[0].required);
    }

    #[test]
    fn test_remove() {
        let mut b = TemplateBuilder::from_schema(vec![field("a"), field("b")]);
        assert_eq!(b.remove_field("a").unwrap().key, "a");
        assert_eq!(keys(&b), vec!["b"]);
        assert!(b.remove_field("a").is_err());
    }

    #[test]
    fn test_move() {
        let mut b = TemplateBuilder::from_schema(vec![field("a"), field("b"), field("c")]);
        b.move_field("c", 0).unwrap();
        assert_eq!(keys(&b), vec!["c", "a", "b"]);
        b.move_field("c", 99).unwrap();
        assert_eq!(keys(&b), vec!["a", "b", "c"]);
        assert!(b.move_field("x", 0).is_err());
    }

    #[test]
    fn test_suggest_key() {
        let mut b = TemplateBuilder::new();
        assert_eq!(b.suggest_key("Kağıt Türü"), "kagit_turu");
        assert_eq!(b.suggest_key("3D Baskı"), "field_3d_baski");
        assert_eq!(b.suggest_key("!!!"), "field");

        b.add_field(field("kagit_turu")).unwrap();
        b.add_field(field("kagit_turu_2")).unwrap();
        assert_eq!(b.suggest_key("Kağıt türü"), "kagit_turu_3");

        let long = b.suggest_key(&"x".repeat(200));
        assert_eq!(long.len(), MAX_KEY_LEN);
    }

    #[test]
    fn test_build_runs_schema_validation() {
        let mut b = TemplateBuilder::new();
        b.add_field(field("Bad Key")).unwrap();
        assert!(b.clone().build().is_err());

        let ok = TemplateBuilder::from_schema(vec![field("a")]).build().unwrap();
        assert_eq!(ok.len(), 1);
    }
}
