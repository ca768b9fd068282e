//! Data source traits consumed by resolvers

use crate::core::query::{Predicate, Projection, Record, SortSpec};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Description of the model a data source serves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Primary key field (e.g. "id")
    pub key_field: String,

    /// All known fields, key included
    pub fields: Vec<String>,

    /// Fields backed by an index; these become sortable
    #[serde(default)]
    pub indexed_fields: Vec<String>,
}

impl ModelSchema {
    pub fn new(key_field: impl Into<String>) -> Self {
        let key_field = key_field.into();
        Self {
            fields: vec![key_field.clone()],
            key_field,
            indexed_fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
        self
    }

    /// Declare an indexed field (also registers it as a field)
    pub fn with_index(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.indexed_fields.contains(&field) {
            self.indexed_fields.push(field.clone());
        }
        self.with_field(field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Key field first, then indexed fields, without duplicates
    pub fn sortable_fields(&self) -> Vec<&str> {
        let mut sortable = vec![self.key_field.as_str()];
        for field in &self.indexed_fields {
            if !sortable.contains(&field.as_str()) {
                sortable.push(field);
            }
        }
        sortable
    }
}

/// Handle to a model in a backing store
///
/// Implementations are agnostic to the storage engine; a resolver only asks
/// for a query scoped by a predicate and refines it before execution.
pub trait DataSource: Send + Sync {
    /// Name of the model (e.g. "User")
    fn model_name(&self) -> &str;

    /// Schema description, if the handle carries one
    fn schema(&self) -> Option<&ModelSchema>;

    /// Start a query scoped by `predicate`
    ///
    /// No I/O is expected until [`QueryHandle::execute`] is called.
    fn find(&self, predicate: Predicate) -> Result<Box<dyn QueryHandle>>;
}

/// An in-progress, not yet executed query
#[async_trait]
pub trait QueryHandle: Send {
    /// Restrict the returned fields
    fn restrict_fields(&mut self, projection: &Projection);

    /// Cap the number of returned records
    fn limit_to(&mut self, limit: u64);

    /// Order the returned records
    fn order_by(&mut self, sort: &SortSpec);

    /// Run the query
    async fn execute(self: Box<Self>) -> Result<Vec<Record>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sortable_fields_start_with_key() {
        let schema = ModelSchema::new("id")
            .with_index("email")
            .with_field("name")
            .with_index("id");

        assert_eq!(schema.sortable_fields(), vec!["id", "email"]);
        assert!(schema.has_field("name"));
        assert!(!schema.has_field("age"));
    }

    #[test]
    fn test_with_field_is_idempotent() {
        let schema = ModelSchema::new("id").with_field("id").with_field("name");
        assert_eq!(schema.fields, vec!["id".to_string(), "name".to_string()]);
    }
}
