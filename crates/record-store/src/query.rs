use serde_json::Value;

use crate::Record;

/// Builder for constructing record queries.
///
/// Filters are equality matches on top-level fields, combined with AND.
/// Results are always ordered by creation time, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordQuery {
    /// Field/value pairs every returned record must match.
    pub filters: Vec<(String, Value)>,

    /// Maximum number of records to return.
    pub limit: Option<usize>,

    /// Number of records to skip.
    pub offset: Option<usize>,
}

impl RecordQuery {
    /// Creates a query matching every record in the table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality filter on a field.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Limits the number of records returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips this many records before returning results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns true if the record satisfies every filter.
    pub fn matches(&self, record: &Record) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| record.field(field) == Some(expected))
    }

    /// Returns the filters as a single JSON object, for containment queries.
    pub fn filter_document(&self) -> Value {
        let map = self
            .filters
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Fields, RecordId};
    use serde_json::json;

    fn record(product_id: &str, quantity: u32) -> Record {
        let mut fields = Fields::new();
        fields.insert("product_id".to_string(), json!(product_id));
        fields.insert("quantity".to_string(), json!(quantity));
        Record::new("product_sales", RecordId::new(), fields)
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(RecordQuery::new().matches(&record("a", 1)));
    }

    #[test]
    fn eq_filters_are_combined_with_and() {
        let query = RecordQuery::new().eq("product_id", "a").eq("quantity", 2);

        assert!(query.matches(&record("a", 2)));
        assert!(!query.matches(&record("a", 1)));
        assert!(!query.matches(&record("b", 2)));
    }

    #[test]
    fn missing_field_never_matches() {
        let query = RecordQuery::new().eq("transaction_id", "t");
        assert!(!query.matches(&record("a", 1)));
    }

    #[test]
    fn query_builder_chain() {
        let query = RecordQuery::new().eq("status", "pending").limit(10).offset(5);

        assert_eq!(query.filters, vec![("status".to_string(), json!("pending"))]);
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, Some(5));
        assert_eq!(query.filter_document(), json!({"status": "pending"}));
    }
}
