use serde_json::Value;
use std::collections::HashMap;

/// One row of a [`Table`] result set: column name to value.
pub type Row = HashMap<String, Value>;

/// A tabular result set returned by [`super::StoreGateway::fetch`].
///
/// Callers iterate `rows()` rather than assume the whole set was
/// materialised up front; the current implementation buffers rows after
/// the query completes, but nothing in the public contract promises that
/// will remain true for very large result sets, so treat it as a stream.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
