use std::collections::{HashMap, HashSet};

/// Table and column names known to the Store Gateway, as reported by
/// `schema()`. Used by the Catalogue's startup self-check (spec §4.2) to
/// confirm every formula's referenced columns actually exist.
#[derive(Debug, Clone, Default)]
pub struct SchemaDescriptor {
    tables: HashMap<String, HashSet<String>>,
}

impl SchemaDescriptor {
    pub fn new() -> Self {
        Self { tables: HashMap::new() }
    }

    pub fn with_table(mut self, table: impl Into<String>, columns: &[&str]) -> Self {
        self.tables
            .insert(table.into(), columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables.get(table).map(|cols| cols.contains(column)).unwrap_or(false)
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|s| s.as_str())
    }
}
