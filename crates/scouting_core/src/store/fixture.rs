//! In-memory [`StoreGateway`] fixture.
//!
//! Exercises query templates against pre-seeded [`Table`]s keyed by the
//! table name named in a simple `FROM <table>` clause, rather than by
//! parsing SQL. Good enough to drive the Catalogue, Metric Engine, Role
//! Engine and Executor through their paces without a live Postgres
//! instance; callers that need real filtering should seed already-filtered
//! tables per scenario.

use super::guard::assert_projection_only;
use super::schema::SchemaDescriptor;
use super::table::{Row, Table};
use super::{Param, StoreGateway};
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemoryStoreGateway {
    tables: RwLock<HashMap<String, Table>>,
    schema: RwLock<SchemaDescriptor>,
}

impl InMemoryStoreGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_table(&self, name: impl Into<String>, table: Table) -> &Self {
        self.tables.write().unwrap().insert(name.into(), table);
        self
    }

    pub fn seed_rows(&self, name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> &Self {
        self.seed_table(name, Table::new(columns, rows))
    }

    pub fn with_schema(self, schema: SchemaDescriptor) -> Self {
        *self.schema.write().unwrap() = schema;
        self
    }

    fn table_name_from(query_template: &str) -> Option<String> {
        let upper = query_template.to_uppercase();
        let from_idx = upper.find("FROM")?;
        let rest = query_template[from_idx + 4..].trim_start();
        let name: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
            .collect();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

#[async_trait]
impl StoreGateway for InMemoryStoreGateway {
    async fn fetch(&self, query_template: &str, _parameters: &[(&str, Param)]) -> Result<Table> {
        assert_projection_only(query_template)?;
        let table_name = Self::table_name_from(query_template).ok_or_else(|| {
            CoreError::ForbiddenStatement("could not determine target table from template".into())
        })?;
        let tables = self.tables.read().unwrap();
        tables
            .get(&table_name)
            .cloned()
            .ok_or_else(|| CoreError::StoreUnavailable(format!("no fixture data seeded for `{table_name}`")))
    }

    async fn schema(&self) -> Result<SchemaDescriptor> {
        Ok(self.schema.read().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetches_seeded_table_by_from_clause() {
        let gw = InMemoryStoreGateway::new();
        let mut row = Row::new();
        row.insert("id".into(), serde_json::json!(1));
        gw.seed_rows("players".into(), vec!["id".into()], vec![row]);

        let result = gw.fetch("SELECT id FROM players WHERE id = :id", &[("id", Param::Int(1))]).await.unwrap();
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn missing_table_is_store_unavailable() {
        let gw = InMemoryStoreGateway::new();
        let err = gw.fetch("SELECT * FROM missing_table", &[]).await.unwrap_err();
        assert!(matches!(err, CoreError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn mutation_template_is_rejected_before_lookup() {
        let gw = InMemoryStoreGateway::new();
        let err = gw.fetch("DELETE FROM players", &[]).await.unwrap_err();
        assert!(matches!(err, CoreError::ForbiddenStatement(_)));
    }
}
