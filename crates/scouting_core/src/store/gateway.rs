use super::guard::assert_projection_only;
use super::schema::SchemaDescriptor;
use super::table::{Row, Table};
use crate::config::StoreConfig;
use crate::error::{CoreError, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Column, Row as SqlxRow, TypeInfo, ValueRef};
use std::collections::HashMap;
use std::time::Duration;

/// A bound query parameter. Parameters are always bound by name through
/// the driver's own parameter binding, never through string
/// interpolation into the template (spec §4.1).
#[derive(Debug, Clone)]
pub enum Param {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Uuid(uuid::Uuid),
    Null,
}

#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Execute a parameterised projection. `query_template` must begin
    /// with `SELECT`/`WITH` and name its parameters as `:name`; violating
    /// that is a `ForbiddenStatement`, never silently rewritten.
    async fn fetch(&self, query_template: &str, parameters: &[(&str, Param)]) -> Result<Table>;

    /// Table/column names known to the store, for the Catalogue's
    /// startup self-check.
    async fn schema(&self) -> Result<SchemaDescriptor>;
}

/// Production [`StoreGateway`] backed by a bounded Postgres pool.
///
/// Three of the Store Gateway's four defensive layers live here: a
/// bounded pool with acquisition timeout, a read-only transaction wrapped
/// around every fetch, and the session itself configured read-only at
/// connection time. The fourth layer (database-level privilege
/// enforcement) is outside this crate's control and is assumed to be in
/// place by deployment.
pub struct PgStoreGateway {
    pool: sqlx::PgPool,
    acquire_timeout: Duration,
}

impl PgStoreGateway {
    pub async fn connect(database_url: &str, config: &StoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_millis(config.timeout_ms))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("SET SESSION CHARACTERISTICS AS TRANSACTION READ ONLY")
                        .execute(conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;

        Ok(Self { pool, acquire_timeout: Duration::from_millis(config.timeout_ms) })
    }

    /// Rewrite `:name` placeholders into `$1, $2, ...` in first-seen
    /// order, returning the rewritten template and the ordered parameter
    /// list to bind. This is purely a placeholder-token rewrite: values
    /// never touch the template string.
    fn positionalize<'p>(
        query_template: &str,
        parameters: &'p [(&str, Param)],
    ) -> Result<(String, Vec<&'p Param>)> {
        let by_name: HashMap<&str, &Param> =
            parameters.iter().map(|(n, p)| (*n, p)).collect();
        let mut out = String::with_capacity(query_template.len());
        let mut ordered = Vec::new();
        let bytes = query_template.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b':' && i + 1 < bytes.len() && (bytes[i + 1].is_ascii_alphabetic() || bytes[i + 1] == b'_') {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                    end += 1;
                }
                let name = &query_template[start..end];
                let param = by_name.get(name).ok_or_else(|| {
                    CoreError::ForbiddenStatement(format!("unbound parameter `:{name}`"))
                })?;
                ordered.push(*param);
                out.push('$');
                out.push_str(&ordered.len().to_string());
                i = end;
            } else {
                out.push(bytes[i] as char);
                i += 1;
            }
        }
        Ok((out, ordered))
    }
}

#[async_trait]
impl StoreGateway for PgStoreGateway {
    async fn fetch(&self, query_template: &str, parameters: &[(&str, Param)]) -> Result<Table> {
        assert_projection_only(query_template)?;
        let (positional_sql, ordered_params) = Self::positionalize(query_template, parameters)?;

        let mut tx = tokio::time::timeout(self.acquire_timeout, self.pool.begin())
            .await
            .map_err(|_| CoreError::StoreUnavailable("pool acquisition timed out".into()))??;

        let mut query = sqlx::query(&positional_sql);
        for param in &ordered_params {
            query = match param {
                Param::Text(s) => query.bind(s.clone()),
                Param::Int(n) => query.bind(*n),
                Param::Float(f) => query.bind(*f),
                Param::Bool(b) => query.bind(*b),
                Param::Uuid(u) => query.bind(*u),
                Param::Null => query.bind(Option::<String>::None),
            };
        }

        let rows: Vec<PgRow> = query.fetch_all(&mut *tx).await?;
        tx.rollback().await.ok();

        let columns = rows
            .first()
            .map(|r| r.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();

        let table_rows: Vec<Row> = rows.iter().map(pg_row_to_map).collect();
        Ok(Table::new(columns, table_rows))
    }

    async fn schema(&self) -> Result<SchemaDescriptor> {
        let rows = sqlx::query(
            "SELECT table_name, column_name FROM information_schema.columns WHERE table_schema = 'public'",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut descriptor = SchemaDescriptor::new();
        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        for row in rows {
            let table: String = row.try_get("table_name")?;
            let column: String = row.try_get("column_name")?;
            grouped.entry(table).or_default().push(column);
        }
        for (table, columns) in grouped {
            let refs: Vec<&str> = columns.iter().map(|s| s.as_str()).collect();
            descriptor = descriptor.with_table(table, &refs);
        }
        Ok(descriptor)
    }
}

/// Best-effort conversion of a Postgres row into a loosely typed JSON map,
/// sufficient for formula evaluation which only needs numbers/strings/bools.
fn pg_row_to_map(row: &PgRow) -> Row {
    let mut map = Row::new();
    for col in row.columns() {
        let name = col.name().to_string();
        let value = decode_value(row, col);
        map.insert(name, value);
    }
    map
}

fn decode_value(row: &PgRow, col: &sqlx::postgres::PgColumn) -> Value {
    let idx = col.ordinal();
    let raw = row.try_get_raw(idx);
    let Ok(raw) = raw else { return Value::Null };
    if raw.is_null() {
        return Value::Null;
    }
    match col.type_info().name() {
        "INT2" | "INT4" | "INT8" => row
            .try_get::<i64, _>(idx)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "FLOAT4" | "FLOAT8" | "NUMERIC" => row
            .try_get::<f64, _>(idx)
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BOOL" => row.try_get::<bool, _>(idx).map(Value::from).unwrap_or(Value::Null),
        "UUID" => row
            .try_get::<uuid::Uuid, _>(idx)
            .map(|u| Value::String(u.to_string()))
            .unwrap_or(Value::Null),
        _ => row.try_get::<String, _>(idx).map(Value::from).unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positionalize_rewrites_named_params_in_order() {
        let params: Vec<(&str, Param)> =
            vec![("league", Param::Text("PL".into())), ("min_minutes", Param::Float(900.0))];
        let (sql, ordered) =
            PgStoreGateway::positionalize("SELECT * FROM t WHERE league = :league AND minutes >= :min_minutes", &params)
                .unwrap();
        assert_eq!(sql, "SELECT * FROM t WHERE league = $1 AND minutes >= $2");
        assert_eq!(ordered.len(), 2);
    }

    #[test]
    fn positionalize_rejects_unbound_parameter() {
        let params: Vec<(&str, Param)> = vec![];
        let result = PgStoreGateway::positionalize("SELECT * FROM t WHERE x = :missing", &params);
        assert!(result.is_err());
    }
}
