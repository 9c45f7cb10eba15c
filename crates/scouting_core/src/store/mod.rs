//! Store Gateway (spec §4.1): the only component that speaks SQL.
//!
//! Narrow, typed, read-only access to the relational store: parameterised
//! projections returning a [`Table`], and schema metadata for the
//! Catalogue's startup self-check.

mod gateway;
mod guard;
mod schema;
mod table;

pub use gateway::{Param, PgStoreGateway, StoreGateway};
pub use schema::SchemaDescriptor;
pub use table::{Row, Table};

/// An in-memory [`StoreGateway`] fixture, used by this crate's own unit
/// tests and by host applications' integration tests in place of a real
/// Postgres instance.
pub mod fixture;
