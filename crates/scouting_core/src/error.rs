//! Core error type.
//!
//! Every public contract in this crate returns `Result<T, CoreError>`.
//! Error *kinds* mirror the ones enumerated in the system design: input
//! errors are surfaced directly, data-sufficiency conditions travel as
//! typed flags on results rather than as errors where possible, transient
//! errors are never retried internally, and fatal/integrity errors abort
//! the request (or, at startup, the process).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Input errors ----
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    #[error("metric {metric} is not valid for position scope {position}")]
    IncompatibleMetricForPosition { metric: String, position: String },

    #[error("invalid weight: {0}")]
    InvalidWeight(String),

    #[error("invalid limit: {0} (must be in [1, 500])")]
    InvalidLimit(usize),

    #[error("failed to parse query: {0:?}")]
    ParseError(Vec<String>),

    // ---- Data-sufficiency conditions (reported as flags where possible,
    // but returned as errors from contracts that have no partial result
    // to attach them to) ----
    #[error("insufficient minutes: {minutes} < {threshold}")]
    InsufficientMinutes { minutes: f64, threshold: f64 },

    #[error("insufficient positional data: {events} events observed")]
    InsufficientPositionalData { events: u32 },

    #[error("cohort too small: {size} < {minimum}")]
    CohortTooSmall { size: usize, minimum: usize },

    #[error("no candidates matched the query")]
    NoCandidates,

    #[error("reference player's role vector is insufficient")]
    ReferenceRoleInsufficient,

    #[error("no season data for player {player_id} season {season}")]
    NoSeasonData { player_id: String, season: String },

    // ---- Transient ----
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("language model unavailable: {0}")]
    LlmUnavailable(String),

    #[error("request timed out after {0}ms")]
    Timeout(u64),

    // ---- Fatal / integrity ----
    #[error("forbidden statement: {0}")]
    ForbiddenStatement(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("catalogue invalid: {0:?}")]
    CatalogueInvalid(Vec<String>),
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                CoreError::StoreUnavailable(err.to_string())
            }
            _ => CoreError::StoreUnavailable(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CoreError::Timeout(0)
        } else {
            CoreError::LlmUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::ParseError(vec![err.to_string()])
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
