//! Natural-language Query Parser (spec §4.6): the only path from free
//! text to a [`crate::query::StructuredQuery`], built as four
//! independent defensive layers so that no single one of them is ever
//! trusted to keep a hallucinated term out on its own.
//!
//! 1. [`prompt`] bounds what the model is even allowed to name.
//! 2. [`schema_check`] rejects a malformed response before anything in
//!    it is interpreted.
//! 3. [`resolve`] checks every name against the Catalogue and the Store.
//! 4. [`fallback`] supplies safe defaults for whatever is still missing,
//!    but only in lenient mode.

mod fallback;
mod llm_client;
mod prompt;
mod resolve;
mod schema_check;

pub use llm_client::{HttpLlmClient, LlmClient};
pub use schema_check::RawQuery;

use crate::catalog::Catalogue;
use crate::error::CoreError;
use crate::query::StructuredQuery;
use crate::store::StoreGateway;
use serde::Serialize;

/// Outcome of a lenient parse: the best query the parser could build,
/// whether it had to fall back to a default anywhere, and why.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    pub query: StructuredQuery,
    pub degraded: bool,
    pub warnings: Vec<String>,
}

pub struct QueryParser<'a> {
    llm: &'a dyn LlmClient,
    catalogue: &'a Catalogue,
    gateway: &'a dyn StoreGateway,
    temperature: f32,
}

impl<'a> QueryParser<'a> {
    pub fn new(llm: &'a dyn LlmClient, catalogue: &'a Catalogue, gateway: &'a dyn StoreGateway, temperature: f32) -> Self {
        Self { llm, catalogue, gateway, temperature }
    }

    /// Strict mode (spec §4.6: `parse(text, lenient=false)`): any
    /// unresolved term fails the whole request with a [`CoreError::ParseError`]
    /// listing every offending token, rather than running a query that
    /// only partially reflects what was asked.
    pub async fn parse_strict(&self, text: &str) -> Result<StructuredQuery, CoreError> {
        let raw = self.complete_and_check(text).await?;
        let resolved = resolve::resolve(&raw, self.catalogue, self.gateway).await?;
        if resolved.unresolved.is_empty() {
            Ok(resolved.query)
        } else {
            Err(CoreError::ParseError(resolved.unresolved))
        }
    }

    /// Lenient mode (spec §4.6: `parse(text, lenient=true)`): unresolved
    /// terms are dropped and any resulting gap is filled with a safe
    /// default, with `degraded=true` and a `warnings` entry for every
    /// term that didn't make it through.
    pub async fn parse_lenient(&self, text: &str) -> Result<ParseOutcome, CoreError> {
        let raw = self.complete_and_check(text).await?;
        let resolved = resolve::resolve(&raw, self.catalogue, self.gateway).await?;
        let mut query = resolved.query;
        let mut warnings: Vec<String> = resolved
            .unresolved
            .iter()
            .map(|term| format!("unknown term: {term}"))
            .collect();
        let degraded_before_defaults = !warnings.is_empty();

        warnings.extend(fallback::apply_safe_defaults(&mut query, self.catalogue));

        Ok(ParseOutcome {
            query,
            degraded: degraded_before_defaults || !warnings.is_empty(),
            warnings,
        })
    }

    async fn complete_and_check(&self, text: &str) -> Result<RawQuery, CoreError> {
        let known = resolve::known_leagues(self.gateway).await?;
        let system_prompt = prompt::system_prompt(self.catalogue, &known);
        let completion = self.llm.complete(&system_prompt, text, self.temperature).await?;
        schema_check::parse_raw(&completion)
    }
}
