use crate::catalog::Catalogue;
use crate::query::{MetricSet, StructuredQuery};

/// Layer 4 of the anti-hallucination defence (spec §4.6): when lenient
/// parsing leaves genuine gaps — no metric set resolved, no limit named
/// — substitute a conservative, always-valid default rather than fail
/// the request outright. Only ever fills a gap; a term that did resolve
/// is never second-guessed here.
pub fn apply_safe_defaults(query: &mut StructuredQuery, catalogue: &Catalogue) -> Vec<String> {
    let mut warnings = Vec::new();

    let metrics_empty = matches!(&query.metric_set, MetricSet::Explicit(ids) if ids.is_empty());
    if metrics_empty {
        if let Some(preset_id) = default_preset_id(catalogue) {
            warnings.push(format!("no metrics resolved; defaulting to preset `{preset_id}`"));
            query.metric_set = MetricSet::Preset(preset_id);
        }
    }

    if query.limit == 0 {
        query.limit = 10;
        warnings.push("no limit named; defaulting to 10".to_string());
    }

    warnings
}

fn default_preset_id(catalogue: &Catalogue) -> Option<String> {
    if catalogue.preset("striker_profile").is_some() {
        return Some("striker_profile".to_string());
    }
    catalogue.metrics().map(|m| m.id.clone()).min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EMBEDDED_CATALOGUE_TOML;
    use crate::query::CohortFilters;

    #[test]
    fn empty_metric_set_falls_back_to_a_preset() {
        let catalogue = Catalogue::from_toml_str(EMBEDDED_CATALOGUE_TOML).unwrap();
        let mut query =
            StructuredQuery::leaderboard(CohortFilters::default(), MetricSet::Explicit(vec![]), 0);
        let warnings = apply_safe_defaults(&mut query, &catalogue);
        assert!(!warnings.is_empty());
        assert!(matches!(query.metric_set, MetricSet::Preset(_)));
        assert_eq!(query.limit, 10);
    }
}
