use crate::catalog::Catalogue;

/// Build the constrained system prompt for layer 1 of the anti-
/// hallucination defence (spec §4.6): a bounded vocabulary of every
/// metric id/alias, preset id, and position code the model is allowed
/// to name, plus the StructuredQuery grammar it must emit.
pub fn system_prompt(catalogue: &Catalogue, known_leagues: &[String]) -> String {
    let mut metric_ids: Vec<&str> = catalogue.metrics().map(|m| m.id.as_str()).collect();
    metric_ids.sort_unstable();

    let positions = ["GK", "LB", "CB", "RB", "LWB", "RWB", "CDM", "CM", "CAM", "LM", "RM", "LW", "RW", "CF", "ST", "DF", "MF", "FW"];

    format!(
        "You translate football scouting questions into a StructuredQuery JSON object.\n\
         You may ONLY name metric ids from this list: {metric_ids:?}\n\
         You may ONLY name position codes from this list: {positions:?}\n\
         You may ONLY name leagues from this list: {known_leagues:?}\n\
         Respond with a single JSON object with exactly these fields: \
         kind (one of \"similarity\", \"leaderboard\", \"comparison\", \"filter\"), \
         reference_player (string display name or null), \
         comparison_other (string display name or null), \
         leagues (array of strings), season (string or null), \
         positions (array of strings), min_age (number or null), \
         max_age (number or null), min_minutes (number or null), \
         preset (string or null), metrics (array of strings), \
         role_weight (number or null), stats_weight (number or null), \
         limit (integer or null). \
         Never invent a metric id, position code, or league name outside the lists above. \
         If a term in the question does not match anything in the lists, omit it rather than guessing."
    )
}
