use crate::error::CoreError;

const FORBIDDEN_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "TRUNCATE", "GRANT", "REVOKE", "COPY", "CREATE",
    "MERGE", "CALL", "EXECUTE", "VACUUM", "REINDEX", "LOCK",
];

const ALLOWED_LEADING_KEYWORDS: &[&str] = &["SELECT", "WITH"];

/// Statement-text inspection, the third of the Store Gateway's four
/// defensive layers (spec §4.1): a projection-only template begins with
/// `SELECT`/`WITH` and contains no mutation keyword. This is a
/// textual guard, not a parser — it exists to catch programmer error
/// and a compromised prompt/template before the statement ever reaches
/// the read-only transaction and session that the deeper layers enforce.
pub fn assert_projection_only(query_template: &str) -> Result<(), CoreError> {
    let normalized = normalize(query_template);
    let first_word = normalized.split_whitespace().next().unwrap_or("");

    if !ALLOWED_LEADING_KEYWORDS.contains(&first_word.to_uppercase().as_str()) {
        return Err(CoreError::ForbiddenStatement(format!(
            "statement must begin with SELECT or WITH, found `{first_word}`"
        )));
    }

    let upper = normalized.to_uppercase();
    for kw in FORBIDDEN_KEYWORDS {
        if contains_keyword(&upper, kw) {
            return Err(CoreError::ForbiddenStatement(format!(
                "statement contains forbidden keyword `{kw}`"
            )));
        }
    }

    Ok(())
}

fn normalize(s: &str) -> String {
    s.trim().to_string()
}

/// Word-boundary keyword search so e.g. `delete_flag` as a column alias
/// doesn't trip the `DELETE` check.
fn contains_keyword(haystack_upper: &str, keyword: &str) -> bool {
    let bytes = haystack_upper.as_bytes();
    let kw = keyword.as_bytes();
    let mut start = 0;
    while let Some(pos) = find_from(bytes, kw, start) {
        let before_ok = pos == 0 || !bytes[pos - 1].is_ascii_alphanumeric() && bytes[pos - 1] != b'_';
        let after_idx = pos + kw.len();
        let after_ok = after_idx >= bytes.len()
            || (!bytes[after_idx].is_ascii_alphanumeric() && bytes[after_idx] != b'_');
        if before_ok && after_ok {
            return true;
        }
        start = pos + 1;
    }
    false
}

fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_select_and_with() {
        assert!(assert_projection_only("SELECT * FROM players").is_ok());
        assert!(assert_projection_only("WITH x AS (SELECT 1) SELECT * FROM x").is_ok());
        assert!(assert_projection_only("  select id from teams  ").is_ok());
    }

    #[test]
    fn rejects_mutation_keywords() {
        assert!(assert_projection_only("DELETE FROM players").is_err());
        assert!(assert_projection_only("SELECT 1; DROP TABLE players").is_err());
        assert!(assert_projection_only("UPDATE players SET x = 1").is_err());
    }

    #[test]
    fn does_not_false_positive_on_identifier_substrings() {
        // `delete_flag` as a column name must not trip the DELETE check.
        assert!(assert_projection_only("SELECT delete_flag FROM players").is_ok());
        // `updated_at` must not trip the UPDATE check.
        assert!(assert_projection_only("SELECT updated_at FROM players").is_ok());
    }

    #[test]
    fn rejects_non_projection_leading_keyword() {
        assert!(assert_projection_only("EXPLAIN SELECT * FROM players").is_err());
    }
}
