//! Common-synonym mapping for the enum coercion cascade (`spec.md` §4.5
//! step 4, §9 Open Questions).
//!
//! The source repo carried two divergent Transformer implementations with
//! subtly different synonym tables; `spec.md` §9 explicitly declines to
//! guess which is intentional domain knowledge. We freeze the table named
//! in the spec text verbatim (see DESIGN.md for the Open Question
//! resolution) rather than inventing additional aliases.

/// (lowercased input, catalog label to try) pairs. Matched case-insensitively
/// against the already-normalized input value.
const SYNONYMS: &[(&str, &str)] = &[
    ("activity", "INDIVIDUAL"),
    ("active", "ACTIVE"),
    ("yes", "TRUE"),
    ("no", "FALSE"),
];

/// Looks up a domain-agnostic synonym for `value`. Returns the raw synonym
/// target (e.g. `"ACTIVE"`); the caller still has to confirm the target
/// exists in the actual catalog before using it (§4.5 step 4: "if the
/// synonym target is present in the catalog, use it").
pub fn lookup_synonym(value: &str) -> Option<&'static str> {
    let folded = value.to_lowercase();
    SYNONYMS.iter().find(|(k, _)| *k == folded).map(|(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_synonyms_resolve() {
        assert_eq!(lookup_synonym("yes"), Some("TRUE"));
        assert_eq!(lookup_synonym("YES"), Some("TRUE"));
        assert_eq!(lookup_synonym("activity"), Some("INDIVIDUAL"));
    }

    #[test]
    fn unknown_value_has_no_synonym() {
        assert_eq!(lookup_synonym("banana"), None);
    }
}
