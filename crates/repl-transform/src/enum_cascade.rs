//! The enum coercion cascade, `spec.md` §4.5 steps 1-6. Kept separate from
//! `lib.rs` so the short-circuit order reads as one function a reviewer
//! can check against the spec line by line.

use repl_policies::lookup_synonym;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeOutcome {
    Exact,
    CaseInsensitive,
    Substring,
    Synonym,
    Default,
    EmptyCatalog,
}

/// Returns the label to use (`None` only for `EmptyCatalog`) and which rule
/// matched. Rules are tried in order and the first match wins — later rules
/// never run once an earlier one succeeds.
pub fn coerce(value: &str, labels: &[String]) -> (Option<String>, CascadeOutcome) {
    if labels.is_empty() {
        return (None, CascadeOutcome::EmptyCatalog);
    }

    if let Some(label) = labels.iter().find(|l| l.as_str() == value) {
        return (Some(label.clone()), CascadeOutcome::Exact);
    }

    let folded = value.to_lowercase();
    if let Some(label) = labels.iter().find(|l| l.to_lowercase() == folded) {
        return (Some(label.clone()), CascadeOutcome::CaseInsensitive);
    }

    if let Some(label) = labels.iter().find(|l| {
        let label_folded = l.to_lowercase();
        label_folded.contains(&folded) || folded.contains(&label_folded)
    }) {
        return (Some(label.clone()), CascadeOutcome::Substring);
    }

    if let Some(synonym_target) = lookup_synonym(value) {
        if let Some(label) = labels.iter().find(|l| l.as_str() == synonym_target) {
            return (Some(label.clone()), CascadeOutcome::Synonym);
        }
    }

    (Some(labels[0].clone()), CascadeOutcome::Default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(vs: &[&str]) -> Vec<String> {
        vs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_match_short_circuits() {
        let (label, outcome) = coerce("ACTIVE", &labels(&["ACTIVE", "INACTIVE"]));
        assert_eq!(label.as_deref(), Some("ACTIVE"));
        assert_eq!(outcome, CascadeOutcome::Exact);
    }

    #[test]
    fn case_insensitive_match_wins_before_substring_or_synonym() {
        let (label, outcome) = coerce("active", &labels(&["ACTIVE", "INACTIVE"]));
        assert_eq!(label.as_deref(), Some("ACTIVE"));
        assert_eq!(outcome, CascadeOutcome::CaseInsensitive);
    }

    #[test]
    fn substring_match_resolves_ambiguity_by_catalog_order() {
        let (label, outcome) = coerce("act", &labels(&["INACTIVE", "ACTIVE"]));
        assert_eq!(label.as_deref(), Some("INACTIVE"));
        assert_eq!(outcome, CascadeOutcome::Substring);
    }

    #[test]
    fn synonym_match_requires_target_present_in_catalog() {
        let (label, outcome) = coerce("yes", &labels(&["TRUE", "FALSE"]));
        assert_eq!(label.as_deref(), Some("TRUE"));
        assert_eq!(outcome, CascadeOutcome::Synonym);

        let (label, outcome) = coerce("yes", &labels(&["Y", "N"]));
        assert_eq!(label.as_deref(), Some("Y"));
        assert_eq!(outcome, CascadeOutcome::Default);
    }

    #[test]
    fn unmatched_value_falls_back_to_first_catalog_label() {
        let (label, outcome) = coerce("INVALID_TYPE", &labels(&["USER", "ADMIN"]));
        assert_eq!(label.as_deref(), Some("USER"));
        assert_eq!(outcome, CascadeOutcome::Default);
    }

    #[test]
    fn empty_catalog_yields_no_label() {
        let (label, outcome) = coerce("anything", &labels(&[]));
        assert_eq!(label, None);
        assert_eq!(outcome, CascadeOutcome::EmptyCatalog);
    }
}
