//! repl-transform — the Transformer (`spec.md` §4.5): remaps enum labels
//! and coerces every other column family, per row, per target column.

mod coerce;
mod enum_cascade;

use repl_domain::{Batch, ColumnMeta, EnumCatalog, Row, TypeFamily, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformCounters {
    pub enum_transformations: u64,
    pub default_substitutions: u64,
    pub null_substitutions: u64,
    pub coercion_failures: u64,
}

impl TransformCounters {
    pub fn merge(&mut self, other: &TransformCounters) {
        self.enum_transformations += other.enum_transformations;
        self.default_substitutions += other.default_substitutions;
        self.null_substitutions += other.null_substitutions;
        self.coercion_failures += other.coercion_failures;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformIssue {
    pub column: String,
    pub message: String,
}

/// Stateless; all the context it needs (target columns, enum catalog) is
/// passed per call so one instance can serve every table in a run.
#[derive(Debug, Default)]
pub struct Transformer;

impl Transformer {
    pub fn new() -> Self {
        Self
    }

    /// `validate_only` runs the same cascade/coercion logic but returns the
    /// row unmutated, reporting what *would* have changed as issues instead
    /// (§4.5 "Dry-run variant").
    pub fn transform_row(
        &self,
        row: &Row,
        columns: &[ColumnMeta],
        enums: &EnumCatalog,
        validate_only: bool,
    ) -> (Row, TransformCounters, Vec<TransformIssue>) {
        let mut output = Row::with_capacity(row.len());
        let mut counters = TransformCounters::default();
        let mut issues = Vec::new();

        for column in columns {
            let Some(raw) = row.get(&column.name) else {
                continue;
            };
            let raw = raw.clone();

            if raw.is_null() {
                output.insert(column.name.clone(), Value::Null);
                continue;
            }
            if raw.is_empty_text() {
                output.insert(column.name.clone(), Value::Null);
                continue;
            }

            let (coerced, issue) = match column.type_family {
                TypeFamily::Enum => self.coerce_enum_column(column, &raw, enums, &mut counters),
                other_family => {
                    let (coerced, failed) = coerce_by_family(&raw, other_family);
                    if failed {
                        counters.coercion_failures += 1;
                        (coerced, Some(format!("could not coerce {raw} to {other_family:?}")))
                    } else {
                        (coerced, None)
                    }
                }
            };

            if let Some(message) = issue {
                issues.push(TransformIssue { column: column.name.clone(), message });
            }

            if validate_only {
                output.insert(column.name.clone(), raw);
            } else {
                output.insert(column.name.clone(), coerced);
            }
        }

        (output, counters, issues)
    }

    fn coerce_enum_column(
        &self,
        column: &ColumnMeta,
        raw: &Value,
        enums: &EnumCatalog,
        counters: &mut TransformCounters,
    ) -> (Value, Option<String>) {
        let Some(enum_name) = &column.enum_name else {
            return (raw.clone(), None);
        };
        let Some(labels) = enums.labels(enum_name) else {
            // Not in the catalog: §3 invariant says the cascade is never
            // consulted in this case.
            return (raw.clone(), None);
        };

        let text = raw.as_text().map(|s| s.to_string()).unwrap_or_else(|| raw.to_string());
        let (label, outcome) = enum_cascade::coerce(&text, labels);

        use enum_cascade::CascadeOutcome::*;
        match outcome {
            Exact => (Value::Text(label.expect("Exact always yields a label")), None),
            CaseInsensitive | Substring | Synonym => {
                counters.enum_transformations += 1;
                (Value::Text(label.expect("non-empty-catalog outcomes always yield a label")), None)
            }
            Default => {
                counters.default_substitutions += 1;
                (Value::Text(label.expect("Default always yields a label")), None)
            }
            EmptyCatalog => {
                counters.null_substitutions += 1;
                (Value::Null, Some(format!("enum {enum_name} has no catalog labels")))
            }
        }
    }

    pub fn transform_batch(
        &self,
        rows: &[Row],
        columns: &[ColumnMeta],
        enums: &EnumCatalog,
        validate_only: bool,
    ) -> (Batch, TransformCounters, Vec<TransformIssue>) {
        let mut out_rows = Vec::with_capacity(rows.len());
        let mut counters = TransformCounters::default();
        let mut issues = Vec::new();

        for row in rows {
            let (transformed, row_counters, row_issues) = self.transform_row(row, columns, enums, validate_only);
            out_rows.push(transformed);
            counters.merge(&row_counters);
            issues.extend(row_issues);
        }

        (Batch::new(out_rows), counters, issues)
    }
}

fn coerce_by_family(value: &Value, family: TypeFamily) -> (Value, bool) {
    match family {
        TypeFamily::Integer => coerce::to_integer(value),
        TypeFamily::Numeric => coerce::to_float(value),
        TypeFamily::Boolean => coerce::to_boolean(value),
        TypeFamily::Temporal => coerce::to_temporal(value),
        TypeFamily::Json => coerce::to_json(value),
        TypeFamily::Text | TypeFamily::Other => coerce::to_text(value),
        TypeFamily::Enum => unreachable!("enum family handled by coerce_enum_column"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repl_domain::ColumnMeta;

    fn enum_column(name: &str, enum_name: &str) -> ColumnMeta {
        ColumnMeta::new(name, TypeFamily::Enum, true, false).with_enum_name(enum_name)
    }

    #[test]
    fn enum_case_insensitive_coercion_counts_as_a_transformation() {
        let transformer = Transformer::new();
        let mut row = Row::new();
        row.insert("status", Value::Text("active".to_string()));

        let columns = vec![enum_column("status", "status_enum")];
        let mut enums = EnumCatalog::new();
        enums.insert("status_enum", vec!["ACTIVE".to_string(), "INACTIVE".to_string()]);

        let (output, counters, issues) = transformer.transform_row(&row, &columns, &enums, false);

        assert_eq!(output.get("status"), Some(&Value::Text("ACTIVE".to_string())));
        assert_eq!(counters.enum_transformations, 1);
        assert!(issues.is_empty());
    }

    #[test]
    fn enum_default_substitution_counts_separately_from_transformations() {
        let transformer = Transformer::new();
        let mut row = Row::new();
        row.insert("type", Value::Text("INVALID_TYPE".to_string()));

        let columns = vec![enum_column("type", "type_enum")];
        let mut enums = EnumCatalog::new();
        enums.insert("type_enum", vec!["USER".to_string(), "ADMIN".to_string()]);

        let (output, counters, _) = transformer.transform_row(&row, &columns, &enums, false);

        assert_eq!(output.get("type"), Some(&Value::Text("USER".to_string())));
        assert_eq!(counters.default_substitutions, 1);
        assert_eq!(counters.enum_transformations, 0);
    }

    #[test]
    fn dry_run_reports_issues_without_mutating_the_row() {
        let transformer = Transformer::new();
        let mut row = Row::new();
        row.insert("type", Value::Text("INVALID_TYPE".to_string()));

        let columns = vec![enum_column("type", "type_enum")];
        let mut enums = EnumCatalog::new();
        enums.insert("type_enum", vec!["USER".to_string(), "ADMIN".to_string()]);

        let (output, counters, _) = transformer.transform_row(&row, &columns, &enums, true);

        assert_eq!(output.get("type"), Some(&Value::Text("INVALID_TYPE".to_string())));
        assert_eq!(counters.default_substitutions, 1);
    }

    #[test]
    fn empty_string_normalizes_to_null_before_any_coercion() {
        let transformer = Transformer::new();
        let mut row = Row::new();
        row.insert("age", Value::Text(String::new()));
        let columns = vec![ColumnMeta::new("age", TypeFamily::Integer, true, false)];

        let (output, counters, _) = transformer.transform_row(&row, &columns, &EnumCatalog::new(), false);

        assert_eq!(output.get("age"), Some(&Value::Null));
        assert_eq!(counters.coercion_failures, 0);
    }

    #[test]
    fn non_numeric_integer_coercion_fails_to_null_and_is_counted() {
        let transformer = Transformer::new();
        let mut row = Row::new();
        row.insert("age", Value::Text("not-a-number".to_string()));
        let columns = vec![ColumnMeta::new("age", TypeFamily::Integer, true, false)];

        let (output, counters, issues) = transformer.transform_row(&row, &columns, &EnumCatalog::new(), false);

        assert_eq!(output.get("age"), Some(&Value::Null));
        assert_eq!(counters.coercion_failures, 1);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn column_absent_from_row_is_left_absent() {
        let transformer = Transformer::new();
        let row = Row::new();
        let columns = vec![ColumnMeta::new("missing", TypeFamily::Text, true, false)];

        let (output, _, _) = transformer.transform_row(&row, &columns, &EnumCatalog::new(), false);
        assert!(output.get("missing").is_none());
    }
}
