//! repl-loader — the Loader (`spec.md` §4.6): paged, parameterized batch
//! inserts with conflict policy and per-row fallback on batch failure.

mod params;

use log::warn;
use postgres::types::ToSql;
use postgres::Client;
use repl_domain::{Batch, ColumnMeta, ReplicationError, Row};
use repl_policies::ConflictPolicy;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub conflict_policy: ConflictPolicy,
    pub batch_size: usize,
    pub clear_first: bool,
    /// Needed only for `ConflictPolicy::Update`, to name an `ON CONFLICT`
    /// target; ignored otherwise.
    pub primary_key_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub index: usize,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOutcome {
    pub inserted_rows: u64,
    pub total_rows: u64,
    pub batches: u64,
    pub errors: Vec<RowError>,
}

#[derive(Debug, Default)]
pub struct Loader;

impl Loader {
    pub fn new() -> Self {
        Self
    }

    pub fn load(
        &self,
        conn: &mut Client,
        table: &str,
        batch: &Batch,
        columns: &[ColumnMeta],
        options: &LoadOptions,
    ) -> Result<LoadOutcome, ReplicationError> {
        if options.clear_first {
            conn.execute(&format!("DELETE FROM {}", quote_ident(table)), &[])
                .map_err(|e| ReplicationError::insert_failed(format!("clear_first delete on {table} failed: {e}")))?;
        }

        let mut outcome = LoadOutcome { total_rows: batch.len() as u64, ..Default::default() };

        let effective_columns = effective_columns(batch, columns);
        if effective_columns.is_empty() {
            return Err(ReplicationError::schema_mismatch(format!(
                "no row key in this batch for {table} matches a target column"
            )));
        }

        for chunk in batch.rows.chunks(options.batch_size.max(1)) {
            outcome.batches += 1;

            match self.insert_batch(conn, table, chunk, &effective_columns, options) {
                Ok(inserted) => outcome.inserted_rows += inserted,
                Err(e) if e.as_db_error().is_none() => {
                    // Not a server-reported rejection (e.g. a dead socket) —
                    // no amount of per-row retrying will help.
                    return Err(ReplicationError::insert_failed(format!("connection lost while inserting into {table}: {e}")));
                }
                Err(_batch_error) => {
                    let (inserted, row_errors) = self.insert_rows_one_by_one(conn, table, chunk, &effective_columns, options)?;
                    outcome.inserted_rows += inserted;
                    for row_error in &row_errors {
                        warn!("{table}: row {} rejected: {}", row_error.index, row_error.detail);
                    }
                    outcome.errors.extend(row_errors);
                }
            }
        }

        Ok(outcome)
    }

    fn insert_batch(
        &self,
        conn: &mut Client,
        table: &str,
        rows: &[Row],
        columns: &[&ColumnMeta],
        options: &LoadOptions,
    ) -> Result<u64, postgres::Error> {
        let (statement, params) = build_insert(table, rows, columns, options);
        let param_refs: Vec<&(dyn ToSql + Sync)> = params.iter().map(|p| p.as_ref()).collect();
        conn.execute(&statement, &param_refs)
    }

    /// Re-runs the same statement shape one row at a time so a single
    /// poison row doesn't sink the rest of the batch (§4.6 "Fallback on
    /// batch failure").
    fn insert_rows_one_by_one(
        &self,
        conn: &mut Client,
        table: &str,
        rows: &[Row],
        columns: &[&ColumnMeta],
        options: &LoadOptions,
    ) -> Result<(u64, Vec<RowError>), ReplicationError> {
        let mut inserted = 0;
        let mut errors = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            let single = std::slice::from_ref(row);
            match self.insert_batch(conn, table, single, columns, options) {
                Ok(n) => inserted += n,
                Err(e) if e.as_db_error().is_none() => {
                    return Err(ReplicationError::insert_failed(format!(
                        "connection lost while inserting row {index} into {table}: {e}"
                    )));
                }
                Err(e) => errors.push(RowError { index, detail: e.to_string() }),
            }
        }

        Ok((inserted, errors))
    }
}

/// `intersect(target.columns, union(keys(row_i)))`, preserving the
/// target's declared column order (`spec.md` §3). The union half comes
/// straight from [`Batch::union_columns`] — the Transformer already
/// computed it when it built this batch.
fn effective_columns<'a>(batch: &Batch, columns: &'a [ColumnMeta]) -> Vec<&'a ColumnMeta> {
    let present = batch.union_columns();
    columns.iter().filter(|c| present.iter().any(|p| p == &c.name)).collect()
}

fn build_insert(
    table: &str,
    rows: &[Row],
    columns: &[&ColumnMeta],
    options: &LoadOptions,
) -> (String, Vec<Box<dyn ToSql + Sync>>) {
    let column_list = columns.iter().map(|c| quote_ident(&c.name)).collect::<Vec<_>>().join(", ");

    let mut params: Vec<Box<dyn ToSql + Sync>> = Vec::with_capacity(rows.len() * columns.len());
    let mut value_groups = Vec::with_capacity(rows.len());

    for row in rows {
        let mut placeholders = Vec::with_capacity(columns.len());
        for column in columns {
            let value = row.get(&column.name).cloned().unwrap_or(repl_domain::Value::Null);
            let value = if value.is_empty_text() { repl_domain::Value::Null } else { value };
            params.push(params::bind(&value, column.type_family));
            placeholders.push(format!("${}", params.len()));
        }
        value_groups.push(format!("({})", placeholders.join(", ")));
    }

    let suffix = conflict_suffix(columns, options);

    let statement = format!(
        "INSERT INTO {table} ({columns}) VALUES {values}{suffix}",
        table = quote_ident(table),
        columns = column_list,
        values = value_groups.join(", "),
        suffix = suffix,
    );

    (statement, params)
}

fn conflict_suffix(columns: &[&ColumnMeta], options: &LoadOptions) -> String {
    match options.conflict_policy {
        ConflictPolicy::Error => String::new(),
        ConflictPolicy::Skip => " ON CONFLICT DO NOTHING".to_string(),
        ConflictPolicy::Update => {
            if options.primary_key_columns.is_empty() {
                return " ON CONFLICT DO NOTHING".to_string();
            }
            let target = options.primary_key_columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", ");
            let assignments = columns
                .iter()
                .filter(|c| !options.primary_key_columns.contains(&c.name))
                .map(|c| format!("{ident} = EXCLUDED.{ident}", ident = quote_ident(&c.name)))
                .collect::<Vec<_>>()
                .join(", ");
            if assignments.is_empty() {
                format!(" ON CONFLICT ({target}) DO NOTHING")
            } else {
                format!(" ON CONFLICT ({target}) DO UPDATE SET {assignments}")
            }
        }
    }
}

/// Exposed so the Executor can quote the same way for its own Clear and
/// Rollback deletes (`spec.md` §4.7 steps 5/7), which don't go through the
/// Loader at all.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use repl_domain::{TypeFamily, Value};

    fn col(name: &str, family: TypeFamily) -> ColumnMeta {
        ColumnMeta::new(name, family, true, false)
    }

    #[test]
    fn identifier_quoting_doubles_embedded_quotes() {
        assert_eq!(quote_ident(r#"weird"name"#), r#""weird""name""#);
    }

    #[test]
    fn effective_columns_intersects_target_columns_with_the_batchs_row_keys() {
        let columns = vec![col("id", TypeFamily::Integer), col("name", TypeFamily::Text), col("unused", TypeFamily::Text)];
        let mut row = Row::new();
        row.insert("id", Value::Int(1));
        row.insert("name", Value::Text("a".into()));
        row.insert("not_a_column", Value::Text("x".into()));

        let batch = Batch::new(vec![row]);
        let effective = effective_columns(&batch, &columns);
        let names: Vec<&str> = effective.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name"]);
    }

    #[test]
    fn conflict_skip_appends_do_nothing() {
        let columns = vec![col("id", TypeFamily::Integer)];
        let refs: Vec<&ColumnMeta> = columns.iter().collect();
        let options = LoadOptions {
            conflict_policy: ConflictPolicy::Skip,
            batch_size: 1000,
            clear_first: false,
            primary_key_columns: vec![],
        };
        assert_eq!(conflict_suffix(&refs, &options), " ON CONFLICT DO NOTHING");
    }

    #[test]
    fn conflict_update_assigns_every_non_key_column_from_excluded() {
        let columns = vec![col("id", TypeFamily::Integer), col("name", TypeFamily::Text)];
        let refs: Vec<&ColumnMeta> = columns.iter().collect();
        let options = LoadOptions {
            conflict_policy: ConflictPolicy::Update,
            batch_size: 1000,
            clear_first: false,
            primary_key_columns: vec!["id".to_string()],
        };
        assert_eq!(conflict_suffix(&refs, &options), r#" ON CONFLICT ("id") DO UPDATE SET "name" = EXCLUDED."name""#);
    }

    #[test]
    fn insert_statement_numbers_placeholders_sequentially_across_rows() {
        let columns = vec![col("id", TypeFamily::Integer), col("name", TypeFamily::Text)];
        let refs: Vec<&ColumnMeta> = columns.iter().collect();
        let mut r1 = Row::new();
        r1.insert("id", Value::Int(1));
        r1.insert("name", Value::Text("a".into()));
        let mut r2 = Row::new();
        r2.insert("id", Value::Int(2));
        r2.insert("name", Value::Text("b".into()));

        let options = LoadOptions {
            conflict_policy: ConflictPolicy::Error,
            batch_size: 1000,
            clear_first: false,
            primary_key_columns: vec![],
        };
        let (statement, params) = build_insert("users", &[r1, r2], &refs, &options);

        assert!(statement.starts_with(r#"INSERT INTO "users" ("id", "name") VALUES ($1, $2), ($3, $4)"#));
        assert_eq!(params.len(), 4);
    }
}
