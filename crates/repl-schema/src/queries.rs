//! Raw SQL against `information_schema` / `pg_catalog`. Kept separate from
//! `inspector.rs` so the memoization/error-policy logic reads cleanly.

use std::collections::HashMap;

use postgres::Client;
use repl_domain::{ColumnMeta, EnumCatalog, ForeignKeyEdge, TypeFamily};

pub fn query_table_list(conn: &mut Client) -> Result<Vec<String>, postgres::Error> {
    let rows = conn.query(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
         ORDER BY table_name",
        &[],
    )?;
    Ok(rows.into_iter().map(|r| r.get::<_, String>(0)).collect())
}

pub fn query_table_columns(conn: &mut Client, table: &str) -> Result<Vec<ColumnMeta>, postgres::Error> {
    let rows = conn.query(
        "SELECT column_name, data_type, udt_name, is_nullable, column_default \
         FROM information_schema.columns \
         WHERE table_schema = 'public' AND table_name = $1 \
         ORDER BY ordinal_position",
        &[&table],
    )?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let name: String = row.get(0);
            let data_type: String = row.get(1);
            let udt_name: String = row.get(2);
            let is_nullable: String = row.get(3);
            let has_default: bool = row.get::<_, Option<String>>(4).is_some();

            let nullable = is_nullable == "YES";
            let mut meta = ColumnMeta::new(name, classify_type(&data_type, &udt_name), nullable, has_default);
            if data_type == "USER-DEFINED" {
                meta = meta.with_enum_name(udt_name);
            }
            meta
        })
        .collect())
}

fn classify_type(data_type: &str, udt_name: &str) -> TypeFamily {
    match data_type {
        "integer" | "bigint" | "smallint" | "serial" | "bigserial" => TypeFamily::Integer,
        "numeric" | "real" | "double precision" | "decimal" => TypeFamily::Numeric,
        "boolean" => TypeFamily::Boolean,
        "timestamp without time zone" | "timestamp with time zone" | "date" | "time without time zone"
        | "time with time zone" => TypeFamily::Temporal,
        "text" | "character varying" | "character" | "citext" => TypeFamily::Text,
        "json" | "jsonb" => TypeFamily::Json,
        "USER-DEFINED" => TypeFamily::Enum,
        _ => {
            let _ = udt_name;
            TypeFamily::Other
        }
    }
}

pub fn query_foreign_keys(conn: &mut Client, table: &str) -> Result<Vec<ForeignKeyEdge>, postgres::Error> {
    let rows = conn.query(
        "SELECT ccu.table_name AS referenced_table \
         FROM information_schema.table_constraints tc \
         JOIN information_schema.key_column_usage kcu \
           ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
         JOIN information_schema.constraint_column_usage ccu \
           ON tc.constraint_name = ccu.constraint_name AND tc.table_schema = ccu.table_schema \
         WHERE tc.constraint_type = 'FOREIGN KEY' \
           AND tc.table_schema = 'public' \
           AND tc.table_name = $1",
        &[&table],
    )?;

    Ok(rows
        .into_iter()
        .map(|row| ForeignKeyEdge::new(table.to_string(), row.get::<_, String>(0)))
        .collect())
}

/// Ordered primary-key column names, used by the Loader to pick an
/// `ON CONFLICT` target when the conflict policy is `update`.
pub fn query_primary_key_columns(conn: &mut Client, table: &str) -> Result<Vec<String>, postgres::Error> {
    let rows = conn.query(
        "SELECT kcu.column_name \
         FROM information_schema.table_constraints tc \
         JOIN information_schema.key_column_usage kcu \
           ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
         WHERE tc.constraint_type = 'PRIMARY KEY' \
           AND tc.table_schema = 'public' \
           AND tc.table_name = $1 \
         ORDER BY kcu.ordinal_position",
        &[&table],
    )?;
    Ok(rows.into_iter().map(|r| r.get::<_, String>(0)).collect())
}

pub fn query_enum_catalog(conn: &mut Client) -> Result<EnumCatalog, postgres::Error> {
    let rows = conn.query(
        "SELECT t.typname, e.enumlabel \
         FROM pg_catalog.pg_type t \
         JOIN pg_catalog.pg_enum e ON t.oid = e.enumtypid \
         JOIN pg_catalog.pg_namespace n ON n.oid = t.typnamespace \
         WHERE n.nspname = 'public' \
         ORDER BY t.typname, e.enumsortorder",
        &[],
    )?;

    let mut labels_by_enum: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        let enum_name: String = row.get(0);
        let label: String = row.get(1);
        labels_by_enum.entry(enum_name).or_default().push(label);
    }
    Ok(EnumCatalog::from_map(labels_by_enum))
}
