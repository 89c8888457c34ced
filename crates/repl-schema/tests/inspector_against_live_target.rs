use std::sync::Arc;

use repl_infra::PoolProvider;
use repl_schema::SchemaInspector;

#[test]
fn table_columns_and_enum_catalog_are_memoized() -> Result<(), Box<dyn std::error::Error>> {
    let connection_url = match std::env::var("TARGET_DATABASE_URL") {
        Ok(u) => u,
        Err(_) => {
            eprintln!("Skipping live schema inspection test: TARGET_DATABASE_URL not set");
            return Ok(());
        }
    };

    let provider = PoolProvider::connect(&connection_url, 2)?;
    let mut inspector = SchemaInspector::new(Arc::new(provider));

    let tables = inspector.table_list()?;
    assert!(!tables.is_empty(), "expected at least one base table in the target");

    let first = tables[0].clone();
    let columns_first_call = inspector.table_columns(&first)?;
    let columns_second_call = inspector.table_columns(&first)?;
    assert_eq!(columns_first_call, columns_second_call, "memoized result must be stable across calls");

    let enums_first_call = inspector.enum_catalog()?;
    let enums_second_call = inspector.enum_catalog()?;
    assert_eq!(enums_first_call, enums_second_call);

    Ok(())
}
