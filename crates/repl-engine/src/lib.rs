//! repl-engine — the Executor (`spec.md` §4.7): drives the phase sequence,
//! maintains `RunStats`, and owns every resource borrowed by the other
//! components for the duration of a run.

mod bootstrap;
mod cancellation;
mod summary;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use repl_config::RunConfig;
use repl_domain::{ColumnMeta, ForeignKeyEdge, ReplicationError, RunStats};
use repl_infra::{progress, ConnectionProvider};
use repl_loader::{quote_ident, LoadOptions, Loader};
use repl_policies::{ConflictPolicy, RunMode};
use repl_schema::SchemaInspector;
use repl_transform::Transformer;
use repl_upstream::UpstreamClient;

pub use summary::render as render_summary;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisIssue {
    pub table: String,
    pub data_transformation_needed: u64,
    pub analysis_error: Option<String>,
    pub schema_change: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    pub dry_run_issues: Vec<AnalysisIssue>,
}

/// Unconditionally deletes every row from each named table, in the given
/// order, swallowing per-table failures as a warning. The Clear phase
/// (`spec.md` §4.7 step 5) and Finalize's rollback (step 7) are the same
/// "delete everything, in deletion order" operation, so both call this.
pub fn clear_tables(conn: &mut postgres::Client, deletion_order: &[String]) {
    for table in deletion_order {
        if let Err(e) = conn.execute(&format!("DELETE FROM {}", quote_ident(table)), &[]) {
            warn!("could not clear table {table}: {e}");
        }
    }
}

/// Pure row-count verification rule (`spec.md` §4.6 "Verification", §9
/// Open Question #2): a short insert count is only a table-level failure
/// under `ConflictPolicy::Error` — under `skip`/`update` a row being left
/// alone or merged rather than inserted is the expected, successful
/// outcome, not a mismatch.
fn is_row_count_mismatch(conflict_policy: ConflictPolicy, planned: u64, inserted: u64) -> bool {
    conflict_policy == ConflictPolicy::Error && inserted != planned
}

/// Finalize's two independent decisions (`spec.md` §4.7 step 7, §9 Open
/// Question #3): whether to run the rollback deletes, and whether the run
/// itself is reported as failed. Touches only `RunStats`/config flags, no
/// I/O, so it is pulled out of `run_inner` to be tested on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FinalizeDecision {
    should_rollback: bool,
    should_raise: bool,
}

fn finalize_decision(has_failures: bool, enable_rollback: bool, continue_on_error: bool) -> FinalizeDecision {
    if !has_failures {
        return FinalizeDecision { should_rollback: false, should_raise: false };
    }
    FinalizeDecision { should_rollback: enable_rollback, should_raise: !continue_on_error }
}

pub struct Executor {
    config: RunConfig,
    upstream: UpstreamClient,
    cancelled: Arc<AtomicBool>,
}

impl Executor {
    pub fn new(config: RunConfig) -> Result<Self, ReplicationError> {
        let upstream = UpstreamClient::new(&config.upstream_base_url, config.upstream_database_id, config.connect_timeout_ms)?;
        let cancelled = cancellation::install()?;
        Ok(Self { config, upstream, cancelled })
    }

    pub fn run(&mut self) -> Result<(RunStats, RunOutcome), ReplicationError> {
        let started_at = Utc::now();
        let result = self.run_inner(started_at);
        self.cleanup();
        result
    }

    fn run_inner(&mut self, started_at: chrono::DateTime<Utc>) -> Result<(RunStats, RunOutcome), ReplicationError> {
        progress::phase_divider("AUTH");
        let spinner = progress::phase_spinner("authenticating with upstream");
        self.upstream.authenticate(&self.config.upstream_username, &self.config.upstream_password)?;
        spinner.finish_and_clear();
        self.check_cancelled()?;

        progress::phase_divider("CONNECT");
        let spinner = progress::phase_spinner("connecting to target");
        let provider = Arc::new(bootstrap::connect_with_bootstrap_and_retry(&self.config)?);
        let mut conn = provider.connection()?;
        spinner.finish_and_clear();
        self.check_cancelled()?;

        progress::phase_divider("DISCOVER");
        let spinner = progress::phase_spinner("discovering schema");
        let tables = self.upstream.list_tables()?;
        let table_names: Vec<String> = tables.iter().map(|t| t.name.clone()).collect();

        let mut inspector = SchemaInspector::new(provider.clone());
        let mut columns_by_table: std::collections::HashMap<String, Vec<ColumnMeta>> = std::collections::HashMap::new();
        let mut edges: Vec<ForeignKeyEdge> = Vec::new();
        for name in &table_names {
            columns_by_table.insert(name.clone(), inspector.table_columns(name)?);
            edges.extend(inspector.foreign_keys(name)?);
        }
        let enums = inspector.enum_catalog()?;
        spinner.finish_and_clear();
        self.check_cancelled()?;

        progress::phase_divider("PLAN");
        let plan = repl_planner::plan(&table_names, &edges);
        if plan.cycle_detected {
            warn!("cycle detected among tables; proceeding with best-effort order");
        }

        let mut stats = RunStats::start(table_names.len(), started_at);
        let mut dry_run_issues = Vec::new();

        match self.config.mode {
            RunMode::Sync => {
                progress::phase_divider("CLEAR");
                clear_tables(&mut conn, &plan.deletion_order);
                self.check_cancelled()?;

                progress::phase_divider("SYNC");
                let bar = progress::table_progress_bar(plan.insertion_order.len() as u64);
                let transformer = Transformer::new();
                let loader = Loader::new();

                for table_name in &plan.insertion_order {
                    self.check_cancelled()?;
                    bar.set_message(table_name.clone());

                    let descriptor = tables.iter().find(|t| &t.name == table_name);
                    let Some(descriptor) = descriptor else {
                        bar.inc(1);
                        continue;
                    };

                    let planned = self.upstream.count_rows(descriptor.id);
                    if planned == 0 {
                        stats.record_success(0, 0);
                        bar.inc(1);
                        continue;
                    }

                    let columns = columns_by_table.get(table_name).cloned().unwrap_or_default();
                    let primary_key_columns = inspector.primary_key_columns(table_name)?;
                    let options = LoadOptions {
                        conflict_policy: self.config.conflict_policy,
                        batch_size: self.config.batch_size,
                        clear_first: false,
                        primary_key_columns,
                    };

                    let sync_result = self.sync_table(
                        descriptor.id,
                        table_name,
                        planned,
                        &columns,
                        &enums,
                        &transformer,
                        &loader,
                        &mut conn,
                        &options,
                        &mut stats,
                    );

                    match sync_result {
                        Ok(inserted) => {
                            if is_row_count_mismatch(self.config.conflict_policy, planned as u64, inserted) {
                                let err = ReplicationError::row_count_mismatch(format!(
                                    "{table_name}: inserted {inserted} of {planned} planned rows"
                                ));
                                stats.record_failure(table_name.clone(), err.kind, err.detail);
                            } else {
                                stats.record_success(planned as u64, inserted);
                            }
                        }
                        Err(e) => stats.record_failure(table_name.clone(), e.kind, e.detail),
                    }

                    bar.inc(1);
                }
                bar.finish_and_clear();

                progress::phase_divider("FINALIZE");
                let decision = finalize_decision(stats.has_failures(), self.config.enable_rollback, self.config.continue_on_error);
                if decision.should_rollback {
                    clear_tables(&mut conn, &plan.deletion_order);
                }
                if decision.should_raise {
                    stats.finish(Utc::now());
                    return Err(ReplicationError::sync_failed(if decision.should_rollback {
                        "one or more tables failed; target rolled back"
                    } else {
                        "one or more tables failed"
                    }));
                }
                stats.finish(Utc::now());
            }
            RunMode::DryRun => {
                progress::phase_divider("DRY_RUN_ANALYZE");
                let transformer = Transformer::new();
                for table_name in &plan.insertion_order {
                    self.check_cancelled()?;
                    let Some(descriptor) = tables.iter().find(|t| &t.name == table_name) else { continue };
                    let count = self.upstream.count_rows(descriptor.id);
                    if count == 0 {
                        continue;
                    }
                    let columns = columns_by_table.get(table_name).cloned().unwrap_or_default();
                    let sample_limit = count.min(10);

                    match self.upstream.fetch_page(descriptor.id, 0, sample_limit) {
                        Ok(page) => {
                            let (_, counters, _) = transformer.transform_batch(&page.rows, &columns, &enums, true);
                            let schema_change = columns.iter().any(|c| c.type_family == repl_domain::TypeFamily::Enum);
                            dry_run_issues.push(AnalysisIssue {
                                table: table_name.clone(),
                                data_transformation_needed: counters.enum_transformations
                                    + counters.default_substitutions
                                    + counters.null_substitutions
                                    + counters.coercion_failures,
                                analysis_error: None,
                                schema_change,
                            });
                            stats.record_success(count as u64, 0);
                        }
                        Err(e) => {
                            dry_run_issues.push(AnalysisIssue {
                                table: table_name.clone(),
                                data_transformation_needed: 0,
                                analysis_error: Some(e.to_string()),
                                schema_change: false,
                            });
                            stats.record_failure(table_name.clone(), e.kind, e.detail);
                        }
                    }
                }
                stats.finish(Utc::now());
            }
        }

        Ok((stats, RunOutcome { dry_run_issues }))
    }

    #[allow(clippy::too_many_arguments)]
    fn sync_table(
        &self,
        table_id: i64,
        table_name: &str,
        planned: i64,
        columns: &[ColumnMeta],
        enums: &repl_domain::EnumCatalog,
        transformer: &Transformer,
        loader: &Loader,
        conn: &mut postgres::Client,
        options: &LoadOptions,
        stats: &mut RunStats,
    ) -> Result<u64, ReplicationError> {
        let limit = self.config.batch_size.max(1) as i64;
        let mut offset = 0i64;
        let mut inserted = 0u64;

        loop {
            self.check_cancelled()?;
            let page = self.upstream.fetch_page(table_id, offset, limit)?;
            let page_len = page.rows.len() as i64;

            let (batch, counters, _) = transformer.transform_batch(&page.rows, columns, enums, false);
            stats.enum_transformations += counters.enum_transformations;
            stats.default_substitutions += counters.default_substitutions;
            stats.null_substitutions += counters.null_substitutions;
            stats.coercion_failures += counters.coercion_failures;

            let outcome = loader.load(conn, table_name, &batch, columns, options)?;
            inserted += outcome.inserted_rows;

            offset += page_len;
            if page_len < limit || offset >= planned {
                break;
            }
        }

        Ok(inserted)
    }

    fn check_cancelled(&self) -> Result<(), ReplicationError> {
        if cancellation::requested(&self.cancelled) {
            info!("interrupt received; aborting run");
            return Err(ReplicationError::sync_failed("run aborted by interrupt signal"));
        }
        Ok(())
    }

    fn cleanup(&mut self) {
        self.upstream.logout();
    }
}
