//! The end-of-run tabular summary (`spec.md` §7: "duration, tables
//! synchronized over total, rows synchronized, and either success or the
//! failed-table list with kind and detail per entry").

use repl_domain::RunStats;

pub fn render(stats: &RunStats) -> String {
    let mut out = String::new();
    out.push_str("=== SUMMARY ===\n");

    let duration = stats
        .duration()
        .map(|d| format!("{:.2}s", d.num_milliseconds() as f64 / 1000.0))
        .unwrap_or_else(|| "unknown".to_string());

    out.push_str(&format!("duration:          {duration}\n"));
    out.push_str(&format!("tables synced:     {}/{}\n", stats.successful_tables, stats.total_tables));
    out.push_str(&format!("rows inserted:     {}\n", stats.rows_inserted));
    out.push_str(&format!("rows planned:      {}\n", stats.rows_planned));
    out.push_str(&format!(
        "transformations:   enum={} default={} null={} coercion-failures={}\n",
        stats.enum_transformations, stats.default_substitutions, stats.null_substitutions, stats.coercion_failures
    ));

    if stats.has_failures() {
        out.push_str("result:            FAILED\n");
        for failed in &stats.failed_tables {
            out.push_str(&format!("  - {} [{}] {}\n", failed.table, failed.kind.as_str(), failed.detail));
        }
    } else {
        out.push_str("result:            SUCCESS\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use repl_domain::ErrorKind;

    fn started_at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn a_clean_run_renders_success_with_no_failed_table_lines() {
        let mut stats = RunStats::start(2, started_at());
        stats.record_success(10, 10);
        stats.record_success(5, 5);
        stats.finish(started_at() + chrono::Duration::seconds(3));

        let rendered = render(&stats);
        assert!(rendered.contains("result:            SUCCESS\n"));
        assert!(!rendered.contains("FAILED"));
        assert!(rendered.contains("tables synced:     2/2"));
    }

    #[test]
    fn a_failed_run_renders_every_failed_table_with_kind_and_detail() {
        let mut stats = RunStats::start(2, started_at());
        stats.record_success(10, 10);
        stats.record_failure("orders", ErrorKind::InsertFailed, "connection lost");
        stats.finish(started_at() + chrono::Duration::seconds(1));

        let rendered = render(&stats);
        assert!(rendered.contains("result:            FAILED\n"));
        assert!(rendered.contains("orders"));
        assert!(rendered.contains("connection lost"));
    }

    #[test]
    fn an_unfinished_run_reports_duration_as_unknown() {
        let stats = RunStats::start(1, started_at());
        let rendered = render(&stats);
        assert!(rendered.contains("duration:          unknown"));
    }
}
