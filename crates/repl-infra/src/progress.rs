//! TTY progress rendering for the Executor's phases (`spec.md` §7: "a
//! per-phase spinner/progress indication ... a table-granularity progress
//! bar during Sync"). Falls back to a hidden, no-op bar when stdout isn't
//! a terminal so piped/CI output stays plain log lines.

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// One line per phase: `=== PHASE NAME ===` followed by a spinner while
/// the phase runs.
pub fn phase_divider(title: &str) {
    println!("=== {title} ===");
}

pub fn phase_spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if !is_tty() {
        bar.set_draw_target(ProgressDrawTarget::hidden());
    }
    bar.set_style(ProgressStyle::with_template("{spinner:.green} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    bar.set_message(message.to_string());
    bar.enable_steady_tick(std::time::Duration::from_millis(120));
    bar
}

/// Table-granularity progress bar for the Sync phase.
pub fn table_progress_bar(total_tables: u64) -> ProgressBar {
    let bar = ProgressBar::new(total_tables);
    if !is_tty() {
        bar.set_draw_target(ProgressDrawTarget::hidden());
    }
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} tables — {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}
