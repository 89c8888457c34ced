//! `metasync` — replicate an upstream database into a local target
//! (`spec.md` §6: exit 0 on success/help/unknown-flag, exit 1 on any
//! fatal error).

use std::process::ExitCode;

use log::{error, info};
use repl_config::{cli, CliOutcome, RunConfig};
use repl_engine::Executor;

fn main() -> ExitCode {
    match cli::parse_args(std::env::args().skip(1)) {
        CliOutcome::PrintUsageAndExit => {
            print!("{}", cli::USAGE);
            ExitCode::SUCCESS
        }
        CliOutcome::Run(flags) => {
            let mut config = match RunConfig::from_env() {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{}: {}", e.kind.as_str(), e.detail);
                    return ExitCode::FAILURE;
                }
            };
            config.apply_cli_flags(&flags);
            init_logging(config.log_level);
            info!("{}", config.describe());

            match run(config) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("{}: {}", e.kind.as_str(), e.detail);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn init_logging(level: repl_config::LogLevel) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_filter_str())).init();
}

fn run(config: RunConfig) -> Result<(), repl_domain::ReplicationError> {
    let mut executor = Executor::new(config)?;
    let (stats, outcome) = executor.run()?;

    println!("{}", repl_engine::render_summary(&stats));
    for issue in &outcome.dry_run_issues {
        match &issue.analysis_error {
            Some(err) => println!("  {}: analysis failed — {err}", issue.table),
            None => println!(
                "  {}: {} cell(s) would be transformed, schema_change={}",
                issue.table, issue.data_transformation_needed, issue.schema_change
            ),
        }
    }

    Ok(())
}
