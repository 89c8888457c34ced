//! repl-config — the Configurator (`spec.md` §4.1): loads and validates
//! runtime options, exposing an immutable [`RunConfig`] snapshot.

pub mod cli;
pub mod run_config;
pub mod url;

pub use cli::{parse_args, CliFlags, CliOutcome};
pub use run_config::{LogLevel, RunConfig};
