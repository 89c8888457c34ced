//! Immutable `RunConfig` snapshot plus environment loading/validation.
//!
//! Modeled after the teacher's lazy `.env`-then-environment loading
//! (`chem-persistence::config::DbConfig::from_env`), generalized to the
//! full option set of `spec.md` §4.1.

use std::env;

use once_cell::sync::Lazy;
use repl_domain::{ErrorKind, ReplicationError};
use repl_policies::{ConflictPolicy, RunMode};

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv();
});

/// Forces the lazy `.env` load. Exposed for callers (tests, alternate
/// entry points) that want deterministic timing instead of relying on the
/// first `RunConfig::from_env` call.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub upstream_base_url: String,
    pub upstream_database_id: i64,
    pub upstream_username: String,
    pub upstream_password: String,

    pub target_host: String,
    pub target_port: u16,
    pub target_name: String,
    pub target_username: String,
    pub target_password: String,
    pub target_tls_enabled: bool,

    pub connect_timeout_ms: u64,
    pub batch_size: usize,
    pub log_level: LogLevel,
    pub conflict_policy: ConflictPolicy,
    pub enable_rollback: bool,
    pub continue_on_error: bool,
    pub mode: RunMode,
}

/// Reads an environment source, keyed by the variable names in `spec.md`
/// §4.1/§6. Abstracted behind a trait so validation can be unit-tested
/// against a fixed map instead of the real process environment (whose
/// iteration order the §8 round-trip property explicitly must not
/// influence the result).
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl RunConfig {
    pub fn from_env() -> Result<Self, ReplicationError> {
        init_dotenv();
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(source: &dyn EnvSource) -> Result<Self, ReplicationError> {
        let required = |key: &str| -> Result<String, ReplicationError> {
            source
                .get(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ReplicationError::config_invalid(format!("missing required variable {key}")))
        };

        let upstream_base_url = required("UPSTREAM_BASE_URL")?;
        let upstream_database_id = required("UPSTREAM_DATABASE_ID")?
            .parse::<i64>()
            .map_err(|_| ReplicationError::config_invalid("UPSTREAM_DATABASE_ID must be an integer"))?;
        let upstream_username = required("UPSTREAM_USERNAME")?;
        let upstream_password = required("UPSTREAM_PASSWORD")?;

        let target_host = required("TARGET_HOST")?;
        let target_port: u16 = required("TARGET_PORT")?
            .parse()
            .map_err(|_| ReplicationError::config_invalid("TARGET_PORT must be a valid port number"))?;
        if target_port == 0 {
            return Err(ReplicationError::config_invalid("TARGET_PORT must be in 1..=65535"));
        }
        let target_name = required("TARGET_NAME")?;
        let target_username = required("TARGET_USERNAME")?;
        let target_password = required("TARGET_PASSWORD")?;

        let target_tls_enabled = source
            .get("TARGET_TLS_ENABLED")
            .map(|v| parse_bool_env(&v))
            .unwrap_or(false);

        let connect_timeout_ms: u64 = source
            .get("CONNECT_TIMEOUT_MS")
            .map(|v| v.parse().map_err(|_| ReplicationError::config_invalid("CONNECT_TIMEOUT_MS must be an integer")))
            .transpose()?
            .unwrap_or(30_000);
        if connect_timeout_ms < 1_000 {
            return Err(ReplicationError::config_invalid("CONNECT_TIMEOUT_MS must be >= 1000"));
        }

        let batch_size: usize = source
            .get("BATCH_SIZE")
            .map(|v| v.parse().map_err(|_| ReplicationError::config_invalid("BATCH_SIZE must be an integer")))
            .transpose()?
            .unwrap_or(1_000);
        if batch_size == 0 {
            return Err(ReplicationError::config_invalid("BATCH_SIZE must be positive"));
        }

        let log_level = match source.get("LOG_LEVEL") {
            Some(v) => LogLevel::parse(&v)
                .ok_or_else(|| ReplicationError::config_invalid(format!("invalid LOG_LEVEL: {v}")))?,
            None => LogLevel::Info,
        };

        let conflict_policy = match source.get("CONFLICT_POLICY") {
            Some(v) => ConflictPolicy::parse(&v)
                .ok_or_else(|| ReplicationError::config_invalid(format!("invalid CONFLICT_POLICY: {v}")))?,
            None => ConflictPolicy::Error,
        };

        let enable_rollback = source.get("ENABLE_ROLLBACK").map(|v| parse_bool_env(&v)).unwrap_or(true);
        let continue_on_error = source.get("CONTINUE_ON_ERROR").map(|v| parse_bool_env(&v)).unwrap_or(false);

        let mode = match source.get("MODE") {
            Some(v) => RunMode::parse(&v).ok_or_else(|| ReplicationError::config_invalid(format!("invalid MODE: {v}")))?,
            None => RunMode::Sync,
        };

        let mut config = RunConfig {
            upstream_base_url,
            upstream_database_id,
            upstream_username,
            upstream_password,
            target_host,
            target_port,
            target_name,
            target_username,
            target_password,
            target_tls_enabled,
            connect_timeout_ms,
            batch_size,
            log_level,
            conflict_policy,
            enable_rollback,
            continue_on_error,
            mode,
        };

        if config.continue_on_error {
            config.enable_rollback = false;
        }

        Ok(config)
    }

    /// Applies `--dry-run`/`--ignore-errors` overrides from the command
    /// line on top of the environment-derived config, per `spec.md` §6.
    pub fn apply_cli_flags(&mut self, flags: &crate::cli::CliFlags) {
        if flags.dry_run {
            self.mode = RunMode::DryRun;
        }
        if flags.ignore_errors {
            self.continue_on_error = true;
            self.enable_rollback = false;
        }
    }

    /// Logs a summary of the effective configuration without ever emitting
    /// a credential value.
    pub fn describe(&self) -> String {
        format!(
            "upstream={} db={} target={}:{}/{} tls={} batch_size={} conflict_policy={} mode={:?}",
            self.upstream_base_url,
            self.upstream_database_id,
            self.target_host,
            self.target_port,
            self.target_name,
            self.target_tls_enabled,
            self.batch_size,
            self.conflict_policy.as_str(),
            match self.mode {
                RunMode::Sync => "sync",
                RunMode::DryRun => "dry-run",
            }
        )
    }
}

fn parse_bool_env(v: &str) -> bool {
    matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapEnv(HashMap<&'static str, &'static str>);

    impl EnvSource for MapEnv {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| v.to_string())
        }
    }

    fn full_valid_env() -> MapEnv {
        MapEnv(HashMap::from([
            ("UPSTREAM_BASE_URL", "https://upstream.example.com"),
            ("UPSTREAM_DATABASE_ID", "7"),
            ("UPSTREAM_USERNAME", "svc"),
            ("UPSTREAM_PASSWORD", "secret"),
            ("TARGET_HOST", "localhost"),
            ("TARGET_PORT", "5432"),
            ("TARGET_NAME", "devdb"),
            ("TARGET_USERNAME", "postgres"),
            ("TARGET_PASSWORD", "pgpass"),
        ]))
    }

    #[test]
    fn missing_required_field_is_config_invalid() {
        let env = MapEnv(HashMap::new());
        let err = RunConfig::from_source(&env).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConfigInvalid);
    }

    #[test]
    fn defaults_apply_when_optional_fields_absent() {
        let cfg = RunConfig::from_source(&full_valid_env()).unwrap();
        assert_eq!(cfg.batch_size, 1000);
        assert_eq!(cfg.connect_timeout_ms, 30_000);
        assert!(cfg.enable_rollback);
        assert!(!cfg.continue_on_error);
        assert_eq!(cfg.conflict_policy, ConflictPolicy::Error);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut env = full_valid_env();
        env.0.insert("TARGET_PORT", "0");
        let err = RunConfig::from_source(&env).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConfigInvalid);
    }

    #[test]
    fn continue_on_error_forces_rollback_off() {
        let mut env = full_valid_env();
        env.0.insert("CONTINUE_ON_ERROR", "true");
        let cfg = RunConfig::from_source(&env).unwrap();
        assert!(cfg.continue_on_error);
        assert!(!cfg.enable_rollback);
    }

    #[test]
    fn round_trip_is_independent_of_iteration_order() {
        // HashMap iteration order is randomized per-process; constructing
        // two independent env sources from the same logical data must still
        // produce an identical RunConfig.
        let a = RunConfig::from_source(&full_valid_env()).unwrap();
        let b = RunConfig::from_source(&full_valid_env()).unwrap();
        assert_eq!(a.upstream_base_url, b.upstream_base_url);
        assert_eq!(a.target_port, b.target_port);
        assert_eq!(a.batch_size, b.batch_size);
        assert_eq!(a.conflict_policy, b.conflict_policy);
    }
}
