//! Hand-rolled argument parser.
//!
//! `spec.md` §9 calls this out explicitly: the recognized flag set is a
//! trivial closed set, so pulling in an argument-parsing framework would
//! be pure overhead. The only required behaviors are: recognize the three
//! documented flags, and treat `--help`/`-h` and any unknown flag the same
//! way (print usage, exit 0) per §6.

pub const USAGE: &str = "\
metasync — replicate an upstream database into a local target

USAGE:
    metasync [OPTIONS]

OPTIONS:
    -d, --dry-run        analyze without mutating the target
    -i, --ignore-errors   continue past per-table failures (disables rollback)
    -h, --help            print this message and exit

All connection settings are read from the environment (see README/.env).
";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliFlags {
    pub dry_run: bool,
    pub ignore_errors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliOutcome {
    Run(CliFlags),
    /// Help requested, or an unrecognized flag was seen — both print usage
    /// and exit 0 per `spec.md` §6.
    PrintUsageAndExit,
}

pub fn parse_args<I, S>(args: I) -> CliOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut flags = CliFlags::default();
    for arg in args {
        match arg.as_ref() {
            "--dry-run" | "-d" => flags.dry_run = true,
            "--ignore-errors" | "-i" => flags.ignore_errors = true,
            "--help" | "-h" => return CliOutcome::PrintUsageAndExit,
            _unknown => return CliOutcome::PrintUsageAndExit,
        }
    }
    CliOutcome::Run(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_runs_with_defaults() {
        let outcome = parse_args(Vec::<&str>::new());
        assert_eq!(outcome, CliOutcome::Run(CliFlags::default()));
    }

    #[test]
    fn long_and_short_flags_are_equivalent() {
        assert_eq!(parse_args(["--dry-run"]), parse_args(["-d"]));
        assert_eq!(parse_args(["--ignore-errors"]), parse_args(["-i"]));
    }

    #[test]
    fn help_short_circuits_to_usage() {
        assert_eq!(parse_args(["--dry-run", "--help"]), CliOutcome::PrintUsageAndExit);
    }

    #[test]
    fn unknown_flag_prints_usage_like_help() {
        assert_eq!(parse_args(["--nonsense"]), CliOutcome::PrintUsageAndExit);
    }

    #[test]
    fn combined_flags_both_apply() {
        let CliOutcome::Run(flags) = parse_args(["-d", "-i"]) else {
            panic!("expected Run outcome");
        };
        assert!(flags.dry_run && flags.ignore_errors);
    }
}
