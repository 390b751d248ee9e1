//! Command-line parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::logging::LogConfig;

/// Default directory for the durable audit log.
pub const DEFAULT_LOG_DIR: &str = "/var/lib/asterisk/agi/logs";

/// Default log file name inside the log directory.
pub const DEFAULT_LOG_FILE: &str = "agi.log";

/// CLI options. Positional arguments are the ones the dialplan passes to
/// the AGI script.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "agi-session",
    about = "AGI worker: reads the call preamble and answers with SET VARIABLE directives",
    version
)]
pub struct Cli {
    /// Directory for the audit log (created if missing)
    #[arg(long, env = "AGI_LOG_DIR", default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Audit log file name
    #[arg(long, env = "AGI_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: String,

    /// Do not echo log messages to stderr
    #[arg(long, env = "AGI_QUIET", default_value_t = false)]
    pub quiet: bool,

    /// Script arguments from the dialplan
    #[arg(value_name = "ARG", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Logging settings derived from the flags.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            dir: self.log_dir.clone(),
            file_name: self.log_file.clone(),
            console: !self.quiet,
        }
    }

    /// Positional arguments as [`ScriptArgs`].
    pub fn script_args(&self) -> ScriptArgs {
        ScriptArgs::new(self.args.clone())
    }
}

/// Positional script arguments with placeholder fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptArgs(Vec<String>);

impl ScriptArgs {
    /// Wrap the arguments in dialplan order.
    pub fn new(args: Vec<String>) -> Self {
        Self(args)
    }

    /// Argument at 1-based `position`, or `arg<position>` when absent or empty.
    pub fn get_or_placeholder(&self, position: usize) -> String {
        position
            .checked_sub(1)
            .and_then(|idx| self.0.get(idx))
            .filter(|arg| !arg.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("arg{}", position))
    }

    /// Comma-joined arguments, as written to the audit log.
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl<S: Into<String>> FromIterator<S> for ScriptArgs {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["agi-session"]).unwrap();
        assert_eq!(cli.log_dir, PathBuf::from(DEFAULT_LOG_DIR));
        assert_eq!(cli.log_file, DEFAULT_LOG_FILE);
        assert!(!cli.quiet);
        assert!(cli.args.is_empty());
        assert!(cli.log_config().console);
    }

    #[test]
    fn test_flags_and_positionals() {
        let cli = Cli::try_parse_from([
            "agi-session",
            "--log-dir",
            "/tmp/agi",
            "--quiet",
            "A",
            "B",
        ])
        .unwrap();
        assert_eq!(cli.args, vec!["A", "B"]);
        let log = cli.log_config();
        assert_eq!(log.file_path(), PathBuf::from("/tmp/agi/agi.log"));
        assert!(!log.console);
    }

    #[test]
    fn test_hyphenated_positional() {
        let cli = Cli::try_parse_from(["agi-session", "A", "-5"]).unwrap();
        assert_eq!(cli.args, vec!["A", "-5"]);
    }

    #[test]
    fn test_placeholder_fallback() {
        let args: ScriptArgs = ["A", ""].into_iter().collect();
        assert_eq!(args.get_or_placeholder(1), "A");
        assert_eq!(args.get_or_placeholder(2), "arg2");
        assert_eq!(args.get_or_placeholder(3), "arg3");
        assert_eq!(args.get_or_placeholder(0), "arg0");
    }

    #[test]
    fn test_joined() {
        let args: ScriptArgs = ["A", "B"].into_iter().collect();
        assert_eq!(args.joined(), "A, B");
        assert_eq!(ScriptArgs::default().joined(), "");
    }
}
