//! amiboot: choose the configuration Amiberry boots into.
//!
//! Shows the `.uae` configurations found in the configuration directory,
//! marks the one the launch line currently uses, reads one answer and
//! rewrites the launch line accordingly.
//!
//! # Usage
//!
//! ```text
//! amiboot [OPTIONS]
//!
//! Options:
//!   --config <FILE>           Settings file
//!   --target <KIND>           service | script
//!   --target-file <FILE>      File holding the launch line
//!   --conf-dir <DIR>          Directory with the configuration files
//!   --lang <CODE>             en | es
//!   --param-style <STYLE>     legacy | modern
//!   --write-mode <MODE>       direct | atomic
//!   --dry-run                 Show the new launch line, do not write it
//!   --print-config            Print the effective settings and exit
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable              | Option            |
//! |-----------------------|-------------------|
//! | `AMIBOOT_CONFIG`      | `--config`        |
//! | `AMIBOOT_TARGET`      | `--target`        |
//! | `AMIBOOT_TARGET_FILE` | `--target-file`   |
//! | `AMIBOOT_CONF_DIR`    | `--conf-dir`      |
//! | `AMIBOOT_LANG`        | `--lang`          |
//! | `AMIBOOT_PARAM_STYLE` | `--param-style`   |
//! | `AMIBOOT_WRITE_MODE`  | `--write-mode`    |
//! | `AMIBOOT_DRY_RUN`     | `--dry-run`       |
//!
//! Command-line options win over environment variables, which win over the
//! settings file.
//!
//! # Exit codes
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | change applied, dry run shown, or user quit      |
//! | 1    | invalid selection                                |
//! | 2    | launch line not found                            |
//! | 3    | target file missing                              |
//! | 4    | target file unreadable                           |
//! | 5    | target file unwritable                           |
//! | 6    | bad settings, bad command line, unreadable conf  |

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use amiboot::application::{exit_code, run};
use amiboot::infrastructure::storage::config::{load_settings, AppConfig};
use amiboot::infrastructure::{LineConsole, WriteMode};
use amiboot_core::{Language, ParamStyle, TargetKind};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Choose the configuration Amiberry boots into.
#[derive(Debug, Parser)]
#[command(name = "amiboot", about = "Choose the configuration Amiberry boots into", version)]
struct Cli {
    /// Settings file to use instead of the default locations.
    #[arg(long, value_name = "FILE", env = "AMIBOOT_CONFIG")]
    config: Option<PathBuf>,

    /// Which kind of file holds the launch line.
    #[arg(long, value_enum, env = "AMIBOOT_TARGET")]
    target: Option<TargetArg>,

    /// Path of the service unit or launcher script to edit.
    #[arg(long, value_name = "FILE", env = "AMIBOOT_TARGET_FILE")]
    target_file: Option<PathBuf>,

    /// Directory scanned for configuration files.
    #[arg(long, value_name = "DIR", env = "AMIBOOT_CONF_DIR")]
    conf_dir: Option<PathBuf>,

    /// Language of the menu and messages (`en` or `es`).
    #[arg(long, value_name = "CODE", env = "AMIBOOT_LANG")]
    lang: Option<Language>,

    /// Parameter syntax: `legacy` for Amiberry before 3.4, `modern` after.
    #[arg(long, value_enum, env = "AMIBOOT_PARAM_STYLE")]
    param_style: Option<ParamStyleArg>,

    /// How the target file is replaced.
    #[arg(long, value_enum, env = "AMIBOOT_WRITE_MODE")]
    write_mode: Option<WriteModeArg>,

    /// Print the rewritten launch line instead of writing it.
    #[arg(long, env = "AMIBOOT_DRY_RUN")]
    dry_run: bool,

    /// Print the effective settings as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TargetArg {
    Service,
    Script,
}

impl From<TargetArg> for TargetKind {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Service => TargetKind::Service,
            TargetArg::Script => TargetKind::Script,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ParamStyleArg {
    Legacy,
    Modern,
}

impl From<ParamStyleArg> for ParamStyle {
    fn from(arg: ParamStyleArg) -> Self {
        match arg {
            ParamStyleArg::Legacy => ParamStyle::Legacy,
            ParamStyleArg::Modern => ParamStyle::Modern,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WriteModeArg {
    Direct,
    Atomic,
}

impl From<WriteModeArg> for WriteMode {
    fn from(arg: WriteModeArg) -> Self {
        match arg {
            WriteModeArg::Direct => WriteMode::Direct,
            WriteModeArg::Atomic => WriteMode::Atomic,
        }
    }
}

impl Cli {
    /// Loads the settings file and applies the command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or parsed.
    fn into_app_config(self) -> anyhow::Result<AppConfig> {
        let cfg = load_settings(self.config.as_deref()).with_context(|| match &self.config {
            Some(path) => format!("cannot load settings from '{}'", path.display()),
            None => "cannot load settings".to_string(),
        })?;
        Ok(self.apply(cfg))
    }

    /// Overrides the fields of `cfg` that were given on the command line.
    fn apply(self, mut cfg: AppConfig) -> AppConfig {
        if let Some(target) = self.target {
            cfg.target.kind = target.into();
        }
        // `--target-file` replaces the path of whichever kind is active.
        if let Some(path) = self.target_file {
            match cfg.target.kind {
                TargetKind::Service => cfg.target.service_file = path,
                TargetKind::Script => cfg.target.script_file = path,
            }
        }
        if let Some(dir) = self.conf_dir {
            cfg.configs.directory = dir;
        }
        if let Some(lang) = self.lang {
            cfg.language = lang;
        }
        if let Some(style) = self.param_style {
            cfg.launch.param_style = style.into();
            // An explicit style replaces a custom template from the file.
            cfg.launch.template = None;
        }
        if let Some(mode) = self.write_mode {
            cfg.launch.write_mode = mode.into();
        }
        cfg
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Usage errors must not exit 2, which means "launch line not found".
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                exit_code::CONFIGURATION
            } else {
                exit_code::SUCCESS
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run_cli(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            println!("ERROR: {e:#}");
            ExitCode::from(exit_code::CONFIGURATION)
        }
    }
}

/// Runs one session and returns the process exit code.
///
/// Session failures are reported here with their localized message; only
/// configuration problems are returned as errors.
fn run_cli(cli: Cli) -> anyhow::Result<u8> {
    let dry_run = cli.dry_run;
    let print_config = cli.print_config;
    let cfg = cli.into_app_config()?;

    init_tracing(&cfg.log_level);
    debug!(
        target_file = %cfg.target_path().display(),
        kind = %cfg.target.kind,
        "effective settings"
    );

    if print_config {
        print!("{}", cfg.to_toml()?);
        return Ok(exit_code::SUCCESS);
    }

    let settings = cfg.session_settings(dry_run).context("invalid settings")?;
    let catalog = cfg.catalog();
    let mut console = LineConsole::stdio();

    match run(&settings, &catalog, &mut console) {
        Ok(outcome) => {
            debug!(?outcome, "session finished");
            Ok(outcome.exit_code())
        }
        Err(err) => {
            error!(error = %err, "session failed");
            println!("{}", err.localized(settings.language));
            Ok(err.exit_code())
        }
    }
}

/// Sends diagnostics to stderr; stdout carries only the menu and messages.
///
/// `RUST_LOG` wins over the `log_level` setting.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("amiboot").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_defaults_leave_settings_untouched() {
        // Arrange
        let cli = parse(&[]);

        // Act
        let cfg = cli.apply(AppConfig::default());

        // Assert
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_cli_flags_default_to_false() {
        let cli = parse(&[]);
        assert!(!cli.dry_run);
        assert!(!cli.print_config);
    }

    #[test]
    fn test_cli_target_script_selects_script_file() {
        // Arrange
        let cli = parse(&["--target", "script", "--target-file", "/opt/amiberry.sh"]);

        // Act
        let cfg = cli.apply(AppConfig::default());

        // Assert
        assert_eq!(cfg.target.kind, TargetKind::Script);
        assert_eq!(cfg.target_path(), Path::new("/opt/amiberry.sh"));
        // The service path is not touched
        assert_eq!(
            cfg.target.service_file,
            AppConfig::default().target.service_file
        );
    }

    #[test]
    fn test_cli_target_file_applies_to_service_by_default() {
        let cfg = parse(&["--target-file", "/tmp/a.service"]).apply(AppConfig::default());
        assert_eq!(cfg.target.service_file, PathBuf::from("/tmp/a.service"));
    }

    #[test]
    fn test_cli_conf_dir_override() {
        let cfg = parse(&["--conf-dir", "/srv/uae"]).apply(AppConfig::default());
        assert_eq!(cfg.configs.directory, PathBuf::from("/srv/uae"));
    }

    #[test]
    fn test_cli_lang_accepts_codes_case_insensitively() {
        let cli = parse(&["--lang", "ES"]);
        assert_eq!(cli.lang, Some(Language::Es));
    }

    #[test]
    fn test_cli_unknown_lang_is_a_usage_error() {
        let result = Cli::try_parse_from(["amiboot", "--lang", "de"]);
        let err = result.unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_cli_param_style_clears_custom_template() {
        // Arrange
        let mut file_cfg = AppConfig::default();
        file_cfg.launch.template = Some("-c {}".to_string());

        // Act
        let cfg = parse(&["--param-style", "modern"]).apply(file_cfg);

        // Assert
        assert_eq!(cfg.launch.param_style, ParamStyle::Modern);
        assert_eq!(cfg.launch.template, None);
    }

    #[test]
    fn test_cli_write_mode_override() {
        let cfg = parse(&["--write-mode", "atomic"]).apply(AppConfig::default());
        assert_eq!(cfg.launch.write_mode, WriteMode::Atomic);
    }

    #[test]
    fn test_cli_rejects_unknown_target_kind() {
        assert!(Cli::try_parse_from(["amiboot", "--target", "initd"]).is_err());
    }

    #[test]
    fn test_help_is_not_an_error_exit() {
        let err = Cli::try_parse_from(["amiboot", "--help"]).unwrap_err();
        assert!(!err.use_stderr());
    }

    #[test]
    fn test_into_app_config_with_missing_file_fails_with_path() {
        // Arrange
        let cli = parse(&["--config", "/nonexistent/amiboot.toml"]);

        // Act
        let err = cli.into_app_config().unwrap_err();

        // Assert
        assert!(format!("{err:#}").contains("/nonexistent/amiboot.toml"));
    }
}
