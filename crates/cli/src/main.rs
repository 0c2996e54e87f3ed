mod commands;
mod discovery;
mod exit_code;
mod progress;
mod report;

use clap::{Parser, Subcommand};
use exit_code::ExitCode;
use sheetlint_linter::CancelFlag;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetlint")]
#[command(about = "Style-rule linter for CSS and SCSS", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Files or directories to lint
    #[arg(value_name = "PATHS", default_value = ".")]
    paths: Vec<PathBuf>,

    /// Path to a sheetlint config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Automatically fix violations that have safe fixes
    #[arg(long, conflicts_with = "fix_dry_run")]
    fix: bool,

    /// Show what would be fixed without modifying files
    #[arg(long, conflicts_with = "fix")]
    fix_dry_run: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Suppress progress indicators (spinners)
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show progress indicators (spinners)
    pub show_progress: bool,
    /// Whether to show informational output (summaries, timings)
    pub show_info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every rule sheetlint knows about
    Rules {
        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: ListFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Grouped, colored output with a summary
    Human,
    /// One `path:line:column: [severity] rule message` line per violation
    Machine,
    /// Aggregated JSON document for tooling
    Json,
    /// GitHub Actions workflow commands for PR annotations
    Github,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ListFormat {
    Human,
    Json,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_progress: !cli.quiet && !cli.no_progress,
        show_info: !cli.quiet,
    };

    let result = match cli.command {
        Some(Commands::Rules { format }) => commands::rules::run(format).map(|()| ExitCode::Success),
        None => {
            let cancel = CancelFlag::new();
            watch_for_interrupt(cancel.clone());

            let args = commands::lint::LintArgs {
                paths: cli.paths,
                config: cli.config,
                format: cli.format,
                fix: cli.fix,
                fix_dry_run: cli.fix_dry_run,
            };
            match tokio::task::spawn_blocking(move || {
                commands::lint::run(&args, output_opts, &cancel)
            })
            .await
            {
                Ok(result) => result,
                Err(join_error) => Err(anyhow::anyhow!("lint run failed: {join_error}")),
            }
        }
    };

    match result {
        Ok(code) => code.into(),
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::for_error(&error).into()
        }
    }
}

/// Cancel the run on Ctrl-C. Files already linted keep their results.
fn watch_for_interrupt(cancel: CancelFlag) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling remaining files");
            cancel.cancel();
        }
    });
}

/// Logs go to stderr, filtered by `RUST_LOG`; silent by default.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color || std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if std::env::var("CLICOLOR").is_ok_and(|val| val == "0") {
        control::set_override(false);
    }
}

/// Serializes tests that touch process-wide color state.
#[cfg(test)]
pub(crate) fn color_lock() -> std::sync::MutexGuard<'static, ()> {
    static COLOR_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
    COLOR_MUTEX
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}


#[cfg(test)]
mod color_tests {
    use super::{color_lock, configure_colors};
    use colored::control::{self, SHOULD_COLORIZE};

    const VARS: [&str; 3] = ["NO_COLOR", "CLICOLOR", "CLICOLOR_FORCE"];

    /// Run `configure_colors` with exactly `env` set and return whether
    /// output would be colored, or `None` when no override was applied.
    fn colorize_with(env: &[(&str, &str)], force_color: bool, no_color: bool) -> Option<bool> {
        let _lock = color_lock();
        let saved: Vec<_> = VARS.iter().map(|var| std::env::var_os(var)).collect();
        for var in VARS {
            std::env::remove_var(var);
        }
        for (var, value) in env {
            std::env::set_var(var, value);
        }

        // Toggle the default so an applied override is distinguishable
        control::set_override(true);
        configure_colors(force_color, no_color);
        let forced_on = SHOULD_COLORIZE.should_colorize();
        control::set_override(false);
        configure_colors(force_color, no_color);
        let forced_off = !SHOULD_COLORIZE.should_colorize();
        control::unset_override();

        for (var, value) in VARS.iter().zip(saved) {
            match value {
                Some(value) => std::env::set_var(var, value),
                None => std::env::remove_var(var),
            }
        }

        match (forced_on, forced_off) {
            (true, true) => None,
            (on, _) => Some(on),
        }
    }

    #[test]
    fn flags_win_over_environment() {
        assert_eq!(colorize_with(&[("NO_COLOR", "1")], true, false), Some(true));
        assert_eq!(colorize_with(&[("CLICOLOR_FORCE", "1")], false, true), Some(false));
    }

    #[test]
    fn no_color_disables_colors_whatever_its_value() {
        assert_eq!(colorize_with(&[("NO_COLOR", "1")], false, false), Some(false));
        assert_eq!(colorize_with(&[("NO_COLOR", "")], false, false), Some(false));
        assert_eq!(
            colorize_with(&[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")], false, false),
            Some(false)
        );
    }

    #[test]
    fn clicolor_force_enables_colors_unless_zero_or_empty() {
        assert_eq!(colorize_with(&[("CLICOLOR_FORCE", "1")], false, false), Some(true));
        assert_eq!(colorize_with(&[("CLICOLOR_FORCE", "0")], false, false), None);
        assert_eq!(colorize_with(&[("CLICOLOR_FORCE", "")], false, false), None);
    }

    #[test]
    fn clicolor_zero_disables_colors() {
        assert_eq!(colorize_with(&[("CLICOLOR", "0")], false, false), Some(false));
        assert_eq!(colorize_with(&[("CLICOLOR", "1")], false, false), None);
        assert_eq!(colorize_with(&[], false, false), None);
    }
}
