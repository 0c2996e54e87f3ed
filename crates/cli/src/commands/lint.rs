use crate::commands::fix::{apply_fixes, collect_fixes, display_dry_run};
use crate::discovery::collect_files;
use crate::exit_code::ExitCode;
use crate::report::{plural, render, ReportOptions};
use crate::{OutputFormat, OutputOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use sheetlint_config::{find_config, load_config, SheetlintConfig};
use sheetlint_linter::{CancelFlag, Engine, LintRun, RuleRegistry, RuleSet, IO_ERROR};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct LintArgs {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub fix: bool,
    pub fix_dry_run: bool,
}

pub fn run(args: &LintArgs, output: OutputOptions, cancel: &CancelFlag) -> Result<ExitCode> {
    let start_time = Instant::now();
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;

    let (config, root) = resolve_config(args.config.as_deref(), &cwd)?;
    let registry = RuleRegistry::new();
    let rules = RuleSet::from_config(&registry, &config.rules)?;
    tracing::debug!(rules = rules.len(), root = %root.display(), "rules resolved");
    let engine = Engine::new(&registry, rules);

    let files = collect_files(&args.paths, &root, &config.file_filter())?;

    let human = args.format == OutputFormat::Human;
    let spinner = crate::progress::spinner(
        &format!("Linting {} files...", files.len()),
        human && output.show_progress,
    );
    let mut run = engine.lint_files(&files, cancel);
    spinner.finish_and_clear();

    let mut fixed = 0;
    if (args.fix || args.fix_dry_run) && !run.cancelled {
        let fixes = collect_fixes(&run);
        if args.fix_dry_run {
            if !fixes.is_empty() {
                display_dry_run(&fixes, args.format)?;
            }
        } else if !fixes.is_empty() {
            fixed = apply_fixes(&fixes)?;
            // Report what is left after the rewrite
            run = engine.lint_files(&files, cancel);
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(
        &run,
        args.format,
        ReportOptions {
            quiet: !output.show_info,
            fixed,
        },
        &mut out,
    )?;
    out.flush()?;
    // Timings vary between runs, so they stay off stdout
    if human && output.show_info {
        eprintln!(
            "  {} {}",
            "⏱".dimmed(),
            timing(run.outcomes.len(), start_time.elapsed().as_secs_f64())
        );
    }

    let code = exit_code(&run);
    if code == ExitCode::Cancelled {
        eprintln!(
            "{}",
            format!(
                "Cancelled: {} of {} files were linted",
                run.outcomes.len(),
                files.len()
            )
            .yellow()
        );
    }
    Ok(code)
}

fn timing(files: usize, seconds: f64) -> String {
    format!("{} in {seconds:.2}s", plural(files, "file"))
}

/// Use `--config` when given, else the nearest config file above `cwd`,
/// else the defaults. Include and exclude patterns are relative to the
/// returned root: the config file's directory, or `cwd` without one.
fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<(SheetlintConfig, PathBuf)> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(cwd)?,
    };

    let Some(path) = path else {
        tracing::debug!("no config file found, using defaults");
        return Ok((SheetlintConfig::default(), cwd.to_path_buf()));
    };

    let config = load_config(&path)?;
    let root = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| cwd.to_path_buf(), |parent| cwd.join(parent));
    Ok((config, root))
}

/// Cancellation wins, then unreadable files, then error-severity
/// violations.
fn exit_code(run: &LintRun) -> ExitCode {
    if run.cancelled {
        ExitCode::Cancelled
    } else if run.violations().any(|v| v.rule == IO_ERROR) {
        ExitCode::IoError
    } else if run.has_errors() {
        ExitCode::Violations
    } else {
        ExitCode::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetlint_config::ConfigError;
    use std::fs;

    fn run_for(sources: &[(&str, &str)]) -> LintRun {
        let registry = RuleRegistry::new();
        let engine = Engine::new(&registry, RuleSet::defaults(&registry).unwrap());
        LintRun {
            outcomes: sources
                .iter()
                .map(|(path, source)| engine.lint_source(Path::new(path), source))
                .collect(),
            cancelled: false,
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&run_for(&[("a.scss", ".a {}")])), ExitCode::Success);
        assert_eq!(
            exit_code(&run_for(&[("a.scss", ".a { margin: 0px; }")])),
            ExitCode::Success
        );
        assert_eq!(
            exit_code(&run_for(&[("a.scss", "#a {}")])),
            ExitCode::Violations
        );
        assert_eq!(
            exit_code(&run_for(&[("a.scss", ".a {")])),
            ExitCode::Violations
        );

        let mut cancelled = run_for(&[("a.scss", "#a {}")]);
        cancelled.cancelled = true;
        assert_eq!(exit_code(&cancelled), ExitCode::Cancelled);
    }

    #[test]
    fn test_unreadable_file_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let registry = RuleRegistry::new();
        let engine = Engine::new(&registry, RuleSet::defaults(&registry).unwrap());
        let run = LintRun {
            outcomes: vec![
                engine.lint_source(Path::new("a.scss"), "#a {}"),
                engine.lint_file(&dir.path().join("missing.scss")),
            ],
            cancelled: false,
        };
        assert_eq!(exit_code(&run), ExitCode::IoError);
    }

    #[test]
    fn test_timing_line() {
        assert_eq!(timing(1, 0.5), "1 file in 0.50s");
        assert_eq!(timing(3, 1.234), "3 files in 1.23s");
    }

    #[test]
    fn test_resolve_config_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, root) = resolve_config(None, dir.path()).unwrap();
        assert_eq!(config, SheetlintConfig::default());
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_resolve_config_finds_parent_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".sheetlintrc.json"),
            r#"{"no-id-selector": false}"#,
        )
        .unwrap();
        let nested = dir.path().join("styles");
        fs::create_dir_all(&nested).unwrap();

        let (config, root) = resolve_config(None, &nested).unwrap();
        assert!(config.rules.contains_key("no-id-selector"));
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_resolve_config_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("lint.yml");
        let error = resolve_config(Some(&missing), dir.path()).unwrap_err();
        assert!(error.is::<ConfigError>());
        assert_eq!(ExitCode::for_error(&error), ExitCode::ConfigError);
    }

    #[test]
    fn test_unknown_rule_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheetlint.toml");
        fs::write(&path, "[rules]\nno-such-rule = \"error\"\n").unwrap();

        let (config, _) = resolve_config(Some(&path), dir.path()).unwrap();
        let registry = RuleRegistry::new();
        let error: anyhow::Error = RuleSet::from_config(&registry, &config.rules)
            .unwrap_err()
            .into();
        assert_eq!(ExitCode::for_error(&error), ExitCode::ConfigError);
        assert!(error.to_string().contains("no-such-rule"));
    }
}
