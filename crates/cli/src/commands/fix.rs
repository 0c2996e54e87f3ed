use crate::OutputFormat;
use anyhow::{Context, Result};
use colored::Colorize;
use sheetlint_linter::{LintRun, Violation};
use sheetlint_types::{apply_edits, TextEdit};
use std::io::{self, Write};
use std::path::PathBuf;

/// Fixable violations of one file
pub struct FileFix {
    pub path: PathBuf,
    pub violations: Vec<Violation>,
}

impl FileFix {
    fn edits(&self) -> Vec<TextEdit> {
        self.violations
            .iter()
            .filter_map(|v| v.fix.as_ref())
            .flat_map(|fix| fix.edits.iter().cloned())
            .collect()
    }
}

/// Collect every violation carrying a fix, grouped by file.
pub fn collect_fixes(run: &LintRun) -> Vec<FileFix> {
    run.outcomes
        .iter()
        .filter_map(|outcome| {
            let violations: Vec<Violation> = outcome
                .violations
                .iter()
                .filter(|v| v.fix.is_some())
                .cloned()
                .collect();
            (!violations.is_empty()).then(|| FileFix {
                path: outcome.path.clone(),
                violations,
            })
        })
        .collect()
}

/// Show what `--fix` would change.
///
/// Human output goes to stdout ahead of the report; other formats keep
/// stdout parseable, so the preview goes to stderr.
pub fn display_dry_run(fixes: &[FileFix], format: OutputFormat) -> io::Result<()> {
    if format == OutputFormat::Human {
        write_dry_run(fixes, &mut io::stdout().lock())
    } else {
        let mut err = io::stderr().lock();
        for file_fix in fixes {
            for v in &file_fix.violations {
                if let Some(fix) = &v.fix {
                    writeln!(
                        err,
                        "would fix {}:{}: {} ({})",
                        file_fix.path.display(),
                        v.start,
                        fix.label,
                        v.rule
                    )?;
                }
            }
        }
        Ok(())
    }
}

fn write_dry_run(fixes: &[FileFix], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "Dry run - would fix the following issues:".cyan())?;
    writeln!(out)?;
    for file_fix in fixes {
        writeln!(out, "{}:", file_fix.path.display().to_string().bold())?;
        for v in &file_fix.violations {
            if let Some(fix) = &v.fix {
                writeln!(
                    out,
                    "  {} {} {} ({})",
                    "→".green(),
                    v.start,
                    fix.label,
                    v.rule.dimmed()
                )?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Rewrite each file with its fixes applied. Returns the number of edits
/// applied; edits that overlap an earlier one are skipped.
#[tracing::instrument(skip_all, fields(files = fixes.len()))]
pub fn apply_fixes(fixes: &[FileFix]) -> Result<usize> {
    let mut applied = 0;
    for file_fix in fixes {
        let content = std::fs::read_to_string(&file_fix.path)
            .with_context(|| format!("failed to read {}", file_fix.path.display()))?;

        let (fixed, count) = apply_edits(&content, &file_fix.edits());
        if count == 0 {
            continue;
        }

        std::fs::write(&file_fix.path, fixed)
            .with_context(|| format!("failed to write {}", file_fix.path.display()))?;
        tracing::debug!(path = %file_fix.path.display(), count, "applied fixes");
        applied += count;
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetlint_linter::{CancelFlag, Engine, RuleRegistry, RuleSet};
    use std::fs;

    fn lint(files: &[PathBuf]) -> LintRun {
        let registry = RuleRegistry::new();
        let engine = Engine::new(&registry, RuleSet::defaults(&registry).unwrap());
        engine.lint_files(files, &CancelFlag::new())
    }

    #[test]
    fn test_collect_fixes_keeps_fixable_violations() {
        let dir = tempfile::tempdir().unwrap();
        let fixable = dir.path().join("a.scss");
        let clean = dir.path().join("b.scss");
        fs::write(&fixable, "#a { margin: 0px; padding: 0em 1px; }").unwrap();
        fs::write(&clean, ".b { margin: 0; }").unwrap();

        let fixes = collect_fixes(&lint(&[fixable.clone(), clean]));
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].path, fixable);
        assert_eq!(fixes[0].violations.len(), 2);
        assert!(fixes[0]
            .violations
            .iter()
            .all(|v| v.rule == "zero-needs-no-unit"));
    }

    #[test]
    fn test_apply_fixes_rewrites_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.scss");
        fs::write(&path, ".a {\n  margin: 0px;\n  padding: 0em 1px;\n}\n").unwrap();

        let fixes = collect_fixes(&lint(std::slice::from_ref(&path)));
        assert_eq!(apply_fixes(&fixes).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            ".a {\n  margin: 0;\n  padding: 0 1px;\n}\n"
        );

        assert!(collect_fixes(&lint(&[path])).is_empty());
    }

    #[test]
    fn test_apply_fixes_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.scss");
        fs::write(&path, ".a { margin: 0px; }").unwrap();
        let fixes = collect_fixes(&lint(std::slice::from_ref(&path)));
        fs::remove_file(&path).unwrap();

        let error = apply_fixes(&fixes).unwrap_err();
        assert!(error.to_string().starts_with("failed to read"));
    }

    #[test]
    fn test_dry_run_lists_fixes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.scss");
        fs::write(&path, ".a { margin: 0px; }").unwrap();
        let fixes = collect_fixes(&lint(std::slice::from_ref(&path)));

        let _lock = crate::color_lock();
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_dry_run(&fixes, &mut out).unwrap();
        colored::control::unset_override();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("→ 1:14 Replace `0px` with `0` (zero-needs-no-unit)"));
        assert_eq!(fs::read_to_string(&path).unwrap(), ".a { margin: 0px; }");
    }
}
