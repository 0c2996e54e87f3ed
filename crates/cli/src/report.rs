//! Rendering a [`LintRun`] for people, scripts and CI.

use crate::OutputFormat;
use colored::Colorize;
use sheetlint_linter::{FileOutcome, FileStatus, LintRun, Violation};
use sheetlint_types::Severity;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Hide warnings and the human summary
    pub quiet: bool,
    /// Number of fixes applied before the run, reported in the summary
    pub fixed: usize,
}

/// Write `run` to `out` in the requested format.
///
/// Violations are written in the order the engine produced them: by path,
/// then position, then rule.
pub fn render(
    run: &LintRun,
    format: OutputFormat,
    options: ReportOptions,
    out: &mut impl Write,
) -> io::Result<()> {
    match format {
        OutputFormat::Human => render_human(run, options, out),
        OutputFormat::Machine => render_machine(run, options, out),
        OutputFormat::Json => render_json(run, options, out),
        OutputFormat::Github => render_github(run, options, out),
    }
}

fn shown(violation: &Violation, options: ReportOptions) -> bool {
    !options.quiet || violation.severity.is_error()
}

fn render_machine(run: &LintRun, options: ReportOptions, out: &mut impl Write) -> io::Result<()> {
    for v in run.violations().filter(|v| shown(v, options)) {
        writeln!(
            out,
            "{}:{}: [{}] {} {}",
            v.path.display(),
            v.start,
            v.severity,
            v.rule,
            v.message
        )?;
    }
    Ok(())
}

fn render_human(run: &LintRun, options: ReportOptions, out: &mut impl Write) -> io::Result<()> {
    let mut first = true;
    for outcome in &run.outcomes {
        let violations: Vec<&Violation> = outcome
            .violations
            .iter()
            .filter(|v| shown(v, options))
            .collect();
        if violations.is_empty() {
            continue;
        }

        if !first {
            writeln!(out)?;
        }
        first = false;
        writeln!(out, "{}", outcome.path.display().to_string().underline())?;

        let positions: Vec<String> = violations.iter().map(|v| v.start.to_string()).collect();
        let width = positions.iter().map(String::len).max().unwrap_or(0);
        for (violation, position) in violations.iter().zip(&positions) {
            let severity = format!("{:<7}", violation.severity.as_str());
            let severity = match violation.severity {
                Severity::Error => severity.red(),
                Severity::Warning => severity.yellow(),
            };
            writeln!(
                out,
                "  {}  {}  {}  {}",
                format!("{position:<width$}").dimmed(),
                severity,
                violation.message,
                violation.rule.dimmed()
            )?;
        }
    }

    if options.quiet {
        return Ok(());
    }
    if !first {
        writeln!(out)?;
    }
    write_summary(run, options, out)
}

fn write_summary(run: &LintRun, options: ReportOptions, out: &mut impl Write) -> io::Result<()> {
    if options.fixed > 0 {
        writeln!(
            out,
            "{}",
            format!("✓ Fixed {} issue(s)", options.fixed).green()
        )?;
    }

    let errors = run.count(Severity::Error);
    let warnings = run.count(Severity::Warning);
    let problems = errors + warnings;
    if problems == 0 {
        let files = plural(run.outcomes.len(), "file");
        writeln!(
            out,
            "{}",
            format!("✓ No problems found in {files}").green().bold()
        )?;
    } else {
        let line = format!(
            "✗ {} ({}, {})",
            plural(problems, "problem"),
            plural(errors, "error"),
            plural(warnings, "warning")
        );
        let line = if errors > 0 { line.red() } else { line.yellow() };
        writeln!(out, "{}", line.bold())?;
    }

    let unchecked: Vec<&FileOutcome> = run.unchecked().collect();
    if !unchecked.is_empty() {
        let noun = if unchecked.len() == 1 { "file" } else { "files" };
        writeln!(out, "{} {noun} could not be checked:", unchecked.len())?;
        for outcome in unchecked {
            writeln!(out, "  {}", outcome.path.display())?;
        }
    }
    Ok(())
}

pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn render_json(run: &LintRun, options: ReportOptions, out: &mut impl Write) -> io::Result<()> {
    let violation_to_json = |v: &Violation| {
        serde_json::json!({
            "message": v.message,
            "severity": v.severity.as_str(),
            "rule": v.rule,
            "fixable": v.fix.is_some(),
            "location": {
                "start": { "line": v.start.line, "column": v.start.column },
                "end": { "line": v.end.line, "column": v.end.column }
            }
        })
    };

    let files: Vec<serde_json::Value> = run
        .outcomes
        .iter()
        .map(|outcome| {
            let (errors, warnings): (Vec<&Violation>, Vec<&Violation>) = outcome
                .violations
                .iter()
                .partition(|v| v.severity.is_error());
            serde_json::json!({
                "file": outcome.path.to_string_lossy(),
                "status": match outcome.status {
                    FileStatus::Checked => "checked",
                    FileStatus::Unchecked => "unchecked",
                },
                "errors": errors.into_iter().map(violation_to_json).collect::<Vec<_>>(),
                "warnings": warnings.into_iter().map(violation_to_json).collect::<Vec<_>>(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "success": !run.has_errors() && !run.cancelled,
        "cancelled": run.cancelled,
        "files": files,
        "stats": {
            "total_files": run.outcomes.len(),
            "total_errors": run.count(Severity::Error),
            "total_warnings": run.count(Severity::Warning),
            "unchecked_files": run.unchecked().count(),
            "fixed": options.fixed,
        }
    });

    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)
}

fn render_github(run: &LintRun, options: ReportOptions, out: &mut impl Write) -> io::Result<()> {
    for v in run.violations().filter(|v| shown(v, options)) {
        writeln!(
            out,
            "::{} file={},line={},col={},endLine={},endColumn={}::{} [{}]",
            v.severity,
            escape_property(&v.path.to_string_lossy()),
            v.start.line,
            v.start.column,
            v.end.line,
            v.end.column,
            escape_data(&v.message),
            v.rule
        )?;
    }
    Ok(())
}

/// Workflow command data must not contain raw `%` or line breaks.
fn escape_data(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(text: &str) -> String {
    escape_data(text).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetlint_linter::{Engine, RuleRegistry, RuleSet};
    use std::path::Path;

    fn sample_run() -> LintRun {
        let registry = RuleRegistry::new();
        let engine = Engine::new(&registry, RuleSet::defaults(&registry).unwrap());
        LintRun {
            outcomes: vec![
                engine.lint_source(Path::new("styles/a.scss"), "#a { margin: 0px; }"),
                engine.lint_source(Path::new("styles/b.scss"), ".b {\n  color: red;\n"),
            ],
            cancelled: false,
        }
    }

    fn clean_run() -> LintRun {
        let registry = RuleRegistry::new();
        let engine = Engine::new(&registry, RuleSet::defaults(&registry).unwrap());
        LintRun {
            outcomes: vec![
                engine.lint_source(Path::new("a.scss"), ".a { color: red; }"),
                engine.lint_source(Path::new("b.css"), ".b { margin: 0; }"),
            ],
            cancelled: false,
        }
    }

    fn render_to_string(run: &LintRun, format: OutputFormat, options: ReportOptions) -> String {
        let mut out = Vec::new();
        render(run, format, options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn render_plain(run: &LintRun, options: ReportOptions) -> String {
        let _lock = crate::color_lock();
        colored::control::set_override(false);
        let output = render_to_string(run, OutputFormat::Human, options);
        colored::control::unset_override();
        output
    }

    #[test]
    fn test_machine_output() {
        let output = render_to_string(&sample_run(), OutputFormat::Machine, ReportOptions::default());
        insta::assert_snapshot!(output, @r"
        styles/a.scss:1:1: [error] no-id-selector Avoid the id selector `#a`; use a class instead
        styles/a.scss:1:14: [warning] zero-needs-no-unit Zero needs no unit; write `0` instead of `0px`
        styles/b.scss:1:4: [error] parse-error unclosed `{`
        ");
    }

    #[test]
    fn test_machine_output_quiet_hides_warnings() {
        let options = ReportOptions {
            quiet: true,
            ..ReportOptions::default()
        };
        let output = render_to_string(&sample_run(), OutputFormat::Machine, options);
        assert_eq!(output.lines().count(), 2);
        assert!(!output.contains("[warning]"));
    }

    #[test]
    fn test_human_output() {
        let output = render_plain(&sample_run(), ReportOptions::default());
        insta::assert_snapshot!(output, @r"
        styles/a.scss
          1:1   error    Avoid the id selector `#a`; use a class instead  no-id-selector
          1:14  warning  Zero needs no unit; write `0` instead of `0px`  zero-needs-no-unit

        styles/b.scss
          1:4  error    unclosed `{`  parse-error

        ✗ 3 problems (2 errors, 1 warning)
        1 file could not be checked:
          styles/b.scss
        ");
    }

    #[test]
    fn test_human_output_clean() {
        let options = ReportOptions {
            fixed: 2,
            ..ReportOptions::default()
        };
        let output = render_plain(&clean_run(), options);
        insta::assert_snapshot!(output, @r"
        ✓ Fixed 2 issue(s)
        ✓ No problems found in 2 files
        ");
    }

    #[test]
    fn test_human_output_quiet() {
        let options = ReportOptions {
            quiet: true,
            ..ReportOptions::default()
        };
        let output = render_plain(&sample_run(), options);
        assert!(!output.contains("zero-needs-no-unit"));
        assert!(!output.contains("problems"));
        assert!(output.contains("no-id-selector"));
    }

    #[test]
    fn test_json_output() {
        let output = render_to_string(&sample_run(), OutputFormat::Json, ReportOptions::default());
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["cancelled"], false);
        assert_eq!(json["stats"]["total_files"], 2);
        assert_eq!(json["stats"]["total_errors"], 2);
        assert_eq!(json["stats"]["total_warnings"], 1);
        assert_eq!(json["stats"]["unchecked_files"], 1);

        let first = &json["files"][0];
        assert_eq!(first["file"], "styles/a.scss");
        assert_eq!(first["status"], "checked");
        assert_eq!(first["errors"][0]["rule"], "no-id-selector");
        assert_eq!(first["warnings"][0]["rule"], "zero-needs-no-unit");
        assert_eq!(first["warnings"][0]["fixable"], true);
        assert_eq!(
            first["warnings"][0]["location"],
            serde_json::json!({ "start": { "line": 1, "column": 14 }, "end": { "line": 1, "column": 17 } })
        );
        assert_eq!(json["files"][1]["status"], "unchecked");
    }

    #[test]
    fn test_json_output_clean() {
        let output = render_to_string(&clean_run(), OutputFormat::Json, ReportOptions::default());
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["stats"]["total_errors"], 0);
    }

    #[test]
    fn test_github_output() {
        let output = render_to_string(&sample_run(), OutputFormat::Github, ReportOptions::default());
        insta::assert_snapshot!(output, @r"
        ::error file=styles/a.scss,line=1,col=1,endLine=1,endColumn=3::Avoid the id selector `#a`; use a class instead [no-id-selector]
        ::warning file=styles/a.scss,line=1,col=14,endLine=1,endColumn=17::Zero needs no unit; write `0` instead of `0px` [zero-needs-no-unit]
        ::error file=styles/b.scss,line=1,col=4,endLine=1,endColumn=4::unclosed `{` [parse-error]
        ");
    }

    #[test]
    fn test_github_escaping() {
        assert_eq!(escape_data("100% done\nnext"), "100%25 done%0Anext");
        assert_eq!(escape_property("C:\\a,b.scss"), "C%3A\\a%2Cb.scss");
    }
}
