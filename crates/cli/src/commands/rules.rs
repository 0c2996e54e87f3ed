//! `sheetlint rules`: list the rule registry.

use crate::ListFormat;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use sheetlint_linter::{RuleRegistry, StyleRule};
use std::io::{self, Write};

#[derive(Debug, Serialize)]
struct RuleInfo {
    id: &'static str,
    description: &'static str,
    severity: &'static str,
    node_kind: &'static str,
    enabled_by_default: bool,
    fixable: bool,
}

impl From<&StyleRule> for RuleInfo {
    fn from(rule: &StyleRule) -> Self {
        Self {
            id: rule.id.as_str(),
            description: rule.description,
            severity: rule.default_severity.as_str(),
            node_kind: rule.node_kind.as_str(),
            enabled_by_default: rule.enabled_by_default,
            fixable: rule.fixable,
        }
    }
}

pub fn run(format: ListFormat) -> Result<()> {
    let registry = RuleRegistry::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_rules(&registry, format, &mut out)?;
    out.flush()?;
    Ok(())
}

fn write_rules(registry: &RuleRegistry, format: ListFormat, out: &mut impl Write) -> Result<()> {
    let mut rules: Vec<RuleInfo> = registry.iter().map(RuleInfo::from).collect();
    rules.sort_by_key(|rule| rule.id);

    match format {
        ListFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &rules)?;
            writeln!(out)?;
        }
        ListFormat::Human => {
            let width = rules.iter().map(|rule| rule.id.len()).max().unwrap_or(0);
            for rule in &rules {
                let mut tags = vec![rule.severity.to_string()];
                if !rule.enabled_by_default {
                    tags.push("off by default".to_string());
                }
                if rule.fixable {
                    tags.push("fixable".to_string());
                }
                writeln!(
                    out,
                    "{}  {}  {}",
                    format!("{:<width$}", rule.id).bold(),
                    rule.description,
                    format!("({})", tags.join(", ")).dimmed()
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lists_every_rule() {
        let mut out = Vec::new();
        write_rules(&RuleRegistry::new(), ListFormat::Json, &mut out).unwrap();
        let rules: Vec<serde_json::Value> = serde_json::from_slice(&out).unwrap();

        let ids: Vec<&str> = rules.iter().filter_map(|r| r["id"].as_str()).collect();
        assert_eq!(ids, RuleRegistry::new().names());

        let zero = rules
            .iter()
            .find(|r| r["id"] == "zero-needs-no-unit")
            .unwrap();
        assert_eq!(zero["fixable"], true);
        assert_eq!(zero["node_kind"], "value");

        let pattern = rules
            .iter()
            .find(|r| r["id"] == "class-name-pattern")
            .unwrap();
        assert_eq!(pattern["enabled_by_default"], false);
    }

    #[test]
    fn test_human_table() {
        let _lock = crate::color_lock();
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_rules(&RuleRegistry::new(), ListFormat::Human, &mut out).unwrap();
        colored::control::unset_override();

        let output = String::from_utf8(out).unwrap();
        assert_eq!(output.lines().count(), 8);
        let id_line = output
            .lines()
            .find(|line| line.starts_with("no-id-selector "))
            .unwrap();
        assert!(id_line.ends_with("(error)"));
        assert!(output.contains("(warning, off by default)"));
        assert!(output.contains("(warning, fixable)"));
    }
}
