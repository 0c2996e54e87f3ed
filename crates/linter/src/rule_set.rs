use crate::registry::{RuleId, RuleRegistry};
use crate::rules;
use crate::traits::StyleCheck;
use sheetlint_config::{ConfigError, RuleSetting};
use sheetlint_types::{RuleSeverity, Severity};
use std::collections::{BTreeMap, HashMap};

/// A rule that will run, with its resolved severity and options.
pub struct ActiveRule {
    pub id: RuleId,
    pub severity: Severity,
    pub check: Box<dyn StyleCheck>,
}

impl std::fmt::Debug for ActiveRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveRule")
            .field("id", &self.id)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

/// The rules enabled for a run, in registry order.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<ActiveRule>,
}

impl RuleSet {
    /// Every rule that is enabled by default, with default options.
    pub fn defaults(registry: &RuleRegistry) -> Result<Self, ConfigError> {
        Self::from_config(registry, &BTreeMap::new())
    }

    /// Resolve the configured rule settings against the registry.
    ///
    /// Rules not mentioned keep their defaults. Unknown identifiers and
    /// invalid options are errors; options of a disabled rule are ignored.
    #[tracing::instrument(skip_all, fields(configured = settings.len()))]
    pub fn from_config(
        registry: &RuleRegistry,
        settings: &BTreeMap<String, RuleSetting>,
    ) -> Result<Self, ConfigError> {
        let mut resolved: HashMap<RuleId, &RuleSetting> = HashMap::new();
        for (name, setting) in settings {
            let Some(rule) = registry.lookup(name) else {
                return Err(ConfigError::unknown_rule(name, registry.names()));
            };
            resolved.insert(rule.id, setting);
        }

        let mut rules = Vec::new();
        for rule in registry.iter() {
            let setting = resolved.get(&rule.id).copied();
            let severity = match setting {
                Some(setting) => setting
                    .severity()
                    .unwrap_or_else(|| rule.default_severity.into()),
                None if rule.enabled_by_default => rule.default_severity.into(),
                None => RuleSeverity::Off,
            };
            let Some(severity) = severity.to_severity() else {
                tracing::debug!(rule = %rule.id, "rule disabled");
                continue;
            };

            let check = rules::build(rule.id, setting.and_then(RuleSetting::options)).map_err(
                |message| ConfigError::InvalidOption {
                    rule: rule.id.as_str().to_string(),
                    message,
                },
            )?;
            rules.push(ActiveRule {
                id: rule.id,
                severity,
                check,
            });
        }

        tracing::debug!(enabled = rules.len(), "resolved rule set");
        Ok(Self { rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveRule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&ActiveRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, severity: Severity, check: Box<dyn StyleCheck>) {
        self.rules.push(ActiveRule {
            id: check.id(),
            severity,
            check,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sheetlint_config::load_config_from_str;
    use std::path::Path;

    fn resolve(json: &str) -> Result<RuleSet, ConfigError> {
        let config = load_config_from_str(json, Path::new(".sheetlintrc.json")).unwrap();
        RuleSet::from_config(&RuleRegistry::new(), &config.rules)
    }

    fn ids(rule_set: &RuleSet) -> Vec<&'static str> {
        rule_set.iter().map(|rule| rule.id.as_str()).collect()
    }

    #[test]
    fn test_defaults() {
        let rule_set = RuleSet::defaults(&RuleRegistry::new()).unwrap();
        assert_eq!(rule_set.len(), 7);
        assert!(rule_set.get(RuleId::ClassNamePattern).is_none());
        assert_eq!(
            rule_set.get(RuleId::NoIdSelector).unwrap().severity,
            Severity::Error
        );
    }

    #[test]
    fn test_disable_and_override() {
        let rule_set = resolve(
            r#"{"no-id-selector": false, "prefer-shorthand": "error", "zero-needs-no-unit": "off"}"#,
        )
        .unwrap();
        assert_eq!(
            ids(&rule_set),
            vec![
                "max-selector-depth",
                "no-tag-qualified-id-or-class",
                "prefer-shorthand",
                "restrict-nesting-purpose",
                "commented-out-code-block",
            ]
        );
        assert_eq!(
            rule_set.get(RuleId::PreferShorthand).unwrap().severity,
            Severity::Error
        );
    }

    #[test]
    fn test_enabling_an_opt_in_rule() {
        let rule_set = resolve(r#"{"class-name-pattern": ["error", {"pattern": "^[a-z-]+$"}]}"#)
            .unwrap();
        assert_eq!(
            rule_set.get(RuleId::ClassNamePattern).unwrap().severity,
            Severity::Error
        );
    }

    #[test]
    fn test_options_object_keeps_default_severity() {
        let rule_set = resolve(r#"{"max-selector-depth": {"max": 5}}"#).unwrap();
        assert_eq!(
            rule_set.get(RuleId::MaxSelectorDepth).unwrap().severity,
            Severity::Warning
        );
    }

    #[test]
    fn test_unknown_rule() {
        let error = resolve(r#"{"no-ids-selector": true}"#).unwrap_err();
        assert_eq!(
            error.to_string(),
            "unknown rule `no-ids-selector` (did you mean `no-id-selector`?)"
        );
    }

    #[test]
    fn test_synthetic_identifiers_cannot_be_configured() {
        let error = resolve(r#"{"parse-error": false}"#).unwrap_err();
        assert!(matches!(error, ConfigError::UnknownRule { .. }));
    }

    #[test]
    fn test_invalid_options() {
        let error = resolve(r#"{"max-selector-depth": {"depth": 2}}"#).unwrap_err();
        assert!(matches!(
            &error,
            ConfigError::InvalidOption { rule, .. } if rule == "max-selector-depth"
        ));

        let error = resolve(r#"{"class-name-pattern": true}"#).unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid options for rule `class-name-pattern`: missing required option `pattern`"
        );
    }

    #[test]
    fn test_options_of_disabled_rule_are_ignored() {
        let settings = BTreeMap::from([(
            "class-name-pattern".to_string(),
            RuleSetting::Detailed {
                severity: Some(RuleSeverity::Off),
                options: json!({ "pattern": "[" }),
            },
        )]);
        let rule_set = RuleSet::from_config(&RuleRegistry::new(), &settings).unwrap();
        assert!(rule_set.get(RuleId::ClassNamePattern).is_none());
    }
}
