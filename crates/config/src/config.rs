use serde::Deserialize;
use sheetlint_types::RuleSeverity;
use std::collections::BTreeMap;
use std::path::Path;

/// Loaded sheetlint configuration.
///
/// Two document shapes are accepted. The short form is a bare mapping from
/// rule identifier to setting:
///
/// ```yaml
/// max-selector-depth: { max: 4 }
/// no-id-selector: false
/// ```
///
/// The long form nests that mapping under `rules` and adds file patterns:
///
/// ```yaml
/// rules:
///   zero-needs-no-unit: error
/// include: ["src/**/*.scss"]
/// exclude: ["src/vendor/**"]
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetlintConfig {
    /// Per-rule settings keyed by rule identifier, not yet validated
    pub rules: BTreeMap<String, RuleSetting>,
    /// Glob patterns a file must match to be linted (empty means all)
    pub include: Vec<String>,
    /// Glob patterns that exclude a file, checked before `include`
    pub exclude: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    #[serde(default)]
    rules: BTreeMap<String, RuleSetting>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

const DOCUMENT_KEYS: [&str; 3] = ["rules", "include", "exclude"];

impl SheetlintConfig {
    /// Interpret an already parsed document in either accepted shape.
    pub(crate) fn from_value(value: serde_json::Value) -> Result<Self, String> {
        match value {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::Object(map)
                if map.keys().any(|key| DOCUMENT_KEYS.contains(&key.as_str())) =>
            {
                let document: Document =
                    serde_json::from_value(serde_json::Value::Object(map)).map_err(|e| e.to_string())?;
                Ok(Self {
                    rules: document.rules,
                    include: document.include,
                    exclude: document.exclude,
                })
            }
            serde_json::Value::Object(map) => {
                let rules = serde_json::from_value(serde_json::Value::Object(map))
                    .map_err(|e| e.to_string())?;
                Ok(Self {
                    rules,
                    ..Self::default()
                })
            }
            other => Err(format!(
                "expected a mapping of rule settings, found {}",
                json_type_name(&other)
            )),
        }
    }

    /// Compile the include/exclude patterns.
    ///
    /// Patterns that fail to compile are reported as errors by the loader,
    /// so here they are skipped.
    #[must_use]
    pub fn file_filter(&self) -> FileFilter {
        FileFilter {
            include: compile_patterns(&self.include),
            exclude: compile_patterns(&self.exclude),
        }
    }

    /// Returns the first pattern that is not a valid glob.
    pub(crate) fn invalid_pattern(&self) -> Option<(&str, glob::PatternError)> {
        self.include
            .iter()
            .chain(&self.exclude)
            .find_map(|pattern| {
                expand_braces(pattern)
                    .into_iter()
                    .find_map(|expanded| glob::Pattern::new(&expanded).err())
                    .map(|error| (pattern.as_str(), error))
            })
    }
}

/// Compiled include/exclude patterns.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    include: Vec<glob::Pattern>,
    exclude: Vec<glob::Pattern>,
}

impl FileFilter {
    /// Check a path relative to the config root. Exclusions win over
    /// inclusions; with no include patterns every file is in scope.
    #[must_use]
    pub fn matches(&self, relative: &Path) -> bool {
        let path = relative.to_string_lossy().replace('\\', "/");
        let path = path.strip_prefix("./").unwrap_or(&path);

        if self.exclude.iter().any(|p| p.matches(path)) {
            tracing::trace!(path, "excluded by config");
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| p.matches(path))
    }
}

fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .flat_map(|pattern| expand_braces(pattern))
        .filter_map(|pattern| glob::Pattern::new(&pattern).ok())
        .collect()
}

/// Strip a leading `./` or `/` and collapse repeated slashes.
fn normalize_pattern(pattern: &str) -> String {
    let trimmed = pattern.strip_prefix("./").unwrap_or(pattern);
    let mut normalized = trimmed.strip_prefix('/').unwrap_or(trimmed).to_string();
    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }
    normalized
}

/// Expand a single brace group, so `**/*.{css,scss}` becomes two patterns.
fn expand_braces(pattern: &str) -> Vec<String> {
    let normalized = normalize_pattern(pattern);

    if let (Some(start), Some(end)) = (normalized.find('{'), normalized.find('}')) {
        if start < end {
            let before = &normalized[..start];
            let after = &normalized[end + 1..];
            return normalized[start + 1..end]
                .split(',')
                .map(|option| format!("{before}{}{after}", option.trim()))
                .collect();
        }
    }

    vec![normalized]
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "a mapping",
    }
}

/// Configuration for a single rule.
///
/// Supports several formats:
/// ```yaml
/// # Toggle
/// no-id-selector: false
/// zero-needs-no-unit: true
///
/// # Severity only
/// prefer-shorthand: error
///
/// # Options object, with an optional severity key
/// max-selector-depth: { max: 4 }
/// max-selector-depth: { severity: error, max: 4 }
///
/// # ESLint-style array: [severity, options]
/// max-selector-depth: [error, { max: 4 }]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSetting {
    /// `false`
    Off,
    /// `true`: default severity and options
    Enabled,
    /// Just a severity
    Severity(RuleSeverity),
    /// Options, with or without a severity
    Detailed {
        severity: Option<RuleSeverity>,
        options: serde_json::Value,
    },
}

impl RuleSetting {
    /// The severity the user asked for, if any.
    #[must_use]
    pub fn severity(&self) -> Option<RuleSeverity> {
        match self {
            Self::Off => Some(RuleSeverity::Off),
            Self::Enabled => None,
            Self::Severity(severity) => Some(*severity),
            Self::Detailed { severity, .. } => *severity,
        }
    }

    /// Rule options, if any were given.
    #[must_use]
    pub fn options(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Detailed { options, .. } => Some(options),
            _ => None,
        }
    }
}

fn parse_severity<E: serde::de::Error>(keyword: &str) -> Result<RuleSeverity, E> {
    RuleSeverity::from_keyword(keyword).ok_or_else(|| {
        E::custom(format!(
            "unknown severity `{keyword}` (expected off, warn or error)"
        ))
    })
}

impl<'de> Deserialize<'de> for RuleSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, SeqAccess, Visitor};

        struct RuleSettingVisitor;

        impl<'de> Visitor<'de> for RuleSettingVisitor {
            type Value = RuleSetting;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str(
                    "a boolean, \
                     a severity string ('off', 'warn', 'error'), \
                     an array [severity, options], \
                     or an options object",
                )
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(if value {
                    RuleSetting::Enabled
                } else {
                    RuleSetting::Off
                })
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                parse_severity(value).map(RuleSetting::Severity)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let keyword: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"array with severity"))?;
                let severity = parse_severity(&keyword)?;

                match seq.next_element::<serde_json::Value>()? {
                    Some(options) => Ok(RuleSetting::Detailed {
                        severity: Some(severity),
                        options,
                    }),
                    None => Ok(RuleSetting::Severity(severity)),
                }
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut options = serde_json::Map::deserialize(
                    de::value::MapAccessDeserializer::new(map),
                )?;

                let severity = match options.remove("severity") {
                    None => None,
                    Some(serde_json::Value::String(keyword)) => Some(parse_severity(&keyword)?),
                    Some(_) => return Err(de::Error::custom("`severity` must be a string")),
                };

                Ok(RuleSetting::Detailed {
                    severity,
                    options: serde_json::Value::Object(options),
                })
            }
        }

        deserializer.deserialize_any(RuleSettingVisitor)
    }
}
