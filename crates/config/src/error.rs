use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Fatal configuration problems. Any of these aborts a run before files are
/// linted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("unsupported config file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("unknown rule `{rule}`{}", did_you_mean(.suggestion.as_deref()))]
    UnknownRule {
        rule: String,
        suggestion: Option<String>,
    },

    #[error("invalid options for rule `{rule}`: {message}")]
    InvalidOption { rule: String, message: String },
}

impl ConfigError {
    /// Build an [`ConfigError::UnknownRule`], suggesting the closest known
    /// identifier when one is similar enough.
    #[must_use]
    pub fn unknown_rule<'a>(rule: &str, known: impl IntoIterator<Item = &'a str>) -> Self {
        let suggestion = known
            .into_iter()
            .map(|candidate| (candidate, strsim::jaro_winkler(rule, candidate)))
            .filter(|(_, score)| *score >= 0.85)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate.to_string());

        Self::UnknownRule {
            rule: rule.to_string(),
            suggestion,
        }
    }
}

fn did_you_mean(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(" (did you mean `{s}`?)"))
}
