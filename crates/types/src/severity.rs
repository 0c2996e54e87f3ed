//! Severity types for violations and rule configuration.

/// Severity of a reported violation.
///
/// Errors fail the run; warnings are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Advisory finding; never changes the exit status
    Warning,
    /// Finding that makes the run fail
    Error,
}

impl Severity {
    /// Returns true if this severity indicates an error.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Lowercase name used in rendered output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule severity for lint configuration.
///
/// This represents how a lint rule should be reported, as configured
/// by the user. Rules can be turned off, reported as warnings, or as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleSeverity {
    /// Rule is disabled
    Off,
    /// Rule violations are reported as warnings (default)
    #[default]
    Warn,
    /// Rule violations are reported as errors
    Error,
}

impl RuleSeverity {
    /// Convert to the severity of reported violations.
    ///
    /// Returns `None` if the rule is off.
    #[must_use]
    pub const fn to_severity(self) -> Option<Severity> {
        match self {
            Self::Off => None,
            Self::Warn => Some(Severity::Warning),
            Self::Error => Some(Severity::Error),
        }
    }

    /// Parse a severity keyword as written in configuration files.
    ///
    /// Accepts `off`, `warn`, `warning` and `error`.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "off" => Some(Self::Off),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl From<Severity> for RuleSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Warning => Self::Warn,
            Severity::Error => Self::Error,
        }
    }
}

impl std::fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}
