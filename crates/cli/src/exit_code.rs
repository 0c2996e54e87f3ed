//! Exit codes for the sheetlint CLI.
//!
//! Distinct codes let scripts and CI systems tell "the stylesheets have
//! problems" apart from "the linter could not run".

use sheetlint_config::ConfigError;

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// No error-severity violations (warnings are allowed)
    Success = 0,
    /// At least one error-severity violation, including parse errors
    Violations = 1,
    /// Missing, unreadable or invalid configuration
    ConfigError = 2,
    /// A file or directory could not be read or written
    IoError = 4,
    /// Interrupted with Ctrl-C
    Cancelled = 130,
}

impl ExitCode {
    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Exit code for an error that stopped the run.
    ///
    /// Configuration problems are reported as such; anything else that can
    /// abort a run comes from the file system.
    #[must_use]
    pub fn for_error(error: &anyhow::Error) -> Self {
        if error.chain().any(|cause| cause.is::<ConfigError>()) {
            Self::ConfigError
        } else {
            Self::IoError
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.code())
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Violations => write!(f, "violations found"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::IoError => write!(f, "I/O error"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::Violations.code(), 1);
        assert_eq!(ExitCode::ConfigError.code(), 2);
        assert_eq!(ExitCode::IoError.code(), 4);
        assert_eq!(ExitCode::Cancelled.code(), 130);
    }

    #[test]
    fn test_config_errors_map_to_config_code() {
        let error = anyhow::Error::from(ConfigError::unknown_rule("no-such-rule", std::iter::empty()));
        assert_eq!(ExitCode::for_error(&error), ExitCode::ConfigError);

        let wrapped = Err::<(), _>(ConfigError::unknown_rule("x", std::iter::empty()))
            .context("while resolving rules")
            .unwrap_err();
        assert_eq!(ExitCode::for_error(&wrapped), ExitCode::ConfigError);
    }

    #[test]
    fn test_other_errors_map_to_io_code() {
        let error = anyhow::Error::from(std::io::Error::other("disk on fire"));
        assert_eq!(ExitCode::for_error(&error), ExitCode::IoError);
    }
}
