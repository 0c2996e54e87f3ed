//! Stylesheet dialect detection.

use std::path::Path;

/// Syntax dialect of a stylesheet (determines tokenizing strategy).
///
/// Both dialects share the same tree. The dialect only decides whether
/// SCSS-only lexical constructs, such as `//` line comments, are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// Plain CSS (.css)
    Css,
    /// Sass in SCSS syntax (.scss)
    #[default]
    Scss,
}

impl Dialect {
    /// Detect the dialect from a file path based on its extension.
    ///
    /// Returns `None` if the extension is not a supported stylesheet type.
    /// The indented `.sass` syntax is not supported.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        match extension.to_ascii_lowercase().as_str() {
            "css" => Some(Self::Css),
            "scss" => Some(Self::Scss),
            _ => None,
        }
    }

    /// Returns `true` if `//` starts a comment running to the end of the line.
    #[must_use]
    pub const fn has_line_comments(self) -> bool {
        matches!(self, Self::Scss)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css => write!(f, "css"),
            Self::Scss => write!(f, "scss"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_dialect_from_path() {
        assert_eq!(
            Dialect::from_path(&PathBuf::from("styles/main.css")),
            Some(Dialect::Css)
        );
        assert_eq!(
            Dialect::from_path(&PathBuf::from("_variables.scss")),
            Some(Dialect::Scss)
        );
        assert_eq!(
            Dialect::from_path(&PathBuf::from("LEGACY.CSS")),
            Some(Dialect::Css)
        );
        assert_eq!(Dialect::from_path(&PathBuf::from("theme.sass")), None);
        assert_eq!(Dialect::from_path(&PathBuf::from("README.md")), None);
        assert_eq!(Dialect::from_path(&PathBuf::from("Makefile")), None);
    }

    #[test]
    fn test_line_comments() {
        assert!(Dialect::Scss.has_line_comments());
        assert!(!Dialect::Css.has_line_comments());
    }
}
