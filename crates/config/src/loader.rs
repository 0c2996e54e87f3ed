use crate::{ConfigError, Result, SheetlintConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
pub const CONFIG_FILES: &[&str] = &[
    ".sheetlintrc.yml",
    ".sheetlintrc.yaml",
    ".sheetlintrc.json",
    ".sheetlintrc",
    "sheetlint.toml",
];

/// Find a sheetlint config file by walking up the directory tree from the given start directory.
/// Returns the path to the config file if found.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::info!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a sheetlint config from the specified path.
/// Automatically detects the format based on file extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<SheetlintConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(
        rules = config.rules.len(),
        include = config.include.len(),
        exclude = config.exclude.len(),
        "Config loaded successfully"
    );
    Ok(config)
}

/// Load a sheetlint config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<SheetlintConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    tracing::debug!(extension, file_name, "Detecting config format");

    let value = match extension {
        "yml" | "yaml" => {
            tracing::trace!("Parsing as YAML");
            parse_yaml(contents, path)?
        }
        "json" => {
            tracing::trace!("Parsing as JSON");
            parse_json(contents, path)?
        }
        "toml" => {
            tracing::trace!("Parsing as TOML");
            parse_toml(contents, path)?
        }
        "" if file_name == ".sheetlintrc" => {
            // No extension: JSON is tried first so its error messages win for
            // brace-delimited files, then YAML
            tracing::trace!("Trying JSON then YAML for .sheetlintrc");
            parse_json(contents, path).or_else(|_| parse_yaml(contents, path))?
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    let config = SheetlintConfig::from_value(value).map_err(|message| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    })?;

    tracing::debug!("Validating config");
    validate_config(&config, path)?;

    Ok(config)
}

/// Parse YAML configuration
fn parse_yaml(contents: &str, path: &Path) -> Result<serde_json::Value> {
    if contents.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("YAML parse error: {e}"),
    })
}

/// Parse JSON configuration
fn parse_json(contents: &str, path: &Path) -> Result<serde_json::Value> {
    serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })
}

/// Parse TOML configuration
fn parse_toml(contents: &str, path: &Path) -> Result<serde_json::Value> {
    toml::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("TOML parse error: {e}"),
    })
}

/// Validate the loaded configuration
///
/// Rule identifiers and options are checked later, against the rule
/// registry; only the file patterns are checked here.
fn validate_config(config: &SheetlintConfig, path: &Path) -> Result<()> {
    if let Some((pattern, error)) = config.invalid_pattern() {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            message: format!("invalid file pattern `{pattern}`: {error}"),
        });
    }

    tracing::debug!("Config validation passed");
    Ok(())
}
