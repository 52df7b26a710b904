//! Writer options loading and validation.

use crate::error::ConfigError;
use crate::options::WriterOptions;
use std::path::Path;

/// Loads and validates writer options from a TOML file.
pub fn load_options(path: &Path) -> Result<WriterOptions, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_options_from_str(&content)
}

/// Parses and validates writer options from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_options_from_str(content: &str) -> Result<WriterOptions, ConfigError> {
    let options: WriterOptions =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_options(&options)?;
    Ok(options)
}

/// Rejects settings that would produce malformed output paths.
fn validate_options(options: &WriterOptions) -> Result<(), ConfigError> {
    for (field, dir) in [("bindir", &options.bindir), ("objdir", &options.objdir)] {
        if dir.as_ref().is_some_and(|d| d.as_os_str().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "{field} must not be empty"
            )));
        }
    }
    if options.repo_root.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "repo_root must not be empty".to_string(),
        ));
    }
    if let Some(ext) = options
        .banners
        .keys()
        .find(|ext| ext.is_empty() || ext.starts_with('.'))
    {
        return Err(ConfigError::ValidationError(format!(
            "banner extension '{ext}' must be given without a leading dot"
        )));
    }
    Ok(())
}
