//! Engine configuration.
//!
//! Configuration is usually built in code, but can also be read from a YAML
//! file:
//!
//! ```yaml
//! default_filter: html
//! strip: true
//! strict_filters: false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TemplateError};

/// Options controlling how [`Engine`](super::Engine) parses and renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Filter applied to every interpolation whose chain has no `raw`.
    pub default_filter: Option<String>,

    /// Trim surrounding whitespace from target bodies.
    pub strip: bool,

    /// Fail on unknown filters instead of passing the value through.
    pub strict_filters: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_filter: None,
            strip: false,
            strict_filters: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TemplateError::ConfigNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                TemplateError::Io(e)
            }
        })?;

        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| TemplateError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| TemplateError::ConfigValidationError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.default_filter {
            if name.trim().is_empty() {
                return Err(TemplateError::ConfigValidationError {
                    message: "default_filter must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_is_strict_without_default_filter() {
        let config = EngineConfig::default();
        assert_eq!(config.default_filter, None);
        assert!(!config.strip);
        assert!(config.strict_filters);
    }

    #[test]
    fn parses_partial_yaml() {
        let config = EngineConfig::from_yaml_str("default_filter: html").unwrap();
        assert_eq!(config.default_filter.as_deref(), Some("html"));
        assert!(config.strict_filters);
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = EngineConfig::from_yaml_str("escape: true");
        assert!(matches!(
            result,
            Err(TemplateError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn rejects_empty_default_filter() {
        let result = EngineConfig::from_yaml_str("default_filter: '  '");
        assert!(matches!(
            result,
            Err(TemplateError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn load_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("engine.yml");
        fs::write(&path, "strip: true\nstrict_filters: false\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert!(config.strip);
        assert!(!config.strict_filters);
    }

    #[test]
    fn load_reports_missing_file() {
        let result = EngineConfig::load(Path::new("/nonexistent/engine.yml"));
        assert!(matches!(result, Err(TemplateError::ConfigNotFound { .. })));
    }

    #[test]
    fn load_reports_parse_error_with_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("engine.yml");
        fs::write(&path, "strip: [").unwrap();

        let result = EngineConfig::load(&path);
        assert!(matches!(result, Err(TemplateError::ConfigParseError { .. })));
    }
}
