//! Error types for template rendering.
//!
//! This module defines [`TemplateError`], the error type returned by every
//! render entry point, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration problems (no engine bound) are reported immediately and
//!   are never retried; only the caller can fix them
//! - Data lookups that walk through a missing value fail instead of
//!   rendering an empty string
//! - Use `anyhow::Error` (via `TemplateError::Other`) for errors raised by
//!   caller-provided data accessors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for template operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No engine is bound to the widget and none could be created.
    #[error("No template engine bound for widget type '{widget_type}'")]
    NoEngineBound { widget_type: String },

    /// A nested property walk hit a missing or non-traversable value.
    #[error("Cannot resolve '{path}': no property '{segment}'")]
    Lookup { path: String, segment: String },

    /// Requested target is not registered with the engine.
    #[error("Unknown template target: {name}")]
    UnknownTarget { name: String },

    /// A target with this name is already registered.
    #[error("Template target already exists: {name}")]
    DuplicateTarget { name: String },

    /// Template source could not be parsed.
    #[error("Template parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    /// Interpolation references a filter that is not registered.
    #[error("Unknown filter: {name}")]
    UnknownFilter { name: String },

    /// A filter was called with arguments it cannot use.
    #[error("Filter '{filter}' {message}")]
    FilterArgument { filter: String, message: String },

    /// Engine configuration file not found.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse an engine configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Engine configuration values are invalid.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_engine_bound_displays_widget_type() {
        let err = TemplateError::NoEngineBound {
            widget_type: "TextBox".into(),
        };
        assert!(err.to_string().contains("TextBox"));
    }

    #[test]
    fn lookup_displays_path_and_segment() {
        let err = TemplateError::Lookup {
            path: "user.name".into(),
            segment: "name".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("user.name"));
        assert!(msg.contains("'name'"));
    }

    #[test]
    fn unknown_target_displays_name() {
        let err = TemplateError::UnknownTarget {
            name: "missing".into(),
        };
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn parse_error_displays_offset() {
        let err = TemplateError::Parse {
            offset: 12,
            message: "unterminated interpolation".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("unterminated"));
    }

    #[test]
    fn filter_argument_displays_filter_and_message() {
        let err = TemplateError::FilterArgument {
            filter: "part".into(),
            message: "requires a node name".into(),
        };
        assert_eq!(err.to_string(), "Filter 'part' requires a node name");
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: TemplateError = io_err.into();
        assert!(matches!(err, TemplateError::Io(_)));
    }

    #[test]
    fn anyhow_error_converts() {
        let err: TemplateError = anyhow::anyhow!("accessor failed").into();
        assert_eq!(err.to_string(), "accessor failed");
    }
}
