//! widget-template - template rendering for UI widgets.
//!
//! Binds widgets to shared, per-type template engines and resolves template
//! variables with widget-aware shorthands for DOM ids, class names and
//! sub-part HTML.
//!
//! # Modules
//!
//! - [`binding`] - Engine extension and the per-type engine registry
//! - [`cli`] - Command-line interface and argument parsing
//! - [`data`] - Render data, data accessors and resolved values
//! - [`engine`] - Default template engine, filters and configuration
//! - [`error`] - Error types and result aliases
//! - [`helper`] - Render entry points for widget authors
//! - [`resolver`] - Variable resolution rules
//! - [`widget`] - Widget capabilities and the DOM naming scheme
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use widget_template::{DomWidget, TemplateHelper};
//!
//! let widget = DomWidget::new("Dialog", "3");
//! let helper = TemplateHelper::new(&widget);
//!
//! let html = helper
//!     .render("<div class=\"${.title}\">${title}</div>", json!({"title": "Hello"}))
//!     .unwrap();
//! assert_eq!(html, "<div class=\"ui-dialog-title\">Hello</div>");
//! ```

pub mod binding;
pub mod cli;
pub mod data;
pub mod engine;
pub mod error;
pub mod helper;
pub mod resolver;
pub mod widget;

pub use binding::{EngineHandle, EngineRegistry, ExtendedEngine};
pub use data::{DataAccessor, Resolved, Scope, TemplateData};
pub use engine::{Engine, EngineConfig, TemplateEngine};
pub use error::{Result, TemplateError};
pub use helper::TemplateHelper;
pub use resolver::ResolutionContext;
pub use widget::{DomWidget, Widget};
