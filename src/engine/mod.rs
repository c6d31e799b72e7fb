//! Template engine.
//!
//! The template layer talks to engines through the [`TemplateEngine`]
//! trait. [`Engine`] is the default implementation: named targets, `${...}`
//! interpolation and filter chains, nothing more.
//!
//! # Targets
//!
//! Template files hold any number of named targets:
//!
//! ```text
//! <!-- target: greeting -->
//! Hello, ${name}!
//! <!-- /target -->
//! ```
//!
//! The closing marker is optional; a target also ends at the next target
//! marker or at the end of the source. Text outside targets is ignored.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use widget_template::data::TemplateData;
//! use widget_template::engine::{Engine, TemplateEngine};
//! use widget_template::resolver::ResolutionContext;
//! use widget_template::widget::DomWidget;
//!
//! let mut engine = Engine::new();
//! engine.parse("<!-- target: greeting -->Hello, ${name}!").unwrap();
//!
//! let widget = DomWidget::new("Label", "1");
//! let data = json!({"name": "Ada"});
//! let scope = ResolutionContext::new(TemplateData::from(&data), &widget);
//! assert_eq!(engine.render("greeting", &scope).unwrap(), "Hello, Ada!");
//! ```

pub mod config;
pub mod filter;
pub mod parser;

pub use config::EngineConfig;
pub use filter::{engine_filters, escape_html, filter, Filter, FilterRegistry};
pub use parser::{parse_template, referenced_variables, Expression, FilterCall, Operand, Segment};

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::data::{Resolved, Scope};
use crate::error::{Result, TemplateError};

/// Filter name that suppresses the configured default filter.
pub const RAW_FILTER: &str = "raw";

static TARGET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--\s*(/)?target\b([^>]*?)-->").unwrap());

static TARGET_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap());

/// A compiled template that renders against a scope.
pub type Renderer<'e> = Box<dyn Fn(&dyn Scope) -> Result<String> + 'e>;

/// Engine capabilities the template layer relies on.
pub trait TemplateEngine {
    /// Render a registered target.
    fn render(&self, target: &str, scope: &dyn Scope) -> Result<String>;

    /// Compile an ad-hoc template body.
    fn compile(&self, content: &str) -> Result<Renderer<'_>>;

    /// Register a filter, replacing any filter with the same name.
    fn add_filter(&mut self, name: &str, filter: Filter);

    /// Check if a filter is registered.
    fn has_filter(&self, name: &str) -> bool;

    /// Number of registered filters.
    fn filter_count(&self) -> usize;
}

/// A parsed template body.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template body.
    pub fn parse(body: &str) -> Result<Self> {
        Ok(Self {
            segments: parse_template(body)?,
        })
    }

    /// Parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Default template engine.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    targets: HashMap<String, Template>,
    filters: FilterRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            targets: HashMap::new(),
            filters: FilterRegistry::with_builtins(),
        }
    }

    /// Create an engine with the given configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse template source and register every target it declares.
    ///
    /// Returns the registered target names in source order. On error no
    /// target is registered.
    pub fn parse(&mut self, source: &str) -> Result<Vec<String>> {
        let mut pending: Vec<(String, &str)> = Vec::new();
        let mut open: Option<(String, usize)> = None;

        for captures in TARGET_MARKER.captures_iter(source) {
            let Some(marker) = captures.get(0) else {
                continue;
            };
            if let Some((name, body_start)) = open.take() {
                pending.push((name, &source[body_start..marker.start()]));
            }
            if captures.get(1).is_some() {
                continue;
            }
            let rest = captures.get(2).map_or("", |m| m.as_str());
            let name = target_name(rest, marker.start())?;
            open = Some((name.to_string(), marker.end()));
        }
        if let Some((name, body_start)) = open {
            pending.push((name, &source[body_start..]));
        }

        let mut templates: Vec<(String, Template)> = Vec::with_capacity(pending.len());
        for (name, body) in pending {
            if self.targets.contains_key(&name) || templates.iter().any(|(n, _)| *n == name) {
                return Err(TemplateError::DuplicateTarget { name });
            }
            let template = self.prepare(body)?;
            templates.push((name, template));
        }

        let mut names = Vec::with_capacity(templates.len());
        for (name, template) in templates {
            debug!("Registered template target '{}'", name);
            self.targets.insert(name.clone(), template);
            names.push(name);
        }
        Ok(names)
    }

    /// Register one target body under `name`.
    pub fn add_target(&mut self, name: &str, body: &str) -> Result<()> {
        if self.targets.contains_key(name) {
            return Err(TemplateError::DuplicateTarget {
                name: name.to_string(),
            });
        }
        let template = self.prepare(body)?;
        debug!("Registered template target '{}'", name);
        self.targets.insert(name.to_string(), template);
        Ok(())
    }

    fn prepare(&self, body: &str) -> Result<Template> {
        let body = if self.config.strip { body.trim() } else { body };
        Template::parse(body)
    }

    /// Check if a target is registered.
    pub fn has_target(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Parsed template of a target.
    pub fn target(&self, name: &str) -> Option<&Template> {
        self.targets.get(name)
    }

    /// Registered target names, sorted.
    pub fn target_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered filters.
    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Render a parsed template against a scope.
    pub fn execute(&self, template: &Template, scope: &dyn Scope) -> Result<String> {
        let mut output = String::new();
        for segment in &template.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Interpolation(expression) => {
                    output.push_str(&self.evaluate(expression, scope)?);
                }
            }
        }
        Ok(output)
    }

    fn evaluate(&self, expression: &Expression, scope: &dyn Scope) -> Result<String> {
        let mut value = operand_value(&expression.head, scope)?;

        for call in &expression.filters {
            let args = call
                .args
                .iter()
                .map(|arg| operand_value(arg, scope))
                .collect::<Result<Vec<_>>>()?;
            value = Resolved::text(self.apply_filter(&call.name, &value, &args)?);
        }

        let is_raw = expression.filters.iter().any(|f| f.name == RAW_FILTER);
        match &self.config.default_filter {
            Some(name) if !is_raw => self.apply_filter(name, &value, &[]),
            _ => Ok(value.to_text()),
        }
    }

    fn apply_filter<'a>(
        &self,
        name: &str,
        value: &Resolved<'a>,
        args: &[Resolved<'a>],
    ) -> Result<String> {
        match self.filters.get(name) {
            Some(filter) => filter(value, args),
            None if self.config.strict_filters => Err(TemplateError::UnknownFilter {
                name: name.to_string(),
            }),
            None => {
                warn!("Unknown filter '{}' ignored", name);
                Ok(value.to_text())
            }
        }
    }
}

/// Name declared by an opening marker, given the text after `target`.
fn target_name(rest: &str, offset: usize) -> Result<&str> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(TemplateError::Parse {
            offset,
            message: "target marker without a name".to_string(),
        });
    }
    let name = rest.strip_prefix(':').map(str::trim).unwrap_or(rest);
    if !rest.starts_with(':') || !TARGET_NAME.is_match(name) {
        return Err(TemplateError::Parse {
            offset,
            message: format!("invalid target name '{}'", name),
        });
    }
    Ok(name)
}

fn operand_value<'s>(operand: &Operand, scope: &'s dyn Scope) -> Result<Resolved<'s>> {
    match operand {
        Operand::Variable(name) => scope.get(name),
        Operand::Literal(value) => Ok(Resolved::Value(value.clone())),
    }
}

impl TemplateEngine for Engine {
    fn render(&self, target: &str, scope: &dyn Scope) -> Result<String> {
        let template = self
            .targets
            .get(target)
            .ok_or_else(|| TemplateError::UnknownTarget {
                name: target.to_string(),
            })?;
        self.execute(template, scope)
    }

    fn compile(&self, content: &str) -> Result<Renderer<'_>> {
        let template = Template::parse(content)?;
        Ok(Box::new(move |scope: &dyn Scope| {
            self.execute(&template, scope)
        }))
    }

    fn add_filter(&mut self, name: &str, filter: Filter) {
        if self.filters.insert(name, filter) {
            debug!("Replaced filter '{}'", name);
        }
    }

    fn has_filter(&self, name: &str) -> bool {
        self.filters.contains(name)
    }

    fn filter_count(&self) -> usize {
        self.filters.len()
    }
}
