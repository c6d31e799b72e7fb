//! Render data and resolved values.
//!
//! Callers hand the template layer either a plain nested value
//! ([`TemplateData::Nested`]) or an object answering lookups itself
//! ([`TemplateData::Accessor`]). The variant is chosen up front by the
//! caller; the resolver never probes the shape of the data.

use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::widget::Widget;

/// Structured data that answers variable lookups by name.
///
/// Closures of the form `Fn(&str) -> Result<Value>` implement this trait.
///
/// # Example
///
/// ```
/// use serde_json::{json, Value};
/// use widget_template::data::DataAccessor;
/// use widget_template::Result;
///
/// let accessor = |name: &str| -> Result<Value> { Ok(json!(name.to_uppercase())) };
/// assert_eq!(accessor.get("title").unwrap(), json!("TITLE"));
/// ```
pub trait DataAccessor {
    /// Look up a variable by its full name, dots included.
    fn get(&self, name: &str) -> Result<Value>;
}

impl<F> DataAccessor for F
where
    F: Fn(&str) -> Result<Value>,
{
    fn get(&self, name: &str) -> Result<Value> {
        self(name)
    }
}

/// Data supplied to a single render call.
pub enum TemplateData<'a> {
    /// Lookups are delegated to the accessor.
    Accessor(&'a dyn DataAccessor),
    /// Lookups walk the value along dot-separated paths.
    Nested(Cow<'a, Value>),
}

impl<'a> TemplateData<'a> {
    /// Wrap an accessor.
    pub fn accessor(accessor: &'a dyn DataAccessor) -> Self {
        TemplateData::Accessor(accessor)
    }
}

impl Default for TemplateData<'_> {
    /// An empty mapping.
    fn default() -> Self {
        TemplateData::Nested(Cow::Owned(Value::Object(Map::new())))
    }
}

impl<'a> From<&'a Value> for TemplateData<'a> {
    fn from(value: &'a Value) -> Self {
        TemplateData::Nested(Cow::Borrowed(value))
    }
}

impl From<Value> for TemplateData<'_> {
    fn from(value: Value) -> Self {
        TemplateData::Nested(Cow::Owned(value))
    }
}

impl fmt::Debug for TemplateData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateData::Accessor(_) => f.write_str("Accessor(..)"),
            TemplateData::Nested(value) => f.debug_tuple("Nested").field(value).finish(),
        }
    }
}

/// Result of resolving one template variable.
#[derive(Clone)]
pub enum Resolved<'a> {
    /// The widget that owns the render.
    Instance(&'a dyn Widget),
    /// A plain data value.
    Value(Value),
}

impl<'a> Resolved<'a> {
    /// Shorthand for a string value.
    pub fn text(text: impl Into<String>) -> Self {
        Resolved::Value(Value::String(text.into()))
    }

    /// The widget, if this is the instance reference.
    pub fn as_widget(&self) -> Option<&'a dyn Widget> {
        match self {
            Resolved::Instance(widget) => Some(*widget),
            Resolved::Value(_) => None,
        }
    }

    /// The data value, if this is not the instance reference.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Resolved::Instance(_) => None,
            Resolved::Value(value) => Some(value),
        }
    }

    /// Text written into rendered output.
    ///
    /// Strings are written as-is, `null` as nothing, other scalars through
    /// `Display`, and arrays/objects as compact JSON. The widget renders as
    /// its instance id.
    pub fn to_text(&self) -> String {
        match self {
            Resolved::Instance(widget) => widget.instance_id().to_string(),
            Resolved::Value(Value::String(s)) => s.clone(),
            Resolved::Value(Value::Null) => String::new(),
            Resolved::Value(value) => value.to_string(),
        }
    }
}

impl fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Instance(widget) => write!(
                f,
                "Instance({}#{})",
                widget.type_name(),
                widget.instance_id()
            ),
            Resolved::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl PartialEq<Value> for Resolved<'_> {
    fn eq(&self, other: &Value) -> bool {
        self.as_value() == Some(other)
    }
}

/// Lookup surface the engine calls once per variable reference.
pub trait Scope {
    /// Resolve a variable name.
    fn get(&self, name: &str) -> Result<Resolved<'_>>;
}
