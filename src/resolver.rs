//! Variable resolution for widget templates.
//!
//! Every variable the engine meets during a render is answered by a
//! [`ResolutionContext`], which pairs the caller's data with the widget that
//! owns the render.
//!
//! # Resolution Order
//!
//! Rules are tried in this order (first match wins):
//! 1. `instance` - the widget itself, even if the data has an `instance` key
//! 2. `#part` - generated DOM id of `part`
//! 3. `.part` - generated class list of `part`
//! 4. `<node#part>` - HTML of `part` rendered as a `node` element
//! 5. Accessor data - `data.get(name)`
//! 6. Nested data - `a.b.c` walks `data["a"]["b"]["c"]`
//!
//! Shorthands (1-4) are checked before the data is consulted. Deep paths
//! therefore only work for names that are not shorthand tokens.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::data::{Resolved, Scope, TemplateData};
use crate::error::{Result, TemplateError};
use crate::widget::Widget;

/// Name that always resolves to the owning widget.
pub const INSTANCE: &str = "instance";

static PART_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([A-Za-z0-9_-]+)#([A-Za-z0-9_-]+)>$").unwrap());

/// A shorthand token recognized in a variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shorthand<'n> {
    /// `instance`
    Instance,
    /// `#part`
    Id(&'n str),
    /// `.part`
    Class(&'n str),
    /// `<node#part>`
    Part { node_name: &'n str, part: &'n str },
}

impl<'n> Shorthand<'n> {
    /// Classify a variable name, or `None` for a plain data lookup.
    ///
    /// Bracketed names with characters outside `[A-Za-z0-9_-]` are not
    /// shorthands and fall through to the data.
    ///
    /// ```
    /// use widget_template::resolver::Shorthand;
    ///
    /// assert_eq!(Shorthand::parse("#main"), Some(Shorthand::Id("main")));
    /// assert_eq!(
    ///     Shorthand::parse("<div#body>"),
    ///     Some(Shorthand::Part { node_name: "div", part: "body" })
    /// );
    /// assert_eq!(Shorthand::parse("<div#a b>"), None);
    /// assert_eq!(Shorthand::parse("user.name"), None);
    /// ```
    pub fn parse(name: &'n str) -> Option<Self> {
        if name == INSTANCE {
            return Some(Shorthand::Instance);
        }
        if let Some(part) = name.strip_prefix('#') {
            return Some(Shorthand::Id(part));
        }
        if let Some(part) = name.strip_prefix('.') {
            return Some(Shorthand::Class(part));
        }
        let captures = PART_PATTERN.captures(name)?;
        let node_name = captures.get(1)?.as_str();
        let part = captures.get(2)?.as_str();
        Some(Shorthand::Part { node_name, part })
    }
}

/// Resolve one variable name against data and widget.
pub fn resolve<'a>(
    name: &str,
    data: &TemplateData<'_>,
    widget: &'a dyn Widget,
) -> Result<Resolved<'a>> {
    if let Some(shorthand) = Shorthand::parse(name) {
        trace!("Resolved '{}' as shorthand {:?}", name, shorthand);
        return Ok(match shorthand {
            Shorthand::Instance => Resolved::Instance(widget),
            Shorthand::Id(part) => Resolved::text(widget.id(part)),
            Shorthand::Class(part) => Resolved::text(widget.part_class_name(part)),
            Shorthand::Part { node_name, part } => {
                Resolved::text(widget.part_html(part, node_name))
            }
        });
    }

    match data {
        TemplateData::Accessor(accessor) => {
            trace!("Delegating '{}' to data accessor", name);
            accessor.get(name).map(Resolved::Value)
        }
        TemplateData::Nested(root) => lookup_path(root, name).map(Resolved::Value),
    }
}

/// Walk a dot-separated path through nested objects and arrays.
///
/// Every segment must exist; a missing key, an out-of-range index, or a
/// scalar in the middle of the path is a [`TemplateError::Lookup`].
pub fn lookup_path(root: &Value, path: &str) -> Result<Value> {
    let mut current = root;
    for segment in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.ok_or_else(|| TemplateError::Lookup {
            path: path.to_string(),
            segment: segment.to_string(),
        })?;
    }
    Ok(current.clone())
}

/// Per-render pairing of caller data and the owning widget.
///
/// Created at the start of a render and dropped at its end.
pub struct ResolutionContext<'a> {
    data: TemplateData<'a>,
    widget: &'a dyn Widget,
}

impl<'a> ResolutionContext<'a> {
    /// Create a context for one render.
    pub fn new(data: TemplateData<'a>, widget: &'a dyn Widget) -> Self {
        Self { data, widget }
    }

    /// The widget that owns this render.
    pub fn widget(&self) -> &'a dyn Widget {
        self.widget
    }
}

impl Scope for ResolutionContext<'_> {
    fn get(&self, name: &str) -> Result<Resolved<'_>> {
        resolve(name, &self.data, self.widget)
    }
}
