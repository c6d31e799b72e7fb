//! Filter registry.
//!
//! A filter receives the value flowing through an interpolation plus its
//! call arguments and returns replacement text. Filters are stored by name;
//! registering a name twice replaces the earlier filter.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::data::Resolved;
use crate::error::Result;

/// A named transformation applied inside `${value | name(args)}`.
pub type Filter = Rc<dyn for<'a> Fn(&Resolved<'a>, &[Resolved<'a>]) -> Result<String>>;

/// Wrap a closure as a [`Filter`].
///
/// # Example
///
/// ```
/// use widget_template::engine::{filter, Filter};
///
/// let upper: Filter = filter(|value, _args| Ok(value.to_text().to_uppercase()));
/// ```
pub fn filter<F>(f: F) -> Filter
where
    F: for<'a> Fn(&Resolved<'a>, &[Resolved<'a>]) -> Result<String> + 'static,
{
    Rc::new(f)
}

/// Filters available on every engine, before any widget extension.
pub fn engine_filters() -> Vec<(&'static str, Filter)> {
    vec![
        ("html", filter(|value, _| Ok(escape_html(&value.to_text())))),
        ("raw", filter(|value, _| Ok(value.to_text()))),
    ]
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Name-to-filter table owned by an engine.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, Filter>,
}

impl FilterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the engine filters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, filter) in engine_filters() {
            registry.insert(name, filter);
        }
        registry
    }

    /// Register a filter. Returns `true` if an earlier filter was replaced.
    pub fn insert(&mut self, name: &str, filter: Filter) -> bool {
        self.filters.insert(name.to_string(), filter).is_some()
    }

    /// Look up a filter by name.
    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name)
    }

    /// Check if a filter is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether no filters are registered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Registered filter names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}
