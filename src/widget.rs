//! Widget capabilities consumed by the template layer.
//!
//! Templates never build DOM names themselves. Every generated identifier,
//! class name and sub-part fragment comes from the [`Widget`] that owns the
//! render, so two widgets of the same type can share one engine without
//! their markup colliding.
//!
//! [`DomWidget`] is a ready-made implementation following the usual
//! `ctrl-{id}-{part}` / `ui-{type}-{part}` naming scheme.

/// A UI component that templates render on behalf of.
pub trait Widget {
    /// Widget class identifier. Widgets with the same type share an engine.
    fn type_name(&self) -> &str;

    /// Identifier of this particular instance.
    fn instance_id(&self) -> &str;

    /// DOM id for a named part of this widget.
    fn id(&self, part: &str) -> String;

    /// CSS class list for a named part of this widget.
    fn part_class_name(&self, part: &str) -> String;

    /// HTML for an empty element representing a named part.
    fn part_html(&self, part: &str, node_name: &str) -> String;
}

/// Widget using generated DOM names.
///
/// # Example
///
/// ```
/// use widget_template::widget::{DomWidget, Widget};
///
/// let widget = DomWidget::new("TextBox", "1").with_skin("dark");
///
/// assert_eq!(widget.id("main"), "ctrl-1-main");
/// assert_eq!(
///     widget.part_class_name("input"),
///     "ui-textbox-input skin-dark-textbox-input"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomWidget {
    type_name: String,
    instance_id: String,
    dom_id_prefix: Option<String>,
    skin: Option<String>,
}

impl DomWidget {
    /// Create a widget of the given type and instance id.
    pub fn new(type_name: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            instance_id: instance_id.into(),
            dom_id_prefix: None,
            skin: None,
        }
    }

    /// Prefix generated ids, typically with the id of the owning view.
    pub fn with_dom_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dom_id_prefix = Some(prefix.into());
        self
    }

    /// Add skin classes to every part class list.
    pub fn with_skin(mut self, skin: impl Into<String>) -> Self {
        self.skin = Some(skin.into());
        self
    }

    fn type_slug(&self) -> String {
        self.type_name.to_lowercase()
    }
}

impl Widget for DomWidget {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn instance_id(&self) -> &str {
        &self.instance_id
    }

    fn id(&self, part: &str) -> String {
        let mut id = String::from("ctrl-");
        if let Some(prefix) = &self.dom_id_prefix {
            id.push_str(prefix);
            id.push('-');
        }
        id.push_str(&self.instance_id);
        if !part.is_empty() {
            id.push('-');
            id.push_str(part);
        }
        id
    }

    fn part_class_name(&self, part: &str) -> String {
        let slug = self.type_slug();
        let mut classes = vec![format!("ui-{}-{}", slug, part)];
        if let Some(skin) = &self.skin {
            classes.push(format!("skin-{}-{}-{}", skin, slug, part));
        }
        classes.join(" ")
    }

    fn part_html(&self, part: &str, node_name: &str) -> String {
        format!(
            r#"<{node} id="{id}" class="{class}"></{node}>"#,
            node = node_name,
            id = self.id(part),
            class = self.part_class_name(part),
        )
    }
}
