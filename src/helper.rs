//! Render entry points for widget authors.
//!
//! A [`TemplateHelper`] belongs to one widget. It finds the widget's engine
//! (an engine set on the helper, else the engine registered for the widget
//! type, else a freshly created default) and renders templates with a
//! [`ResolutionContext`] wrapping the caller's data and the widget.
//!
//! # Shorthands
//!
//! Inside templates rendered through the helper:
//!
//! - `${#main}` is the DOM id of part `main`
//! - `${.main}` is the class list of part `main`
//! - `${<div#main>}` is the HTML of part `main` as a `div`
//! - `${instance}` is the widget itself (mostly useful as a filter argument)
//!
//! Shorthands only make sense with flat data: a data property named
//! `instance`, or a dotted path starting with `#` or `.`, can never be
//! reached.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use widget_template::binding::ExtendedEngine;
//! use widget_template::engine::Engine;
//! use widget_template::helper::TemplateHelper;
//! use widget_template::widget::DomWidget;
//!
//! let mut engine = Engine::new();
//! engine
//!     .parse("<!-- target: box --><div id=\"${#main}\">${title}</div>")
//!     .unwrap();
//!
//! let widget = DomWidget::new("Box", "1");
//! let mut helper = TemplateHelper::new(&widget);
//! helper.set_template_engine(ExtendedEngine::new(engine));
//!
//! let html = helper.render_template("box", &json!({"title": "Hi"})).unwrap();
//! assert_eq!(html, "<div id=\"ctrl-1-main\">Hi</div>");
//! ```

use std::cell::RefCell;

use tracing::debug;

use crate::binding::{self, EngineHandle};
use crate::data::TemplateData;
use crate::error::Result;
use crate::resolver::ResolutionContext;
use crate::widget::Widget;

/// Template rendering facade for one widget.
pub struct TemplateHelper<'w> {
    widget: &'w dyn Widget,
    engine: RefCell<Option<EngineHandle>>,
}

impl<'w> TemplateHelper<'w> {
    /// Create a helper for a widget.
    pub fn new(widget: &'w dyn Widget) -> Self {
        Self {
            widget,
            engine: RefCell::new(None),
        }
    }

    /// The widget this helper renders for.
    pub fn widget(&self) -> &'w dyn Widget {
        self.widget
    }

    /// Engine used by this widget.
    ///
    /// Falls back to the engine registered for the widget type, creating a
    /// default one on first access. The result is cached on the helper.
    ///
    /// # Errors
    ///
    /// Returns `NoEngineBound` if no engine is set or registered and the
    /// class registry has no factory.
    pub fn template_engine(&self) -> Result<EngineHandle> {
        if let Some(engine) = self.engine.borrow().as_ref() {
            return Ok(engine.clone());
        }

        let engine = binding::class_engine(self.widget.type_name())?;
        *self.engine.borrow_mut() = Some(engine.clone());
        Ok(engine)
    }

    /// Use `engine` for this widget, installing widget filters if needed.
    pub fn set_template_engine(&mut self, engine: EngineHandle) {
        engine.ensure_extended();
        debug!(
            "Set template engine for widget '{}#{}'",
            self.widget.type_name(),
            self.widget.instance_id()
        );
        *self.engine.get_mut() = Some(engine);
    }

    /// Resolution context pairing `data` with this widget.
    pub fn context<'a>(&'a self, data: TemplateData<'a>) -> ResolutionContext<'a> {
        ResolutionContext::new(data, self.widget)
    }

    /// Render the named target.
    ///
    /// Pass `TemplateData::default()` when there is no data.
    pub fn render_template<'d>(
        &self,
        target: &str,
        data: impl Into<TemplateData<'d>>,
    ) -> Result<String> {
        let handle = self.template_engine()?;
        let engine = handle.engine();
        let context = ResolutionContext::new(data.into(), self.widget);
        debug!(
            "Rendering target '{}' for widget '{}'",
            target,
            self.widget.type_name()
        );
        engine.render(target, &context)
    }

    /// Compile and render an inline template body.
    pub fn render<'d>(&self, content: &str, data: impl Into<TemplateData<'d>>) -> Result<String> {
        let handle = self.template_engine()?;
        let engine = handle.engine();
        let renderer = engine.compile(content)?;
        let context = ResolutionContext::new(data.into(), self.widget);
        renderer(&context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{with_registry, ExtendedEngine};
    use crate::engine::{filter, Engine};
    use crate::error::TemplateError;
    use serde_json::{json, Value};
    use std::rc::Rc;

    fn engine_with(source: &str) -> EngineHandle {
        let mut engine = Engine::new();
        engine.parse(source).unwrap();
        ExtendedEngine::new(engine)
    }

    #[test]
    fn renders_plain_data() {
        let widget = crate::widget::DomWidget::new("Greeter", "1");
        let mut helper = TemplateHelper::new(&widget);
        helper.set_template_engine(engine_with("<!-- target: greeting -->Hello, ${name}!"));

        let output = helper
            .render_template("greeting", &json!({"name": "Ada"}))
            .unwrap();
        assert_eq!(output, "Hello, Ada!");
    }

    #[test]
    fn renders_id_shorthand() {
        let widget = crate::widget::DomWidget::new("Box", "1");
        let mut helper = TemplateHelper::new(&widget);
        helper.set_template_engine(engine_with("<!-- target: box --><div id=\"${#main}\"></div>"));

        let output = helper.render_template("box", TemplateData::default()).unwrap();
        assert_eq!(output, "<div id=\"ctrl-1-main\"></div>");
    }

    #[test]
    fn render_inline_uses_same_resolution() {
        let widget = crate::widget::DomWidget::new("Card", "9");
        let helper = TemplateHelper::new(&widget);
        let output = helper
            .render("${.title}|${<h3#title>}|${user.name}", json!({"user": {"name": "Lin"}}))
            .unwrap();
        assert_eq!(
            output,
            r#"ui-card-title|<h3 id="ctrl-9-title" class="ui-card-title"></h3>|Lin"#
        );
    }

    #[test]
    fn render_inline_with_accessor() {
        let widget = crate::widget::DomWidget::new("Card", "9");
        let helper = TemplateHelper::new(&widget);
        let accessor = |name: &str| -> Result<Value> { Ok(json!(name.len())) };
        let output = helper
            .render("${a.b.c} ${#x}", TemplateData::accessor(&accessor))
            .unwrap();
        assert_eq!(output, "5 ctrl-9-x");
    }

    #[test]
    fn missing_nested_property_fails_render() {
        let widget = crate::widget::DomWidget::new("Card", "9");
        let helper = TemplateHelper::new(&widget);
        let err = helper.render("${a.c}", json!({"a": {"b": 5}})).unwrap_err();
        assert!(matches!(err, TemplateError::Lookup { .. }));
    }

    #[test]
    fn lazily_uses_class_engine() {
        let widget = crate::widget::DomWidget::new("helper-lazy-widget", "1");
        let helper = TemplateHelper::new(&widget);

        let first = helper.template_engine().unwrap();
        let second = helper.template_engine().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert!(first.is_extended());

        let other = crate::widget::DomWidget::new("helper-lazy-widget", "2");
        let other_helper = TemplateHelper::new(&other);
        assert!(Rc::ptr_eq(&other_helper.template_engine().unwrap(), &first));
    }

    #[test]
    fn no_factory_is_configuration_error() {
        let widget = crate::widget::DomWidget::new("helper-no-engine", "1");
        let helper = TemplateHelper::new(&widget);

        with_registry(|registry| registry.set_factory(None));
        let result = helper.render("x", TemplateData::default());
        with_registry(|registry| *registry = crate::binding::EngineRegistry::new());

        assert!(matches!(result, Err(TemplateError::NoEngineBound { .. })));
    }

    #[test]
    fn set_engine_twice_installs_filters_once() {
        let widget = crate::widget::DomWidget::new("Box", "1");
        let mut helper = TemplateHelper::new(&widget);
        let engine = ExtendedEngine::new(Engine::new());

        helper.set_template_engine(engine.clone());
        let count = engine.engine().filter_count();
        helper.set_template_engine(engine.clone());
        assert_eq!(engine.engine().filter_count(), count);
    }

    #[test]
    fn custom_filters_survive_extension() {
        let widget = crate::widget::DomWidget::new("Box", "1");
        let mut helper = TemplateHelper::new(&widget);
        let engine = ExtendedEngine::new(Engine::new());
        engine
            .engine_mut()
            .add_filter("shout", filter(|value, _| Ok(value.to_text().to_uppercase())));

        helper.set_template_engine(engine);
        let output = helper.render("${'hi' | shout}", TemplateData::default()).unwrap();
        assert_eq!(output, "HI");
    }

    #[test]
    fn instance_shadows_data_property() {
        let widget = crate::widget::DomWidget::new("Box", "77");
        let helper = TemplateHelper::new(&widget);
        let output = helper
            .render("${instance}", json!({"instance": "data"}))
            .unwrap();
        assert_eq!(output, "77");
    }

    #[test]
    fn context_resolves_against_widget() {
        use crate::data::Scope;

        let widget = crate::widget::DomWidget::new("Box", "5");
        let helper = TemplateHelper::new(&widget);
        let context = helper.context(TemplateData::default());
        assert_eq!(context.get("#a").unwrap(), json!("ctrl-5-a"));
    }
}
