//! Integration tests for the rendering public API.

use serde_json::{json, Value};
use widget_template::binding::{bind_class_engine, with_registry, EngineRegistry};
use widget_template::{
    DomWidget, Engine, ExtendedEngine, Result, TemplateData, TemplateError, TemplateHelper,
    Widget,
};

const CONTROL_TEMPLATES: &str = r#"
<!-- target: greeting -->Hello, ${name}!<!-- /target -->
<!-- target: box --><div id="${#main}" class="${.main}">${<span#label>}</div><!-- /target -->
<!-- target: filters -->${'main' | id(${instance})}|${'main' | class(${instance})}|${'icon' | part('i', ${instance})}<!-- /target -->
"#;

fn helper_for(widget: &DomWidget) -> TemplateHelper<'_> {
    let mut engine = Engine::new();
    engine.parse(CONTROL_TEMPLATES).unwrap();
    let mut helper = TemplateHelper::new(widget);
    helper.set_template_engine(ExtendedEngine::new(engine));
    helper
}

/// Widget with fixed names, independent of the DOM naming scheme.
struct FixedWidget;

impl Widget for FixedWidget {
    fn type_name(&self) -> &str {
        "Fixed"
    }

    fn instance_id(&self) -> &str {
        "fixed"
    }

    fn id(&self, part: &str) -> String {
        format!("id:{}", part)
    }

    fn part_class_name(&self, part: &str) -> String {
        format!("class:{}", part)
    }

    fn part_html(&self, part: &str, node_name: &str) -> String {
        format!("html:{}:{}", node_name, part)
    }
}

#[test]
fn greeting_renders_plain_data() {
    let widget = DomWidget::new("Control", "1");
    let helper = helper_for(&widget);
    let output = helper
        .render_template("greeting", &json!({"name": "Ada"}))
        .unwrap();
    assert_eq!(output, "Hello, Ada!");
}

#[test]
fn box_substitutes_generated_names() {
    let widget = DomWidget::new("Control", "1");
    let helper = helper_for(&widget);
    let output = helper
        .render_template("box", TemplateData::default())
        .unwrap();
    insta::assert_snapshot!(output, @r#"<div id="ctrl-1-main" class="ui-control-main"><span id="ctrl-1-label" class="ui-control-label"></span></div>"#);
}

#[test]
fn filters_match_shorthands() {
    let widget = DomWidget::new("Control", "1");
    let helper = helper_for(&widget);
    let output = helper
        .render_template("filters", TemplateData::default())
        .unwrap();
    let expected = format!(
        "{}|{}|{}",
        widget.id("main"),
        widget.part_class_name("main"),
        widget.part_html("icon", "i")
    );
    assert_eq!(output, expected);
}

#[test]
fn shorthands_delegate_to_widget() {
    let widget = FixedWidget;
    let helper = TemplateHelper::new(&widget);
    for part in ["a", "b-c", "x_1", ""] {
        let output = helper
            .render(&format!("${{#{0}}} ${{.{0}}}", part), TemplateData::default())
            .unwrap();
        assert_eq!(output, format!("id:{0} class:{0}", part));
    }
    let output = helper
        .render("${<section#body-2>}", TemplateData::default())
        .unwrap();
    assert_eq!(output, "html:section:body-2");
}

#[test]
fn instance_is_unreachable_as_data() {
    let widget = FixedWidget;
    let helper = TemplateHelper::new(&widget);
    let output = helper
        .render("${instance}", json!({"instance": "from data"}))
        .unwrap();
    assert_eq!(output, "fixed");
}

#[test]
fn nested_lookup_and_failure() {
    let widget = DomWidget::new("Control", "1");
    let helper = TemplateHelper::new(&widget);
    let data = json!({"a": {"b": 5}});

    assert_eq!(helper.render("${a.b}", &data).unwrap(), "5");
    let err = helper.render("${a.c}", &data).unwrap_err();
    assert!(matches!(err, TemplateError::Lookup { .. }));
}

#[test]
fn unknown_target_is_reported() {
    let widget = DomWidget::new("Control", "1");
    let helper = helper_for(&widget);
    let err = helper
        .render_template("missing", TemplateData::default())
        .unwrap_err();
    assert!(matches!(err, TemplateError::UnknownTarget { name } if name == "missing"));
}

#[test]
fn structured_accessor_receives_names() {
    let widget = DomWidget::new("Control", "1");
    let helper = TemplateHelper::new(&widget);
    let accessor = |name: &str| -> Result<Value> {
        match name {
            "user.name" => Ok(json!("Grace")),
            other => Err(anyhow::anyhow!("unexpected lookup {}", other).into()),
        }
    };
    let output = helper
        .render("${user.name} (${#id})", TemplateData::accessor(&accessor))
        .unwrap();
    assert_eq!(output, "Grace (ctrl-1-id)");
}

#[test]
fn class_engine_is_shared_between_instances() {
    let mut engine = Engine::new();
    engine.parse("<!-- target: item --><li id=\"${#}\">${label}</li>").unwrap();
    let handle = ExtendedEngine::new(engine);
    bind_class_engine("ListItem", handle.clone());
    let filters = handle.engine().filter_count();

    let first = DomWidget::new("ListItem", "1");
    let second = DomWidget::new("ListItem", "2");
    let first_html = TemplateHelper::new(&first)
        .render_template("item", &json!({"label": "one"}))
        .unwrap();
    let second_html = TemplateHelper::new(&second)
        .render_template("item", &json!({"label": "two"}))
        .unwrap();

    assert_eq!(first_html, r#"<li id="ctrl-1">one</li>"#);
    assert_eq!(second_html, r#"<li id="ctrl-2">two</li>"#);

    bind_class_engine("ListItem", handle.clone());
    assert_eq!(handle.engine().filter_count(), filters);
}

#[test]
fn missing_engine_is_configuration_error() {
    with_registry(|registry| *registry = EngineRegistry::without_factory());

    let widget = DomWidget::new("Unbound", "1");
    let helper = TemplateHelper::new(&widget);
    let err = helper.render("x", TemplateData::default()).unwrap_err();

    with_registry(|registry| *registry = EngineRegistry::new());
    assert!(matches!(err, TemplateError::NoEngineBound { .. }));
    assert!(err.to_string().contains("Unbound"));
}
