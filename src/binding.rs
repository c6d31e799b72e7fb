//! Engine binding and widget filter installation.
//!
//! Engines are shared per widget type, not per widget instance. Each engine
//! is wrapped in an [`ExtendedEngine`] that records whether the widget
//! filters (`id`, `class`, `part`) have been installed, so binding the same
//! engine to many widgets never registers them twice.
//!
//! # Class Registry
//!
//! [`EngineRegistry`] maps widget type names to engines. One registry per
//! thread is created on first use by [`with_registry`]; its default factory
//! builds a plain [`Engine`] the first time a widget type asks for one.
//!
//! # Filters
//!
//! - `${'main' | id(${instance})}` - DOM id of part `main`
//! - `${'main' | class(${instance})}` - class list of part `main`
//! - `${'main' | part('div', ${instance})}` - `main` rendered as a `div`
//!
//! The widget must be passed as the last argument.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::data::Resolved;
use crate::engine::{filter, Engine, Filter, TemplateEngine};
use crate::error::{Result, TemplateError};
use crate::widget::Widget;

/// Shared reference to an extended engine.
pub type EngineHandle = Rc<ExtendedEngine>;

/// Builds the engine for a widget type that has none bound.
pub type EngineFactory = Rc<dyn Fn() -> Result<Box<dyn TemplateEngine>>>;

/// Names of the filters installed by [`ExtendedEngine::install_filters`].
pub const WIDGET_FILTERS: [&str; 3] = ["id", "class", "part"];

fn widget_arg<'a>(name: &str, args: &[Resolved<'a>]) -> Result<&'a dyn Widget> {
    args.last()
        .and_then(Resolved::as_widget)
        .ok_or_else(|| TemplateError::FilterArgument {
            filter: name.to_string(),
            message: "expects the widget instance as its last argument".to_string(),
        })
}

fn id_filter<'a>(part: &Resolved<'a>, args: &[Resolved<'a>]) -> Result<String> {
    Ok(widget_arg("id", args)?.id(&part.to_text()))
}

fn class_filter<'a>(part: &Resolved<'a>, args: &[Resolved<'a>]) -> Result<String> {
    Ok(widget_arg("class", args)?.part_class_name(&part.to_text()))
}

fn part_filter<'a>(part: &Resolved<'a>, args: &[Resolved<'a>]) -> Result<String> {
    let widget = widget_arg("part", args)?;
    let node_name = match args {
        [node_name, _] => node_name.to_text(),
        _ => {
            return Err(TemplateError::FilterArgument {
                filter: "part".to_string(),
                message: "expects a node name and the widget instance".to_string(),
            })
        }
    };
    Ok(widget.part_html(&part.to_text(), &node_name))
}

/// The filters every widget engine carries.
pub fn widget_filters() -> Vec<(&'static str, Filter)> {
    vec![
        (WIDGET_FILTERS[0], filter(id_filter)),
        (WIDGET_FILTERS[1], filter(class_filter)),
        (WIDGET_FILTERS[2], filter(part_filter)),
    ]
}

/// An engine paired with its extension status.
pub struct ExtendedEngine {
    engine: RefCell<Box<dyn TemplateEngine>>,
    extended: Cell<bool>,
}

impl ExtendedEngine {
    /// Wrap an engine. Filters are installed when it is first bound.
    pub fn new(engine: impl TemplateEngine + 'static) -> EngineHandle {
        Self::from_boxed(Box::new(engine))
    }

    /// Wrap an already boxed engine.
    pub fn from_boxed(engine: Box<dyn TemplateEngine>) -> EngineHandle {
        Rc::new(Self {
            engine: RefCell::new(engine),
            extended: Cell::new(false),
        })
    }

    /// Whether the widget filters are installed.
    pub fn is_extended(&self) -> bool {
        self.extended.get()
    }

    /// Install the widget filters unless already done.
    ///
    /// Returns `true` if this call installed them.
    pub fn ensure_extended(&self) -> bool {
        if self.is_extended() {
            return false;
        }
        self.install_filters();
        true
    }

    /// Register the widget filters and mark the engine extended.
    ///
    /// Repeat calls re-register the same names, leaving the table unchanged
    /// in size.
    pub fn install_filters(&self) {
        let mut engine = self.engine.borrow_mut();
        for (name, filter) in widget_filters() {
            engine.add_filter(name, filter);
        }
        self.extended.set(true);
        debug!(
            "Installed widget filters ({} filters registered)",
            engine.filter_count()
        );
    }

    /// Borrow the engine for rendering.
    pub fn engine(&self) -> Ref<'_, dyn TemplateEngine + 'static> {
        Ref::map(self.engine.borrow(), |engine| &**engine)
    }

    /// Borrow the engine mutably, e.g. to add custom filters.
    pub fn engine_mut(&self) -> RefMut<'_, dyn TemplateEngine + 'static> {
        RefMut::map(self.engine.borrow_mut(), |engine| &mut **engine)
    }
}

impl fmt::Debug for ExtendedEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedEngine")
            .field("extended", &self.is_extended())
            .field("filters", &self.engine().filter_count())
            .finish()
    }
}

/// Engines keyed by widget type name.
pub struct EngineRegistry {
    engines: HashMap<String, EngineHandle>,
    factory: Option<EngineFactory>,
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineRegistry {
    /// Create a registry that builds a default [`Engine`] on demand.
    pub fn new() -> Self {
        Self::with_factory(Rc::new(|| -> Result<Box<dyn TemplateEngine>> {
            Ok(Box::new(Engine::new()))
        }))
    }

    /// Create a registry using a custom factory.
    pub fn with_factory(factory: EngineFactory) -> Self {
        Self {
            engines: HashMap::new(),
            factory: Some(factory),
        }
    }

    /// Create a registry that never creates engines on its own.
    pub fn without_factory() -> Self {
        Self {
            engines: HashMap::new(),
            factory: None,
        }
    }

    /// Factory used for unbound widget types.
    pub fn factory(&self) -> Option<EngineFactory> {
        self.factory.clone()
    }

    /// Replace the factory used for unbound widget types.
    pub fn set_factory(&mut self, factory: Option<EngineFactory>) {
        self.factory = factory;
    }

    /// Bind an engine to a widget type, extending it if needed.
    pub fn bind(&mut self, type_name: &str, engine: EngineHandle) {
        engine.ensure_extended();
        debug!("Bound template engine for widget type '{}'", type_name);
        self.engines.insert(type_name.to_string(), engine);
    }

    /// Remove the engine bound to a widget type.
    pub fn unbind(&mut self, type_name: &str) -> Option<EngineHandle> {
        self.engines.remove(type_name)
    }

    /// Engine bound to a widget type, if any.
    pub fn get(&self, type_name: &str) -> Option<EngineHandle> {
        self.engines.get(type_name).cloned()
    }

    /// Engine bound to a widget type, creating one with the factory if
    /// none is bound yet.
    ///
    /// # Errors
    ///
    /// Returns `NoEngineBound` if nothing is bound and there is no factory.
    pub fn get_or_create(&mut self, type_name: &str) -> Result<EngineHandle> {
        if let Some(engine) = self.engines.get(type_name) {
            return Ok(engine.clone());
        }

        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| TemplateError::NoEngineBound {
                widget_type: type_name.to_string(),
            })?;

        let engine = ExtendedEngine::from_boxed(factory()?);
        debug!("Created template engine for widget type '{}'", type_name);
        self.bind(type_name, engine.clone());
        Ok(engine)
    }

    /// Number of bound widget types.
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Whether no widget type has an engine.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

thread_local! {
    static REGISTRY: RefCell<EngineRegistry> = RefCell::new(EngineRegistry::new());
}

/// Run `f` with this thread's class registry.
///
/// The registry is created with a default factory on first access.
pub fn with_registry<R>(f: impl FnOnce(&mut EngineRegistry) -> R) -> R {
    REGISTRY.with(|registry| f(&mut registry.borrow_mut()))
}

/// Engine for a widget type from the thread's registry.
///
/// The factory runs outside the registry borrow, so it may itself look up
/// or bind class engines.
pub fn class_engine(type_name: &str) -> Result<EngineHandle> {
    if let Some(engine) = with_registry(|registry| registry.get(type_name)) {
        return Ok(engine);
    }

    let factory = with_registry(|registry| registry.factory()).ok_or_else(|| {
        TemplateError::NoEngineBound {
            widget_type: type_name.to_string(),
        }
    })?;
    let engine = ExtendedEngine::from_boxed(factory()?);

    Ok(with_registry(|registry| match registry.get(type_name) {
        Some(existing) => existing,
        None => {
            debug!("Created template engine for widget type '{}'", type_name);
            registry.bind(type_name, engine.clone());
            engine
        }
    }))
}

/// Bind an engine to a widget type in the thread's registry.
pub fn bind_class_engine(type_name: &str, engine: EngineHandle) {
    with_registry(|registry| registry.bind(type_name, engine));
}
