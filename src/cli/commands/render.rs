//! Render command implementation.
//!
//! The `widget-template render` command renders a template file for a
//! [`DomWidget`] built from the command-line options.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use tracing::debug;

use crate::binding::ExtendedEngine;
use crate::cli::args::RenderArgs;
use crate::data::TemplateData;
use crate::engine::{Engine, EngineConfig};
use crate::error::Result;
use crate::helper::TemplateHelper;
use crate::widget::DomWidget;

use super::dispatcher::{Command, CommandResult};

/// The render command implementation.
pub struct RenderCommand {
    config: EngineConfig,
    args: RenderArgs,
}

impl RenderCommand {
    /// Create a new render command.
    pub fn new(config: EngineConfig, args: RenderArgs) -> Self {
        Self { config, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RenderArgs {
        &self.args
    }

    fn widget(&self) -> DomWidget {
        let mut widget = DomWidget::new(&self.args.widget_type, &self.args.widget_id);
        if let Some(prefix) = &self.args.id_prefix {
            widget = widget.with_dom_id_prefix(prefix);
        }
        if let Some(skin) = &self.args.skin {
            widget = widget.with_skin(skin);
        }
        widget
    }

    /// Render and return the output text.
    pub fn render(&self) -> Result<String> {
        let source = fs::read_to_string(&self.args.file)?;
        let data = match &self.args.data {
            Some(path) => load_data(path)?,
            None => Value::Object(Default::default()),
        };

        let mut engine = Engine::with_config(self.config.clone())?;
        let widget = self.widget();
        let mut helper = TemplateHelper::new(&widget);

        match &self.args.target {
            Some(target) => {
                let names = engine.parse(&source)?;
                debug!("Parsed {} targets from {}", names.len(), self.args.file.display());
                helper.set_template_engine(ExtendedEngine::new(engine));
                helper.render_template(target, TemplateData::from(&data))
            }
            None => {
                helper.set_template_engine(ExtendedEngine::new(engine));
                helper.render(&source, TemplateData::from(&data))
            }
        }
    }
}

/// Read render data from a JSON file.
fn load_data(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON data in {}", path.display()))?;
    Ok(value)
}

impl Command for RenderCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let output = self.render()?;
        writeln!(out, "{}", output)?;
        Ok(CommandResult::success())
    }
}
