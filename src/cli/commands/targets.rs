//! Targets command implementation.
//!
//! The `widget-template targets` command lists the targets declared in a
//! template file, in source order.

use std::fs;
use std::io::Write;

use crate::cli::args::TargetsArgs;
use crate::engine::{referenced_variables, Engine, EngineConfig};
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

/// The targets command implementation.
pub struct TargetsCommand {
    config: EngineConfig,
    args: TargetsArgs,
}

impl TargetsCommand {
    /// Create a new targets command.
    pub fn new(config: EngineConfig, args: TargetsArgs) -> Self {
        Self { config, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &TargetsArgs {
        &self.args
    }
}

impl Command for TargetsCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let source = fs::read_to_string(&self.args.file)?;
        let mut engine = Engine::with_config(self.config.clone())?;
        let names = engine.parse(&source)?;

        if names.is_empty() {
            writeln!(out, "No targets found in {}", self.args.file.display())?;
            return Ok(CommandResult::failure(1));
        }

        for name in &names {
            match engine.target(name) {
                Some(template) if self.args.variables => {
                    let variables = referenced_variables(template.segments());
                    writeln!(out, "{}: {}", name, variables.join(", "))?;
                }
                _ => writeln!(out, "{}", name)?,
            }
        }
        Ok(CommandResult::success())
    }
}
