//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;
use std::path::Path;

use crate::cli::args::{Cli, Commands};
use crate::engine::EngineConfig;
use crate::error::Result;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command, writing its output to `out`.
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    config: EngineConfig,
}

impl CommandDispatcher {
    /// Create a dispatcher using the given engine configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Create a dispatcher, loading engine configuration from `path` if given.
    pub fn from_config_path(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        Ok(Self::new(config))
    }

    /// Engine configuration handed to commands.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Dispatch and execute a command, flushing `out` afterwards.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        let result = self.execute(cli, out)?;
        out.flush()?;
        Ok(result)
    }

    fn execute(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        match &cli.command {
            Commands::Render(args) => {
                let cmd = super::render::RenderCommand::new(self.config.clone(), args.clone());
                cmd.execute(out)
            }
            Commands::Targets(args) => {
                let cmd = super::targets::TargetsCommand::new(self.config.clone(), args.clone());
                cmd.execute(out)
            }
        }
    }
}
