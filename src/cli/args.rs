//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// widget-template - Render widget templates from the command line.
#[derive(Debug, Parser)]
#[command(name = "widget-template")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to engine config file (YAML)
    #[arg(short, long, global = true, env = "WIDGET_TEMPLATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a template file for a widget
    Render(RenderArgs),

    /// List the targets declared in a template file
    Targets(TargetsArgs),
}

/// Arguments for the `render` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RenderArgs {
    /// Template file
    pub file: PathBuf,

    /// Target to render (renders the whole file inline if omitted)
    #[arg(short, long)]
    pub target: Option<String>,

    /// JSON file with render data
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Widget type used for class names
    #[arg(long, default_value = "Control")]
    pub widget_type: String,

    /// Widget instance id used for DOM ids
    #[arg(long, default_value = "1")]
    pub widget_id: String,

    /// Prefix for generated DOM ids
    #[arg(long)]
    pub id_prefix: Option<String>,

    /// Skin name added to part class names
    #[arg(long)]
    pub skin: Option<String>,
}

/// Arguments for the `targets` command.
#[derive(Debug, Clone, clap::Args)]
pub struct TargetsArgs {
    /// Template file
    pub file: PathBuf,

    /// Also list the variables each target references
    #[arg(long)]
    pub variables: bool,
}
