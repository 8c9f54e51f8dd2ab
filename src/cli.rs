use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::source::HostContainer;

#[derive(Parser, Debug)]
#[command(name = "flowview", about = "Render process and case diagrams and drive the live debugger")]
pub struct Cli {
    /// Application root the REST paths hang off.
    #[arg(long, env = "FLOWVIEW_BASE_URL")]
    pub base_url: Option<String>,

    /// Draw debugger markers and allow breakpoint changes.
    #[arg(long, env = "FLOWVIEW_DEBUGGER", value_parser = clap::builder::BoolishValueParser::new())]
    pub debugger: Option<bool>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a diagram and write it as SVG.
    Render(RenderArgs),
    /// Add or remove a breakpoint, then redraw.
    Breakpoint(BreakpointArgs),
    /// Continue a halted plan item, then refresh and redraw.
    Continue(ContinueArgs),
}

#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    #[arg(long)]
    pub process_instance: Option<String>,

    #[arg(long)]
    pub case_instance: Option<String>,

    #[arg(long)]
    pub process_definition: Option<String>,

    #[arg(long)]
    pub case_definition: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    /// Saved version of `--model`.
    #[arg(long, requires = "model")]
    pub history: Option<String>,
}

impl SourceArgs {
    #[must_use]
    pub fn container(&self, debugger_enabled: bool) -> HostContainer {
        HostContainer {
            process_instance_id: self.process_instance.clone(),
            case_instance_id: self.case_instance.clone(),
            process_definition_id: self.process_definition.clone(),
            case_definition_id: self.case_definition.clone(),
            model_id: self.model.clone(),
            history_model_id: self.history.clone(),
            debugger_enabled,
        }
    }
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output file; stdout when absent.
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[arg(long, default_value_t = 0)]
    pub zoom_in: u32,

    #[arg(long, default_value_t = 0)]
    pub zoom_out: u32,

    /// Abort on an element type with no renderer instead of skipping it.
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakpointOp {
    Add,
    Remove,
}

#[derive(Args, Debug)]
pub struct BreakpointArgs {
    pub op: BreakpointOp,

    pub element_id: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ContinueArgs {
    pub plan_item_id: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long)]
    pub out: Option<PathBuf>,
}
