mod api;
mod cli;
mod config;
mod error;
mod session;
mod source;

use std::path::Path;
use std::process::ExitCode;

use canvas::engine::{Action, EngineCore};
use canvas::render::UnknownElementPolicy;
use clap::Parser;
use serde_json::Value;

use api::{HttpEngineApi, RefreshKind};
use cli::{BreakpointOp, Cli, Command, SourceArgs};
use config::ViewerConfig;
use error::{AppError, ErrorCode};
use session::{DebuggerHost, DebuggerSession, SessionError};
use source::DiagramSource;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, ".env not loaded"),
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), retryable = e.retryable(), error = %e, "flowview failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = ViewerConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url.trim_end_matches('/').to_owned();
    }
    if let Some(debugger) = cli.debugger {
        config.debugger_enabled = debugger;
    }
    tracing::debug!(base_url = %config.base_url, debugger = config.debugger_enabled, "configured");

    match cli.command {
        Command::Render(args) => {
            let mut session = open(&config, &args.source, args.strict)?;
            session.reload().await?;
            for _ in 0..args.zoom_in {
                session.zoom_in();
            }
            for _ in 0..args.zoom_out {
                session.zoom_out();
            }
            write_svg(session.engine(), args.out.as_deref())
        }
        Command::Breakpoint(args) => {
            config.debugger_enabled = true;
            let mut session = open(&config, &args.source, false)?;
            session.toggle_breakpoint(&args.element_id, args.op == BreakpointOp::Add).await?;
            write_svg(session.engine(), args.out.as_deref())
        }
        Command::Continue(args) => {
            config.debugger_enabled = true;
            let mut session = open(&config, &args.source, false)?;
            session.continue_plan_item(&args.plan_item_id).await?;
            write_svg(session.engine(), args.out.as_deref())
        }
    }
}

fn open(
    config: &ViewerConfig,
    source: &SourceArgs,
    strict: bool,
) -> Result<DebuggerSession<HttpEngineApi, CliHost>, AppError> {
    let container = source.container(config.debugger_enabled);
    let source = DiagramSource::try_from(&container)?;
    tracing::debug!(%source, notation = ?source.notation(), "diagram source");

    let mut engine_config = config.engine_config(&container);
    if strict {
        engine_config.render.unknown_policy = UnknownElementPolicy::FailFast;
    }
    let api = HttpEngineApi::new(config)?;
    Ok(DebuggerSession::new(api, CliHost, EngineCore::new(engine_config), source))
}

fn write_svg(engine: &EngineCore, out: Option<&Path>) -> Result<(), AppError> {
    let svg = engine.svg().ok_or(AppError::NothingRendered)?;
    match out {
        Some(path) => {
            std::fs::write(path, svg)?;
            tracing::info!(path = %path.display(), "svg written");
        }
        None => println!("{svg}"),
    }
    Ok(())
}

/// Host for command-line runs: everything the page would show goes to the log.
struct CliHost;

impl DebuggerHost for CliHost {
    fn selection_changed(&mut self, element_id: Option<&str>) {
        tracing::info!(?element_id, "selection changed");
    }

    fn navigate(&mut self, element_id: &str) {
        tracing::info!(%element_id, "navigate");
    }

    fn notify_failure(&mut self, error: &SessionError) {
        tracing::warn!(code = error.error_code(), error = %error, "debugger call failed");
    }

    fn refreshed(&mut self, kind: RefreshKind, payload: Value) {
        tracing::info!(panel = kind.segment(), %payload, "panel refreshed");
    }

    fn diagram_replaced(&mut self, svg: &str) {
        tracing::debug!(bytes = svg.len(), "diagram replaced");
    }

    fn present(&mut self, action: &Action) {
        if let Action::ResizeCanvas(size) = action {
            tracing::debug!(width = size.width, height = size.height, "canvas resized");
        }
    }
}
