use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use astrolens::cli::{AskArgs, Cli, Command};
use astrolens::server::HttpServer;
use astrolens::ui::{ExplainOutcome, ExplainerController, HttpExplainClient, TerminalView};
use astrolens::viz::fonts;
use astrolens::{x11, ServiceConfig, UiConfig};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("astrolens=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve(args) => serve(ServiceConfig::from(args)),
        Command::Ask(args) => ask(&args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("fatal: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn serve(config: ServiceConfig) -> Result<ExitCode> {
    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(HttpServer::new(config).start())?;
    Ok(ExitCode::SUCCESS)
}

fn ask(args: &AskArgs) -> Result<ExitCode> {
    let config = UiConfig::from(args);
    let font = fonts::load_font();
    if font.is_none() {
        warn!("no font found; text in the visualization will be skipped");
    }

    let client = HttpExplainClient::new(config.endpoint.clone())?;
    let view = TerminalView::new(&config, font);
    let mut controller =
        ExplainerController::new(view, client).with_image_source(config.image_source.clone());

    let outcome = controller.on_explain(&args.concept);
    let view = controller.into_view();
    view.render(&mut io::stdout().lock())?;

    match outcome {
        ExplainOutcome::Rendered { kind, .. } => {
            if config.window {
                x11::animate(
                    kind,
                    config.canvas_width,
                    config.canvas_height,
                    view.star_seed(),
                    view.font(),
                    &format!("AstroLens: {}", args.concept.trim()),
                )?;
            }
            Ok(ExitCode::SUCCESS)
        }
        ExplainOutcome::Rejected | ExplainOutcome::Failed(_) => Ok(ExitCode::FAILURE),
    }
}
