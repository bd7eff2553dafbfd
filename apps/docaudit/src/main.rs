//! docaudit - Audit document identifiers against a remote object store
//!
//! Reads identifier lists, checks each identifier's object with a HEAD
//! request, and writes the missing and errored identifiers to report files.

mod cli;
mod display;
mod error;
mod events;
mod input;
mod logging;

use crate::cli::{Cli, Commands, GlobalArgs, VerifyArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use docaudit_config::{parse_state_list, Config};
use docaudit_errors::{Error, InputError};
use docaudit_events::{EventEmitter, EventReceiver, EventSender};
use docaudit_report::{ReportContext, ReportEmitter};
use docaudit_types::{BatchSummary, ColorChoice};
use docaudit_verify::Verifier;
use std::future::Future;
use std::process;
use std::sync::Arc;
use tokio::select;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    logging::init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting docaudit v{}", env!("CARGO_PKG_VERSION"));

    // Precedence: defaults < file < environment < CLI flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global, &cli.command);
    config.validate()?;

    let (event_sender, event_receiver) = docaudit_events::channel();

    let color = config.general.color;
    let renderer = OutputRenderer::new(cli.global.json, color);
    let colors_enabled = match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, cli.global.json);

    let summaries = match cli.command {
        Commands::Verify(args) => {
            let command = run_verify(args, config, renderer.clone(), event_sender);
            execute_with_events(command, event_receiver, &mut event_handler).await?
        }
    };

    renderer.render_run(&summaries)?;
    info!("Command completed successfully");
    Ok(())
}

/// Drive a command while forwarding its events, until it finishes or Ctrl-C
///
/// On Ctrl-C the command future is dropped, which aborts every probe still
/// in flight and discards partial results.
async fn execute_with_events<F, T>(
    command: F,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<T, CliError>
where
    F: Future<Output = Result<T, CliError>>,
{
    let mut command_future = Box::pin(command);
    let mut interrupt = Box::pin(tokio::signal::ctrl_c());

    loop {
        select! {
            result = &mut command_future => {
                while let Ok(message) = event_receiver.try_recv() {
                    event_handler.handle_event(message);
                }
                return result;
            }

            _ = &mut interrupt => {
                warn!("interrupted, abandoning in-flight probes");
                return Err(CliError::Cancelled);
            }

            message = event_receiver.recv() => {
                if let Some(message) = message {
                    event_handler.handle_event(message);
                }
            }
        }
    }
}

/// Verify every selected input file in turn
async fn run_verify(
    args: VerifyArgs,
    config: Config,
    renderer: OutputRenderer,
    events: EventSender,
) -> Result<Vec<BatchSummary>, CliError> {
    let files = input::discover(&args.paths, &config.input.extensions).await?;
    let files = input::select(files, &config.input.states);
    if files.is_empty() {
        return Err(Error::from(InputError::NothingSelected).into());
    }

    let prober = docaudit_net::prober_from_config(&config)?.with_events(events.clone());
    let verifier =
        Verifier::new(Arc::new(prober), config.verify.concurrency).with_events(events.clone());
    let emitter = ReportEmitter::new().with_events(events.clone());

    events.emit_operation_started("verify");
    let mut summaries = Vec::with_capacity(files.len());

    for file in files {
        let list = input::load_identifiers(&file.path, &config.input.id_column).await?;
        if list.identifiers.is_empty() {
            events.emit_warning_with_context("No identifiers found, skipping", file.name.clone());
            continue;
        }

        let label = file.label();
        let batch = verifier.verify(&label, list.identifiers).await;

        let context = ReportContext::new(&file.name, &label, &config.output.dir);
        emitter.emit(&context, &batch.aggregate).await?;

        let summary = BatchSummary::new(&file.name, &label, &batch.aggregate, batch.elapsed)
            .with_rows(list.total_rows, list.blank_rows);
        renderer.render_summary(&summary)?;
        summaries.push(summary);
    }

    events.emit_operation_completed("verify", true);
    Ok(summaries)
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &GlobalArgs, command: &Commands) {
    if let Some(color) = global.color {
        config.general.color = color;
    }

    let Commands::Verify(args) = command;
    if let Some(states) = &args.states {
        config.input.states = parse_state_list(states);
    }
    if let Some(concurrency) = args.concurrency {
        config.verify.concurrency = concurrency;
    }
    if let Some(timeout) = args.timeout {
        config.verify.timeout = timeout;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.verify.max_attempts = max_attempts;
    }
    if let Some(delay) = args.retry_delay_ms {
        config.verify.retry_delay_ms = delay;
    }
    if args.retry_server_errors {
        config.verify.retry_server_errors = true;
    }
    if let Some(base_url) = &args.base_url {
        config.store.base_url.clone_from(base_url);
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir.clone_from(dir);
    }
}
