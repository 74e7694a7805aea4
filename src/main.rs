use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::filter::{Directive, EnvFilter};

use narrative_dispatch::config::EngineConfig;
use narrative_dispatch::context::Context;
use narrative_dispatch::engine::Engine;
use narrative_dispatch::error::ConfigError;
use narrative_dispatch::flags::MemoryFlagStore;
use narrative_dispatch::quest::QuestCatalog;
use narrative_dispatch::replay::Trace;

#[derive(Parser)]
#[command(
    name = "narrative-dispatch",
    about = "Replay a recorded dialogue trace through the dispatch engine",
    version
)]
struct Cli {
    /// Trace file of flags to seed and invocations to run
    trace: PathBuf,

    /// Engine config (default: built-in keys, logging and quest directory)
    config: Option<PathBuf>,
}

/// Replay a trace and render the watched flags as JSON
fn run(trace_path: &Path, config: EngineConfig) -> Result<String, ConfigError> {
    let mut catalog = QuestCatalog::new();
    catalog.load_from_directory(&config.quests.data_dir)?;

    let trace = Trace::load(trace_path)?;
    let ctx = Context::new(
        Box::new(MemoryFlagStore::new()),
        Box::new(catalog),
        config.keys,
    );
    let mut engine = Engine::new(ctx);

    info!(
        "Replaying {} invocations from {:?}",
        trace.invoke.len(),
        trace_path
    );
    let report = trace.run(&mut engine);

    serde_json::to_string_pretty(&report.watched)
        .map_err(|e| ConfigError::Invalid(format!("failed to render watched flags: {}", e)))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is read before logging starts so its filter can apply
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    };

    // Initialize logging
    let directive = config
        .as_ref()
        .map(|c| c.logging.filter.clone())
        .unwrap_or_else(|_| EngineConfig::default().logging.filter);
    let mut filter = EnvFilter::from_default_env();
    match directive.parse::<Directive>() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("ignoring invalid log filter '{}': {}", directive, e),
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = config.and_then(|config| run(&cli.trace, config));
    match result {
        Ok(watched) => {
            println!("{}", watched);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
