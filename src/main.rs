//! Switchyard - dispatch layer for generation providers.
//!
//! Main entry point for the Switchyard CLI.

mod cli;
mod register;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use switchyard_config::{ConfigLoader, ConfigValidator, LoggingConfig};
use switchyard_core::{Registry, ResolveOptions, ResolveOutcome, SearchFilters};
use switchyard_protocols::{Definition, RunOptions};
use switchyard_runtime::Executor;

use crate::cli::{Cli, Commands};

/// Initialize tracing with console and optional file output.
///
/// `RUST_LOG` overrides the configured level. Console output goes to stderr
/// so command results on stdout stay machine-readable.
fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = match &config.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("switchyard")
                .filename_suffix("log")
                .max_log_files(30)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the worker alive for the program duration
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    let json_layer = config
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!config.json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    let warnings = ConfigValidator::validate(&config).into_result()?;
    init_tracing(&config.logging)?;
    for warning in warnings {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }

    let registry = Arc::new(Registry::new());
    register::register_all(&registry, &config, &cli.catalog)?;
    info!(
        "Registered {} definitions and {} providers",
        registry.len(),
        registry.provider_names().len()
    );

    let executor = Executor::from_config(registry.clone(), &config);

    match cli.command {
        Commands::Run {
            name,
            inputs,
            provider,
            timeout_ms,
            no_wait,
            continue_on_error,
            output_dir,
        } => {
            let inputs: Value =
                serde_json::from_str(&inputs).context("--inputs must be a JSON object")?;
            let mut options = RunOptions::new()
                .with_wait(!no_wait)
                .on_status_change(|status| info!("Job status: {}", status))
                .on_progress(|progress, logs| {
                    debug!("Progress {:.0}%", progress);
                    for line in logs {
                        debug!("  {}", line);
                    }
                });
            if let Some(provider) = provider {
                options = options.with_provider(provider);
            }
            if let Some(ms) = timeout_ms {
                options = options.with_timeout(Duration::from_millis(ms));
            }
            if let Some(dir) = output_dir {
                options = options.with_output_dir(dir);
            }
            if continue_on_error || !config.pipeline.stop_on_error {
                options = options.with_stop_on_error(false);
            }

            let result = executor.run(&name, inputs, &options).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::List { kind, format } => {
            print_definitions(&registry.list(kind), &format)?;
        }
        Commands::Search {
            query,
            input_type,
            output_type,
            provider,
            format,
        } => {
            let filters = SearchFilters {
                input_type,
                output_type,
                provider,
            };
            print_definitions(&registry.search(&query, &filters), &format)?;
        }
        Commands::Resolve {
            name,
            fuzzy,
            prefer,
        } => {
            let mut options = ResolveOptions::default();
            if fuzzy {
                options = options.with_fuzzy(true);
            }
            if let Some(kind) = prefer {
                options = options.with_prefer_type(kind);
            }
            match executor.resolver().resolve(&name, &options)? {
                ResolveOutcome::Found(resolution) => {
                    println!(
                        "{} -> {} ({} match, score {:.2})",
                        name,
                        resolution.definition.qualified_name(),
                        resolution.match_kind,
                        resolution.score
                    );
                }
                ResolveOutcome::NotFound { suggestions } => {
                    println!("{}: not found", name);
                    if !suggestions.is_empty() {
                        println!("Did you mean: {}", suggestions.join(", "));
                    }
                }
            }
        }
        Commands::Info { name } => {
            let definition = executor.resolver().resolve_required(&name)?;
            println!("{}", serde_json::to_string_pretty(definition.as_ref())?);
        }
        Commands::Providers => {
            for name in registry.provider_names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

/// Print definitions as a table or JSON.
fn print_definitions(definitions: &[Arc<Definition>], format: &str) -> anyhow::Result<()> {
    if definitions.is_empty() {
        println!("No definitions found.");
        return Ok(());
    }

    match format {
        "json" => {
            let values: Vec<&Definition> = definitions.iter().map(|d| d.as_ref()).collect();
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        _ => {
            println!("{:<8} {:<24} {:<12} {}", "KIND", "NAME", "TYPES", "DESCRIPTION");
            println!("{}", "-".repeat(80));
            for definition in definitions {
                println!(
                    "{:<8} {:<24} {:<12} {}",
                    definition.kind().as_str(),
                    definition.name(),
                    type_label(definition),
                    definition.description()
                );
            }
        }
    }

    Ok(())
}

fn type_label(definition: &Definition) -> String {
    let meta = definition.meta();
    match (&meta.input_type, &meta.output_type) {
        (None, None) => "-".to_string(),
        (input, output) => format!(
            "{}->{}",
            input.as_deref().unwrap_or("?"),
            output.as_deref().unwrap_or("?")
        ),
    }
}
