use crate::error::CliError;
use clap::Parser;
use commands::Commands;
use filter_config::settings::{Backend, CompilerSettings, RequestBindings};
use model::filter::PredicateTree;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "catalog-filter",
    version = "0.1.0",
    about = "Compiles catalogue filter expressions into backend queries"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            filter,
            backend,
            settings,
            bindings,
            output,
        } => {
            let settings = load_settings(settings.as_deref())?;
            let validated = settings.validate()?;
            let backend = backend.map(Backend::from).unwrap_or(validated.backend);

            let source = tokio::fs::read_to_string(&filter).await?;
            let tree: PredicateTree = serde_json::from_str(&source)?;
            info!("Compiling {filter} for the {backend:?} backend");

            let bindings = match bindings {
                Some(path) => RequestBindings::load_from_file(Path::new(&path))?,
                None => RequestBindings::default(),
            };

            let query = validated.compile_with_bindings(backend, &tree, bindings)?;
            match output {
                Some(path) => output::write_json(&query, &path).await?,
                None => output::print_json(&query)?,
            }
        }
        Commands::Settings { settings } => {
            let settings = load_settings(settings.as_deref())?;
            settings.validate()?;
            output::print_json(&settings)?;
        }
    }

    Ok(())
}

fn load_settings(path: Option<&str>) -> Result<CompilerSettings, CliError> {
    match path {
        Some(path) => Ok(CompilerSettings::load_from_file(Path::new(path))?),
        None => Ok(CompilerSettings::default()),
    }
}
