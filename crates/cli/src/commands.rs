use clap::{Subcommand, ValueEnum};
use filter_config::settings::Backend;

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a JSON predicate tree and print the composite query
    Compile {
        #[arg(long, help = "Predicate tree file path (JSON)")]
        filter: String,

        #[arg(long, value_enum, help = "Overrides the backend chosen in the settings")]
        backend: Option<BackendArg>,

        #[arg(long, help = "Settings file path (JSON)")]
        settings: Option<String>,

        #[arg(long, help = "Request prefix and variable bindings file path (JSON)")]
        bindings: Option<String>,

        #[arg(
            long,
            help = "If specified, writes the compiled query to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Print the effective settings
    Settings {
        #[arg(long, help = "Settings file path (JSON)")]
        settings: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackendArg {
    Index,
    Sql,
}

impl From<BackendArg> for Backend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Index => Backend::Index,
            BackendArg::Sql => Backend::Sql,
        }
    }
}
