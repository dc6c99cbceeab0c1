use std::path::Path;

use clap::{Parser, Subcommand};

use sugg_cli::commands::{config_ops, query_ops};
use sugg_cli::input::EngineOptions;
use sugg_cli::trace_init::init_tracing;
use sugg_core::MatchType;

#[derive(Parser)]
#[command(name = "suggtool", about = "Suggestion engine diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank dataset items for a single query
    Query {
        /// Dataset file (one item per line)
        dataset_file: String,
        /// Query text
        input: String,
        /// prefix, substring, fuzzy or regex
        #[arg(short, long, default_value = "prefix")]
        match_type: MatchType,
        /// Settings TOML file (optional)
        #[arg(long)]
        config: Option<String>,
        /// History file, one previously used item per line (optional)
        #[arg(long)]
        history: Option<String>,
        /// Weight override as ITEM=WEIGHT (repeatable)
        #[arg(long = "weight")]
        weights: Vec<String>,
        /// Never suggest this item (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
        /// Maximum number of suggestions (overrides the settings file)
        #[arg(short, long)]
        n: Option<usize>,
        /// Show confidence, edit distance and match type per suggestion
        #[arg(long)]
        details: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Read queries from stdin and print suggestions for each line
    Interactive {
        /// Dataset file (one item per line)
        dataset_file: String,
        /// Initial match type
        #[arg(short, long, default_value = "prefix")]
        match_type: MatchType,
        /// Settings TOML file (optional)
        #[arg(long)]
        config: Option<String>,
        /// History file (optional)
        #[arg(long)]
        history: Option<String>,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Query {
            dataset_file,
            input,
            match_type,
            config,
            history,
            weights,
            exclude,
            n,
            details,
            json,
        } => {
            let opts = EngineOptions {
                dataset: Some(Path::new(&dataset_file)),
                config: config.as_deref().map(Path::new),
                history: history.as_deref().map(Path::new),
                weights,
                exclude,
                max_suggestions: n,
            };
            query_ops::query_cmd(&opts, &input, match_type, details, json);
        }
        Command::Interactive {
            dataset_file,
            match_type,
            config,
            history,
        } => {
            let opts = EngineOptions {
                dataset: Some(Path::new(&dataset_file)),
                config: config.as_deref().map(Path::new),
                history: history.as_deref().map(Path::new),
                ..Default::default()
            };
            query_ops::interactive_cmd(&opts, match_type);
        }
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
