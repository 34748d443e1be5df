//! `chemviz`: command-line client for the equipment visualizer API.

mod client;
mod commands;
mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use crate::client::ApiClient;

#[derive(Parser, Debug)]
#[command(name = "chemviz", version, about = "Chemical equipment visualizer client")]
struct Cli {
    /// Base URL of the API, including the `/api` prefix.
    #[arg(
        long,
        global = true,
        env = "CHEMVIZ_API_URL",
        default_value = "http://127.0.0.1:3000/api"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload an equipment CSV as a new batch.
    Upload {
        /// Path to the CSV file.
        file: PathBuf,
    },

    /// Show statistics for the latest upload.
    Summary {
        /// Print the raw JSON response.
        #[arg(long)]
        json: bool,
    },

    /// List retained uploads, newest first.
    History,

    /// Download the PDF report for the latest upload.
    Export {
        /// Where to write the PDF. Defaults to the name suggested by the server.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let client = ApiClient::new(&cli.api_url)?;
    match cli.command {
        Commands::Upload { file } => commands::upload::run(&client, &file),
        Commands::Summary { json } => commands::summary::run(&client, json),
        Commands::History => commands::history::run(&client),
        Commands::Export { output } => commands::export::run(&client, output),
    }
}
