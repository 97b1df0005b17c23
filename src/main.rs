use clap::{Parser, Subcommand};
use estimate_search::api::{run_api_server, ApiConfig};
use estimate_search::cli::{self, SearchOptions};
use estimate_search::config::EngineConfig;
use estimate_search::types::SearchMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "estimate-search")]
#[command(about = "Fuzzy row search for cost-estimate spreadsheets")]
#[command(long_about = "Estimate Search - find rows in cost-estimate spreadsheets

COMMANDS:
  list     - List every project row of the first sheet
  search   - Fuzzy-search the item column, or every cell
  inspect  - Show the header row and column mapping that search would use
  serve    - Run the HTTP upload API

MATCHING:
  Cells are compared with a partial-ratio score (0-100): the search term is
  aligned against the best-matching part of each cell, so \"pipe\" finds
  \"6in steel pipe fitting\". Rows scoring above the threshold (default 70)
  are returned in sheet order.

EXAMPLES:
  estimate-search list estimate.xlsx
  estimate-search search estimate.xlsx \"pipe fitting\"
  estimate-search search estimate.xlsx lobby --mode sheet --json
  estimate-search search estimate.xlsx pipe -o matches.xlsx
  estimate-search serve --port 5000")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every row of the first sheet as a project
    List {
        /// Spreadsheet file (.xlsx, .xlsm, .xlsb, .xls, .ods)
        file: PathBuf,

        /// Engine config (YAML)
        #[arg(short, long, env = "ESTIMATE_CONFIG")]
        config: Option<PathBuf>,

        /// Print the JSON response instead of a summary
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Fuzzy-search a spreadsheet.

MODES:
  column  Score only the item column of the first sheet whose name contains
          the sheet marker (default \"Detail\"). The header row and column
          names are inferred; results carry Item, Unit, Quantity, Unit Cost
          and Total Cost.
  sheet   Score every cell of every sheet. A row appears once per matching
          cell, with the sheet, row and column that matched.")]
    /// Fuzzy-search a spreadsheet
    Search {
        /// Spreadsheet file
        file: PathBuf,

        /// Text to search for
        term: String,

        /// Search mode: column or sheet
        #[arg(short, long, default_value = "column")]
        mode: SearchMode,

        /// Engine config (YAML)
        #[arg(short, long, env = "ESTIMATE_CONFIG")]
        config: Option<PathBuf>,

        /// Override the row match threshold (0-100); column inference is unaffected
        #[arg(short, long)]
        threshold: Option<u8>,

        /// Print the JSON response instead of a summary
        #[arg(long)]
        json: bool,

        /// Also write results to an Excel file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show sheets, header row and column mapping for the item sheet
    Inspect {
        /// Spreadsheet file
        file: PathBuf,

        /// Engine config (YAML)
        #[arg(short, long, env = "ESTIMATE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Run the HTTP upload API
    Serve {
        /// Host address to bind to (use 0.0.0.0 for all interfaces)
        #[arg(short = 'H', long, default_value = "127.0.0.1", env = "ESTIMATE_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "5000", env = "ESTIMATE_PORT")]
        port: u16,

        /// Scratch directory for uploaded files
        #[arg(long, env = "ESTIMATE_UPLOAD_DIR")]
        upload_dir: Option<PathBuf>,

        /// Engine config (YAML)
        #[arg(short, long, env = "ESTIMATE_CONFIG")]
        config: Option<PathBuf>,
    },
}

/// Diagnostics go to stderr so `--json` output stays clean
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "estimate_search=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // The server installs its own subscriber
    if !matches!(cli.command, Commands::Serve { .. }) {
        init_logging();
    }

    match cli.command {
        Commands::List { file, config, json } => cli::list(file, config, json)?,

        Commands::Search {
            file,
            term,
            mode,
            config,
            threshold,
            json,
            output,
        } => cli::search(
            file,
            term,
            SearchOptions {
                mode,
                config,
                threshold,
                json,
                output,
            },
        )?,

        Commands::Inspect { file, config } => cli::inspect(file, config)?,

        Commands::Serve {
            host,
            port,
            upload_dir,
            config,
        } => {
            let defaults = ApiConfig::default();
            let api_config = ApiConfig {
                host,
                port,
                upload_dir: upload_dir.unwrap_or(defaults.upload_dir),
                max_upload_bytes: defaults.max_upload_bytes,
                engine: match config {
                    Some(path) => EngineConfig::load(&path)?,
                    None => EngineConfig::default(),
                },
            };
            tokio::runtime::Runtime::new()?.block_on(run_api_server(api_config))?;
        }
    }

    Ok(())
}
