use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;


#[derive(Debug, Parser)]
#[command(name = "tickercast-cli")]
#[command(about = "Batch market-forecast pipeline: gather, analyze, rank, deliver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full pipeline end to end, in memory
    Run {
        /// Ticker to process; repeatable. Falls back to the watchlist file.
        #[arg(long = "ticker")]
        tickers: Vec<String>,

        /// Watchlist YAML path override
        #[arg(long)]
        watchlist: Option<PathBuf>,

        /// Spreadsheet id for the ranked rows (overrides TICKERCAST_SHEET_ID)
        #[arg(long)]
        sheet_id: Option<String>,

        /// Also write ALL analysis rows to a newly created sheet
        #[arg(long)]
        new_sheet: bool,

        /// Title for that new sheet (timestamped default otherwise)
        #[arg(long)]
        sheet_name: Option<String>,
    },
    /// Run one pipeline stage against the checkpoint directory
    Stage {
        #[command(subcommand)]
        stage: StageCommands,
    },
}

#[derive(Debug, Subcommand)]
enum StageCommands {
    /// Fetch market data and news/macro context, write gathered.json
    Gather {
        /// Ticker to process; repeatable. Falls back to the watchlist file.
        #[arg(long = "ticker")]
        tickers: Vec<String>,

        /// Watchlist YAML path override
        #[arg(long)]
        watchlist: Option<PathBuf>,
    },
    /// Generate and parse predictions from gathered.json, write analyses.json
    Analyze {
        /// Also write ALL analysis rows to a newly created sheet
        #[arg(long)]
        new_sheet: bool,

        /// Title for that new sheet (timestamped default otherwise)
        #[arg(long)]
        sheet_name: Option<String>,
    },
    /// Rank analyses.json to the top positive predictions, write ranked.json
    Rank,
    /// Append ranked.json to the configured spreadsheet
    Deliver {
        /// Spreadsheet id (overrides TICKERCAST_SHEET_ID)
        #[arg(long)]
        sheet_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = tickercast_core::load_app_config_from_env()?;

    match cli.command {
        Commands::Run {
            tickers,
            watchlist,
            sheet_id,
            new_sheet,
            sheet_name,
        } => {
            commands::run_full(&config, tickers, watchlist, sheet_id, new_sheet, sheet_name)
                .await
        }
        Commands::Stage { stage } => match stage {
            StageCommands::Gather { tickers, watchlist } => {
                commands::run_gather_stage(&config, tickers, watchlist).await
            }
            StageCommands::Analyze {
                new_sheet,
                sheet_name,
            } => commands::run_analyze_stage(&config, new_sheet, sheet_name).await,
            StageCommands::Rank => commands::run_rank_stage(&config),
            StageCommands::Deliver { sheet_id } => {
                commands::run_deliver_stage(&config, sheet_id).await
            }
        },
    }
}
