use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::intake::export::{caregivers_csv, parents_csv};
use crate::intake::store::InterestStore;
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Night Nurse Intake",
    about = "Run the Tahoe Night Nurse interest intake service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a CSV dump of one collection to stdout
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Which collection to export
    #[arg(long, value_enum, default_value_t = ExportAudience::Parents)]
    audience: ExportAudience,
    /// Override the configured database path
    #[arg(long)]
    database: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportAudience {
    Parents,
    Caregivers,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Export(args) => run_export(args),
    }
}

fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let path = args.database.unwrap_or(config.database.path);
    let store = InterestStore::open(&path)?;

    let document = match args.audience {
        ExportAudience::Parents => parents_csv(&store.parents()?)?,
        ExportAudience::Caregivers => caregivers_csv(&store.caregivers()?)?,
    };

    print!("{document}");
    Ok(())
}
