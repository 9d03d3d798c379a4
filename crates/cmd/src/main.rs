use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use cmd::commands;
use hatchery::request::{DEFAULT_COLS, DEFAULT_ROWS};
use hatchery::{Config, GenerationRequest, Hatchery};

#[derive(Parser)]
#[command(author, version, about = "Synthetic dataset hatchery", long_about = None)]
#[command(name = "hatch")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Storage root override (falls back to HATCH_STORAGE, then /data)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a dataset in-process
    Generate(GenerateArgs),
    /// Generate a dataset in a one-shot container
    Run(RunArgs),
    /// List datasets in the storage root, newest first
    List,
    /// Remove a dataset
    Delete {
        /// Dataset name (.parquet extension optional)
        name: String,
    },
    /// Print the first rows of a dataset
    Cat {
        /// Dataset name (.parquet extension optional)
        name: String,
        /// Number of rows to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of rows (100 to 1000000)
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: u64,

    /// Number of columns (1 to 100)
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: u64,

    /// Base name for the dataset file; a timestamp name is chosen when omitted
    #[arg(long)]
    name: Option<String>,

    /// Seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,

    /// Replace an existing dataset of the same name
    #[arg(long)]
    overwrite: bool,
}

impl GenerateArgs {
    fn to_request(&self) -> GenerationRequest {
        GenerationRequest {
            rows: self.rows,
            cols: self.cols,
            name: self.name.clone(),
            seed: self.seed,
            overwrite: self.overwrite,
        }
    }
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    generate: GenerateArgs,

    /// Container image holding the generator
    #[arg(long)]
    image: Option<String>,

    /// Volume name or host path bound into the container
    #[arg(long)]
    volume: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    diagnostics::init_with_default(if cli.verbose { "info" } else { "off" });

    let mut config = Config::resolve(cli.storage.clone());

    match &cli.command {
        Commands::Generate(args) => {
            let service = Hatchery::open(config);
            commands::generate_command(&service, &args.to_request(), &mut None)
        }
        Commands::Run(args) => {
            if let Some(image) = &args.image {
                config.image = image.clone();
            }
            if let Some(volume) = &args.volume {
                config.volume = volume.clone();
            }
            let service = Hatchery::open(config);
            commands::run_command(&service, &args.generate.to_request(), &mut None).await
        }
        Commands::List => {
            let service = Hatchery::open(config);
            commands::list_command(&service, &mut None)
        }
        Commands::Delete { name } => {
            let service = Hatchery::open(config);
            commands::delete_command(&service, name, &mut None)
        }
        Commands::Cat { name, limit } => {
            let service = Hatchery::open(config);
            commands::cat_command(&service, name, *limit, &mut None)
        }
    }
}
