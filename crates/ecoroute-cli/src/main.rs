use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ecoroute_cli::commands::batch::{handle_batch_command, BatchCommandArgs};
use ecoroute_cli::commands::route::{
    handle_route_command, route_requests, EcoCommandArgs, RestrictedCommandArgs,
    RouteCommandArgs,
};
use ecoroute_cli::menu::{run_menu, MenuConfig};
use ecoroute_cli::output::OutputFormat;
use ecoroute_lib::{Dataset, DatasetPaths};

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive, park and walk route planner")]
struct Cli {
    /// Locations table (Location,Id,Code,Parking).
    #[arg(long, env = "ECOROUTE_LOCATIONS", default_value = "Locations.csv", global = true)]
    locations: PathBuf,

    /// Distances table (Location1,Location2,Driving,Walking).
    #[arg(long, env = "ECOROUTE_DISTANCES", default_value = "Distances.csv", global = true)]
    distances: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fastest driving route and its independent alternative.
    Route(RouteCommandArgs),
    /// Driving route that avoids locations or segments and may pass through one.
    Restricted(RestrictedCommandArgs),
    /// Drive to a parking location, then walk within a time limit.
    Eco(EcoCommandArgs),
    /// Run a batch request file and write the result file.
    Batch(BatchCommandArgs),
    /// Interactive menu.
    Menu,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = DatasetPaths::new(&cli.locations, &cli.distances);
    let dataset = load_dataset(&paths)?;

    match &cli.command {
        Command::Route(args) => handle_route_command(&dataset, cli.format, &route_requests(args)),
        Command::Restricted(args) => {
            handle_route_command(&dataset, cli.format, &[args.to_request()])
        }
        Command::Eco(args) => handle_route_command(&dataset, cli.format, &[args.to_request()]),
        Command::Batch(args) => handle_batch_command(&dataset, cli.format, args),
        Command::Menu => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_menu(&dataset, &MenuConfig::default(), stdin.lock(), stdout.lock())
        }
    }
}

fn load_dataset(paths: &DatasetPaths) -> Result<Dataset> {
    paths.load().with_context(|| {
        format!(
            "failed to load dataset from {} and {}",
            paths.locations.display(),
            paths.distances.display()
        )
    })
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
