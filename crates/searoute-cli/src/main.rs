use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use searoute_cli::commands::ports::handle_ports_command;
use searoute_cli::commands::route::{handle_route_command, RouteCommandArgs};
use searoute_cli::data::DataOptions;
use searoute_cli::output::{CommandOutcome, OutputFormat};

#[derive(Parser, Debug)]
#[command(author, version, about = "Sea route planning utilities")]
struct Cli {
    /// Port registry JSON file to use instead of the embedded one.
    #[arg(long, global = true, value_name = "FILE")]
    ports_file: Option<PathBuf>,

    /// Coastline JSON file to use instead of the embedded one.
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "no_land")]
    land_file: Option<PathBuf>,

    /// Ignore land entirely and plan over open ocean.
    #[arg(long, global = true)]
    no_land: bool,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known ports.
    Ports {
        /// Only list ports in this region.
        #[arg(long)]
        region: Option<String>,
    },
    /// Plan a voyage between two ports.
    Route(RouteCommandArgs),
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(outcome) => outcome.exit_code(),
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<CommandOutcome> {
    let data = DataOptions {
        ports_file: cli.ports_file,
        land_file: cli.land_file,
        no_land: cli.no_land,
    };

    match cli.command {
        Command::Ports { region } => {
            handle_ports_command(&data, region.as_deref(), cli.format)?;
            Ok(CommandOutcome::Complete)
        }
        Command::Route(args) => handle_route_command(&data, cli.format, &args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
