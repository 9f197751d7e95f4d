use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use dartstrat::config::Config;
use dartstrat::error::DsResult;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file. Options given on the command line win over it.
    #[arg(global = true, long)]
    config: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find the aim points with the highest average score
    Search(cmd::search::SearchArgs),
    /// Throw simulated darts at one aim point
    Throw(cmd::throw::ThrowArgs),
    /// Show what a board position or pixel scores
    Describe(cmd::describe::DescribeArgs),
    /// Compare the usual aim points
    Compare(cmd::compare::CompareArgs),
    /// Estimate a player's spread from recorded throws
    Calibrate(cmd::calibrate::CalibrateArgs),
}

impl Commands {
    fn config(&self) -> &Config {
        match self {
            Self::Search(args) => &args.config,
            Self::Throw(args) => &args.config,
            Self::Describe(args) => &args.config,
            Self::Compare(args) => &args.config,
            Self::Calibrate(args) => &args.config,
        }
    }
}

fn resolve_config(
    path: Option<&str>,
    cli_config: &Config,
    matches: &ArgMatches,
) -> DsResult<Config> {
    let config = match path {
        Some(path) => {
            let mut file_config = Config::load_from_file(path)?;
            file_config.merge_from_cli(cli_config, matches);
            file_config
        }
        None => cli_config.clone(),
    };
    config.validate()?;
    Ok(config)
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 dartstrat {}", env!("CARGO_PKG_VERSION"));

    // Config options live on the subcommand, so their sources do too
    let Some((_, sub_matches)) = matches.subcommand() else {
        error!("❌ No command given");
        process::exit(2);
    };

    let config = resolve_config(cli.config.as_deref(), cli.command.config(), sub_matches)
        .unwrap_or_else(|e| {
            error!("❌ {}", e);
            process::exit(1);
        });

    let result = match &cli.command {
        Commands::Search(args) => cmd::search::run(args, config),
        Commands::Throw(args) => cmd::throw::run(args, config),
        Commands::Describe(args) => cmd::describe::run(args, &config),
        Commands::Compare(args) => cmd::compare::run(args, &config),
        Commands::Calibrate(args) => cmd::calibrate::run(args, config),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
