use crate::reports;
use clap::Args;
use dartstrat::api::Session;
use dartstrat::config::Config;
use dartstrat::error::DsResult;
use dartstrat::geometry::BoardPosition;
use dartstrat::targets::compare_named_targets;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct CalibrateArgs {
    #[command(flatten)]
    pub config: Config,

    /// Throw collection JSON file (created when recording into a new file)
    #[arg(short = 'f', long)]
    pub file: PathBuf,

    /// Record one real throw before reporting
    #[arg(
        long,
        num_args = 4,
        value_names = ["AIM_RADIUS", "AIM_ANGLE", "HIT_RADIUS", "HIT_ANGLE"],
        allow_hyphen_values = true
    )]
    pub hit: Option<Vec<f64>>,

    /// Compare the named targets using the measured spread
    #[arg(long, default_value_t = false)]
    pub evaluate: bool,
}

pub fn run(args: &CalibrateArgs, config: Config) -> DsResult<()> {
    let throws = config.search.throws;
    let seed = config.search.seed;
    let mut session = Session::new(config)?;

    if args.file.exists() {
        session.load_recorded(&args.file)?;
    } else if args.hit.is_some() {
        info!("📄 Starting new throw collection at {}", args.file.display());
    } else {
        return Err(dartstrat::DartError::Config(format!(
            "Throw collection {} not found",
            args.file.display()
        )));
    }

    if let Some(values) = &args.hit {
        // clap guarantees four values
        let target = BoardPosition::from_polar(values[0], values[1]);
        let hit = BoardPosition::from_polar(values[2], values[3]);
        session.recorded().add_hit(target, hit);
        session.recorded().save_to_file(&args.file)?;
        info!("💾 Saved {}", args.file.display());
    }

    reports::print_calibration(session.recorded());

    if args.evaluate {
        match session.apply_calibration()? {
            Some(_) => {
                let compared = compare_named_targets(session.model(), throws, seed)?;
                reports::print_comparison(session.model(), &compared);
            }
            None => warn!("⚠️  Not enough throws recorded to estimate a spread."),
        }
    }
    Ok(())
}
