use crate::reports;
use clap::Args;
use dartstrat::api::Session;
use dartstrat::config::Config;
use dartstrat::error::DsResult;
use dartstrat::geometry::BoardPosition;
use dartstrat::targets::NamedTarget;

#[derive(Args, Debug, Clone)]
pub struct ThrowArgs {
    #[command(flatten)]
    pub config: Config,

    /// Aim radius (0 = centre, 1 = outside of the double ring)
    #[arg(long, default_value_t = 0.0)]
    pub radius: f64,

    /// Aim angle in degrees, clockwise from straight up
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub angle: f64,

    /// Aim at a named target instead (bull, t20, d16, ...)
    #[arg(long)]
    pub at: Option<NamedTarget>,

    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: u32,
}

pub fn run(args: &ThrowArgs, config: Config) -> DsResult<()> {
    let target = match args.at {
        Some(named) => named.position(),
        None => BoardPosition::from_polar(args.radius, args.angle),
    };

    let mut session = Session::new(config)?;
    let throws = (0..args.count)
        .map(|_| session.throw_at(target))
        .collect::<DsResult<Vec<_>>>()?;

    reports::print_throws(session.model(), &throws, session.tally());
    Ok(())
}
