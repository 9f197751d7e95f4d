use crate::reports;
use clap::Args;
use dartstrat::config::Config;
use dartstrat::error::{DartError, DsResult};
use dartstrat::geometry::{BoardPosition, PixelPoint};

#[derive(Args, Debug, Clone)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(long, allow_hyphen_values = true)]
    pub radius: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub angle: Option<f64>,

    /// Window pixel column, converted through the configured frame
    #[arg(
        long,
        allow_hyphen_values = true,
        requires = "y",
        conflicts_with_all = ["radius", "angle"]
    )]
    pub x: Option<f64>,

    #[arg(long, allow_hyphen_values = true, requires = "x")]
    pub y: Option<f64>,
}

pub fn run(args: &DescribeArgs, config: &Config) -> DsResult<()> {
    let frame = config.frame.frame();
    let position = match (args.x, args.y, args.radius) {
        (Some(x), Some(y), _) => frame.to_polar(PixelPoint::new(x, y)),
        (_, _, Some(radius)) => BoardPosition::from_polar(radius, args.angle.unwrap_or(0.0)),
        _ => {
            return Err(DartError::Validation(
                "Give either --radius/--angle or --x/--y".to_string(),
            ))
        }
    };

    reports::print_position(&position, &frame);
    Ok(())
}
