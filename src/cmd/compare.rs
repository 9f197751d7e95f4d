use crate::reports;
use clap::Args;
use dartstrat::config::Config;
use dartstrat::error::DsResult;
use dartstrat::targets::compare_named_targets;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub config: Config,
}

pub fn run(_args: &CompareArgs, config: &Config) -> DsResult<()> {
    let model = config.model.accuracy_model()?;
    info!(
        "⚖️  Comparing named targets ({} throws each, model {})",
        config.search.throws, model
    );
    let compared = compare_named_targets(&model, config.search.throws, config.search.seed)?;
    reports::print_comparison(&model, &compared);
    Ok(())
}
