use crate::reports;
use clap::Args;
use dartstrat::api::Session;
use dartstrat::config::Config;
use dartstrat::error::DsResult;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const REPORT_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,

    /// Write every target and its average score to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Cancel the search after this many seconds
    #[arg(long)]
    pub time_limit: Option<f64>,
}

pub fn run(args: &SearchArgs, config: Config) -> DsResult<()> {
    let top = config.search.top;
    let deadline = match args.time_limit {
        Some(secs) => {
            let limit = Duration::try_from_secs_f64(secs).map_err(|_| {
                dartstrat::DartError::Validation(format!(
                    "Time limit must be a non-negative number of seconds, got {}",
                    secs
                ))
            })?;
            // A limit past the end of time is no limit
            Instant::now().checked_add(limit)
        }
        None => None,
    };

    let mut session = Session::new(config)?;
    session.start_search()?;

    let mut last_percent = None;
    loop {
        let snap = session.progress();
        if !snap.is_running() {
            break;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            warn!("⏰ Time limit reached, cancelling search");
            session.cancel_search();
            break;
        }
        let percent = (snap.progress() * 100.0) as u32;
        if snap.total > 0 && last_percent != Some(percent) {
            info!("⏳ {:>3}% ({}/{})", percent, snap.received, snap.total);
            last_percent = Some(percent);
        }
        let pause = match deadline {
            Some(d) => REPORT_INTERVAL.min(d.saturating_duration_since(Instant::now())),
            None => REPORT_INTERVAL,
        };
        thread::sleep(pause);
    }

    let snap = session.wait_for_search();
    if let Some(e) = session.take_search_error() {
        return Err(e);
    }
    if snap.is_cancelled() {
        warn!("⚠️  Search cancelled, no results.");
        return Ok(());
    }

    reports::print_best_targets(session.model(), &snap.best, top);

    if let Some(path) = &args.csv {
        session.export_results(path)?;
        info!("💾 Results written to {}", path.display());
    }
    Ok(())
}
