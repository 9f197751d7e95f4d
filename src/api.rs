use crate::accuracy::calibration::ThrowCollection;
use crate::accuracy::{AccuracyModel, ModelKind};
use crate::config::Config;
use crate::error::{DartError, DsResult};
use crate::geometry::{BoardFrame, BoardPosition, PixelPoint};
use crate::search::{
    seeded_rng, single_throw, SearchCoordinator, SearchOptions, SearchSnapshot, ThrowReport,
    ThrowTally,
};
use rand::rngs::StdRng;
use std::path::Path;
use tracing::info;

/// Everything a front end needs for one player: the accuracy model, the
/// background search and the interactive throwing state.
pub struct Session {
    config: Config,
    model: AccuracyModel,
    frame: BoardFrame,
    coordinator: SearchCoordinator,
    rng: StdRng,
    tally: ThrowTally,
    recorded: ThrowCollection,
}

impl Session {
    pub fn new(config: Config) -> DsResult<Self> {
        config.validate()?;
        let model = config.model.accuracy_model()?;
        let frame = config.frame.frame();
        let coordinator = SearchCoordinator::new(SearchOptions::from(&config));
        // Interactive throws use their own stream, clear of the search workers
        let rng = seeded_rng(config.search.seed, u64::MAX / 2);
        Ok(Self {
            config,
            model,
            frame,
            coordinator,
            rng,
            tally: ThrowTally::default(),
            recorded: ThrowCollection::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model(&self) -> &AccuracyModel {
        &self.model
    }

    pub fn frame(&self) -> &BoardFrame {
        &self.frame
    }

    fn ensure_idle(&self) -> DsResult<()> {
        if self.coordinator.snapshot().is_running() {
            return Err(DartError::SearchAlreadyRunning);
        }
        Ok(())
    }

    /// Swaps the model. Not allowed while a search is using the old one.
    pub fn set_model(&mut self, model: AccuracyModel) -> DsResult<()> {
        self.ensure_idle()?;
        info!("🎯 Accuracy model set to {}", model);
        self.model = model;
        Ok(())
    }

    pub fn set_standard_deviation(&mut self, standard_deviation: f64) -> DsResult<()> {
        let model = self.model.with_standard_deviation(standard_deviation)?;
        self.set_model(model)
    }

    pub fn start_search(&mut self) -> DsResult<()> {
        self.coordinator.start(self.model, self.config.search.throws)
    }

    pub fn cancel_search(&self) {
        self.coordinator.cancel();
    }

    pub fn progress(&self) -> SearchSnapshot {
        self.coordinator.snapshot()
    }

    pub fn wait_for_search(&mut self) -> SearchSnapshot {
        self.coordinator.wait()
    }

    /// The error that ended the last search, if it failed.
    pub fn take_search_error(&self) -> Option<DartError> {
        self.coordinator.take_error()
    }

    pub fn export_results<P: AsRef<Path>>(&self, path: P) -> DsResult<()> {
        let results = self.coordinator.results().ok_or_else(|| {
            DartError::Validation("No completed search to export".to_string())
        })?;
        results.export_csv(path)
    }

    /// Throws one simulated dart and adds it to the running tally.
    pub fn throw_at(&mut self, target: BoardPosition) -> DsResult<ThrowReport> {
        let report = single_throw(target, &self.model, &self.frame, &mut self.rng)?;
        self.tally.add(&report);
        Ok(report)
    }

    /// Same as [`Session::throw_at`], aiming at a window pixel.
    pub fn throw_at_pixel(&mut self, pixel: PixelPoint) -> DsResult<ThrowReport> {
        let target = self.frame.to_polar(pixel);
        self.throw_at(target)
    }

    pub fn tally(&self) -> &ThrowTally {
        &self.tally
    }

    pub fn reset_tally(&mut self) {
        self.tally.reset();
    }

    /// Records a real dart: where the player aimed and where it landed.
    pub fn record_hit(&mut self, target: PixelPoint, hit: PixelPoint) {
        let target = self.frame.to_polar(target);
        let hit = self.frame.to_polar(hit);
        self.recorded.add_hit(target, hit);
    }

    pub fn recorded(&mut self) -> &mut ThrowCollection {
        &mut self.recorded
    }

    pub fn load_recorded<P: AsRef<Path>>(&mut self, path: P) -> DsResult<()> {
        self.recorded = ThrowCollection::load_from_file(path)?;
        Ok(())
    }

    /// Switches to a normal model with the spread measured from the recorded
    /// throws. Returns the new standard deviation, or `None` when too few
    /// throws are recorded.
    pub fn apply_calibration(&mut self) -> DsResult<Option<f64>> {
        let Some(sigma) = self.recorded.std_dev() else {
            return Ok(None);
        };
        let model = match self.model.kind() {
            ModelKind::Normal => self.model.with_standard_deviation(sigma)?,
            _ => AccuracyModel::normal(sigma)?,
        };
        self.set_model(model)?;
        Ok(Some(sigma))
    }
}
