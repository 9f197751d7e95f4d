use crate::accuracy::{AccuracyModel, ModelKind};
use crate::error::{DartError, DsResult};
use crate::geometry::{BoardFrame, PixelPoint};
use crate::search::{supplier, DEFAULT_THROW_COUNT, DEFAULT_TOP_RESULTS, DEFAULT_WORKERS};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub model: ModelParams,
    #[command(flatten)]
    pub frame: FrameParams,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Worker threads evaluating targets
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,
    /// Simulated throws per target
    #[arg(long, default_value_t = DEFAULT_THROW_COUNT)]
    pub throws: u32,
    #[arg(long, default_value_t = supplier::DEFAULT_RADIUS_STEP)]
    pub radius_step: f64,
    /// Degrees between targets on one ring
    #[arg(long, default_value_t = supplier::DEFAULT_ANGLE_STEP)]
    pub angle_step: f64,
    /// Results kept after merging targets that share a label
    #[arg(long, default_value_t = DEFAULT_TOP_RESULTS)]
    pub top: usize,
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            throws: DEFAULT_THROW_COUNT,
            radius_step: supplier::DEFAULT_RADIUS_STEP,
            angle_step: supplier::DEFAULT_ANGLE_STEP,
            top: DEFAULT_TOP_RESULTS,
            seed: None,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// Accuracy model: perfect, uniform or normal
    #[arg(short = 'm', long, default_value_t = ModelKind::Normal)]
    pub model: ModelKind,
    /// Landing disc radius of the uniform model (normalized)
    #[arg(long, default_value_t = 0.3)]
    pub cep_radius: f64,
    /// Standard deviation of the normal model (normalized)
    #[arg(long, default_value_t = 0.1)]
    pub std_dev: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            model: ModelKind::Normal,
            cep_radius: 0.3,
            std_dev: 0.1,
        }
    }
}

impl ModelParams {
    pub fn accuracy_model(&self) -> DsResult<AccuracyModel> {
        AccuracyModel::from_kind(self.model, self.cep_radius, self.std_dev)
    }
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameParams {
    /// Side of the square the board image is drawn in, in pixels
    #[arg(long, default_value_t = 1000.0)]
    pub square_dimension: f64,
    #[arg(long, default_value_t = 0.0)]
    pub origin_x: f64,
    #[arg(long, default_value_t = 0.0)]
    pub origin_y: f64,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            square_dimension: 1000.0,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

impl FrameParams {
    pub fn frame(&self) -> BoardFrame {
        BoardFrame::new(
            self.square_dimension,
            PixelPoint::new(self.origin_x, self.origin_y),
        )
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DsResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            DartError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        info!("⚙️  Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Copies over only the values the user typed on the command line, so a
    /// config file is not clobbered by clap defaults.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(search.workers);
        update_if_present!(search.throws);
        update_if_present!(search.radius_step);
        update_if_present!(search.angle_step);
        update_if_present!(search.top);
        update_if_present!(search.seed);

        update_if_present!(model.model);
        update_if_present!(model.cep_radius);
        update_if_present!(model.std_dev);

        update_if_present!(frame.square_dimension);
        update_if_present!(frame.origin_x);
        update_if_present!(frame.origin_y);
    }

    pub fn validate(&self) -> DsResult<()> {
        let s = &self.search;
        if s.workers == 0 {
            return Err(DartError::Config("workers must be at least 1".to_string()));
        }
        if s.throws == 0 {
            return Err(DartError::Config("throws must be at least 1".to_string()));
        }
        if s.top == 0 {
            return Err(DartError::Config("top must be at least 1".to_string()));
        }
        let side = self.frame.square_dimension;
        if !side.is_finite() || side <= 0.0 {
            return Err(DartError::Config(format!(
                "square_dimension must be positive, got {}",
                side
            )));
        }
        supplier::CircularTargetSupplier::new(s.radius_step, s.angle_step)?;
        self.model.accuracy_model()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.workers, 4);
        assert_eq!(config.model.accuracy_model().unwrap().kind(), ModelKind::Normal);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "model": { "model": "uniform", "cep_radius": 0.5 } }"#)
                .unwrap();
        assert_eq!(config.model.model, ModelKind::Uniform);
        assert_eq!(config.model.cep_radius, 0.5);
        assert_eq!(config.model.std_dev, 0.1);
        assert_eq!(config.search, SearchParams::default());
    }

    #[test]
    fn validate_reports_bad_values() {
        let mut config = Config::default();
        config.search.workers = 0;
        assert!(matches!(config.validate(), Err(DartError::Config(_))));

        let mut config = Config::default();
        config.model.std_dev = 2.0;
        assert!(matches!(config.validate(), Err(DartError::Validation(_))));
    }

    #[test]
    fn validate_rejects_unwalkable_grid() {
        let mut config = Config::default();
        config.search.radius_step = 1e-8;
        assert!(matches!(config.validate(), Err(DartError::Validation(_))));

        let mut config = Config::default();
        config.search.angle_step = 1e-5;
        assert!(config.validate().is_err());
    }
}
