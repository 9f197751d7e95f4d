use crate::error::DsResult;
use crate::geometry::BoardPosition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Minimum number of recorded throws before a spread estimate is offered.
pub const MIN_THROWS_FOR_STD_DEV: usize = 3;

/// Real throws recorded by a player, grouped by the target aimed at.
#[derive(Debug, Clone, Default)]
pub struct ThrowCollection {
    targets: HashMap<BoardPosition, Vec<BoardPosition>>,
    cached_std_dev: Option<f64>,
}

/// On-disk shape of one target and its hits. JSON object keys must be
/// strings, so the map is stored as a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TargetHits {
    target: BoardPosition,
    hits: Vec<BoardPosition>,
}

impl ThrowCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hit(&mut self, target: BoardPosition, hit: BoardPosition) {
        self.targets.entry(target).or_default().push(hit);
        self.cached_std_dev = None;
    }

    pub fn hits_for(&self, target: &BoardPosition) -> &[BoardPosition] {
        self.targets.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_targets(&self) -> usize {
        self.targets.len()
    }

    pub fn num_throws(&self) -> usize {
        self.targets.values().map(Vec::len).sum()
    }

    pub fn is_std_dev_available(&self) -> bool {
        self.num_throws() >= MIN_THROWS_FOR_STD_DEV
    }

    /// Estimated standard deviation of the player's throws, in normalized
    /// radius units, for use with the normal accuracy model.
    ///
    /// Only the radial error is measured. It is doubled into a diameter
    /// error, and the spread of a small sample is taken to be the 2-sigma
    /// (95%) circle, so the result is halved again.
    pub fn std_dev(&mut self) -> Option<f64> {
        if !self.is_std_dev_available() {
            return None;
        }
        if let Some(cached) = self.cached_std_dev {
            return Some(cached);
        }

        let errors: Vec<f64> = self
            .targets
            .iter()
            .flat_map(|(target, hits)| {
                hits.iter()
                    .map(move |hit| (hit.radius - target.radius) * 2.0)
            })
            .collect();

        let n = errors.len() as f64;
        let mean = errors.iter().sum::<f64>() / n;
        let variance = errors.iter().map(|e| (e - mean) * (e - mean)).sum::<f64>() / n;
        let two_sigma = variance.sqrt();
        let sigma = two_sigma / 2.0;

        debug!(throws = errors.len(), mean, sigma, "Recomputed throw spread");
        self.cached_std_dev = Some(sigma);
        Some(sigma)
    }

    pub fn std_dev_string(&mut self) -> String {
        match self.std_dev() {
            Some(sigma) => format!("{:.3}", sigma),
            None => "N/A".to_string(),
        }
    }

    pub fn to_json(&self) -> DsResult<String> {
        let mut entries: Vec<TargetHits> = self
            .targets
            .iter()
            .map(|(target, hits)| TargetHits {
                target: *target,
                hits: hits.clone(),
            })
            .collect();
        // Stable file contents regardless of map order
        entries.sort_by(|a, b| {
            a.target
                .radius
                .total_cmp(&b.target.radius)
                .then(a.target.angle.total_cmp(&b.target.angle))
        });
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    pub fn from_json(content: &str) -> DsResult<Self> {
        let entries: Vec<TargetHits> = serde_json::from_str(content)?;
        let mut collection = Self::new();
        for entry in entries {
            collection
                .targets
                .entry(entry.target)
                .or_default()
                .extend(entry.hits);
        }
        Ok(collection)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DsResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let collection = Self::from_json(&content)?;
        info!(
            "🎯 Loaded {} throws at {} targets from {}",
            collection.num_throws(),
            collection.num_targets(),
            path.as_ref().display()
        );
        Ok(collection)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> DsResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(radius: f64, angle: f64) -> BoardPosition {
        BoardPosition::from_polar(radius, angle)
    }

    #[test]
    fn too_few_throws_has_no_estimate() {
        let mut c = ThrowCollection::new();
        c.add_hit(at(0.5, 0.0), at(0.55, 0.0));
        c.add_hit(at(0.5, 0.0), at(0.45, 0.0));
        assert_eq!(c.num_throws(), 2);
        assert_eq!(c.std_dev(), None);
        assert_eq!(c.std_dev_string(), "N/A");
    }

    #[test]
    fn spread_of_symmetric_misses() {
        let mut c = ThrowCollection::new();
        let target = at(0.5, 0.0);
        c.add_hit(target, at(0.6, 0.0));
        c.add_hit(target, at(0.4, 0.0));
        c.add_hit(target, at(0.6, 10.0));
        c.add_hit(target, at(0.4, 10.0));
        // diameter errors are +-0.2, population sigma 0.2, halved
        let sigma = c.std_dev().unwrap();
        assert!((sigma - 0.1).abs() < 1e-9, "sigma = {}", sigma);
        assert_eq!(c.std_dev_string(), "0.100");
    }

    #[test]
    fn new_hit_invalidates_cache() {
        let mut c = ThrowCollection::new();
        let target = at(0.5, 0.0);
        for r in [0.5, 0.5, 0.5] {
            c.add_hit(target, at(r, 0.0));
        }
        assert_eq!(c.std_dev(), Some(0.0));
        c.add_hit(target, at(0.9, 0.0));
        assert!(c.std_dev().unwrap() > 0.0);
    }

    #[test]
    fn json_keeps_grouping() {
        let mut c = ThrowCollection::new();
        c.add_hit(at(0.5, 0.0), at(0.52, 3.0));
        c.add_hit(at(0.5, 0.0), at(0.47, 359.0));
        c.add_hit(at(0.0, 0.0), at(0.01, 90.0));

        let restored = ThrowCollection::from_json(&c.to_json().unwrap()).unwrap();
        assert_eq!(restored.num_targets(), 2);
        assert_eq!(restored.hits_for(&at(0.5, 0.0)).len(), 2);
        assert_eq!(restored.hits_for(&at(0.0, 0.0)), &[at(0.01, 90.0)]);
    }
}
