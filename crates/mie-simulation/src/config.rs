//! Run configuration: step counts, event cadences and ensemble

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Absolute drift between the running total and the run-start total above
/// which the equilibration boundary forces a full recalculation (K)
pub const DRIFT_THRESHOLD: f64 = 1.0e10;

/// Steps between grand-canonical weighting-function updates
pub const WEIGHT_UPDATE_INTERVAL: u64 = 500_000;

/// Steps between running consistency checks in debug builds
pub const DEFAULT_RUNNING_CHECK_INTERVAL: u64 = 1000;

/// Statistical ensemble being sampled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensemble {
    #[default]
    Nvt,
    Npt,
    Gemc,
    Gcmc,
}

impl Ensemble {
    pub fn is_grand_canonical(self) -> bool {
        self == Ensemble::Gcmc
    }
}

/// Step counts and cadences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFrequencies {
    /// Total number of steps
    pub total: u64,
    /// Steps between move-size adjustments
    pub per_adjust: u64,
    /// Steps until equilibration is complete
    pub till_equil: u64,
    /// Steps between pressure evaluations
    pub pressure_calc_freq: u64,
    /// Steps between replica exchanges
    pub per_exchange: u64,
    pub pressure_calc: bool,
}

impl Default for EventFrequencies {
    fn default() -> Self {
        Self {
            total: 1_000_000,
            per_adjust: 1000,
            till_equil: 100_000,
            pressure_calc_freq: 10_000,
            per_exchange: 0,
            pressure_calc: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub ensemble: Ensemble,
    pub steps: EventFrequencies,
    /// Steps between running consistency checks, `None` disables them
    pub running_check_interval: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ensemble: Ensemble::default(),
            steps: EventFrequencies::default(),
            running_check_interval: default_running_check_interval(),
        }
    }
}

/// Enabled in debug builds only
pub fn default_running_check_interval() -> Option<u64> {
    cfg!(debug_assertions).then_some(DEFAULT_RUNNING_CHECK_INTERVAL)
}

impl SimulationConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, SimulationError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimulationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.steps.total == 0 {
            return Err(SimulationError::ZeroInterval("steps.total"));
        }
        if self.running_check_interval == Some(0) {
            return Err(SimulationError::ZeroInterval("running_check_interval"));
        }
        if self.steps.till_equil > self.steps.total {
            log::warn!(
                "Equilibration ({} steps) is longer than the run ({} steps); no production phase",
                self.steps.till_equil,
                self.steps.total
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gcmc_run() {
        let config = SimulationConfig::from_toml_str(
            r#"
            ensemble = "gcmc"
            running_check_interval = 250

            [steps]
            total = 2000000
            till_equil = 500000
            "#,
        )
        .unwrap();
        assert!(config.ensemble.is_grand_canonical());
        assert_eq!(config.steps.total, 2_000_000);
        assert_eq!(config.steps.till_equil, 500_000);
        assert_eq!(config.steps.per_adjust, EventFrequencies::default().per_adjust);
        assert_eq!(config.running_check_interval, Some(250));
    }

    #[test]
    fn test_default_check_interval_follows_build() {
        let expected = if cfg!(debug_assertions) {
            Some(DEFAULT_RUNNING_CHECK_INTERVAL)
        } else {
            None
        };
        assert_eq!(SimulationConfig::default().running_check_interval, expected);
    }

    #[test]
    fn test_zero_check_interval_rejected() {
        assert!(matches!(
            SimulationConfig::from_toml_str("running_check_interval = 0"),
            Err(SimulationError::ZeroInterval(_))
        ));
    }

    #[test]
    fn test_zero_total_rejected() {
        let text = "[steps]\ntotal = 0\ntill_equil = 0\n";
        assert!(matches!(
            SimulationConfig::from_toml_str(text),
            Err(SimulationError::ZeroInterval("steps.total"))
        ));
    }

    #[test]
    fn test_only_gcmc_is_grand_canonical() {
        assert!(!Ensemble::Nvt.is_grand_canonical());
        assert!(!Ensemble::Npt.is_grand_canonical());
        assert!(!Ensemble::Gemc.is_grand_canonical());
        assert!(Ensemble::Gcmc.is_grand_canonical());
    }
}
