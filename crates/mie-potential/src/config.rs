//! Force-field configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! model = "force_shifted"
//! exponent_path = "integer"
//! r_cut = 10.0
//!
//! [electrostatics]
//! ewald = true
//! alpha = 0.25
//!
//! [[kinds]]
//! name = "CH4"
//! sigma = 3.73
//! epsilon = 148.0
//! n = 12.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::PotentialError;
use crate::params::MieKind;
use crate::power::ExponentPath;

/// Which pair potential to build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Shifted,
    #[default]
    ForceShifted,
}

/// Per-kind Mie parameters. The 1-4 values default to the standard ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindConfig {
    pub name: String,
    pub sigma: f64,
    pub epsilon: f64,
    #[serde(default = "default_exponent")]
    pub n: f64,
    pub sigma_1_4: Option<f64>,
    pub epsilon_1_4: Option<f64>,
    pub n_1_4: Option<f64>,
}

fn default_exponent() -> f64 {
    DEFAULT_EXPONENT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElectrostaticConfig {
    pub ewald: bool,
    pub alpha: f64,
    /// Lower-bound cutoff (Å), pairs at or below it are overlaps
    pub r_cut_low: f64,
    pub scaling_14: f64,
}

impl Default for ElectrostaticConfig {
    fn default() -> Self {
        Self {
            ewald: false,
            alpha: DEFAULT_EWALD_ALPHA,
            r_cut_low: DEFAULT_R_CUT_LOW,
            scaling_14: DEFAULT_SCALING_14,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceFieldConfig {
    pub model: ModelKind,
    pub exponent_path: ExponentPath,
    pub r_cut: f64,
    pub electrostatics: ElectrostaticConfig,
    pub kinds: Vec<KindConfig>,
}

impl Default for ForceFieldConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            exponent_path: ExponentPath::default(),
            r_cut: DEFAULT_R_CUT,
            electrostatics: ElectrostaticConfig::default(),
            kinds: Vec::new(),
        }
    }
}

impl ForceFieldConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, PotentialError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PotentialError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PotentialError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Read force field from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Index of the kind called `name`
    pub fn kind_index(&self, name: &str) -> Result<usize, PotentialError> {
        self.kinds
            .iter()
            .position(|k| k.name == name)
            .ok_or_else(|| PotentialError::UnknownKind(name.to_string()))
    }

    pub fn mie_kinds(&self) -> Result<Vec<MieKind>, PotentialError> {
        self.collect_kinds(|k| MieKind {
            sigma: k.sigma,
            epsilon: k.epsilon,
            n: k.n,
        })
    }

    pub fn mie_kinds_1_4(&self) -> Result<Vec<MieKind>, PotentialError> {
        self.collect_kinds(|k| MieKind {
            sigma: k.sigma_1_4.unwrap_or(k.sigma),
            epsilon: k.epsilon_1_4.unwrap_or(k.epsilon),
            n: k.n_1_4.unwrap_or(k.n),
        })
    }

    fn collect_kinds(
        &self,
        pick: impl Fn(&KindConfig) -> MieKind,
    ) -> Result<Vec<MieKind>, PotentialError> {
        if self.kinds.is_empty() {
            return Err(PotentialError::NoKinds);
        }
        self.kinds
            .iter()
            .map(|k| {
                let kind = pick(k);
                if !(kind.sigma > 0.0) {
                    return Err(PotentialError::InvalidSigma {
                        name: k.name.clone(),
                        sigma: kind.sigma,
                    });
                }
                if !(kind.epsilon >= 0.0) {
                    return Err(PotentialError::InvalidEpsilon {
                        name: k.name.clone(),
                        epsilon: kind.epsilon,
                    });
                }
                Ok(kind)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAPPE: &str = r#"
        model = "force_shifted"
        exponent_path = "integer"
        r_cut = 12.0

        [electrostatics]
        ewald = true
        alpha = 0.29

        [[kinds]]
        name = "CH3"
        sigma = 3.75
        epsilon = 98.0

        [[kinds]]
        name = "CH2"
        sigma = 3.95
        epsilon = 46.0
        n = 14.0
        epsilon_1_4 = 23.0
    "#;

    #[test]
    fn test_parse_and_defaults() {
        let config = ForceFieldConfig::from_toml_str(TRAPPE).unwrap();
        assert_eq!(config.model, ModelKind::ForceShifted);
        assert_eq!(config.exponent_path, ExponentPath::Integer);
        assert_eq!(config.r_cut, 12.0);
        assert!(config.electrostatics.ewald);
        assert_eq!(config.electrostatics.scaling_14, DEFAULT_SCALING_14);
        assert_eq!(config.kinds[0].n, DEFAULT_EXPONENT);
        assert_eq!(config.kind_index("CH2").unwrap(), 1);
    }

    #[test]
    fn test_one_four_falls_back_to_standard() {
        let config = ForceFieldConfig::from_toml_str(TRAPPE).unwrap();
        let kinds = config.mie_kinds_1_4().unwrap();
        assert_eq!(kinds[0].epsilon, 98.0);
        assert_eq!(kinds[1].epsilon, 23.0);
        assert_eq!(kinds[1].n, 14.0);
    }

    #[test]
    fn test_unknown_kind() {
        let config = ForceFieldConfig::from_toml_str(TRAPPE).unwrap();
        assert!(matches!(
            config.kind_index("OH"),
            Err(PotentialError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_empty_kinds_rejected() {
        let config = ForceFieldConfig::default();
        assert!(matches!(config.mie_kinds(), Err(PotentialError::NoKinds)));
    }

    #[test]
    fn test_zero_sigma_rejected() {
        let mut config = ForceFieldConfig::from_toml_str(TRAPPE).unwrap();
        config.kinds[0].sigma = 0.0;
        assert!(matches!(
            config.mie_kinds(),
            Err(PotentialError::InvalidSigma { .. })
        ));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            ForceFieldConfig::from_toml_str("r_cut = \"far\""),
            Err(PotentialError::Toml(_))
        ));
    }
}
