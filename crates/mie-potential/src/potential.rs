//! Pair potential models
//!
//! Shifted Mie form, with `rRat2 = sigma²/r²`:
//!
//! ```text
//! U(r)   = cn eps ((sigma/r)^n - (sigma/r)^6) - shift
//! W(r)   = 6 cn eps ((n/6) (sigma/r)^n - (sigma/r)^6) / r²
//! ```
//!
//! The force-shifted model adds `(1/(3 sqrt(rRat2)) - 1) * fshift` to the
//! energy and `-fshift / sqrt(9 r² sigma²)` to the virial, which is exactly
//! `-(1/r) d/dr` of the energy term. Both vanish at the cutoff.
//!
//! Neither model has a tail correction.

use crate::config::{ForceFieldConfig, ModelKind};
use crate::electrostatic::Electrostatics;
use crate::error::PotentialError;
use crate::params::{PairParameterTable, ShiftStyle};

/// Energy and virial evaluation for one pair of particles
pub trait PairPotential {
    fn energy(&self, dist_sq: f64, kind1: usize, kind2: usize) -> f64;

    fn virial(&self, dist_sq: f64, kind1: usize, kind2: usize) -> f64;

    /// Adds the 1-4 energy to `en`
    fn add_energy_1_4(&self, en: &mut f64, dist_sq: f64, kind1: usize, kind2: usize);

    fn energy_lrc(&self, kind1: usize, kind2: usize) -> f64;

    fn virial_lrc(&self, kind1: usize, kind2: usize) -> f64;

    fn electrostatics(&self) -> &Electrostatics;

    /// Squared cutoff for the Lennard-Jones part. The tables are checked
    /// against it on construction.
    fn r_cut_sq(&self) -> f64 {
        self.electrostatics().r_cut_sq()
    }

    fn coulomb_energy(&self, dist_sq: f64, qi_qj: f64) -> f64 {
        self.electrostatics().energy(dist_sq, qi_qj)
    }

    fn coulomb_virial(&self, dist_sq: f64, qi_qj: f64) -> f64 {
        self.electrostatics().virial(dist_sq, qi_qj)
    }

    fn coulomb_add_1_4(&self, en: &mut f64, dist_sq: f64, qi_qj: f64) {
        self.electrostatics().add_1_4(en, dist_sq, qi_qj)
    }
}

fn check_cutoff(table: &PairParameterTable, electrostatics: &Electrostatics) -> Result<(), PotentialError> {
    let model = electrostatics.r_cut();
    match table.r_cut() {
        Some(table) if (table - model).abs() > 1e-12 * model => {
            Err(PotentialError::CutoffMismatch { table, model })
        }
        _ => Ok(()),
    }
}

/// Energy-shifted Mie potential
#[derive(Debug, Clone)]
pub struct Shifted {
    standard: PairParameterTable,
    one_four: PairParameterTable,
    electrostatics: Electrostatics,
}

impl Shifted {
    /// Fails if either table was shifted at a cutoff other than the
    /// electrostatic one.
    pub fn new(
        standard: PairParameterTable,
        one_four: PairParameterTable,
        electrostatics: Electrostatics,
    ) -> Result<Self, PotentialError> {
        check_cutoff(&standard, &electrostatics)?;
        check_cutoff(&one_four, &electrostatics)?;
        Ok(Self {
            standard,
            one_four,
            electrostatics,
        })
    }

    pub fn table(&self) -> &PairParameterTable {
        &self.standard
    }

    pub fn table_1_4(&self) -> &PairParameterTable {
        &self.one_four
    }
}

impl PairPotential for Shifted {
    #[inline]
    fn energy(&self, dist_sq: f64, kind1: usize, kind2: usize) -> f64 {
        let p = self.standard.get(kind1, kind2);
        let (_, repulse, attract) = self.standard.mie_terms(p, dist_sq);
        p.epsilon_cn * (repulse - attract) - p.shift_const
    }

    #[inline]
    fn virial(&self, dist_sq: f64, kind1: usize, kind2: usize) -> f64 {
        let p = self.standard.get(kind1, kind2);
        let (_, repulse, attract) = self.standard.mie_terms(p, dist_sq);
        p.epsilon_cn_6 * (p.n_over_6 * repulse - attract) / dist_sq
    }

    #[inline]
    fn add_energy_1_4(&self, en: &mut f64, dist_sq: f64, kind1: usize, kind2: usize) {
        let p = self.one_four.get(kind1, kind2);
        let (_, repulse, attract) = self.one_four.mie_terms(p, dist_sq);
        *en += p.epsilon_cn * (repulse - attract) - p.shift_const;
    }

    fn energy_lrc(&self, _kind1: usize, _kind2: usize) -> f64 {
        0.0
    }

    fn virial_lrc(&self, _kind1: usize, _kind2: usize) -> f64 {
        0.0
    }

    fn electrostatics(&self) -> &Electrostatics {
        &self.electrostatics
    }
}

/// Force-shifted Mie potential
#[derive(Debug, Clone)]
pub struct ForceShifted {
    standard: PairParameterTable,
    one_four: PairParameterTable,
    electrostatics: Electrostatics,
}

impl ForceShifted {
    /// Fails if either table was shifted at a cutoff other than the
    /// electrostatic one.
    pub fn new(
        standard: PairParameterTable,
        one_four: PairParameterTable,
        electrostatics: Electrostatics,
    ) -> Result<Self, PotentialError> {
        check_cutoff(&standard, &electrostatics)?;
        check_cutoff(&one_four, &electrostatics)?;
        Ok(Self {
            standard,
            one_four,
            electrostatics,
        })
    }

    pub fn table(&self) -> &PairParameterTable {
        &self.standard
    }

    pub fn table_1_4(&self) -> &PairParameterTable {
        &self.one_four
    }
}

impl PairPotential for ForceShifted {
    #[inline]
    fn energy(&self, dist_sq: f64, kind1: usize, kind2: usize) -> f64 {
        let p = self.standard.get(kind1, kind2);
        let (r_rat2, repulse, attract) = self.standard.mie_terms(p, dist_sq);
        p.epsilon_cn * (repulse - attract) - p.shift_const
            + (1.0 / (3.0 * r_rat2.sqrt()) - 1.0) * p.fshift_const
    }

    #[inline]
    fn virial(&self, dist_sq: f64, kind1: usize, kind2: usize) -> f64 {
        let p = self.standard.get(kind1, kind2);
        let (_, repulse, attract) = self.standard.mie_terms(p, dist_sq);
        p.epsilon_cn_6 * (p.n_over_6 * repulse - attract) / dist_sq
            - p.fshift_const / (9.0 * dist_sq * p.sigma_sq).sqrt()
    }

    #[inline]
    fn add_energy_1_4(&self, en: &mut f64, dist_sq: f64, kind1: usize, kind2: usize) {
        let p = self.one_four.get(kind1, kind2);
        let (r_rat2, repulse, attract) = self.one_four.mie_terms(p, dist_sq);
        *en += p.epsilon_cn * (repulse - attract) - p.shift_const
            + (1.0 / (3.0 * r_rat2.sqrt()) - 1.0) * p.fshift_const;
    }

    fn energy_lrc(&self, _kind1: usize, _kind2: usize) -> f64 {
        0.0
    }

    fn virial_lrc(&self, _kind1: usize, _kind2: usize) -> f64 {
        0.0
    }

    fn electrostatics(&self) -> &Electrostatics {
        &self.electrostatics
    }
}

/// The potential selected for a run, chosen once from the force field
#[derive(Debug, Clone)]
pub enum PotentialModel {
    Shifted(Shifted),
    ForceShifted(ForceShifted),
}

impl PotentialModel {
    pub fn from_config(config: &ForceFieldConfig) -> Result<Self, PotentialError> {
        let kinds = config.mie_kinds()?;
        let kinds_1_4 = config.mie_kinds_1_4()?;
        let style = match config.model {
            ModelKind::Shifted => ShiftStyle::Energy,
            ModelKind::ForceShifted => ShiftStyle::Force,
        };

        let standard =
            PairParameterTable::from_kinds(&kinds, config.r_cut, style, config.exponent_path)?;
        let one_four =
            PairParameterTable::from_kinds(&kinds_1_4, config.r_cut, style, config.exponent_path)?;
        let elect = &config.electrostatics;
        let electrostatics = Electrostatics::new(
            config.r_cut,
            elect.r_cut_low,
            elect.alpha,
            elect.ewald,
            elect.scaling_14,
        )?;

        log::info!(
            "Built {:?} potential: {} kinds, r_cut = {} Å, {:?} exponent path, ewald = {}",
            config.model,
            kinds.len(),
            config.r_cut,
            config.exponent_path,
            elect.ewald
        );

        Ok(match config.model {
            ModelKind::Shifted => PotentialModel::Shifted(Shifted::new(standard, one_four, electrostatics)?),
            ModelKind::ForceShifted => {
                PotentialModel::ForceShifted(ForceShifted::new(standard, one_four, electrostatics)?)
            }
        })
    }

    fn inner(&self) -> &dyn PairPotential {
        match self {
            PotentialModel::Shifted(m) => m as &dyn PairPotential,
            PotentialModel::ForceShifted(m) => m as &dyn PairPotential,
        }
    }
}

impl PairPotential for PotentialModel {
    #[inline]
    fn energy(&self, dist_sq: f64, kind1: usize, kind2: usize) -> f64 {
        match self {
            PotentialModel::Shifted(m) => m.energy(dist_sq, kind1, kind2),
            PotentialModel::ForceShifted(m) => m.energy(dist_sq, kind1, kind2),
        }
    }

    #[inline]
    fn virial(&self, dist_sq: f64, kind1: usize, kind2: usize) -> f64 {
        match self {
            PotentialModel::Shifted(m) => m.virial(dist_sq, kind1, kind2),
            PotentialModel::ForceShifted(m) => m.virial(dist_sq, kind1, kind2),
        }
    }

    #[inline]
    fn add_energy_1_4(&self, en: &mut f64, dist_sq: f64, kind1: usize, kind2: usize) {
        match self {
            PotentialModel::Shifted(m) => m.add_energy_1_4(en, dist_sq, kind1, kind2),
            PotentialModel::ForceShifted(m) => m.add_energy_1_4(en, dist_sq, kind1, kind2),
        }
    }

    fn energy_lrc(&self, kind1: usize, kind2: usize) -> f64 {
        self.inner().energy_lrc(kind1, kind2)
    }

    fn virial_lrc(&self, kind1: usize, kind2: usize) -> f64 {
        self.inner().virial_lrc(kind1, kind2)
    }

    fn electrostatics(&self) -> &Electrostatics {
        self.inner().electrostatics()
    }
}
