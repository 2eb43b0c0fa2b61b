//! Running energy bookkeeping
//!
//! The total is never stored. It is always the sum of the components, so a
//! component update can't leave it stale.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use mie_potential::PairSum;

/// System energy split by contribution (K)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Energy {
    /// Bonds, angles, dihedrals
    pub intra_bond: f64,
    /// Intramolecular non-bonded (including 1-4)
    pub intra_nonbond: f64,
    /// Intermolecular Lennard-Jones/Mie
    pub inter: f64,
    /// Long-range tail correction
    pub tc: f64,
    /// Real-space electrostatics
    pub real: f64,
    /// Ewald self energy
    pub self_energy: f64,
    /// Ewald intramolecular correction
    pub correction: f64,
    /// Reciprocal-space electrostatics
    pub recip: f64,
}

/// Component names in display order
pub const COMPONENT_NAMES: [&str; 8] = [
    "INTRA B",
    "INTRA NB",
    "INTER",
    "TC",
    "REAL",
    "SELF",
    "CORRECTION",
    "RECIP",
];

impl Energy {
    pub fn total(&self) -> f64 {
        self.components().iter().sum()
    }

    /// Components in [`COMPONENT_NAMES`] order
    pub fn components(&self) -> [f64; 8] {
        [
            self.intra_bond,
            self.intra_nonbond,
            self.inter,
            self.tc,
            self.real,
            self.self_energy,
            self.correction,
            self.recip,
        ]
    }

    /// Delta from an intermolecular pair batch
    pub fn from_inter_pairs(sum: &PairSum) -> Self {
        Self {
            inter: sum.lj,
            real: sum.coulomb,
            ..Default::default()
        }
    }

    /// Delta from an intramolecular pair batch. Intramolecular Coulomb goes
    /// into `real` alongside the intermolecular part.
    pub fn from_intra_pairs(sum: &PairSum) -> Self {
        Self {
            intra_nonbond: sum.lj,
            real: sum.coulomb,
            ..Default::default()
        }
    }

    /// Largest absolute per-component difference
    pub fn max_deviation(&self, other: &Energy) -> f64 {
        self.components()
            .iter()
            .zip(other.components().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    fn zip_with(self, rhs: Energy, op: impl Fn(f64, f64) -> f64) -> Energy {
        Energy {
            intra_bond: op(self.intra_bond, rhs.intra_bond),
            intra_nonbond: op(self.intra_nonbond, rhs.intra_nonbond),
            inter: op(self.inter, rhs.inter),
            tc: op(self.tc, rhs.tc),
            real: op(self.real, rhs.real),
            self_energy: op(self.self_energy, rhs.self_energy),
            correction: op(self.correction, rhs.correction),
            recip: op(self.recip, rhs.recip),
        }
    }
}

impl Add for Energy {
    type Output = Energy;

    fn add(self, rhs: Energy) -> Energy {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for Energy {
    type Output = Energy;

    fn sub(self, rhs: Energy) -> Energy {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl AddAssign for Energy {
    fn add_assign(&mut self, rhs: Energy) {
        *self = *self + rhs;
    }
}

impl SubAssign for Energy {
    fn sub_assign(&mut self, rhs: Energy) {
        *self = *self - rhs;
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.components().iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{:>12.4}", value)?;
        }
        write!(f, " | total {:.4}", self.total())
    }
}
