//! Batched pair sums
//!
//! A move's energy delta is a sum over many independent pairs. Each pair
//! only reads the immutable parameter tables, so the sum can be split
//! across threads and reduced at the end.

use std::ops::{Add, AddAssign};

use glam::DVec3;
use rayon::prelude::*;

use crate::constants::BIG_NUM;
use crate::potential::PairPotential;

/// Minimum chunk handed to one rayon task
const PAR_CHUNK: usize = 1024;

/// One interacting pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairTerm {
    pub dist_sq: f64,
    pub kind1: usize,
    pub kind2: usize,
    /// Charge product with the unit factor applied
    pub qi_qj: f64,
    /// Scaled 1-4 pair (bonded neighbours three bonds apart)
    pub one_four: bool,
}

impl PairTerm {
    pub fn new(dist_sq: f64, kind1: usize, kind2: usize, qi_qj: f64) -> Self {
        Self {
            dist_sq,
            kind1,
            kind2,
            qi_qj,
            one_four: false,
        }
    }

    pub fn one_four(dist_sq: f64, kind1: usize, kind2: usize, qi_qj: f64) -> Self {
        Self {
            one_four: true,
            ..Self::new(dist_sq, kind1, kind2, qi_qj)
        }
    }
}

/// Accumulated energies and virials of a batch.
///
/// An overlapping standard pair adds [`BIG_NUM`] to `coulomb` and nothing
/// else, so a batch containing one stays finite and can be rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PairSum {
    pub lj: f64,
    pub coulomb: f64,
    pub lj_virial: f64,
    pub coulomb_virial: f64,
}

impl PairSum {
    /// True when at least one standard pair in the batch overlapped
    pub fn has_overlap(&self) -> bool {
        self.coulomb >= BIG_NUM
    }

    fn accumulate<P: PairPotential + ?Sized>(mut self, model: &P, pair: &PairTerm) -> Self {
        if pair.one_four {
            model.add_energy_1_4(&mut self.lj, pair.dist_sq, pair.kind1, pair.kind2);
            model.coulomb_add_1_4(&mut self.coulomb, pair.dist_sq, pair.qi_qj);
        } else if pair.dist_sq <= model.electrostatics().r_cut_low_sq() {
            self.coulomb += BIG_NUM;
        } else if pair.dist_sq < model.r_cut_sq() {
            self.lj += model.energy(pair.dist_sq, pair.kind1, pair.kind2);
            self.lj_virial += model.virial(pair.dist_sq, pair.kind1, pair.kind2);
            if pair.qi_qj != 0.0 {
                self.coulomb += model.coulomb_energy(pair.dist_sq, pair.qi_qj);
                self.coulomb_virial += model.coulomb_virial(pair.dist_sq, pair.qi_qj);
            }
        }
        self
    }
}

impl Add for PairSum {
    type Output = PairSum;

    fn add(self, rhs: PairSum) -> PairSum {
        PairSum {
            lj: self.lj + rhs.lj,
            coulomb: self.coulomb + rhs.coulomb,
            lj_virial: self.lj_virial + rhs.lj_virial,
            coulomb_virial: self.coulomb_virial + rhs.coulomb_virial,
        }
    }
}

impl AddAssign for PairSum {
    fn add_assign(&mut self, rhs: PairSum) {
        *self = *self + rhs;
    }
}

/// Sum `pairs` in order on the calling thread.
///
/// Standard pairs at or beyond the cutoff are skipped. Standard pairs at or
/// inside the lower-bound cutoff add the overlap sentinel whatever their
/// charge. Pairs with zero charge product skip the Coulomb kernel.
pub fn sum_pairs<P: PairPotential + ?Sized>(model: &P, pairs: &[PairTerm]) -> PairSum {
    pairs
        .iter()
        .fold(PairSum::default(), |acc, pair| acc.accumulate(model, pair))
}

/// Same as [`sum_pairs`], split across the rayon pool
pub fn par_sum_pairs<P: PairPotential + Sync + ?Sized>(model: &P, pairs: &[PairTerm]) -> PairSum {
    pairs
        .par_iter()
        .with_min_len(PAR_CHUNK)
        .fold(PairSum::default, |acc, pair| acc.accumulate(model, pair))
        .reduce(PairSum::default, |a, b| a + b)
}

/// Orthorhombic periodic box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicBox {
    lengths: DVec3,
}

impl PeriodicBox {
    pub fn new(lengths: DVec3) -> Self {
        Self { lengths }
    }

    pub fn cubic(side: f64) -> Self {
        Self::new(DVec3::splat(side))
    }

    pub fn lengths(&self) -> DVec3 {
        self.lengths
    }

    /// Squared minimum-image distance between `a` and `b`
    #[inline]
    pub fn dist_sq(&self, a: DVec3, b: DVec3) -> f64 {
        let d = b - a;
        let wrapped = d - self.lengths * (d / self.lengths).round();
        wrapped.length_squared()
    }
}
