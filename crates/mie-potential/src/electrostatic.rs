//! Real-space Coulomb interaction
//!
//! Two modes, fixed at construction:
//!
//! - Ewald: `E = qq * erfc(alpha r) / r`, the reciprocal-space remainder is
//!   handled elsewhere
//! - Cutoff: `E = qq * (1/r - 1/r_cut)`, shifted to zero at the cutoff
//!
//! Charge products are expected to carry any unit conversion factor already.

use std::f64::consts::FRAC_2_SQRT_PI;

use statrs::function::erf::erf;

use crate::constants::BIG_NUM;
use crate::error::PotentialError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Electrostatics {
    r_cut: f64,
    r_cut_low_sq: f64,
    alpha: f64,
    ewald: bool,
    scaling_14: f64,
}

impl Electrostatics {
    pub fn new(
        r_cut: f64,
        r_cut_low: f64,
        alpha: f64,
        ewald: bool,
        scaling_14: f64,
    ) -> Result<Self, PotentialError> {
        if !(r_cut > 0.0) {
            return Err(PotentialError::InvalidCutoff(r_cut));
        }
        let r_cut_low_sq = r_cut_low * r_cut_low;
        if r_cut_low_sq >= r_cut * r_cut {
            return Err(PotentialError::CutoffLowTooLarge {
                low_sq: r_cut_low_sq,
                cut_sq: r_cut * r_cut,
            });
        }
        if ewald && !(alpha > 0.0) {
            return Err(PotentialError::InvalidAlpha(alpha));
        }

        Ok(Self {
            r_cut,
            r_cut_low_sq,
            alpha,
            ewald,
            scaling_14,
        })
    }

    pub fn r_cut(&self) -> f64 {
        self.r_cut
    }

    pub fn r_cut_sq(&self) -> f64 {
        self.r_cut * self.r_cut
    }

    pub fn r_cut_low_sq(&self) -> f64 {
        self.r_cut_low_sq
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_ewald(&self) -> bool {
        self.ewald
    }

    pub fn scaling_14(&self) -> f64 {
        self.scaling_14
    }

    /// Pair energy, or [`BIG_NUM`] when the pair overlaps.
    #[inline]
    pub fn energy(&self, dist_sq: f64, qi_qj: f64) -> f64 {
        if dist_sq <= self.r_cut_low_sq {
            return BIG_NUM;
        }
        qi_qj * self.kernel(dist_sq.sqrt())
    }

    #[inline]
    pub fn virial(&self, dist_sq: f64, qi_qj: f64) -> f64 {
        let dist = dist_sq.sqrt();
        if self.ewald {
            let screened = 1.0 - erf(self.alpha * dist);
            let gauss = FRAC_2_SQRT_PI * self.alpha * (-self.alpha * self.alpha * dist_sq).exp();
            qi_qj * (screened / dist + gauss) / dist_sq
        } else {
            qi_qj / (dist_sq * dist)
        }
    }

    /// Adds the scaled 1-4 energy to `en`. No overlap check is done here,
    /// 1-4 pairs are bonded neighbours.
    #[inline]
    pub fn add_1_4(&self, en: &mut f64, dist_sq: f64, qi_qj: f64) {
        *en += self.scaling_14 * qi_qj * self.kernel(dist_sq.sqrt());
    }

    /// Long-range part is carried by the reciprocal-space sum
    pub fn energy_lrc(&self) -> f64 {
        0.0
    }

    #[inline]
    fn kernel(&self, dist: f64) -> f64 {
        if self.ewald {
            (1.0 - erf(self.alpha * dist)) / dist
        } else {
            1.0 / dist - 1.0 / self.r_cut
        }
    }
}
