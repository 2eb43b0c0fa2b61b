//! Per-kind-pair Mie parameter tables
//!
//! Tables are full square matrices flattened row-major, so
//! `flat_index(k1, k2) == flat_index(k2, k1)` only holds by value, not by
//! position. Tables built from per-kind inputs are symmetric by
//! construction.

use crate::constants::ATTRACTIVE_EXPONENT;
use crate::error::PotentialError;
use crate::power::{is_whole, ExponentPath};

/// Per-kind Mie inputs before mixing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MieKind {
    pub sigma: f64,
    pub epsilon: f64,
    pub n: f64,
}

/// How the constants at the cutoff are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftStyle {
    /// Energy vanishes at the cutoff
    Energy,
    /// Energy and force vanish at the cutoff
    Force,
}

/// Precomputed constants for one kind pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairParams {
    pub sigma_sq: f64,
    /// Repulsive exponent
    pub n: f64,
    /// `cn * epsilon`
    pub epsilon_cn: f64,
    /// `6 * cn * epsilon`, used by the virial
    pub epsilon_cn_6: f64,
    pub n_over_6: f64,
    /// Energy shift at the cutoff
    pub shift_const: f64,
    /// Force-shift constant, zero for plain energy shifting
    pub fshift_const: f64,
}

impl PairParams {
    /// Build an entry from already-combined constants.
    pub fn from_constants(
        sigma_sq: f64,
        n: f64,
        epsilon_cn: f64,
        shift_const: f64,
        fshift_const: f64,
    ) -> Self {
        Self {
            sigma_sq,
            n,
            epsilon_cn,
            epsilon_cn_6: 6.0 * epsilon_cn,
            n_over_6: n / ATTRACTIVE_EXPONENT,
            shift_const,
            fshift_const,
        }
    }

    /// Build an entry for a mixed pair, shifting at `r_cut`.
    ///
    /// With the force-shift correction written as
    /// `(r/(3 sigma) - 1) * fshift`, zero slope at the cutoff needs
    /// `fshift = -3 sigma U'(r_cut)` and zero value needs
    /// `shift = U(r_cut) + (r_cut/(3 sigma) - 1) * fshift`.
    pub fn mie(sigma: f64, epsilon: f64, n: f64, r_cut: f64, style: ShiftStyle) -> Self {
        let epsilon_cn = mie_prefactor(n) * epsilon;
        let r_rat = sigma / r_cut;
        let repulse = r_rat.powf(n);
        let attract = r_rat.powi(6);
        let energy_at_cut = epsilon_cn * (repulse - attract);

        let (shift_const, fshift_const) = match style {
            ShiftStyle::Energy => (energy_at_cut, 0.0),
            ShiftStyle::Force => {
                let fshift = 3.0 * sigma * epsilon_cn * (n * repulse - 6.0 * attract) / r_cut;
                let shift = energy_at_cut + (r_cut / (3.0 * sigma) - 1.0) * fshift;
                (shift, fshift)
            }
        };

        Self::from_constants(sigma * sigma, n, epsilon_cn, shift_const, fshift_const)
    }
}

/// Mie normalisation `cn = n/(n-6) * (n/6)^(6/(n-6))`. Equals 4 for n = 12.
pub fn mie_prefactor(n: f64) -> f64 {
    let m = ATTRACTIVE_EXPONENT;
    n / (n - m) * (n / m).powf(m / (n - m))
}

/// Lorentz-Berthelot mixing
pub fn mix(a: &MieKind, b: &MieKind) -> MieKind {
    MieKind {
        sigma: 0.5 * (a.sigma + b.sigma),
        epsilon: (a.epsilon * b.epsilon).sqrt(),
        n: 0.5 * (a.n + b.n),
    }
}

/// Immutable table of pair constants indexed by kind pair
#[derive(Debug, Clone)]
pub struct PairParameterTable {
    count: usize,
    entries: Vec<PairParams>,
    exponent: ExponentPath,
    /// Cutoff the shift constants were built for, unknown for explicit entries
    r_cut: Option<f64>,
}

impl PairParameterTable {
    /// Wrap explicit entries, `count * count` of them in row-major order.
    pub fn from_entries(
        count: usize,
        entries: Vec<PairParams>,
        exponent: ExponentPath,
    ) -> Result<Self, PotentialError> {
        if count == 0 {
            return Err(PotentialError::NoKinds);
        }
        if entries.len() != count * count {
            return Err(PotentialError::TableSize {
                kinds: count,
                expected: count * count,
                actual: entries.len(),
            });
        }
        if exponent == ExponentPath::Integer {
            for (index, entry) in entries.iter().enumerate() {
                if !is_whole(entry.n) {
                    return Err(PotentialError::NonIntegerExponent {
                        kind1: index / count,
                        kind2: index % count,
                        n: entry.n,
                    });
                }
            }
        }

        Ok(Self {
            count,
            entries,
            exponent,
            r_cut: None,
        })
    }

    /// Mix every kind pair and shift at `r_cut`.
    pub fn from_kinds(
        kinds: &[MieKind],
        r_cut: f64,
        style: ShiftStyle,
        exponent: ExponentPath,
    ) -> Result<Self, PotentialError> {
        if !(r_cut > 0.0) {
            return Err(PotentialError::InvalidCutoff(r_cut));
        }
        if let Some(kind) = kinds.iter().find(|k| !(k.n > ATTRACTIVE_EXPONENT)) {
            return Err(PotentialError::ExponentTooSmall(kind.n));
        }

        let entries = kinds
            .iter()
            .flat_map(|a| kinds.iter().map(move |b| mix(a, b)))
            .map(|m| PairParams::mie(m.sigma, m.epsilon, m.n, r_cut, style))
            .collect();

        let table = Self::from_entries(kinds.len(), entries, exponent)?;
        Ok(Self {
            r_cut: Some(r_cut),
            ..table
        })
    }

    /// Number of particle kinds
    pub fn kind_count(&self) -> usize {
        self.count
    }

    pub fn exponent_path(&self) -> ExponentPath {
        self.exponent
    }

    pub fn r_cut(&self) -> Option<f64> {
        self.r_cut
    }

    #[inline]
    pub fn flat_index(&self, kind1: usize, kind2: usize) -> usize {
        debug_assert!(
            kind1 < self.count && kind2 < self.count,
            "kind pair ({kind1}, {kind2}) out of range for {} kinds",
            self.count
        );
        kind1 * self.count + kind2
    }

    #[inline]
    pub fn get(&self, kind1: usize, kind2: usize) -> &PairParams {
        &self.entries[self.flat_index(kind1, kind2)]
    }

    /// Repulsive and attractive terms for one pair at `dist_sq`.
    ///
    /// Returns `(r_rat2, repulse, attract)`.
    #[inline]
    pub fn mie_terms(&self, params: &PairParams, dist_sq: f64) -> (f64, f64, f64) {
        let r_rat2 = params.sigma_sq / dist_sq;
        let r_rat4 = r_rat2 * r_rat2;
        let attract = r_rat4 * r_rat2;
        let repulse = self.exponent.repulse(r_rat2, r_rat4, attract, params.n);
        (r_rat2, repulse, attract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn argon() -> MieKind {
        MieKind {
            sigma: 3.405,
            epsilon: 119.8,
            n: 12.0,
        }
    }

    #[test]
    fn test_lj_prefactor_is_four() {
        assert_relative_eq!(mie_prefactor(12.0), 4.0, max_relative = 1e-14);
    }

    #[test]
    fn test_mixing_rules() {
        let a = MieKind {
            sigma: 3.0,
            epsilon: 100.0,
            n: 12.0,
        };
        let b = MieKind {
            sigma: 4.0,
            epsilon: 25.0,
            n: 14.0,
        };
        let m = mix(&a, &b);
        assert_eq!(m.sigma, 3.5);
        assert_eq!(m.epsilon, 50.0);
        assert_eq!(m.n, 13.0);
    }

    #[test]
    fn test_table_is_symmetric() {
        let other = MieKind {
            sigma: 3.75,
            epsilon: 98.0,
            n: 16.0,
        };
        let table = PairParameterTable::from_kinds(
            &[argon(), other],
            10.0,
            ShiftStyle::Force,
            ExponentPath::Real,
        )
        .unwrap();
        assert_eq!(table.kind_count(), 2);
        assert_eq!(table.get(0, 1), table.get(1, 0));
        assert_ne!(table.flat_index(0, 1), table.flat_index(1, 0));
    }

    #[test]
    fn test_table_keeps_its_cutoff() {
        let table =
            PairParameterTable::from_kinds(&[argon()], 8.5, ShiftStyle::Force, ExponentPath::Real).unwrap();
        assert_eq!(table.r_cut(), Some(8.5));

        let entry = PairParams::from_constants(1.0, 12.0, 4.0, 0.0, 0.0);
        let explicit = PairParameterTable::from_entries(1, vec![entry], ExponentPath::Real).unwrap();
        assert_eq!(explicit.r_cut(), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_kind_panics() {
        let table = PairParameterTable::from_kinds(
            &[argon(), argon()],
            10.0,
            ShiftStyle::Force,
            ExponentPath::Real,
        )
        .unwrap();
        // (0, 2) would alias (1, 0) in the flat layout
        table.get(0, 2);
    }

    #[test]
    fn test_integer_path_rejects_fractional_mixed_exponent() {
        let other = MieKind {
            n: 13.0,
            ..argon()
        };
        let err = PairParameterTable::from_kinds(
            &[argon(), other],
            10.0,
            ShiftStyle::Force,
            ExponentPath::Integer,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PotentialError::NonIntegerExponent { kind1: 0, kind2: 1, .. }
        ));
    }

    #[test]
    fn test_wrong_entry_count() {
        let entry = PairParams::from_constants(1.0, 12.0, 4.0, 0.0, 0.0);
        let err = PairParameterTable::from_entries(2, vec![entry; 3], ExponentPath::Real)
            .unwrap_err();
        assert!(matches!(err, PotentialError::TableSize { expected: 4, .. }));
    }

    #[test]
    fn test_rejects_soft_exponent() {
        let soft = MieKind {
            n: 6.0,
            ..argon()
        };
        assert!(matches!(
            PairParameterTable::from_kinds(&[soft], 10.0, ShiftStyle::Energy, ExponentPath::Real),
            Err(PotentialError::ExponentTooSmall(_))
        ));
    }

    #[test]
    fn test_energy_shift_has_no_force_term() {
        let p = PairParams::mie(3.405, 119.8, 12.0, 10.0, ShiftStyle::Energy);
        assert_eq!(p.fshift_const, 0.0);
        assert_eq!(p.epsilon_cn_6, 6.0 * p.epsilon_cn);
        assert_eq!(p.n_over_6, 2.0);
    }
}
