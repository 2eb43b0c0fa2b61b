//! Repulsive-term power evaluation
//!
//! The Mie repulsion is `(sigma/r)^n`. Callers already hold `rRat2`,
//! `rRat4` and `rRat6` (the attractive term), so whole exponents can be
//! assembled from those with a couple of multiplications instead of a
//! general `powf`.

use serde::{Deserialize, Serialize};

/// How the repulsive term `rRat2^(n/2)` is evaluated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExponentPath {
    /// Special-cased products for whole exponents. Tables built with this
    /// path reject non-integer exponents.
    Integer,
    /// `sqrt(rRat2).powf(n)`, valid for any real exponent
    #[default]
    Real,
}

impl ExponentPath {
    /// Evaluate `rRat2^(n/2)` along this path
    #[inline]
    pub fn repulse(self, r_rat2: f64, r_rat4: f64, attract: f64, n: f64) -> f64 {
        match self {
            ExponentPath::Integer => pow_int(r_rat2, r_rat4, attract, n as u32),
            ExponentPath::Real => r_rat2.sqrt().powf(n),
        }
    }
}

/// `d2^(e/2)` given `d4 = d2²` and `d6 = d2³`.
///
/// Odd exponents pick up one `sqrt(d2)`; the remaining even part is
/// built from the precomputed powers for the common Mie exponents.
#[inline]
pub fn pow_int(d2: f64, d4: f64, d6: f64, e: u32) -> f64 {
    let mut result = if e & 1 == 1 { d2.sqrt() } else { 1.0 };
    // in units of d2 from here on
    let half = e >> 1;
    result *= match half {
        0 => 1.0,
        1 => d2,
        2 => d4,
        3 => d6,
        4 => d4 * d4,
        5 => d4 * d6,
        6 => d6 * d6,
        7 => d6 * d6 * d2,
        8 => d6 * d6 * d4,
        9 => d6 * d6 * d6,
        10 => d6 * d6 * d6 * d2,
        11 => d6 * d6 * d6 * d4,
        12 => d6 * d6 * d6 * d6,
        _ => d2.powi(half as i32),
    };
    result
}

/// True when `n` can be fed to the integer path without truncation
pub fn is_whole(n: f64) -> bool {
    n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn powers(r_rat2: f64) -> (f64, f64, f64) {
        let r_rat4 = r_rat2 * r_rat2;
        (r_rat2, r_rat4, r_rat4 * r_rat2)
    }

    #[test]
    fn test_integer_and_real_paths_agree() {
        for &r_rat2 in &[0.04, 0.3, 0.81, 1.0, 1.7, 2.5] {
            let (d2, d4, d6) = powers(r_rat2);
            for n in 0..=40u32 {
                let int = ExponentPath::Integer.repulse(d2, d4, d6, n as f64);
                let real = ExponentPath::Real.repulse(d2, d4, d6, n as f64);
                assert_relative_eq!(int, real, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_lennard_jones_exponent() {
        let (d2, d4, d6) = powers(0.5);
        assert_eq!(pow_int(d2, d4, d6, 12), d6 * d6);
    }

    #[test]
    fn test_odd_exponent() {
        let (d2, d4, d6) = powers(4.0);
        // 4^(7/2) = 2^7
        assert_relative_eq!(pow_int(d2, d4, d6, 7), 128.0, max_relative = 1e-14);
    }

    #[test]
    fn test_is_whole() {
        assert!(is_whole(12.0));
        assert!(is_whole(0.0));
        assert!(!is_whole(12.5));
        assert!(!is_whole(-2.0));
        assert!(!is_whole(f64::NAN));
    }
}
