//! Numeric constants shared by the pair potential and electrostatic models

/// Sentinel energy returned for overlapping pairs (inside the lower-bound
/// cutoff). Large enough that any Metropolis test rejects the move, small
/// enough that summing a handful of them stays finite.
pub const BIG_NUM: f64 = 1.0e20;

/// Attractive exponent of the Mie potential (fixed)
pub const ATTRACTIVE_EXPONENT: f64 = 6.0;

/// Default real-space cutoff (Å)
pub const DEFAULT_R_CUT: f64 = 10.0;

/// Default lower-bound cutoff (Å). Pairs closer than this are overlaps.
pub const DEFAULT_R_CUT_LOW: f64 = 1.0;

/// Default Ewald splitting parameter (1/Å), suitable for a ~10 Å cutoff
pub const DEFAULT_EWALD_ALPHA: f64 = 0.25;

/// Default 1-4 electrostatic scaling factor
pub const DEFAULT_SCALING_14: f64 = 0.5;

/// Default Mie repulsive exponent (12 recovers Lennard-Jones)
pub const DEFAULT_EXPONENT: f64 = 12.0;
