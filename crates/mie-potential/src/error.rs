//! Errors raised while building force-field tables and models

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PotentialError {
    #[error("no particle kinds defined")]
    NoKinds,

    #[error("unknown particle kind `{0}`")]
    UnknownKind(String),

    #[error("expected {expected} pair entries for {kinds} kinds, got {actual}")]
    TableSize {
        kinds: usize,
        expected: usize,
        actual: usize,
    },

    #[error("pair ({kind1}, {kind2}) has exponent {n}, the integer power path needs whole exponents")]
    NonIntegerExponent { kind1: usize, kind2: usize, n: f64 },

    #[error("Mie exponent must be greater than 6, got {0}")]
    ExponentTooSmall(f64),

    #[error("sigma of kind `{name}` must be positive, got {sigma}")]
    InvalidSigma { name: String, sigma: f64 },

    #[error("epsilon of kind `{name}` must not be negative, got {epsilon}")]
    InvalidEpsilon { name: String, epsilon: f64 },

    #[error("cutoff must be positive, got {0}")]
    InvalidCutoff(f64),

    #[error("lower-bound cutoff squared {low_sq} must be below cutoff squared {cut_sq}")]
    CutoffLowTooLarge { low_sq: f64, cut_sq: f64 },

    #[error("parameter table was shifted at {table} Å but the model cutoff is {model} Å")]
    CutoffMismatch { table: f64, model: f64 },

    #[error("Ewald alpha must be positive when Ewald is enabled, got {0}")]
    InvalidAlpha(f64),

    #[error("failed to read force field file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
