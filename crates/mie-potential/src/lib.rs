//! # Mie Pair Potentials
//!
//! Pairwise energy and virial for force-shifted Mie/Lennard-Jones
//! interactions plus real-space electrostatics (cutoff-shifted or Ewald
//! screened), evaluated from squared distances and particle kinds.

pub mod batch;
pub mod config;
pub mod constants;
pub mod electrostatic;
pub mod error;
pub mod params;
pub mod potential;
pub mod power;

pub use batch::*;
pub use config::*;
pub use constants::*;
pub use electrostatic::*;
pub use error::*;
pub use params::*;
pub use potential::*;
pub use power::*;
