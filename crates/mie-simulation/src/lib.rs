//! # Monte Carlo Simulation Driver
//!
//! Step loop that keeps an incrementally updated energy honest against
//! full recalculations, plus the collaborator traits it drives.

pub mod config;
pub mod energy;
pub mod error;
pub mod output;
pub mod simulation;
pub mod system;

pub use config::*;
pub use energy::*;
pub use error::*;
pub use output::*;
pub use simulation::*;
pub use system::*;
