//! Collaborators driven by the simulation loop
//!
//! Move selection, energy recomputation, reciprocal-space bookkeeping,
//! output and grand-canonical biasing live outside this crate. The driver
//! only sees them through these traits.

use crate::energy::Energy;

/// Ewald reciprocal-space state
pub trait ReciprocalSpace {
    /// Full rebuild from the current configuration
    fn init(&mut self);

    /// Refresh the k-vectors and the cached reciprocal terms
    fn update_vectors_and_recip_terms(&mut self);
}

/// Reciprocal space for cutoff-only electrostatics. Nothing to maintain.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEwald;

impl ReciprocalSpace for NoEwald {
    fn init(&mut self) {}

    fn update_vectors_and_recip_terms(&mut self) {}
}

/// Acceptance-bias weighting for grand-canonical sampling
pub trait AcceptanceBias {
    /// Rebuild the weighting function from accumulated visit statistics
    fn refresh_weights(&mut self);

    /// Report the final probability distribution
    fn report_distribution(&self);
}

/// The simulated system as seen by the step loop
pub trait MonteCarloSystem {
    /// Adapt proposal sizes from recent acceptance statistics
    fn adjust_moves(&mut self, step: u64);

    /// Propose, evaluate and accept or reject one trial move. Accepted moves
    /// update the running energy incrementally.
    fn choose_and_run_move(&mut self, step: u64);

    /// Incrementally tracked energy
    fn energy(&self) -> &Energy;

    /// Overwrite the tracked energy
    fn replace_energy(&mut self, energy: Energy);

    /// Ground-truth energy of the current configuration, summed over all
    /// pairs. Must not touch the tracked energy.
    fn system_total(&self) -> Energy;

    fn reciprocal_mut(&mut self) -> &mut dyn ReciprocalSpace;

    /// Only needed for grand-canonical runs
    fn acceptance_bias(&mut self) -> Option<&mut dyn AcceptanceBias> {
        None
    }
}

/// Trajectory/checkpoint writer. Decides its own cadence.
pub trait OutputSink<S: ?Sized> {
    fn emit(&mut self, step: u64, system: &S);

    /// Step count after which equilibration is complete
    fn equil_steps(&self) -> u64;
}
