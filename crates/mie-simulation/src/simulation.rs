//! Monte Carlo step loop
//!
//! Each step adjusts move sizes, runs one trial move and hands the state to
//! the output sink. Layered on top:
//!
//! - a drift guard at the equilibration boundary that replaces the running
//!   energy with a full recalculation when it has wandered too far from the
//!   run-start total
//! - an optional running check that compares the running energy against a
//!   recalculation every few steps without changing anything
//! - grand-canonical weighting-function updates every
//!   [`WEIGHT_UPDATE_INTERVAL`] steps

use std::fmt;
use std::time::{Duration, Instant};

use crate::config::{SimulationConfig, DRIFT_THRESHOLD, WEIGHT_UPDATE_INTERVAL};
use crate::energy::{Energy, COMPONENT_NAMES};
use crate::error::SimulationError;
use crate::system::{MonteCarloSystem, OutputSink};

/// Part of the run a step belongs to. Switches once the output sink's
/// equilibration steps are done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Equilibration,
    Production,
}

/// Outcome of the equilibration-boundary drift check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftReport {
    /// 0-based index of the step after which the check ran
    pub step: u64,
    pub start_total: f64,
    /// Running total before any recalculation
    pub current_total: f64,
    /// Whether the running energy was replaced
    pub recalculated: bool,
}

impl DriftReport {
    pub fn drift(&self) -> f64 {
        (self.current_total - self.start_total).abs()
    }
}

/// Running energy next to a from-scratch recalculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyComparison {
    pub step: u64,
    pub tracked: Energy,
    pub recalculated: Energy,
}

impl EnergyComparison {
    pub fn max_deviation(&self) -> f64 {
        self.tracked.max_deviation(&self.recalculated)
    }
}

impl fmt::Display for EnergyComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "STEP: {}", self.step + 1)?;
        write!(f, "Energy  ")?;
        for (i, name) in COMPONENT_NAMES.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{:>12}", name)?;
        }
        writeln!(f)?;
        writeln!(f, "System: {}", self.tracked)?;
        write!(f, "Recalc: {}", self.recalculated)
    }
}

/// What happened during [`Simulation::run`]
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub steps: u64,
    pub drift: Option<DriftReport>,
    /// 0-based first production step, if the run got that far
    pub production_start: Option<u64>,
    /// 0-based steps after which the weighting function was refreshed
    pub weight_updates: Vec<u64>,
    pub running_checks: Vec<EnergyComparison>,
    pub elapsed: Duration,
}

/// Drives a [`MonteCarloSystem`] through the configured number of steps
pub struct Simulation<S, O> {
    system: S,
    output: O,
    config: SimulationConfig,
}

impl<S, O> Simulation<S, O>
where
    S: MonteCarloSystem,
    O: OutputSink<S>,
{
    pub fn new(mut system: S, output: O, config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        if config.ensemble.is_grand_canonical() && system.acceptance_bias().is_none() {
            return Err(SimulationError::MissingAcceptanceBias);
        }

        log::info!(
            "Simulation: {:?}, {} steps, equilibration {} steps, starting energy {:.4}",
            config.ensemble,
            config.steps.total,
            output.equil_steps(),
            system.energy().total()
        );
        if let Some(every) = config.running_check_interval {
            log::info!("Running energy check every {} steps", every);
        }

        Ok(Self {
            system,
            output,
            config,
        })
    }

    /// Run every configured step
    pub fn run(&mut self) -> RunSummary {
        let started = Instant::now();
        let start_total = self.system.energy().total();
        let grand_canonical = self.config.ensemble.is_grand_canonical();
        let mut summary = RunSummary::default();
        let mut phase = self.phase(0);

        for step in 0..self.config.steps.total {
            if self.phase(step) != phase {
                phase = self.phase(step);
                log::info!("Entering {:?} phase at step {}", phase, step + 1);
                summary.production_start = Some(step);
            }

            // Step 1: Adapt move sizes
            self.system.adjust_moves(step);

            // Step 2: One trial move
            self.system.choose_and_run_move(step);

            // Step 3: Output at the sink's own cadence
            self.output.emit(step, &self.system);

            if step + 1 == self.output.equil_steps() {
                summary.drift = Some(self.check_drift(step, start_total));
            }

            if let Some(every) = self.config.running_check_interval {
                if (step + 1) % every == 0 {
                    summary.running_checks.push(self.running_check(step));
                }
            }

            if grand_canonical && (step + 1) % WEIGHT_UPDATE_INTERVAL == 0 {
                if let Some(bias) = self.system.acceptance_bias() {
                    bias.refresh_weights();
                    log::debug!("Updated weighting function after step {}", step + 1);
                    summary.weight_updates.push(step);
                }
            }
        }

        summary.steps = self.config.steps.total;
        summary.elapsed = started.elapsed();

        if grand_canonical {
            if let Some(bias) = self.system.acceptance_bias() {
                bias.report_distribution();
            }
        }
        log_timing(&summary);

        summary
    }

    /// Compare the running energy against a recalculation. Refreshes the
    /// reciprocal-space terms first, never changes the running energy.
    pub fn running_check(&mut self, step: u64) -> EnergyComparison {
        self.system
            .reciprocal_mut()
            .update_vectors_and_recip_terms();
        let comparison = EnergyComparison {
            step,
            tracked: *self.system.energy(),
            recalculated: self.system.system_total(),
        };
        log::info!("\n{}", comparison);
        comparison
    }

    /// Phase of the 0-based `step`
    pub fn phase(&self, step: u64) -> Phase {
        if step < self.output.equil_steps() {
            Phase::Equilibration
        } else {
            Phase::Production
        }
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn into_parts(self) -> (S, O) {
        (self.system, self.output)
    }

    fn check_drift(&mut self, step: u64, start_total: f64) -> DriftReport {
        let current_total = self.system.energy().total();
        let drift = (current_total - start_total).abs();
        // NaN counts as drifted
        let recalculated = !(drift <= DRIFT_THRESHOLD);

        if recalculated {
            log::info!("Performing total energy calculation to preserve the energy information");
            self.system.reciprocal_mut().init();
            let fresh = self.system.system_total();
            self.system.replace_energy(fresh);
        }
        log::info!(
            "Equilibration complete after {} steps (energy drift {:.4e})",
            step + 1,
            drift
        );

        DriftReport {
            step,
            start_total,
            current_total,
            recalculated,
        }
    }
}

fn log_timing(summary: &RunSummary) {
    let seconds = summary.elapsed.as_secs_f64();
    let rate = if seconds > 0.0 {
        summary.steps as f64 / seconds
    } else {
        0.0
    };
    log::info!(
        "Completed {} steps in {:.3} s ({:.1} steps/s)",
        summary.steps,
        seconds,
        rate
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EventFrequencies;
    use crate::config::{Ensemble, WEIGHT_UPDATE_INTERVAL};
    use crate::system::{AcceptanceBias, NoEwald, ReciprocalSpace};

    /// Energy drifts by a fixed amount every step
    struct Drifting {
        energy: Energy,
        per_step: f64,
        recip: NoEwald,
    }

    impl MonteCarloSystem for Drifting {
        fn adjust_moves(&mut self, _step: u64) {}

        fn choose_and_run_move(&mut self, _step: u64) {
            self.energy.inter += self.per_step;
        }

        fn energy(&self) -> &Energy {
            &self.energy
        }

        fn replace_energy(&mut self, energy: Energy) {
            self.energy = energy;
        }

        fn system_total(&self) -> Energy {
            Energy {
                inter: -42.0,
                ..Default::default()
            }
        }

        fn reciprocal_mut(&mut self) -> &mut dyn ReciprocalSpace {
            &mut self.recip
        }
    }

    struct Quiet(u64);

    impl<S> OutputSink<S> for Quiet {
        fn emit(&mut self, _step: u64, _system: &S) {}

        fn equil_steps(&self) -> u64 {
            self.0
        }
    }

    fn config(total: u64) -> SimulationConfig {
        SimulationConfig {
            steps: EventFrequencies {
                total,
                till_equil: 5,
                ..Default::default()
            },
            running_check_interval: None,
            ..Default::default()
        }
    }

    fn drifting(per_step: f64) -> Drifting {
        Drifting {
            energy: Energy::default(),
            per_step,
            recip: NoEwald,
        }
    }

    #[test]
    fn test_small_drift_keeps_running_energy() {
        let mut sim = Simulation::new(drifting(1.0), Quiet(5), config(10)).unwrap();
        let summary = sim.run();
        let drift = summary.drift.unwrap();
        assert_eq!(drift.step, 4);
        assert_eq!(drift.current_total, 5.0);
        assert!(!drift.recalculated);
        assert_eq!(sim.system().energy().inter, 10.0);
    }

    #[test]
    fn test_large_drift_is_replaced_by_recalculation() {
        let mut sim = Simulation::new(drifting(1.0e10), Quiet(5), config(10)).unwrap();
        let summary = sim.run();
        let drift = summary.drift.unwrap();
        assert!(drift.recalculated);
        assert_eq!(drift.drift(), 5.0e10);
        // recalculated -42 at step 4, then 5 more moves
        assert_eq!(sim.system().energy().inter, -42.0 + 5.0e10);
    }

    #[test]
    fn test_drift_exactly_at_threshold_is_kept() {
        let mut sim = Simulation::new(drifting(DRIFT_THRESHOLD / 5.0), Quiet(5), config(10)).unwrap();
        let summary = sim.run();
        assert!(!summary.drift.unwrap().recalculated);
    }

    #[test]
    fn test_phase_boundary() {
        let sim = Simulation::new(drifting(0.0), Quiet(5), config(10)).unwrap();
        assert_eq!(sim.phase(0), Phase::Equilibration);
        assert_eq!(sim.phase(4), Phase::Equilibration);
        assert_eq!(sim.phase(5), Phase::Production);
        assert_eq!(sim.phase(9), Phase::Production);
    }

    #[test]
    fn test_run_records_production_start() {
        let mut sim = Simulation::new(drifting(0.0), Quiet(5), config(10)).unwrap();
        assert_eq!(sim.run().production_start, Some(5));

        let mut sim = Simulation::new(drifting(0.0), Quiet(50), config(10)).unwrap();
        assert_eq!(sim.run().production_start, None);

        // starts in production, no transition
        let mut sim = Simulation::new(drifting(0.0), Quiet(0), config(10)).unwrap();
        assert_eq!(sim.run().production_start, None);
    }

    struct CountingBias(u32);

    impl AcceptanceBias for CountingBias {
        fn refresh_weights(&mut self) {
            self.0 += 1;
        }

        fn report_distribution(&self) {}
    }

    /// Has a bias at construction and drops it on the first move
    struct DetachingBias {
        inner: Drifting,
        bias: Option<CountingBias>,
    }

    impl MonteCarloSystem for DetachingBias {
        fn adjust_moves(&mut self, _step: u64) {}

        fn choose_and_run_move(&mut self, _step: u64) {
            self.bias = None;
        }

        fn energy(&self) -> &Energy {
            self.inner.energy()
        }

        fn replace_energy(&mut self, energy: Energy) {
            self.inner.replace_energy(energy);
        }

        fn system_total(&self) -> Energy {
            self.inner.system_total()
        }

        fn reciprocal_mut(&mut self) -> &mut dyn ReciprocalSpace {
            self.inner.reciprocal_mut()
        }

        fn acceptance_bias(&mut self) -> Option<&mut dyn AcceptanceBias> {
            self.bias.as_mut().map(|b| b as &mut dyn AcceptanceBias)
        }
    }

    #[test]
    fn test_missing_bias_records_no_weight_update() {
        let mut cfg = config(WEIGHT_UPDATE_INTERVAL);
        cfg.ensemble = Ensemble::Gcmc;
        let system = DetachingBias {
            inner: drifting(0.0),
            bias: Some(CountingBias(0)),
        };
        let mut sim = Simulation::new(system, Quiet(5), cfg).unwrap();
        let summary = sim.run();
        assert!(summary.weight_updates.is_empty());
        assert!(sim.system().bias.is_none());
    }

    #[test]
    fn test_no_drift_check_when_equilibration_never_ends() {
        let mut sim = Simulation::new(drifting(1.0), Quiet(50), config(10)).unwrap();
        assert!(sim.run().drift.is_none());
    }

    #[test]
    fn test_gcmc_without_bias_is_rejected() {
        let mut cfg = config(10);
        cfg.ensemble = Ensemble::Gcmc;
        assert!(matches!(
            Simulation::new(drifting(0.0), Quiet(5), cfg),
            Err(SimulationError::MissingAcceptanceBias)
        ));
    }

    #[test]
    fn test_comparison_display_lists_components() {
        let cmp = EnergyComparison {
            step: 999,
            tracked: Energy::default(),
            recalculated: Energy::default(),
        };
        let text = cmp.to_string();
        assert!(text.starts_with("STEP: 1000"));
        for name in COMPONENT_NAMES {
            assert!(text.contains(name));
        }
        assert!(text.contains("System:"));
        assert!(text.contains("Recalc:"));
    }
}
