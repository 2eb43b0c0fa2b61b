//! Console energy log

use crate::config::EventFrequencies;
use crate::system::{MonteCarloSystem, OutputSink};

/// Logs the tracked energy every `every` steps
#[derive(Debug, Clone)]
pub struct ConsoleOutput {
    every: u64,
    equil_steps: u64,
    lines: u64,
}

impl ConsoleOutput {
    pub fn new(every: u64, steps: &EventFrequencies) -> Self {
        Self {
            every: every.max(1),
            equil_steps: steps.till_equil,
            lines: 0,
        }
    }

    /// Number of lines written so far
    pub fn lines(&self) -> u64 {
        self.lines
    }
}

impl<S: MonteCarloSystem + ?Sized> OutputSink<S> for ConsoleOutput {
    fn emit(&mut self, step: u64, system: &S) {
        if (step + 1) % self.every != 0 {
            return;
        }
        self.lines += 1;
        log::info!("step {:>10} | {}", step + 1, system.energy());
    }

    fn equil_steps(&self) -> u64 {
        self.equil_steps
    }
}
