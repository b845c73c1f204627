//! Loss accumulation over one pass.

use std::time::Instant;

use kpda_io::PhaseSummary;

/// Running sums of the per-batch loss terms of a train or validation pass.
#[derive(Debug, Clone)]
pub struct LossAccumulator {
    started: Instant,
    total: f64,
    global: f64,
    refine: f64,
    batches: usize,
}

impl Default for LossAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl LossAccumulator {
    /// Start a pass now.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            total: 0.0,
            global: 0.0,
            refine: 0.0,
            batches: 0,
        }
    }

    /// Add one batch's `[total, global, refine]` losses.
    pub fn push(&mut self, [total, global, refine]: [f64; 3]) {
        self.total += total;
        self.global += global;
        self.refine += refine;
        self.batches += 1;
    }

    /// Batches seen.
    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Mean losses and elapsed time. An empty pass reports zero losses.
    pub fn summary(&self) -> PhaseSummary {
        let n = self.batches.max(1) as f64;
        PhaseSummary {
            seconds: self.started.elapsed().as_secs_f64(),
            loss: self.total / n,
            global_loss: self.global / n,
            refine_loss: self.refine / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_means() {
        let mut acc = LossAccumulator::new();
        acc.push([3.0, 1.0, 2.0]);
        acc.push([5.0, 2.0, 3.0]);
        let summary = acc.summary();
        assert_eq!(acc.batches(), 2);
        assert_eq!(summary.loss, 4.0);
        assert_eq!(summary.global_loss, 1.5);
        assert_eq!(summary.refine_loss, 2.5);
        assert!(summary.seconds >= 0.0);
    }

    #[test]
    fn test_empty_pass() {
        let summary = LossAccumulator::default().summary();
        assert_eq!(summary.loss, 0.0);
    }
}
