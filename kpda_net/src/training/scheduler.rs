//! Reduce-on-plateau learning-rate schedule.

/// Relative tolerance for comparisons against the learning-rate floor.
const FLOOR_TOLERANCE: f64 = 1e-9;

/// Learning-rate scheduler that reduces the rate when the monitored loss
/// stops improving, and signals a stop once the floor cannot be lowered.
#[derive(Debug, Clone)]
pub struct PlateauScheduler {
    lr: f64,
    min_lr: f64,
    factor: f64,
    patience: usize,
    best: f64,
    wait: usize,
    stopped: bool,
}

impl PlateauScheduler {
    /// Create a scheduler starting at `lr` with a best loss of `best`.
    ///
    /// Pass `f64::INFINITY` as `best` for a fresh run.
    pub fn new(lr: f64, min_lr: f64, factor: f64, patience: usize, best: f64) -> Self {
        Self {
            lr,
            min_lr,
            factor,
            patience,
            best,
            wait: 0,
            stopped: false,
        }
    }

    /// Current learning rate.
    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// Best loss observed so far.
    pub fn best(&self) -> f64 {
        self.best
    }

    /// Non-improving steps since the last improvement or reduction.
    pub fn wait(&self) -> usize {
        self.wait
    }

    /// Whether the scheduler has signalled a stop.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn at_floor(&self) -> bool {
        self.lr <= self.min_lr * (1.0 + FLOOR_TOLERANCE)
    }

    /// Feed one epoch's loss; returns the rate for the next epoch, or `None`
    /// once training should stop.
    pub fn step(&mut self, loss: f64) -> Option<f64> {
        if self.stopped {
            return None;
        }

        if loss < self.best {
            self.best = loss;
            self.wait = 0;
            return Some(self.lr);
        }

        self.wait += 1;
        if self.wait < self.patience {
            return Some(self.lr);
        }
        self.wait = 0;

        let candidate = self.lr * self.factor;
        if candidate < self.min_lr * (1.0 - FLOOR_TOLERANCE) {
            if self.at_floor() {
                self.stopped = true;
                log::info!("Learning rate is already at its floor {:.7}", self.min_lr);
                return None;
            }
            self.lr = self.min_lr;
        } else {
            self.lr = candidate;
        }
        log::info!("Reducing learning rate to {:.7}", self.lr);
        Some(self.lr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() <= 1e-12 * b.abs().max(1.0), "{a} != {b}");
    }

    #[test]
    fn test_improvement_keeps_rate() {
        let mut sched = PlateauScheduler::new(1e-3, 1e-5, 0.1, 3, f64::INFINITY);
        for loss in [1.0, 0.9, 0.8, 0.7] {
            assert_eq!(sched.step(loss), Some(1e-3));
        }
        assert_eq!(sched.best(), 0.7);
        assert_eq!(sched.wait(), 0);
    }

    #[test]
    fn test_reduction_after_patience() {
        let mut sched = PlateauScheduler::new(1e-3, 1e-5, 0.1, 3, f64::INFINITY);
        sched.step(1.0);
        assert_eq!(sched.step(1.0), Some(1e-3));
        assert_eq!(sched.step(1.5), Some(1e-3));
        let lr = sched.step(1.0).unwrap();
        assert_close(lr, 1e-4);
        assert_eq!(sched.wait(), 0);
    }

    #[test]
    fn test_equal_loss_is_not_improvement() {
        let mut sched = PlateauScheduler::new(1.0, 0.01, 0.5, 1, 2.0);
        assert_eq!(sched.step(2.0), Some(0.5));
    }

    #[test]
    fn test_clamps_then_stops() {
        let mut sched = PlateauScheduler::new(1e-3, 5e-5, 0.1, 1, 0.5);
        assert_close(sched.step(1.0).unwrap(), 1e-4);
        // 1e-5 would undershoot the floor.
        assert_close(sched.step(1.0).unwrap(), 5e-5);
        assert_eq!(sched.step(1.0), None);
        assert!(sched.is_stopped());
        // Stays stopped even on improvement.
        assert_eq!(sched.step(0.1), None);
    }

    #[test]
    fn test_exact_floor_reached_by_reduction() {
        // 1e-3 * 0.1 * 0.1 lands on the floor within tolerance.
        let mut sched = PlateauScheduler::new(1e-3, 1e-5, 0.1, 1, 0.0);
        assert_close(sched.step(1.0).unwrap(), 1e-4);
        assert_close(sched.step(1.0).unwrap(), 1e-5);
        assert_eq!(sched.step(1.0), None);
    }

    #[test]
    fn test_resumed_best_is_respected() {
        let mut sched = PlateauScheduler::new(1e-3, 1e-5, 0.1, 2, 0.2);
        assert_eq!(sched.step(0.3), Some(1e-3));
        assert_eq!(sched.wait(), 1);
        assert_eq!(sched.step(0.1), Some(1e-3));
        assert_eq!(sched.wait(), 0);
    }
}
