//! Fixed-timestep scheduling with bounded catch-up.

use serde::{Deserialize, Serialize};

/// Step length and catch-up bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Length of one simulation step in milliseconds.
    pub skip_time_ms: u64,
    /// Most steps a single `tick` may run before giving up on catching up.
    pub max_skip: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            skip_time_ms: 16,
            max_skip: 5,
        }
    }
}

/// Outcome of one scheduling pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Fixed steps the simulation owes for this pass, at most `max_skip`.
    pub steps: u32,
    /// Real milliseconds since the previous pass.
    pub elapsed_ms: u64,
    /// Position of `now` inside the current step, in `[0, 1]`.
    pub interpolation: f32,
    /// Milliseconds the simulation is still behind after the pass.
    /// Non-zero only when the catch-up cap was hit.
    pub backlog_ms: u64,
}

/// Decides how many fixed steps to run for a wall-clock reading.
///
/// `next_update` only moves forward in whole `skip_time_ms` increments, and
/// never by more than `max_skip` of them per call. Readings that go
/// backwards are treated as the last reading.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
    current: u64,
    last_update: u64,
    next_update: u64,
    total_steps: u64,
}

impl Scheduler {
    /// Start the clock at `start_ms`; the first step falls due right after it.
    pub fn new(config: SchedulerConfig, start_ms: u64) -> Self {
        Self {
            config,
            current: start_ms,
            last_update: start_ms,
            next_update: start_ms,
            total_steps: 0,
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    pub fn skip_time_ms(&self) -> u64 {
        self.config.skip_time_ms
    }

    /// Wall time at which the next step falls due.
    pub fn next_update(&self) -> u64 {
        self.next_update
    }

    pub fn last_update(&self) -> u64 {
        self.last_update
    }

    /// Latest wall time seen.
    pub fn current(&self) -> u64 {
        self.current
    }

    /// Steps handed out since construction.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn tick(&mut self, now_ms: u64) -> Tick {
        let now = now_ms.max(self.current);
        self.current = now;

        let skip = self.config.skip_time_ms;
        let mut skipped = 0u32;
        while now > self.next_update && skipped < self.config.max_skip {
            self.next_update += skip;
            skipped += 1;
        }

        let elapsed_ms = now - self.last_update;
        self.last_update = now;
        self.total_steps += u64::from(skipped);

        let backlog_ms = now.saturating_sub(self.next_update);
        if backlog_ms > 0 {
            tracing::debug!(
                steps = skipped,
                backlog_ms,
                "catch-up limit reached, dropping steps"
            );
        }

        Tick {
            steps: skipped,
            elapsed_ms,
            interpolation: self.interpolation_at(now),
            backlog_ms,
        }
    }

    fn interpolation_at(&self, now: u64) -> f32 {
        let skip = self.config.skip_time_ms;
        if skip == 0 || now >= self.next_update {
            return 1.0;
        }
        let remaining = (self.next_update - now) as f32;
        (1.0 - remaining / skip as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> Scheduler {
        Scheduler::new(SchedulerConfig::default(), 0)
    }

    #[test]
    fn no_step_before_first_boundary() {
        let mut s = scheduler();
        let t = s.tick(0);
        assert_eq!(t.steps, 0);
        assert_eq!(s.next_update(), 0);
    }

    #[test]
    fn one_step_per_boundary_crossed() {
        let mut s = scheduler();
        let steps: u32 = [0, 16, 32, 48].iter().map(|&t| s.tick(t).steps).sum();
        assert_eq!(steps, 3);
        assert_eq!(s.total_steps(), 3);
        assert_eq!(s.next_update(), 48);
    }

    #[test]
    fn partial_step_is_run_ahead_of_time() {
        let mut s = scheduler();
        let t = s.tick(17);
        assert_eq!(t.steps, 2);
        assert_eq!(s.next_update(), 32);
    }

    #[test]
    fn steps_never_exceed_max_skip() {
        let mut s = scheduler();
        for now in [10_000, 10_001, 50_000, 50_000 + 16 * 5] {
            let t = s.tick(now);
            assert!(t.steps <= 5, "{} steps at {now}", t.steps);
        }
    }

    #[test]
    fn next_update_moves_in_whole_steps() {
        let mut s = Scheduler::new(SchedulerConfig::default(), 7);
        for now in [7, 9, 30, 31, 200, 201, 5_000] {
            let before = s.next_update();
            let t = s.tick(now);
            let moved = s.next_update() - before;
            assert_eq!(moved % 16, 0);
            assert_eq!(moved / 16, u64::from(t.steps));
            assert!(t.steps <= 5);
        }
    }

    #[test]
    fn large_jump_leaves_backlog() {
        let mut s = scheduler();
        let t = s.tick(1_000);
        assert_eq!(t.steps, 5);
        assert_eq!(s.next_update(), 80);
        assert_eq!(t.backlog_ms, 920);
        assert_eq!(t.interpolation, 1.0);
    }

    #[test]
    fn elapsed_is_real_time_since_last_pass() {
        let mut s = scheduler();
        assert_eq!(s.tick(5).elapsed_ms, 5);
        assert_eq!(s.tick(5).elapsed_ms, 0);
        assert_eq!(s.tick(1_000).elapsed_ms, 995);
        assert_eq!(s.last_update(), 1_000);
    }

    #[test]
    fn interpolation_tracks_position_in_step() {
        let mut s = scheduler();
        // 4 ms past 0 schedules the step ending at 16.
        let t = s.tick(4);
        assert_eq!(t.steps, 1);
        assert!((t.interpolation - 0.25).abs() < 1e-6);
        let t = s.tick(12);
        assert_eq!(t.steps, 0);
        assert!((t.interpolation - 0.75).abs() < 1e-6);
    }

    #[test]
    fn time_going_backwards_is_clamped() {
        let mut s = scheduler();
        s.tick(50);
        let next = s.next_update();
        let t = s.tick(40);
        assert_eq!(t.steps, 0);
        assert_eq!(t.elapsed_ms, 0);
        assert_eq!(s.current(), 50);
        assert_eq!(s.next_update(), next);
    }
}
