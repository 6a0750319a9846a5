/// Frame clock with pause, single-step and time dilation.
///
/// The clock never reads wall time itself: the owner feeds it a real
/// (or parent) delta through [`Clock::advance`] once per frame.
#[derive(Debug, Clone)]
pub struct Clock {
    total_seconds: f64,
    delta_seconds: f64,
    frame_count: u64,
    time_scale: f64,
    paused: bool,
    /// Set by `step_single_frame`: run exactly one advance, then re-pause.
    step_pending: bool,
    max_delta_seconds: f64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Default clamp for a single frame's delta.
    pub const DEFAULT_MAX_DELTA_SECONDS: f64 = 0.1;

    pub fn new() -> Self {
        Self::with_max_delta(Self::DEFAULT_MAX_DELTA_SECONDS)
    }

    pub fn with_max_delta(max_delta_seconds: f64) -> Self {
        Self {
            total_seconds: 0.0,
            delta_seconds: 0.0,
            frame_count: 0,
            time_scale: 1.0,
            paused: false,
            step_pending: false,
            max_delta_seconds,
        }
    }

    /// Advance by `delta_seconds` of parent time.
    ///
    /// The delta is clamped to `0..=max_delta`, zeroed while paused, then
    /// multiplied by the time scale.
    pub fn advance(&mut self, delta_seconds: f64) {
        let mut dt = delta_seconds.clamp(0.0, self.max_delta_seconds);
        if self.paused {
            dt = 0.0;
        }
        dt *= self.time_scale;

        if self.step_pending {
            self.step_pending = false;
            self.paused = true;
        }

        self.delta_seconds = dt;
        self.total_seconds += dt;
        self.frame_count += 1;
    }

    /// Restore the freshly constructed state, keeping the delta clamp.
    pub fn reset(&mut self) {
        *self = Self::with_max_delta(self.max_delta_seconds);
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
        self.step_pending = false;
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.unpause();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Let exactly one upcoming `advance` run, then pause again.
    pub fn step_single_frame(&mut self) {
        self.step_pending = true;
        self.paused = false;
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.time_scale = time_scale.max(0.0);
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn delta_seconds(&self) -> f64 {
        self.delta_seconds
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_seconds
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second implied by the last delta, or 0 when stopped.
    pub fn frame_rate(&self) -> f64 {
        if self.delta_seconds > 0.0 {
            1.0 / self.delta_seconds
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero() {
        let c = Clock::new();
        assert_eq!(c.total_seconds(), 0.0);
        assert_eq!(c.delta_seconds(), 0.0);
        assert_eq!(c.frame_count(), 0);
        assert_eq!(c.time_scale(), 1.0);
        assert!(!c.is_paused());
    }

    #[test]
    fn advance_accumulates() {
        let mut c = Clock::new();
        c.advance(0.016);
        c.advance(0.016);
        assert!((c.total_seconds() - 0.032).abs() < 1e-12);
        assert_eq!(c.frame_count(), 2);
    }

    #[test]
    fn delta_is_clamped() {
        let mut c = Clock::new();
        c.advance(5.0);
        assert_eq!(c.delta_seconds(), Clock::DEFAULT_MAX_DELTA_SECONDS);
        c.advance(-1.0);
        assert_eq!(c.delta_seconds(), 0.0);
    }

    #[test]
    fn paused_clock_reports_zero_delta() {
        let mut c = Clock::new();
        c.pause();
        c.advance(0.05);
        assert_eq!(c.delta_seconds(), 0.0);
        assert_eq!(c.total_seconds(), 0.0);
        // Frames still count while paused.
        assert_eq!(c.frame_count(), 1);
        assert_eq!(c.frame_rate(), 0.0);
    }

    #[test]
    fn time_scale_dilates_delta() {
        let mut c = Clock::new();
        c.set_time_scale(0.1);
        c.advance(0.05);
        assert!((c.delta_seconds() - 0.005).abs() < 1e-12);
    }

    #[test]
    fn single_step_runs_one_frame_then_pauses() {
        let mut c = Clock::new();
        c.pause();
        c.step_single_frame();
        c.advance(0.02);
        assert!((c.delta_seconds() - 0.02).abs() < 1e-12);
        assert!(c.is_paused());
        c.advance(0.02);
        assert_eq!(c.delta_seconds(), 0.0);
    }

    #[test]
    fn toggle_pause_round_trip() {
        let mut c = Clock::new();
        c.toggle_pause();
        assert!(c.is_paused());
        c.toggle_pause();
        assert!(!c.is_paused());
    }

    #[test]
    fn reset_keeps_clamp() {
        let mut c = Clock::with_max_delta(0.5);
        c.advance(0.4);
        c.set_time_scale(3.0);
        c.reset();
        assert_eq!(c.total_seconds(), 0.0);
        assert_eq!(c.time_scale(), 1.0);
        c.advance(1.0);
        assert_eq!(c.delta_seconds(), 0.5);
    }
}
