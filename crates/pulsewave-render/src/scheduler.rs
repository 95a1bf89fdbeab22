//! Frame pacing and cache sweep cadence
//!
//! The host calls in on every display refresh. The scheduler decides which of
//! those calls become rendered frames and when the resource cache is swept.

use tracing::{debug, trace};

/// Pacing configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    /// Upper bound on rendered frames per second
    pub target_fps: f64,
    /// Minimum time between cache sweeps
    pub sweep_interval_ms: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            sweep_interval_ms: 5000.0,
        }
    }
}

impl SchedulerConfig {
    /// Minimum time between rendered frames
    pub fn frame_interval_ms(&self) -> f64 {
        if self.target_fps > 0.0 && self.target_fps.is_finite() {
            1000.0 / self.target_fps
        } else {
            0.0
        }
    }
}

/// Frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Ticks that rendered
    pub rendered: u64,
    /// Ticks dropped by pacing
    pub skipped: u64,
    /// Cache sweeps triggered
    pub sweeps: u64,
}

/// Decides which ticks render and when to sweep
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    config: SchedulerConfig,
    last_frame_ms: Option<f64>,
    last_sweep_ms: Option<f64>,
    stats: SchedulerStats,
}

impl FrameScheduler {
    /// Create a scheduler
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Whether the tick at `timestamp_ms` should render
    ///
    /// The first tick always renders. A timestamp earlier than the last
    /// rendered frame means the host clock restarted; pacing restarts with it.
    /// Non-finite timestamps are skipped.
    pub fn begin_frame(&mut self, timestamp_ms: f64) -> bool {
        if !timestamp_ms.is_finite() {
            self.stats.skipped += 1;
            trace!("Skipping tick with non-finite timestamp {}", timestamp_ms);
            return false;
        }

        if let Some(last) = self.last_frame_ms {
            let elapsed = timestamp_ms - last;
            if elapsed < 0.0 {
                debug!(
                    "Host clock went backwards ({:.1} -> {:.1}), restarting pacing",
                    last, timestamp_ms
                );
                self.last_sweep_ms = None;
            } else if elapsed < self.config.frame_interval_ms() {
                self.stats.skipped += 1;
                trace!(
                    "Skipping tick at {:.1}ms ({:.2}ms since last frame)",
                    timestamp_ms,
                    elapsed
                );
                return false;
            }
        }

        self.last_frame_ms = Some(timestamp_ms);
        self.stats.rendered += 1;
        true
    }

    /// Whether `timestamp_ms` lies before the last rendered frame
    pub fn is_clock_restart(&self, timestamp_ms: f64) -> bool {
        self.last_frame_ms.is_some_and(|last| timestamp_ms < last)
    }

    /// Whether a cache sweep is due after the frame at `timestamp_ms`
    ///
    /// Sweeps run at most once per configured interval, the first one a full
    /// interval after the first check.
    pub fn sweep_due(&mut self, timestamp_ms: f64) -> bool {
        match self.last_sweep_ms {
            Some(last) if timestamp_ms - last >= self.config.sweep_interval_ms => {
                self.last_sweep_ms = Some(timestamp_ms);
                self.stats.sweeps += 1;
                true
            }
            Some(last) if timestamp_ms < last => {
                self.last_sweep_ms = Some(timestamp_ms);
                false
            }
            Some(_) => false,
            None => {
                self.last_sweep_ms = Some(timestamp_ms);
                false
            }
        }
    }

    /// Forget the pacing history; the next tick renders unconditionally
    pub fn reset(&mut self) {
        self.last_frame_ms = None;
    }

    /// Counters since creation
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Active configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
