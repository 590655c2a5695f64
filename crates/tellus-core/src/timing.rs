use crate::constants::MAX_TICK_SECS;

/// Per-tick elapsed time plus a rolling window of recent frame durations.
///
/// The window grows until it holds `capacity` samples, then overwrites the
/// oldest entry. It is never reset. The window keeps true durations; the
/// elapsed time handed to the tick is capped at [`MAX_TICK_SECS`].
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last_timestamp_ms: Option<f64>,
    elapsed_secs: f32,
    durations_ms: Vec<f64>,
    next_slot: usize,
    capacity: usize,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            last_timestamp_ms: None,
            elapsed_secs: 0.0,
            durations_ms: Vec::with_capacity(capacity),
            next_slot: 0,
            capacity,
        }
    }

    /// Advance to `timestamp_ms` and return seconds since the previous call,
    /// capped so a slow frame or a backgrounded tab never yields a large step.
    /// The first call returns 0 and records nothing.
    pub fn record(&mut self, timestamp_ms: f64) -> f32 {
        let Some(last) = self.last_timestamp_ms.replace(timestamp_ms) else {
            self.elapsed_secs = 0.0;
            return 0.0;
        };
        let delta_ms = (timestamp_ms - last).max(0.0);

        if self.durations_ms.len() < self.capacity {
            self.durations_ms.push(delta_ms);
        } else {
            self.durations_ms[self.next_slot] = delta_ms;
        }
        self.next_slot = (self.next_slot + 1) % self.capacity;

        self.elapsed_secs = ((delta_ms / 1000.0) as f32).min(MAX_TICK_SECS);
        self.elapsed_secs
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    pub fn sample_count(&self) -> usize {
        self.durations_ms.len()
    }

    pub fn average_frame_time_ms(&self) -> f64 {
        if self.durations_ms.is_empty() {
            return 0.0;
        }
        self.durations_ms.iter().sum::<f64>() / self.durations_ms.len() as f64
    }

    pub fn fps(&self) -> f64 {
        let avg = self.average_frame_time_ms();
        if avg > 0.0 {
            1000.0 / avg
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_record_is_zero() {
        let mut timer = FrameTimer::new(4);
        assert_eq!(timer.record(1234.0), 0.0);
        assert_eq!(timer.sample_count(), 0);
        assert_eq!(timer.fps(), 0.0);
    }

    #[test]
    fn test_elapsed_seconds() {
        let mut timer = FrameTimer::new(4);
        timer.record(0.0);
        let elapsed = timer.record(16.0);
        assert!((elapsed - 0.016).abs() < 1e-6, "elapsed {elapsed}");
        assert_eq!(timer.elapsed_secs(), elapsed);
    }

    #[test]
    fn test_window_grows_then_wraps() {
        let mut timer = FrameTimer::new(3);
        let mut t = 0.0;
        timer.record(t);
        for delta in [10.0, 20.0, 30.0] {
            t += delta;
            timer.record(t);
        }
        assert_eq!(timer.sample_count(), 3);
        assert!((timer.average_frame_time_ms() - 20.0).abs() < 1e-9);

        // Overwrites the oldest (10 ms) sample.
        t += 40.0;
        timer.record(t);
        assert_eq!(timer.sample_count(), 3);
        assert!((timer.average_frame_time_ms() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_fps_from_average() {
        let mut timer = FrameTimer::new(10);
        timer.record(0.0);
        timer.record(20.0);
        timer.record(40.0);
        assert!((timer.fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_gap_caps_elapsed_but_keeps_duration() {
        let mut timer = FrameTimer::new(4);
        timer.record(0.0);
        let elapsed = timer.record(120.0);
        assert_eq!(elapsed, MAX_TICK_SECS);
        assert!((timer.average_frame_time_ms() - 120.0).abs() < 1e-9);

        // Every frame slow: each tick still gets a bounded step.
        for i in 2..6 {
            assert_eq!(timer.record(120.0 * i as f64), MAX_TICK_SECS);
        }
    }

    #[test]
    fn test_backwards_timestamp_clamps() {
        let mut timer = FrameTimer::new(2);
        timer.record(100.0);
        assert_eq!(timer.record(50.0), 0.0);
    }
}
