//! Adaptive frame sampling.
//!
//! The sampler bounds the total number of sampled frames regardless of video
//! length while never dropping below a quality floor:
//! `rate = clamp(frame_cap / duration, rate_floor, native_ceiling)`.

/// Sampling bounds for one extraction run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBudget {
    /// Upper bound on sampled frames across the whole video.
    pub frame_cap: u32,
    /// Minimum sampling rate in frames per second.
    pub rate_floor: f64,
}

impl Default for FrameBudget {
    fn default() -> Self {
        Self {
            frame_cap: 600,
            rate_floor: 30.0,
        }
    }
}

/// The adaptive sampling rate chosen for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRate(f64);

impl SampleRate {
    /// Compute the adaptive rate for a video of `duration` seconds.
    ///
    /// The native rate of the source is the ceiling; when it sits below the
    /// floor, the floor wins so the quality bound holds.
    pub fn adaptive(duration: f64, budget: FrameBudget, native_ceiling: f64) -> Self {
        let ceiling = native_ceiling.max(budget.rate_floor);
        let raw = if duration > 0.0 {
            budget.frame_cap as f64 / duration
        } else {
            ceiling
        };
        Self(raw.clamp(budget.rate_floor, ceiling))
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        self.0
    }
}

/// Deterministic timestamp generator for one run.
#[derive(Debug, Clone, Copy)]
pub struct FrameSampler {
    rate: SampleRate,
}

impl FrameSampler {
    pub fn new(rate: SampleRate) -> Self {
        Self { rate }
    }

    /// Sampling rate in effect.
    pub fn rate(&self) -> SampleRate {
        self.rate
    }

    /// Number of samples for a video of `duration` seconds:
    /// `floor(duration * rate)`.
    pub fn sample_count(&self, duration: f64) -> u32 {
        (duration.max(0.0) * self.rate.fps()).floor() as u32
    }

    /// The sampled timestamps, `i / rate` for each sample ordinal.
    ///
    /// The ordinal doubles as the canonical frame index of the sample.
    pub fn timestamps(&self, duration: f64) -> Vec<f64> {
        let count = self.sample_count(duration);
        let fps = self.rate.fps();
        (0..count).map(|i| i as f64 / fps).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> FrameBudget {
        FrameBudget {
            frame_cap: 600,
            rate_floor: 30.0,
        }
    }

    #[test]
    fn test_scenario_a_short_video_hits_cap() {
        // 10s video, cap 600, floor 30, native 120 -> rate 60, 600 samples.
        let rate = SampleRate::adaptive(10.0, budget(), 120.0);
        assert!((rate.fps() - 60.0).abs() < 1e-9);

        let sampler = FrameSampler::new(rate);
        assert_eq!(sampler.sample_count(10.0), 600);
    }

    #[test]
    fn test_scenario_b_long_video_floor_enforced() {
        // 40s video: raw 600/40 = 15 sits below the floor, so 30 wins.
        let rate = SampleRate::adaptive(40.0, budget(), 120.0);
        assert!((rate.fps() - 30.0).abs() < 1e-9);

        // The floor means the cap is exceeded by design: quality over budget.
        let sampler = FrameSampler::new(rate);
        assert_eq!(sampler.sample_count(40.0), 1200);
    }

    #[test]
    fn test_native_ceiling_bounds_rate() {
        // 5s video wants 120/s but the source only has 30.
        let rate = SampleRate::adaptive(5.0, budget(), 30.0);
        assert!((rate.fps() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_never_below_floor() {
        for duration in [1.0, 5.0, 20.0, 60.0, 300.0] {
            let rate = SampleRate::adaptive(duration, budget(), 60.0);
            assert!(rate.fps() >= 30.0 - 1e-9, "floor violated at {duration}s");
        }
    }

    #[test]
    fn test_sample_count_is_floor_of_duration_times_rate() {
        let rate = SampleRate::adaptive(10.5, budget(), 60.0);
        let sampler = FrameSampler::new(rate);
        let expected = (10.5 * rate.fps()).floor() as u32;
        assert_eq!(sampler.sample_count(10.5), expected);
        assert_eq!(sampler.timestamps(10.5).len() as u32, expected);
    }

    #[test]
    fn test_timestamps_are_deterministic_and_ordered() {
        let sampler = FrameSampler::new(SampleRate::adaptive(4.0, budget(), 60.0));
        let a = sampler.timestamps(4.0);
        let b = sampler.timestamps(4.0);
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(a[0], 0.0);
    }
}
