//! Canonical-index synchronization and transport control.
//!
//! Two independently captured sequences are aligned by converting the play
//! head to a canonical frame index using the declared nominal rendering
//! rate, never either sequence's own capture rate.

/// Convert a play-head time to the canonical frame index.
pub fn canonical_index(time: f64, canonical_fps: f64) -> u32 {
    if canonical_fps <= 0.0 || time <= 0.0 {
        return 0;
    }
    (time * canonical_fps).floor() as u32
}

/// Play-head state machine: play/pause, seek, frame stepping.
///
/// Pure state transitions on the play head; rendering reads `time()` once
/// per tick and is otherwise decoupled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    duration: f64,
    canonical_fps: f64,
    time: f64,
    playing: bool,
}

impl Transport {
    pub fn new(duration: f64, canonical_fps: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            canonical_fps,
            time: 0.0,
            playing: false,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Canonical index of the current play-head position.
    pub fn current_index(&self) -> u32 {
        canonical_index(self.time, self.canonical_fps)
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// Seek to an absolute time, clamped to the clip bounds.
    pub fn seek_to(&mut self, time: f64) {
        self.time = time.clamp(0.0, self.duration);
    }

    /// Step by `frames` canonical frames (negative steps backwards).
    pub fn step(&mut self, frames: i32) {
        if self.canonical_fps <= 0.0 {
            return;
        }
        let delta = frames as f64 / self.canonical_fps;
        self.seek_to(self.time + delta);
        self.playing = false;
    }

    /// Advance the play head by wall-clock `dt` while playing.
    ///
    /// Pauses automatically at the end of the clip.
    pub fn advance(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        self.seek_to(self.time + dt.max(0.0));
        if self.time >= self.duration {
            self.playing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_index_floors() {
        assert_eq!(canonical_index(0.0, 60.0), 0);
        assert_eq!(canonical_index(0.0166, 60.0), 0);
        assert_eq!(canonical_index(0.0167, 60.0), 1);
        assert_eq!(canonical_index(1.0, 60.0), 60);
        assert_eq!(canonical_index(-1.0, 60.0), 0);
        assert_eq!(canonical_index(1.0, 0.0), 0);
    }

    #[test]
    fn test_seek_clamps() {
        let mut t = Transport::new(10.0, 60.0);
        t.seek_to(4.2);
        assert_eq!(t.time(), 4.2);
        t.seek_to(-3.0);
        assert_eq!(t.time(), 0.0);
        t.seek_to(99.0);
        assert_eq!(t.time(), 10.0);
    }

    #[test]
    fn test_step_is_frames_over_canonical_rate() {
        let mut t = Transport::new(10.0, 60.0);
        t.seek_to(1.0);
        t.step(3);
        assert!((t.time() - (1.0 + 3.0 / 60.0)).abs() < 1e-9);
        t.step(-6);
        assert!((t.time() - (1.0 - 3.0 / 60.0)).abs() < 1e-9);
        assert_eq!(t.current_index(), canonical_index(t.time(), 60.0));
    }

    #[test]
    fn test_step_pauses_playback() {
        let mut t = Transport::new(10.0, 60.0);
        t.play();
        t.step(1);
        assert!(!t.is_playing());
    }

    #[test]
    fn test_advance_only_while_playing() {
        let mut t = Transport::new(2.0, 60.0);
        t.advance(0.5);
        assert_eq!(t.time(), 0.0);

        t.play();
        t.advance(0.5);
        assert_eq!(t.time(), 0.5);

        // Runs off the end and pauses there.
        t.advance(5.0);
        assert_eq!(t.time(), 2.0);
        assert!(!t.is_playing());
    }

    #[test]
    fn test_toggle() {
        let mut t = Transport::new(1.0, 30.0);
        t.toggle();
        assert!(t.is_playing());
        t.toggle();
        assert!(!t.is_playing());
    }
}
