use std::time::Instant;

/// Frame metadata - frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the clock started
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

/// Infinite iterator yielding one [`FrameInfo`] per display refresh
#[derive(Debug)]
pub struct FrameClock {
    frame_number: u64,
    start: Instant,
    last_tick: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            start: now,
            last_tick: now,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameClock {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let now = Instant::now();
        let info = FrameInfo {
            number: self.frame_number,
            time: now.duration_since(self.start).as_secs_f32(),
            delta: now.duration_since(self.last_tick).as_secs_f32(),
        };

        self.frame_number += 1;
        self.last_tick = now;
        Some(info)
    }
}

/// Frames-per-second over fixed reporting windows
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    interval: f32,
    elapsed: f32,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Count a frame; yields the new rate whenever a window closes
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed < self.interval {
            return None;
        }

        self.fps = self.frames as f32 / self.elapsed;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(self.fps)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn clock_numbers_frames() {
        let mut clock = FrameClock::new();
        let first = clock.next().unwrap();
        let second = clock.next().unwrap();

        assert_eq!(first.number, 0);
        assert_eq!(second.number, 1);
        assert_eq!(clock.frame_number(), 2);
        assert!(second.time >= first.time);
    }

    #[test]
    fn clock_measures_delta() {
        let mut clock = FrameClock::new();
        clock.next();

        thread::sleep(Duration::from_millis(10));
        let frame = clock.next().unwrap();

        assert!(frame.delta >= 0.009);
    }

    #[test]
    fn fps_reports_once_per_window() {
        let mut counter = FpsCounter::new(1.0);
        for _ in 0..3 {
            assert_eq!(counter.tick(0.25), None);
        }
        assert_eq!(counter.tick(0.25), Some(4.0));
        assert_eq!(counter.fps(), 4.0);
        assert_eq!(counter.tick(0.25), None);
    }
}
