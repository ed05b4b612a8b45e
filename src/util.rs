//! Shared utilities

use std::collections::VecDeque;
use std::time::Instant;

/// HSV to RGB color conversion
/// h: 0-360, s: 0-1, v: 0-1
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let c = v * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r1 + m) * 255.0) as u8,
        ((g1 + m) * 255.0) as u8,
        ((b1 + m) * 255.0) as u8,
    )
}

// ============================================================================
// FPS Counter
// ============================================================================

/// FPS counter with rolling average. Doubles as the frame clock: `tick`
/// returns the delta time the animation accumulates against.
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    /// Create a new FPS counter with specified sample window
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count,
        }
    }

    /// Call at the start of each frame to record timing
    /// Returns (delta_time, average_fps)
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }

        let avg_dt: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        let avg_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        (dt, avg_fps)
    }

    /// Get the average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        let avg_dt: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        avg_dt * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (255, 0, 0));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), (0, 255, 0));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), (0, 0, 255));
    }

    #[test]
    fn test_hsv_grayscale_when_desaturated() {
        let (r, g, b) = hsv_to_rgb(200.0, 0.0, 0.5);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_fps_counter_window() {
        let mut counter = FpsCounter::new(4);
        for _ in 0..10 {
            let (dt, avg_fps) = counter.tick();
            assert!(dt >= 0.0);
            assert!(avg_fps >= 0.0);
        }
        assert!(counter.frame_times.len() <= 4);
        assert!(counter.avg_frame_time_ms() >= 0.0);
    }
}
