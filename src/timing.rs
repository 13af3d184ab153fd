/// Turns variable render-frame durations into a steady count of logical
/// frames, so per-frame movement keeps the same pace on any display.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    frame_duration: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    pub fn from_fps(fps: u32) -> Self {
        let frame_duration = 1.0 / fps.max(1) as f32;
        Self {
            frame_duration,
            accumulator: 0.0,
            max_steps: 5,
        }
    }

    pub fn accumulate(&mut self, delta: f32) {
        self.accumulator += delta.max(0.0);
        // Drop backlog after a stall instead of fast-forwarding through it.
        let cap = self.frame_duration * self.max_steps as f32;
        if self.accumulator > cap {
            self.accumulator = cap;
        }
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.frame_duration {
            self.accumulator -= self.frame_duration;
            true
        } else {
            false
        }
    }
}
