//! Frame counter shown in the HUD

use bevy::prelude::*;

use crate::constants::FPS_WINDOW_SECS;

/// Counts frames and publishes the count once more than a window has passed
#[derive(Resource, Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    window_start: Option<f64>,
    /// Last published value (frames in the last window)
    pub fps: u32,
}

impl FpsCounter {
    /// Record one frame at `now_secs`. Returns the new value when one is published.
    pub fn tick(&mut self, now_secs: f64) -> Option<u32> {
        let start = *self.window_start.get_or_insert(now_secs);
        self.frames += 1;

        if now_secs - start > FPS_WINDOW_SECS {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = Some(now_secs);
            Some(self.fps)
        } else {
            None
        }
    }
}

pub fn count_frames(mut counter: ResMut<FpsCounter>, time: Res<Time>) {
    counter.tick(time.elapsed_secs_f64());
}
