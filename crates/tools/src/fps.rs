/// Counts presented frames and reports a rate once per second.
///
/// Owned by whoever presents frames; two games never share a counter.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    window_start: Option<u64>,
    frames_in_window: u32,
    fps: u32,
    total_frames: u64,
}

impl FpsCounter {
    const WINDOW_MS: u64 = 1000;

    pub fn new() -> Self {
        Self::default()
    }

    /// Record one presented frame at `now_ms`.
    pub fn count_cycle(&mut self, now_ms: u64) {
        self.total_frames += 1;
        let Some(start) = self.window_start else {
            // The first frame only opens the measuring window.
            self.window_start = Some(now_ms);
            return;
        };
        self.frames_in_window += 1;

        let span = now_ms.saturating_sub(start);
        if span >= Self::WINDOW_MS {
            // Scale to a full second in case frames straddled the boundary.
            let rate = u64::from(self.frames_in_window) * Self::WINDOW_MS / span;
            self.fps = u32::try_from(rate).unwrap_or(u32::MAX);
            tracing::debug!(fps = self.fps, "frame rate");
            self.window_start = Some(now_ms);
            self.frames_in_window = 0;
        }
    }

    /// Frames per second over the last complete window; 0 until one has passed.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}
