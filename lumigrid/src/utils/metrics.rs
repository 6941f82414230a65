use std::time::Duration;

use humantime::format_duration;
use log::info;

/// Accumulates per-frame CPU timings and reports a rolling average, so that
/// rebuild hiccups stand out without profiling tooling attached.
#[derive(Debug, Default)]
pub struct FrameProfiler {
    frames: u32,
    elapsed: Duration,
}

impl FrameProfiler {
    const REPORT_EVERY: u32 = 100;

    pub fn record(&mut self, frame_time: Duration) {
        self.frames += 1;
        self.elapsed += frame_time;

        if self.frames == Self::REPORT_EVERY {
            info!(
                "{} frames submitted in {} (avg {} per frame)",
                self.frames,
                format_duration(self.elapsed),
                format_duration(self.elapsed / self.frames),
            );

            self.frames = 0;
            self.elapsed = Duration::ZERO;
        }
    }
}
