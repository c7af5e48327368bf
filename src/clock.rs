//! Frame clock.
//!
//! Every animated value in the scene (portal swirl, firefly bobbing, grass wind,
//! axe chopping and the camera orbit) is a pure function of the seconds elapsed
//! since the clock was started, so a single [`Clock`] lives in the
//! [`Context`](crate::context::Context) and is sampled once per frame.

use instant::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Clock {
    start: Instant,
    last: Instant,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Seconds since the clock was created.
    pub fn elapsed_time(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Time since the previous call (or since creation on the first call).
    pub fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        dt
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
