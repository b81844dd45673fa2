use std::time::{Duration, Instant};

/// Monotonic time since the demo started. Never reset.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_never_decreases() {
        let clock = Clock::start();
        let first = clock.elapsed();
        std::thread::sleep(Duration::from_millis(2));

        assert!(clock.elapsed() > first);
    }
}
