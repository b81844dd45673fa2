use crate::clock::Clock;

/// One frame's worth of work, driven by `tick` once per redraw.
pub trait FrameDriver {
    /// Advances camera controls, returns whether the camera moved.
    fn update_controls(&mut self) -> bool;

    fn render(&mut self, elapsed: f32) -> anyhow::Result<()>;

    /// Schedules the next `tick`. The loop has no stop state of its own.
    fn request_next_frame(&mut self);
}

/// Runs a single frame: controls, then render, then reschedule. A failed
/// render is logged and the next frame is still requested.
pub fn tick(driver: &mut impl FrameDriver, clock: &Clock) -> f32 {
    let elapsed = clock.elapsed_secs();

    if driver.update_controls() {
        log::trace!("Camera moved at {:.3}s", elapsed);
    }

    if let Err(e) = driver.render(elapsed) {
        log::error!("Frame failed: {:#}", e);
    }

    driver.request_next_frame();

    elapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingDriver {
        calls: Vec<&'static str>,
        fail_render: bool,
        last_elapsed: f32,
    }

    impl FrameDriver for RecordingDriver {
        fn update_controls(&mut self) -> bool {
            self.calls.push("controls");
            false
        }

        fn render(&mut self, elapsed: f32) -> anyhow::Result<()> {
            self.calls.push("render");
            self.last_elapsed = elapsed;
            if self.fail_render {
                anyhow::bail!("surface lost");
            }
            Ok(())
        }

        fn request_next_frame(&mut self) {
            self.calls.push("next");
        }
    }

    #[test]
    fn each_frame_updates_renders_and_reschedules_once() {
        let clock = Clock::start();
        let mut driver = RecordingDriver::default();

        for _ in 0..3 {
            tick(&mut driver, &clock);
        }

        assert_eq!(
            driver.calls,
            ["controls", "render", "next"].repeat(3),
        );
    }

    #[test]
    fn render_errors_do_not_stop_the_loop() {
        let clock = Clock::start();
        let mut driver = RecordingDriver {
            fail_render: true,
            ..Default::default()
        };

        tick(&mut driver, &clock);
        tick(&mut driver, &clock);

        assert_eq!(driver.calls.iter().filter(|call| **call == "next").count(), 2);
    }

    #[test]
    fn elapsed_time_is_monotonic_across_frames() {
        let clock = Clock::start();
        let mut driver = RecordingDriver::default();

        let first = tick(&mut driver, &clock);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = tick(&mut driver, &clock);

        assert!(second > first);
        assert_eq!(driver.last_elapsed, second);
    }
}
