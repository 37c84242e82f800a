//! Fixed-timestep game loop with render interpolation.
//!
//! The loop accumulates real elapsed time and drains it in fixed
//! `seconds_per_update` steps: each step delivers script updates and the
//! caller's update callback. Whatever fraction of a step remains becomes the
//! render callback's interpolation factor, so a renderer can place moving
//! entities between ticks.

use std::time::{Duration, Instant};

use loom_ecs::World;
use loom_script::Event;
use tracing::{debug, info, warn};

use crate::config::Setting;
use crate::script_driver;

/// The application tick loop.
#[derive(Debug)]
pub struct GameLoop {
    setting: Setting,
    tick_id: u64,
}

impl GameLoop {
    /// Create a loop from a [`Setting`].
    #[must_use]
    pub fn new(setting: Setting) -> Self {
        Self {
            setting,
            tick_id: 0,
        }
    }

    /// Returns the number of simulation ticks run so far.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Run the loop until an [`Event::Quit`] arrives or `max_ticks`
    /// simulation ticks have executed.
    ///
    /// - `poll` supplies this frame's input events; each is forwarded to
    ///   every scripted entity, and `Quit` ends the run after the frame.
    /// - `update` runs after script updates on every fixed tick.
    /// - `render` runs once per frame with the interpolation factor in
    ///   `0.0..=1.0` (only a tick-bounded final frame can reach 1.0).
    pub fn run<P, U, R>(&mut self, world: &mut World, mut poll: P, mut update: U, mut render: R)
    where
        P: FnMut(&mut World) -> Vec<Event>,
        U: FnMut(&mut World, f32),
        R: FnMut(&mut World, f32),
    {
        let tick = Duration::from_secs_f32(self.setting.seconds_per_update);
        let dt = self.setting.seconds_per_update;
        let mut previous = Instant::now();
        let mut lag = Duration::ZERO;
        let mut quit = false;
        let mut ticks_this_run = 0u64;

        info!(
            title = %self.setting.title,
            seconds_per_update = f64::from(dt),
            max_ticks = self.setting.max_ticks,
            "starting game loop"
        );

        while !quit {
            let now = Instant::now();
            lag += now - previous;
            previous = now;

            for event in poll(world) {
                if event == Event::Quit {
                    quit = true;
                } else {
                    script_driver::dispatch_event(world, &event);
                }
            }

            while lag >= tick {
                lag -= tick;
                script_driver::dispatch_update(world, dt);
                update(world, dt);
                self.tick_id += 1;
                ticks_this_run += 1;

                if self.setting.max_ticks > 0 && ticks_this_run >= self.setting.max_ticks {
                    quit = true;
                    break;
                }
            }

            // Leftover lag past a full tick only happens when max_ticks cut
            // the update loop short; the factor stays meaningful clamped.
            let alpha = (lag.as_secs_f32() / tick.as_secs_f32()).min(1.0);
            render(world, alpha);

            let elapsed = previous.elapsed();
            if elapsed < tick {
                std::thread::sleep(tick - elapsed);
            } else if !quit {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick.as_millis() as u64,
                    "frame exceeded tick budget"
                );
            }
        }

        debug!(tick_id = self.tick_id, "game loop stopped");
    }
}
