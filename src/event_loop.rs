use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// The frame loop of the front-end.
///
/// Input events are drained as they arrive. Between events the handler is
/// called with `None`. Every call carries the time elapsed since the previous
/// call, which is what feeds `GrabHandleGroup::animate`. While nothing animates the loop
/// blocks on input with the long `idle_interval` instead of ticking at the
/// frame rate, so an idle overlay costs no wakeups.
pub struct EventLoop<D> {
    driver: D,
    frame_interval: Duration,
    idle_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, frame_interval: Duration, idle_interval: Duration) -> Self {
        Self {
            driver,
            frame_interval,
            idle_interval,
        }
    }

    /// Runs until the handler returns `ControlFlow::Quit`.
    ///
    /// The handler returns whether it wants another frame soon (an animation
    /// is in progress) alongside the control flow.
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>, Duration) -> io::Result<(ControlFlow, bool)>,
    {
        let mut last_tick = Instant::now();
        let mut elapsed = move || {
            let now = Instant::now();
            let delta = now - last_tick;
            last_tick = now;
            delta
        };
        loop {
            let (flow, wants_frame) = handler(&mut self.driver, None, elapsed())?;
            if let ControlFlow::Quit = flow {
                break;
            }

            let timeout = if wants_frame {
                self.frame_interval
            } else {
                self.idle_interval
            };
            if self.driver.poll(timeout)? {
                // Drain the queue so bursts of mouse motion during a drag do
                // not fall behind the frame loop.
                loop {
                    let event = self.driver.read()?;
                    let (flow, _) = handler(&mut self.driver, Some(event), elapsed())?;
                    if let ControlFlow::Quit = flow {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
