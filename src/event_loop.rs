use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Single-threaded message pump for the desktop.
///
/// The loop is the only place that polls the input driver. Every transition
/// triggered by an event runs to completion inside the handler before the
/// next event is read, so handlers never interleave.
///
/// The handler is called with:
/// - `Some(event)` for each input event, draining bursts (drags, typing)
///   before yielding,
/// - `None` once per iteration before polling, which is where the caller
///   redraws and advances clocks.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(&mut self.driver, None)? == ControlFlow::Quit {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                loop {
                    let event = self.driver.read()?;
                    if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Event>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn drains_burst_between_idle_ticks() {
        let driver = Scripted(VecDeque::from([key('a'), key('b')]));
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(1));
        let mut seen = Vec::new();
        event_loop
            .run(|_, event| {
                let idle = event.is_none();
                seen.push(event);
                // quit on the second idle tick
                if idle && seen.iter().filter(|e| e.is_none()).count() == 2 {
                    return Ok(ControlFlow::Quit);
                }
                Ok(ControlFlow::Continue)
            })
            .unwrap();
        assert_eq!(seen, vec![None, Some(key('a')), Some(key('b')), None]);
    }

    #[test]
    fn quit_from_event_stops_immediately() {
        let driver = Scripted(VecDeque::from([key('q'), key('x')]));
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(1));
        let mut count = 0;
        event_loop
            .run(|_, event| {
                count += 1;
                Ok(match event {
                    Some(e) if e == key('q') => ControlFlow::Quit,
                    _ => ControlFlow::Continue,
                })
            })
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(event_loop.driver().0.len(), 1);
    }
}
