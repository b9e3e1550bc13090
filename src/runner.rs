use std::io;
use std::time::{Duration, Instant};

use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::shell::Shell;

/// Drive `shell` until it asks to quit.
///
/// Input events are routed as they arrive; idle ticks advance the clock and
/// time-driven applications, then redraw. Terminal modes are restored on
/// every exit path, including errors.
pub fn run_shell<I, O>(
    input: &mut I,
    output: &mut O,
    shell: &mut Shell,
    poll_interval: Duration,
) -> io::Result<()>
where
    I: InputDriver,
    O: OutputDriver,
{
    output.enter()?;
    let result = pump(input, output, shell, poll_interval);
    let restored = output.exit();
    result.and(restored)
}

fn pump<I, O>(
    input: &mut I,
    output: &mut O,
    shell: &mut Shell,
    poll_interval: Duration,
) -> io::Result<()>
where
    I: InputDriver,
    O: OutputDriver,
{
    let mut event_loop = EventLoop::new(input, poll_interval);
    event_loop.driver().set_mouse_capture(true)?;
    event_loop.run(|_, event| {
        let now = Instant::now();
        match event {
            Some(event) => {
                shell.handle_event(&event, now);
            }
            None => {
                shell.tick(now);
                output.draw(|mut frame| shell.render(&mut frame, now))?;
            }
        }
        if shell.should_quit() {
            tracing::info!("leaving desktop");
            return Ok(ControlFlow::Quit);
        }
        Ok(ControlFlow::Continue)
    })
}
