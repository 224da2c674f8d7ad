use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ratatui::layout::Rect;

use grab_handles::app::{DemoApp, DemoConfig};
use grab_handles::config::ConfigError;
use grab_handles::constants::{DEFAULT_HANDLE_HEIGHT, DEFAULT_HANDLE_WIDTH, FADE_MSEC};
use grab_handles::drivers::InputDriver;
use grab_handles::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use grab_handles::event_loop::{ControlFlow, EventLoop};
use grab_handles::tracing_sub;

/// How long the loop blocks on input while no fade is running.
const IDLE_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(
    name = "grab-handles",
    version = env!("CARGO_PKG_VERSION"),
    about = "Move and resize a window through its grab handles"
)]
struct Cli {
    /// Duration of a complete handle fade.
    #[arg(long = "fade-ms", value_name = "MS", default_value_t = FADE_MSEC)]
    fade_ms: u32,

    /// Handle width in cells.
    #[arg(long = "handle-width", value_name = "CELLS", default_value_t = DEFAULT_HANDLE_WIDTH)]
    handle_width: u32,

    /// Handle height in cells.
    #[arg(long = "handle-height", value_name = "CELLS", default_value_t = DEFAULT_HANDLE_HEIGHT)]
    handle_height: u32,

    /// Frame rate while a fade is running.
    #[arg(short = 'f', long = "fps", value_name = "FPS", default_value_t = 60)]
    fps: u32,

    /// Append trace output to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl TryFrom<&Cli> for DemoConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        DemoConfig::new(cli.fade_ms, cli.handle_width, cli.handle_height, cli.fps)
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = DemoConfig::try_from(&cli).map_err(io::Error::other)?;
    tracing_sub::init(cli.log_file.as_deref())?;

    let (width, height) = crossterm::terminal::size()?;
    let mut app = DemoApp::new(config, Rect::new(0, 0, width, height));

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut input = ConsoleInputDriver::new();
    input.set_mouse_capture(true)?;

    let mut event_loop = EventLoop::new(input, app.frame_interval(), IDLE_INTERVAL);
    let result = event_loop.run(|_driver, event, elapsed| {
        let flow = match event {
            Some(event) => app.handle_event(&event),
            None => ControlFlow::Continue,
        };
        let animating = app.tick(elapsed);
        if app.take_redraw() {
            output.draw(|frame| app.render(frame))?;
        }
        Ok((flow, animating))
    });

    output.exit()?;
    result
}
