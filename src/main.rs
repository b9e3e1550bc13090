use clap::Parser;
use ratatui::layout::Rect;

use term_desktop::audio::{self, Audio, BellPlayer, SoundPlayer};
use term_desktop::config::{Cli, Config};
use term_desktop::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_desktop::error::ShellError;
use term_desktop::runner::run_shell;
use term_desktop::shell::Shell;
use term_desktop::tracing_sub;

fn main() -> Result<(), ShellError> {
    let cli = Cli::parse();
    let config = Config::try_from(&cli)?;
    tracing_sub::init(&config.log_target, config.log_level)?;
    tracing::info!(?config, "configuration loaded");

    let (width, height) = crossterm::terminal::size()?;
    let player: Box<dyn SoundPlayer> = if config.sound {
        audio::open_player()
    } else {
        Box::new(BellPlayer)
    };
    let audio = Audio::new(config.sound, player);
    let mut shell = Shell::new(Rect::new(0, 0, width, height), audio);
    shell.boot(&config.open);

    let mut input = ConsoleInputDriver::new();
    let mut output = ConsoleOutputDriver::new()?;
    run_shell(&mut input, &mut output, &mut shell, config.poll_interval)?;
    Ok(())
}
