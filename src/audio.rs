//! Sound effects.
//!
//! Each [`Sound`] is a short sequence of [`Tone`]s synthesized on the fly, so
//! no sample files ship with the binary. [`ToneEngine`] plays them through
//! `rodio`; [`BellPlayer`] is the fallback when no output device opens.

use std::io::{self, Write};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Startup,
    Click,
    Error,
}

/// One sine note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub duration: Duration,
}

const fn tone(frequency: f32, millis: u64) -> Tone {
    Tone {
        frequency,
        duration: Duration::from_millis(millis),
    }
}

// Rising major arpeggio.
const STARTUP: [Tone; 4] = [
    tone(523.25, 110),
    tone(659.25, 110),
    tone(783.99, 110),
    tone(1046.5, 260),
];
const CLICK: [Tone; 1] = [tone(1760.0, 18)];
const ERROR: [Tone; 2] = [tone(220.0, 140), tone(174.61, 220)];

const VOLUME: f32 = 0.2;

impl Sound {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Sound::Startup => &STARTUP,
            Sound::Click => &CLICK,
            Sound::Error => &ERROR,
        }
    }
}

pub trait SoundPlayer: std::fmt::Debug {
    fn play(&mut self, sound: Sound);
}

/// Synthesizes each sound's tones on the default output device.
///
/// The output stream stops when this value is dropped, so it has to live as
/// long as the shell.
#[cfg(feature = "audio")]
pub struct ToneEngine {
    _stream: rodio::OutputStream,
    handle: rodio::OutputStreamHandle,
}

#[cfg(feature = "audio")]
impl ToneEngine {
    pub fn open() -> Result<Self, rodio::StreamError> {
        let (stream, handle) = rodio::OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

#[cfg(feature = "audio")]
impl std::fmt::Debug for ToneEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneEngine").finish_non_exhaustive()
    }
}

#[cfg(feature = "audio")]
impl SoundPlayer for ToneEngine {
    fn play(&mut self, sound: Sound) {
        use rodio::Source;
        use rodio::source::SineWave;

        let sink = match rodio::Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(err) => {
                tracing::debug!(?sound, %err, "audio sink unavailable");
                return;
            }
        };
        for note in sound.tones() {
            sink.append(
                SineWave::new(note.frequency)
                    .take_duration(note.duration)
                    .amplify(VOLUME),
            );
        }
        sink.detach();
    }
}

/// Plays sounds with the terminal bell. The terminal has a single tone, so
/// a sound rings once per note.
#[derive(Debug, Default)]
pub struct BellPlayer;

impl SoundPlayer for BellPlayer {
    fn play(&mut self, sound: Sound) {
        let mut out = io::stdout();
        for _ in sound.tones() {
            if let Err(err) = out.write_all(b"\x07") {
                tracing::debug!(?sound, %err, "bell unavailable");
                return;
            }
        }
        if let Err(err) = out.flush() {
            tracing::debug!(?sound, %err, "bell flush failed");
        }
    }
}

/// The best player available: synthesized tones on the default output
/// device, or the terminal bell when none opens.
pub fn open_player() -> Box<dyn SoundPlayer> {
    #[cfg(feature = "audio")]
    match ToneEngine::open() {
        Ok(engine) => {
            tracing::debug!("audio output opened");
            return Box::new(engine);
        }
        Err(err) => tracing::warn!(%err, "no audio output, using terminal bell"),
    }
    Box::new(BellPlayer)
}

/// Gate in front of a player honouring the sound-enabled setting.
#[derive(Debug)]
pub struct Audio {
    enabled: bool,
    player: Box<dyn SoundPlayer>,
}

impl Audio {
    pub fn new(enabled: bool, player: Box<dyn SoundPlayer>) -> Self {
        Self { enabled, player }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn play(&mut self, sound: Sound) {
        if !self.enabled {
            return;
        }
        tracing::trace!(?sound, "play");
        self.player.play(sound);
    }
}
