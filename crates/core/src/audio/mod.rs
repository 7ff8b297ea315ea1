use std::path::Path;

use crate::Result;

/// Plays one clip at a time and returns only once it has finished.
pub trait ClipPlayer: Send {
    fn play_to_end(&mut self, clip: &Path) -> Result<()>;
}

/// Discards every clip. Used when the toy runs muted.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl ClipPlayer for SilentPlayer {
    fn play_to_end(&mut self, clip: &Path) -> Result<()> {
        tracing::debug!(path = %clip.display(), "muted, skipping clip");
        Ok(())
    }
}

#[cfg(feature = "playback")]
pub use rodio_player::RodioPlayer;

#[cfg(feature = "playback")]
mod rodio_player {
    use std::{fs::File, io::BufReader, path::Path};

    use tracing::debug;

    use super::ClipPlayer;
    use crate::{AbcDeckError, Result};

    /// Plays wav clips on the default output device.
    ///
    /// The output stream is opened per clip and dropped once the sink has
    /// drained, so nothing device-bound outlives a single call.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct RodioPlayer;

    impl RodioPlayer {
        pub fn new() -> Self {
            Self
        }
    }

    impl ClipPlayer for RodioPlayer {
        fn play_to_end(&mut self, clip: &Path) -> Result<()> {
            let file = File::open(clip)?;
            let source = rodio::Decoder::new(BufReader::new(file)).map_err(|err| {
                AbcDeckError::audio(format!("cannot decode `{}`: {err}", clip.display()))
            })?;

            let mut stream = rodio::OutputStreamBuilder::open_default_stream()
                .map_err(|err| AbcDeckError::audio(format!("no output device: {err}")))?;
            stream.log_on_drop(false);

            debug!(path = %clip.display(), "playing clip");
            let sink = rodio::Sink::connect_new(stream.mixer());
            sink.append(source);
            sink.sleep_until_end();
            debug!(path = %clip.display(), "clip finished");
            Ok(())
        }
    }
}
