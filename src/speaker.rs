use std::{
    fs::File,
    io::{BufReader, Cursor},
    path::Path,
};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::{error::AudioError, player::Output, tone::Tone};

/// The default output device, via rodio.
///
/// Tones each get a short lived sink so overlapping beeps mix, recordings
/// share a single clip sink so a new adhan cuts off the previous one.
pub struct Speaker {
    stream: OutputStream,
    clip: Option<Sink>,
    tones: Vec<Sink>,
}

impl Speaker {
    pub fn open() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::ContextUnavailable(e.to_string()))?;
        Ok(Self {
            stream,
            clip: None,
            tones: Vec::new(),
        })
    }

    fn start_clip<S>(&mut self, source: S)
    where
        S: Source + Send + 'static,
    {
        self.stop_clip();
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.play();
        self.clip = Some(sink);
    }
}

impl Output for Speaker {
    fn play_tone(&mut self, tone: &Tone) {
        self.tones.retain(|sink| !sink.empty());
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(tone.source());
        self.tones.push(sink);
    }

    fn play_file(&mut self, path: &Path) -> Result<(), AudioError> {
        let file = File::open(path).map_err(|source| AudioError::AssetLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode(e.to_string()))?;
        self.start_clip(decoder);
        Ok(())
    }

    fn play_bytes(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
        let decoder =
            Decoder::new(Cursor::new(bytes)).map_err(|e| AudioError::Decode(e.to_string()))?;
        self.start_clip(decoder);
        Ok(())
    }

    fn stop_clip(&mut self) {
        if let Some(clip) = self.clip.take() {
            clip.stop();
        }
    }

    fn stop_all(&mut self) {
        self.stop_clip();
        for sink in self.tones.drain(..) {
            sink.stop();
        }
    }
}
