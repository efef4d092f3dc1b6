//! Ambient background sound: one looping track from a fixed set.

use anyhow::Result;
use pomodesk_ipc::SoundStatus;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    #[default]
    Rain,
    Cafe,
}

impl SoundKind {
    pub fn name(self) -> &'static str {
        match self {
            SoundKind::Rain => "rain",
            SoundKind::Cafe => "cafe",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SoundKind::Rain => SoundKind::Cafe,
            SoundKind::Cafe => SoundKind::Rain,
        }
    }
}

impl fmt::Display for SoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SoundKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rain" => Ok(SoundKind::Rain),
            "cafe" => Ok(SoundKind::Cafe),
            other => Err(format!("unknown sound '{}' (expected rain or cafe)", other)),
        }
    }
}

/// Where each track lives on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracks {
    pub rain: PathBuf,
    pub cafe: PathBuf,
}

impl Tracks {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            rain: dir.join("rain.mp3"),
            cafe: dir.join("cafe.mp3"),
        }
    }

    pub fn path(&self, kind: SoundKind) -> &Path {
        match kind {
            SoundKind::Rain => &self.rain,
            SoundKind::Cafe => &self.cafe,
        }
    }
}

/// Something that can loop one audio file.
pub trait AudioBackend {
    fn play_loop(&mut self, track: &Path, volume: f32) -> Result<()>;
    fn set_volume(&mut self, volume: f32);
    fn stop(&mut self);
}

#[cfg(feature = "sound")]
pub type DefaultBackend = rodio_backend::RodioBackend;
#[cfg(not(feature = "sound"))]
pub type DefaultBackend = SilentBackend;

/// Backend for builds without audio output.
#[cfg(not(feature = "sound"))]
#[derive(Debug, Default)]
pub struct SilentBackend;

#[cfg(not(feature = "sound"))]
impl AudioBackend for SilentBackend {
    fn play_loop(&mut self, _track: &Path, _volume: f32) -> Result<()> {
        anyhow::bail!("audio output is not available (built without the `sound` feature)")
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn stop(&mut self) {}
}

#[cfg(feature = "sound")]
mod rodio_backend {
    use super::AudioBackend;
    use anyhow::{Context, Result};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    /// Plays through the default output device. The device is opened on
    /// first use and kept for the life of the backend.
    #[derive(Default)]
    pub struct RodioBackend {
        output: Option<(OutputStream, OutputStreamHandle)>,
        sink: Option<Sink>,
    }

    impl AudioBackend for RodioBackend {
        fn play_loop(&mut self, track: &Path, volume: f32) -> Result<()> {
            self.stop();
            if self.output.is_none() {
                self.output =
                    Some(OutputStream::try_default().context("No audio output device")?);
            }
            let Some((_, handle)) = self.output.as_ref() else {
                anyhow::bail!("No audio output device");
            };

            let file = File::open(track)
                .with_context(|| format!("Failed to open sound file {:?}", track))?;
            let source = Decoder::new(BufReader::new(file))
                .with_context(|| format!("Failed to decode sound file {:?}", track))?
                .repeat_infinite();

            let sink = Sink::try_new(handle).context("Failed to create audio sink")?;
            sink.set_volume(volume);
            sink.append(source);
            self.sink = Some(sink);
            Ok(())
        }

        fn set_volume(&mut self, volume: f32) {
            if let Some(sink) = &self.sink {
                sink.set_volume(volume);
            }
        }

        fn stop(&mut self) {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
        }
    }
}

pub struct SoundPlayer<B> {
    backend: B,
    tracks: Tracks,
    kind: SoundKind,
    volume: f32,
    playing: bool,
}

impl<B: AudioBackend> SoundPlayer<B> {
    pub fn new(backend: B, tracks: Tracks, kind: SoundKind, volume: f32) -> Self {
        Self {
            backend,
            tracks,
            kind,
            volume: clamp_volume(volume).unwrap_or(0.5),
            playing: false,
        }
    }

    pub fn kind(&self) -> SoundKind {
        self.kind
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn status(&self) -> SoundStatus {
        SoundStatus {
            kind: self.kind.name().to_string(),
            volume: self.volume,
            playing: self.playing,
        }
    }

    /// Clamp to `[0.0, 1.0]`; NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        let Some(volume) = clamp_volume(volume) else {
            return;
        };
        self.volume = volume;
        if self.playing {
            self.backend.set_volume(volume);
        }
    }

    /// Switch track, carrying over the playing state.
    pub fn set_kind(&mut self, kind: SoundKind) {
        let was_playing = self.playing;
        if was_playing {
            self.stop();
        }
        self.kind = kind;
        if was_playing {
            self.play();
        }
    }

    /// Returns the new playing flag.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.stop();
        } else {
            self.play();
        }
        self.playing
    }

    pub fn play(&mut self) {
        let track = self.tracks.path(self.kind);
        match self.backend.play_loop(track, self.volume) {
            Ok(()) => {
                info!(kind = %self.kind, "ambient sound playing");
                self.playing = true;
            }
            Err(e) => {
                warn!("Audio play failed: {:#}", e);
                self.playing = false;
            }
        }
    }

    pub fn stop(&mut self) {
        self.backend.stop();
        self.playing = false;
    }
}

fn clamp_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingBackend {
        fail: bool,
        playing: Option<(PathBuf, f32)>,
        plays: u32,
    }

    impl AudioBackend for RecordingBackend {
        fn play_loop(&mut self, track: &Path, volume: f32) -> Result<()> {
            if self.fail {
                anyhow::bail!("device busy");
            }
            self.plays += 1;
            self.playing = Some((track.to_path_buf(), volume));
            Ok(())
        }

        fn set_volume(&mut self, volume: f32) {
            if let Some((_, v)) = self.playing.as_mut() {
                *v = volume;
            }
        }

        fn stop(&mut self) {
            self.playing = None;
        }
    }

    fn player(backend: RecordingBackend) -> SoundPlayer<RecordingBackend> {
        SoundPlayer::new(
            backend,
            Tracks::in_dir(Path::new("/sounds")),
            SoundKind::Rain,
            0.5,
        )
    }

    #[test]
    fn toggle_plays_and_stops() {
        let mut player = player(RecordingBackend::default());
        assert!(player.toggle());
        assert_eq!(
            player.backend.playing,
            Some((PathBuf::from("/sounds/rain.mp3"), 0.5))
        );
        assert!(!player.toggle());
        assert!(player.backend.playing.is_none());
    }

    #[test]
    fn switching_kind_restarts_only_when_playing() {
        let mut player = player(RecordingBackend::default());
        player.set_kind(SoundKind::Cafe);
        assert_eq!(player.backend.plays, 0);

        player.play();
        player.set_kind(SoundKind::Rain);
        assert!(player.is_playing());
        assert_eq!(player.backend.plays, 2);
        assert_eq!(
            player.backend.playing.as_ref().map(|(p, _)| p.clone()),
            Some(PathBuf::from("/sounds/rain.mp3"))
        );
    }

    #[test]
    fn volume_is_clamped_and_forwarded() {
        let mut player = player(RecordingBackend::default());
        player.set_volume(1.7);
        assert_eq!(player.volume(), 1.0);
        player.set_volume(-0.2);
        assert_eq!(player.volume(), 0.0);
        player.set_volume(f32::NAN);
        assert_eq!(player.volume(), 0.0);

        player.play();
        player.set_volume(0.3);
        assert_eq!(player.backend.playing.as_ref().map(|(_, v)| *v), Some(0.3));
    }

    #[test]
    fn failed_playback_leaves_player_stopped() {
        let mut player = player(RecordingBackend {
            fail: true,
            ..Default::default()
        });
        assert!(!player.toggle());
        assert!(!player.status().playing);
    }

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("Rain".parse::<SoundKind>(), Ok(SoundKind::Rain));
        assert_eq!(" cafe ".parse::<SoundKind>(), Ok(SoundKind::Cafe));
        assert!("forest".parse::<SoundKind>().is_err());
        assert_eq!(SoundKind::Rain.next(), SoundKind::Cafe);
    }
}
