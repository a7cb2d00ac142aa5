//! Audio front-end
//!
//! Turns simulation sound cues into playback requests for the platform's
//! audio backend: the asset file to play and the volume to play it at.

use std::path::{Path, PathBuf};

use crate::settings::Settings;
use crate::sim::{GameEvent, SoundCue};

/// A resolved request for the audio backend
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub cue: SoundCue,
    pub path: PathBuf,
    pub volume: f32,
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    asset_dir: PathBuf,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new("assets")
    }
}

impl AudioManager {
    pub fn new(asset_dir: impl AsRef<Path>) -> Self {
        Self {
            asset_dir: asset_dir.as_ref().to_path_buf(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(asset_dir: impl AsRef<Path>, settings: &Settings) -> Self {
        let mut audio = Self::new(asset_dir);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Resolve a cue to a playback request, or None when silent
    pub fn play(&self, cue: SoundCue) -> Option<Playback> {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return None;
        }

        let path = self.asset_dir.join(cue.file_name());
        log::debug!("play {} at {:.2}", path.display(), volume);
        Some(Playback { cue, path, volume })
    }

    /// Playback requests for every sound event in a batch
    pub fn play_events<'a>(
        &'a self,
        events: &'a [GameEvent],
    ) -> impl Iterator<Item = Playback> + 'a {
        events.iter().filter_map(move |event| match event {
            GameEvent::Sound(cue) => self.play(*cue),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_file_names() {
        assert_eq!(SoundCue::ShipBullet.file_name(), "ShipBullet.wav");
        assert_eq!(SoundCue::InvaderBullet.file_name(), "InvaderBullet.wav");
        assert_eq!(SoundCue::ShipHit.file_name(), "ShipHit.wav");
        assert_eq!(SoundCue::InvaderHit.file_name(), "InvaderHit.wav");
    }

    #[test]
    fn test_play_resolves_asset_path() {
        let audio = AudioManager::new("sounds");
        let playback = audio.play(SoundCue::ShipHit).unwrap();
        assert_eq!(playback.path, Path::new("sounds").join("ShipHit.wav"));
        assert!((playback.volume - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_muted_is_silent() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let audio = AudioManager::from_settings("sounds", &settings);
        assert!(audio.play(SoundCue::InvaderHit).is_none());
    }

    #[test]
    fn test_play_events_filters_sounds() {
        let audio = AudioManager::default();
        let events = [
            GameEvent::ScoreChanged { score: 100 },
            GameEvent::Sound(SoundCue::InvaderHit),
            GameEvent::Sound(SoundCue::ShipBullet),
        ];
        let cues: Vec<_> = audio.play_events(&events).map(|p| p.cue).collect();
        assert_eq!(cues, vec![SoundCue::InvaderHit, SoundCue::ShipBullet]);
    }
}
