//! Game settings and tunables
//!
//! Loaded from a JSON file by the native runner. Every field has a default,
//! so a settings file only needs the keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game settings/tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed (invader bullet source selection)
    pub seed: u64,

    // === Scene ===
    pub scene_width: f32,
    pub scene_height: f32,

    // === Formation ===
    /// Seconds between formation steps at the start of a game
    pub initial_cadence: f64,
    /// Cadence multiplier applied on every boundary reversal (0, 1]
    pub cadence_ratchet: f64,
    /// Distance moved per formation step
    pub formation_step: f32,

    // === Weapons ===
    pub ship_bullet_duration: f64,
    pub invader_bullet_duration: f64,
    pub bullet_grace: f64,

    // === Progress ===
    pub score_per_invader: u32,
    pub damage_per_hit: i32,

    // === Ship ===
    /// Horizontal acceleration per unit of tilt
    pub tilt_accel: f32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,

            scene_width: SCENE_WIDTH,
            scene_height: SCENE_HEIGHT,

            initial_cadence: INITIAL_CADENCE,
            cadence_ratchet: CADENCE_RATCHET,
            formation_step: FORMATION_STEP,

            ship_bullet_duration: SHIP_BULLET_DURATION,
            invader_bullet_duration: INVADER_BULLET_DURATION,
            bullet_grace: BULLET_GRACE,

            score_per_invader: SCORE_PER_INVADER,
            damage_per_hit: DAMAGE_PER_HIT,

            tilt_accel: SHIP_TILT_ACCEL,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, then sanitize out-of-range values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Invalid settings in {}: {err}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Cannot read {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Replace values that would break simulation invariants with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.initial_cadence > 0.0) {
            log::warn!("initial_cadence must be positive, got {}", self.initial_cadence);
            self.initial_cadence = defaults.initial_cadence;
        }
        if !(self.cadence_ratchet > 0.0 && self.cadence_ratchet <= 1.0) {
            log::warn!("cadence_ratchet must be in (0, 1], got {}", self.cadence_ratchet);
            self.cadence_ratchet = defaults.cadence_ratchet;
        }
        if !(self.scene_width > 0.0 && self.scene_height > 0.0) {
            log::warn!("scene size must be positive");
            self.scene_width = defaults.scene_width;
            self.scene_height = defaults.scene_height;
        }
        if !(self.ship_bullet_duration > 0.0) {
            self.ship_bullet_duration = defaults.ship_bullet_duration;
        }
        if !(self.invader_bullet_duration > 0.0) {
            self.invader_bullet_duration = defaults.invader_bullet_duration;
        }
        if self.bullet_grace < 0.0 {
            self.bullet_grace = defaults.bullet_grace;
        }
        self.damage_per_hit = self.damage_per_hit.max(0);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);

        self
    }
}
