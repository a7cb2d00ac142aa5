//! SK Invaders - gameplay core of a fixed-screen shoot-'em-up
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation, weapons, contacts, progress)
//! - `hud`: Score/health label formatting for the HUD collaborator
//! - `audio`: Sound cue playback front-end
//! - `settings`: Data-driven tunables loaded from JSON

pub mod audio;
pub mod hud;
pub mod settings;
pub mod sim;

pub use hud::Hud;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame rate the headless runner drives `tick` at
    pub const FRAME_DT: f64 = 1.0 / 60.0;

    /// Scene dimensions (portrait phone, y axis up)
    pub const SCENE_WIDTH: f32 = 320.0;
    pub const SCENE_HEIGHT: f32 = 568.0;

    /// Invader grid
    pub const INVADER_WIDTH: f32 = 24.0;
    pub const INVADER_HEIGHT: f32 = 16.0;
    pub const INVADER_SPACING_X: f32 = 12.0;
    pub const INVADER_SPACING_Y: f32 = 12.0;
    pub const INVADER_ROWS: u32 = 6;
    pub const INVADER_COLS: u32 = 5;

    /// Formation movement
    pub const INITIAL_CADENCE: f64 = 1.0;
    pub const CADENCE_RATCHET: f64 = 0.8;
    pub const FORMATION_STEP: f32 = 10.0;
    /// Distance from the scene edge that counts as "touching" it
    pub const EDGE_TOLERANCE: f32 = 1.0;

    /// Ship
    pub const SHIP_WIDTH: f32 = 30.0;
    pub const SHIP_HEIGHT: f32 = 16.0;
    /// Horizontal acceleration per unit of tilt (scene units/s²)
    pub const SHIP_TILT_ACCEL: f32 = 2000.0;
    /// Fraction of ship velocity lost per second
    pub const SHIP_DAMPING: f32 = 0.1;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 8.0;
    pub const SHIP_BULLET_DURATION: f64 = 1.0;
    pub const INVADER_BULLET_DURATION: f64 = 2.0;
    /// Time a bullet lingers at its destination before it is removed
    pub const BULLET_GRACE: f64 = 3.0 / 60.0;

    /// Progress
    pub const STARTING_HEALTH: i32 = 100;
    pub const SCORE_PER_INVADER: u32 = 100;
    pub const DAMAGE_PER_HIT: i32 = 20;

    /// Invaders whose lower edge reaches this altitude have landed
    pub const MIN_INVADER_ALTITUDE: f32 = 2.0 * SHIP_HEIGHT;
}

/// Axis-aligned extent of a box centred at `pos`: (min, max) corners
#[inline]
pub fn aabb_extent(pos: Vec2, size: Vec2) -> (Vec2, Vec2) {
    let half = size * 0.5;
    (pos - half, pos + half)
}

/// Linear interpolation between two points, `t` clamped to [0, 1]
#[inline]
pub fn lerp_clamped(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    from.lerp(to, t.clamp(0.0, 1.0))
}
