//! Phoenix Range - an arcade shooting-range trainer
//!
//! Core modules:
//! - `catalog`: Static weapons, training levels and achievement definitions
//! - `sim`: Session engine (target motion, hit resolution, ammo, timers)
//! - `progression`: Folds a finished session into the persistent player
//! - `persistence`: Player/avatar storage over a key/value blob store
//! - `platform`: Browser/native platform abstraction

pub mod catalog;
pub mod persistence;
pub mod platform;
pub mod player;
pub mod progression;
pub mod settings;
pub mod sim;

pub use catalog::{AchievementDef, TargetKind, TrainingLevel, Weapon};
pub use player::{Player, PlayerStats};
pub use progression::{Grade, ProgressReport, advance, advance_session, advance_with_report};
pub use settings::Settings;
pub use sim::{Session, SessionInput, SessionPhase, SessionResult};

/// Game configuration constants
pub mod consts {
    /// Motion cadence (20 Hz, matches the range's animation interval)
    pub const MOTION_DT: f32 = 0.05;
    /// Countdown cadence in seconds
    pub const CLOCK_DT: f32 = 1.0;
    /// Maximum motion substeps per update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// The range is a normalized 0-100 plane on both axes
    pub const PLANE_MIN: f32 = 0.0;
    pub const PLANE_MAX: f32 = 100.0;

    /// Spawn window (keeps fresh targets off the visible edges)
    pub const SPAWN_X_MIN: f32 = 10.0;
    pub const SPAWN_X_MAX: f32 = 90.0;
    pub const SPAWN_Y_MIN: f32 = 20.0;
    pub const SPAWN_Y_MAX: f32 = 80.0;

    /// Bounce walls for moving targets
    pub const BOUNDS_X_MIN: f32 = 5.0;
    pub const BOUNDS_X_MAX: f32 = 95.0;
    pub const BOUNDS_Y_MIN: f32 = 15.0;
    pub const BOUNDS_Y_MAX: f32 = 85.0;

    /// Moving target speed range [min, max)
    pub const TARGET_SPEED_MIN: f32 = 1.0;
    pub const TARGET_SPEED_MAX: f32 = 3.0;
    /// Plane units travelled per motion step per unit of speed
    pub const MOTION_STEP_SCALE: f32 = 0.5;

    /// Rendered target diameter
    pub const TARGET_SIZE: f32 = 60.0;
    /// Points per target
    pub const TARGET_POINTS: u32 = 100;
    /// Hit radius is size / HIT_RADIUS_DIVISOR (deliberately tight)
    pub const HIT_RADIUS_DIVISOR: f32 = 8.0;

    /// Delay between the last target falling and the session ending
    pub const END_DELAY_SECS: f32 = 0.5;

    /// Fraction of a level's targets that must be hit to clear it
    pub const COMPLETION_RATIO: f64 = 0.6;
    /// Accuracy needed for the Marksman achievement
    pub const MARKSMAN_ACCURACY: f64 = 90.0;
    /// Time used (seconds) at or under which Speed Shooter unlocks
    pub const SPEED_SHOOTER_SECS: f64 = 20.0;

    /// Largest accepted avatar upload (5 MiB)
    pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;
}

/// Normalize a heading in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(heading: f32) -> f32 {
    let h = heading.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

/// Unit direction vector for a heading in degrees (0° = +x, 90° = +y)
#[inline]
pub fn heading_to_dir(heading: f32) -> glam::Vec2 {
    let rad = heading.to_radians();
    glam::Vec2::new(rad.cos(), rad.sin())
}
