//! Session simulation module
//!
//! All range gameplay lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Seeded RNG only
//! - Stable iteration order (targets sorted by ID)
//! - Every mutation goes through `&mut Session`

pub mod autopilot;
pub mod hit;
pub mod motion;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use hit::{nearest_live_target, resolve_hit};
pub use motion::{clamp_to_bounds, reflect_off_floor, reflect_off_side_wall, step_target};
pub use state::{
    Session, SessionEvent, SessionPhase, SessionResult, Shot, Target, accuracy_percent,
};
pub use tick::{SessionInput, clamp_to_plane};
