//! Target motion: straight-line travel with axis-aligned wall bounces
//!
//! No physics beyond this. A moving target advances along its heading and,
//! when the step would carry it onto or past a wall, its heading is mirrored
//! about the crossed axis and the position is clamped back inside.

use glam::Vec2;

use super::state::Target;
use crate::consts::*;
use crate::{heading_to_dir, normalize_degrees};

/// Mirror a heading off a side wall (x bound): 180° - heading
#[inline]
pub fn reflect_off_side_wall(heading: f32) -> f32 {
    normalize_degrees(180.0 - heading)
}

/// Mirror a heading off the top or bottom wall (y bound): -heading
#[inline]
pub fn reflect_off_floor(heading: f32) -> f32 {
    normalize_degrees(-heading)
}

/// Clamp a position into the bounce walls
#[inline]
pub fn clamp_to_bounds(pos: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(BOUNDS_X_MIN, BOUNDS_X_MAX),
        pos.y.clamp(BOUNDS_Y_MIN, BOUNDS_Y_MAX),
    )
}

/// Distance a target of `speed` covers in `dt` seconds
#[inline]
pub fn step_length(speed: f32, dt: f32) -> f32 {
    speed * MOTION_STEP_SCALE * (dt / MOTION_DT)
}

/// Advance one target by `dt`. Static and already-hit targets are untouched.
///
/// Returns true if the target bounced.
pub fn step_target(target: &mut Target, dt: f32) -> bool {
    if target.hit || !target.is_moving() || target.speed <= 0.0 {
        return false;
    }

    let next = target.pos + heading_to_dir(target.heading) * step_length(target.speed, dt);

    let mut heading = target.heading;
    let mut bounced = false;
    if next.x <= BOUNDS_X_MIN || next.x >= BOUNDS_X_MAX {
        heading = reflect_off_side_wall(heading);
        bounced = true;
    }
    // Corner hits compose both mirrors
    if next.y <= BOUNDS_Y_MIN || next.y >= BOUNDS_Y_MAX {
        heading = reflect_off_floor(heading);
        bounced = true;
    }

    target.heading = normalize_degrees(heading);
    target.pos = clamp_to_bounds(next);
    bounced
}

/// Advance every target by `dt`
pub fn step_targets(targets: &mut [Target], dt: f32) {
    for target in targets.iter_mut() {
        step_target(target, dt);
    }
}
