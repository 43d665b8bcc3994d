//! Idle/demo mode: a simple bot that plays the range
//!
//! Produces the same `SessionInput` a player would, so the session cannot
//! tell it apart from a human. Fire rate follows the loaded weapon.

use super::hit::nearest_live_target;
use super::state::Session;
use super::tick::SessionInput;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Seconds until the next round may be fired
    cooldown: f32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide this frame's input
    pub fn plan(&mut self, session: &Session, dt: f32) -> SessionInput {
        self.cooldown = (self.cooldown - dt).max(0.0);

        let mut input = SessionInput::default();
        if !session.is_active() || session.is_reloading() {
            return input;
        }
        if session.ammo == 0 {
            input.reload = true;
            return input;
        }

        // Track the target closest to the crosshair (lowest id on ties)
        let Some((index, _)) = nearest_live_target(&session.targets, session.aim) else {
            return input;
        };
        input.aim = Some(session.targets[index].pos);

        if self.cooldown <= 0.0 {
            input.fire = true;
            let fire_rate = session.weapon().map_or(60, |w| w.fire_rate.max(1));
            self.cooldown = 60.0 / fire_rate as f32;
        }
        input
    }
}
