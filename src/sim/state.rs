//! Session state and core simulation types
//!
//! One `Session` owns everything a timed run mutates: targets, shot log,
//! ammo, score and the three timers. All mutation goes through `&mut Session`,
//! so the motion tick, the countdown and the reload timer can never interleave
//! mid-update.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::catalog::{TargetKind, TrainingLevel, Weapon};
use crate::consts::*;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Not started (or disposed)
    Idle,
    /// Timer running, targets live
    Active,
    /// Terminal; the result has been produced
    Ended,
}

/// A target on the range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Unique within the session
    pub id: u32,
    /// Center, in the 0-100 plane
    pub pos: Vec2,
    /// Rendered diameter
    pub size: f32,
    pub kind: TargetKind,
    /// Write-once: false -> true on hit, never reset
    pub hit: bool,
    pub points: u32,
    /// Plane speed (0 for static targets)
    pub speed: f32,
    /// Heading in degrees, [0, 360)
    pub heading: f32,
}

impl Target {
    /// Distance from center that still counts as a hit
    pub fn hit_radius(&self) -> f32 {
        self.size / HIT_RADIUS_DIVISOR
    }

    pub fn is_moving(&self) -> bool {
        self.kind == TargetKind::Moving
    }
}

/// One fired round. Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: u32,
    /// Crosshair position when fired
    pub pos: Vec2,
    /// Seconds into the session
    pub fired_at: f32,
    pub hit: bool,
    pub target_id: Option<u32>,
    /// 0 on a miss
    pub points: u32,
}

/// Summary produced exactly once when a session ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub level_id: String,
    pub weapon_id: String,
    pub target_count: u32,
    /// Sum of shot points
    pub score: u32,
    /// hits / shots * 100, or 0 with no shots
    pub accuracy: f64,
    pub shots: Vec<Shot>,
    /// Seconds of the time limit consumed
    pub time_used: f64,
}

impl SessionResult {
    pub fn total_shots(&self) -> u32 {
        self.shots.len() as u32
    }

    pub fn hits(&self) -> u32 {
        self.shots.iter().filter(|s| s.hit).count() as u32
    }

    /// Every spawned target went down
    pub fn all_targets_hit(&self) -> bool {
        self.hits() == self.target_count
    }

    /// Every shot fired was a hit (and at least one was fired)
    pub fn no_wasted_shots(&self) -> bool {
        !self.shots.is_empty() && self.hits() == self.total_shots()
    }
}

/// Accuracy percentage for a shot tally
pub fn accuracy_percent(hits: u32, shots: u32) -> f64 {
    if shots == 0 {
        0.0
    } else {
        hits as f64 / shots as f64 * 100.0
    }
}

/// Things that happened during an update, for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started { targets: u32 },
    TargetHit { target_id: u32, points: u32 },
    Missed { shot_id: u32 },
    /// Trigger pulled with an empty magazine
    DryFire,
    ReloadStarted { duration: f32 },
    ReloadFinished { ammo: u32 },
    AllTargetsHit,
    Ended { score: u32, accuracy: f64 },
}

/// A timed training run
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed the spawn RNG was created from
    pub seed: u64,
    rng: Pcg32,
    pub phase: SessionPhase,
    pub(crate) level: Option<TrainingLevel>,
    pub(crate) weapon: Option<Weapon>,
    /// Sorted by id
    pub targets: Vec<Target>,
    /// Append-only for the life of the run
    pub shots: Vec<Shot>,
    pub score: u32,
    pub ammo: u32,
    /// Whole seconds left on the countdown
    pub time_left: u32,
    /// Crosshair position in the 0-100 plane
    pub aim: Vec2,
    /// Seconds until the reload completes (None when not reloading)
    pub(crate) reload_remaining: Option<f32>,
    /// Seconds until a scheduled end fires
    pub(crate) pending_end: Option<f32>,
    pub(crate) motion_accum: f32,
    pub(crate) clock_accum: f32,
    /// Cosmetic delay between clearing the range and ending
    pub end_delay: f32,
    pub(crate) result: Option<SessionResult>,
    pub(crate) events: Vec<SessionEvent>,
    next_id: u32,
}

impl Session {
    /// Create an idle session whose spawns are driven by `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Idle,
            level: None,
            weapon: None,
            targets: Vec::new(),
            shots: Vec::new(),
            score: 0,
            ammo: 0,
            time_left: 0,
            aim: Vec2::splat(PLANE_MAX / 2.0),
            reload_remaining: None,
            pending_end: None,
            motion_accum: 0.0,
            clock_accum: 0.0,
            end_delay: END_DELAY_SECS,
            result: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Builder-style override of the cosmetic end delay (0 ends immediately)
    pub fn with_end_delay(mut self, secs: f32) -> Self {
        self.end_delay = secs.max(0.0);
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn level(&self) -> Option<&TrainingLevel> {
        self.level.as_ref()
    }

    pub fn weapon(&self) -> Option<&Weapon> {
        self.weapon.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_remaining.is_some()
    }

    /// Ammo capacity of the loaded weapon (0 before the first start)
    pub fn capacity(&self) -> u32 {
        self.weapon.as_ref().map_or(0, |w| w.ammo_capacity)
    }

    pub fn hits(&self) -> u32 {
        self.shots.iter().filter(|s| s.hit).count() as u32
    }

    pub fn total_shots(&self) -> u32 {
        self.shots.len() as u32
    }

    /// Running accuracy of the current shot log
    pub fn accuracy(&self) -> f64 {
        accuracy_percent(self.hits(), self.total_shots())
    }

    pub fn targets_hit(&self) -> u32 {
        self.targets.iter().filter(|t| t.hit).count() as u32
    }

    pub fn all_targets_hit(&self) -> bool {
        !self.targets.is_empty() && self.targets.iter().all(|t| t.hit)
    }

    /// Seconds consumed: whole countdown seconds plus the partial second
    /// the driver has accumulated, capped at the time limit
    pub fn time_used(&self) -> f64 {
        let limit = self.level.as_ref().map_or(0, |l| l.time_limit);
        let whole = limit.saturating_sub(self.time_left) as f64;
        (whole + self.clock_accum as f64).min(limit as f64)
    }

    /// Result of the last finished run, if still held
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Hand the result to the caller (once)
    pub fn take_result(&mut self) -> Option<SessionResult> {
        self.result.take()
    }

    /// Drain queued events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn `level.target_count` targets inside the spawn window
    pub(crate) fn spawn_targets(&mut self, level: &TrainingLevel) {
        self.targets.clear();
        for _ in 0..level.target_count {
            let id = self.next_entity_id();
            let x = self.rng.random_range(SPAWN_X_MIN..SPAWN_X_MAX);
            let y = self.rng.random_range(SPAWN_Y_MIN..SPAWN_Y_MAX);
            let kind = if level.target_kinds.is_empty() {
                TargetKind::Static
            } else {
                level.target_kinds[self.rng.random_range(0..level.target_kinds.len())]
            };
            let (speed, heading) = match kind {
                TargetKind::Moving => (
                    self.rng.random_range(TARGET_SPEED_MIN..TARGET_SPEED_MAX),
                    self.rng.random_range(0.0..360.0),
                ),
                TargetKind::Static => (0.0, 0.0),
            };
            self.targets.push(Target {
                id,
                pos: Vec2::new(x, y),
                size: TARGET_SIZE,
                kind,
                hit: false,
                points: TARGET_POINTS,
                speed,
                heading,
            });
        }
    }
}
