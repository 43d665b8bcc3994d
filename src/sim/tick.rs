//! Session operations and the fixed-cadence driver
//!
//! Three timers act on one session: the 50 ms motion step, the 1 s countdown
//! and the reload countdown (plus the cosmetic end delay). `Session::update`
//! is the only place they advance, in a fixed order, so a shot always sees
//! targets between motion steps and never mid-update.

use glam::Vec2;

use super::hit::resolve_hit;
use super::motion::step_targets;
use super::state::{Session, SessionEvent, SessionPhase, SessionResult, Shot, accuracy_percent};
use crate::catalog::{TrainingLevel, Weapon};
use crate::consts::*;

/// Input for a single update (one-shot flags are consumed by that update)
#[derive(Debug, Clone, Default)]
pub struct SessionInput {
    /// Crosshair position in plane coordinates
    pub aim: Option<Vec2>,
    /// Pull the trigger at the crosshair
    pub fire: bool,
    /// Start a reload
    pub reload: bool,
}

/// Clamp a crosshair position onto the 0-100 plane
#[inline]
pub fn clamp_to_plane(pos: Vec2) -> Vec2 {
    pos.clamp(Vec2::splat(PLANE_MIN), Vec2::splat(PLANE_MAX))
}

impl Session {
    /// Begin a run. Allowed from `Idle` or after a previous run `Ended`.
    ///
    /// Returns false (and changes nothing) while a run is active.
    pub fn start(&mut self, level: &TrainingLevel, weapon: &Weapon) -> bool {
        if self.phase == SessionPhase::Active {
            return false;
        }

        self.level = Some(level.clone());
        self.weapon = Some(weapon.clone());
        self.time_left = level.time_limit;
        self.ammo = weapon.ammo_capacity;
        self.score = 0;
        self.shots.clear();
        self.reload_remaining = None;
        self.pending_end = None;
        self.motion_accum = 0.0;
        self.clock_accum = 0.0;
        self.result = None;
        self.events.clear();
        self.spawn_targets(level);
        self.phase = SessionPhase::Active;

        log::info!(
            "Session started: level={} weapon={} targets={} time={}s",
            level.id,
            weapon.id,
            self.targets.len(),
            level.time_limit
        );
        self.events.push(SessionEvent::Started {
            targets: self.targets.len() as u32,
        });
        true
    }

    /// One motion step: move live moving targets by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if self.phase != SessionPhase::Active {
            return;
        }
        step_targets(&mut self.targets, dt);
    }

    /// One countdown second. Ends the run when the clock reaches zero.
    pub fn advance_clock(&mut self) -> Option<SessionResult> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            log::debug!("Time expired");
            return self.end();
        }
        None
    }

    /// Fire at (x, y). Returns the recorded shot, or None if the trigger was
    /// rejected (not active, reloading, or empty magazine).
    pub fn shoot(&mut self, x: f32, y: f32) -> Option<Shot> {
        if self.phase != SessionPhase::Active || self.is_reloading() {
            return None;
        }
        if self.ammo == 0 {
            self.events.push(SessionEvent::DryFire);
            return None;
        }

        let pos = clamp_to_plane(Vec2::new(x, y));
        let id = self.next_entity_id();
        let fired_at = self.time_used() as f32;

        let shot = match resolve_hit(&self.targets, pos) {
            Some(index) => {
                let target = &mut self.targets[index];
                target.hit = true;
                self.score += target.points;
                self.events.push(SessionEvent::TargetHit {
                    target_id: target.id,
                    points: target.points,
                });
                log::debug!("Shot {} hit target {} (+{})", id, target.id, target.points);
                Shot {
                    id,
                    pos,
                    fired_at,
                    hit: true,
                    target_id: Some(target.id),
                    points: target.points,
                }
            }
            None => {
                self.events.push(SessionEvent::Missed { shot_id: id });
                log::debug!("Shot {} missed at ({:.1}, {:.1})", id, pos.x, pos.y);
                Shot {
                    id,
                    pos,
                    fired_at,
                    hit: false,
                    target_id: None,
                    points: 0,
                }
            }
        };

        self.ammo -= 1;
        self.shots.push(shot.clone());

        if self.pending_end.is_none() && self.all_targets_hit() {
            self.events.push(SessionEvent::AllTargetsHit);
            if self.end_delay <= 0.0 {
                self.end();
            } else {
                self.pending_end = Some(self.end_delay);
            }
        }

        Some(shot)
    }

    /// Start a reload. No-op if already reloading or the magazine is full.
    pub fn reload(&mut self) -> bool {
        if self.phase != SessionPhase::Active || self.is_reloading() {
            return false;
        }
        let Some(weapon) = self.weapon.as_ref() else {
            return false;
        };
        if self.ammo >= weapon.ammo_capacity {
            return false;
        }

        let duration = weapon.reload_time.max(0.0);
        self.events.push(SessionEvent::ReloadStarted { duration });
        log::debug!("Reloading {} ({}s)", weapon.id, duration);
        self.reload_remaining = Some(duration);
        if duration == 0.0 {
            self.finish_reload();
        }
        true
    }

    /// Count the reload timer down by `dt`, refilling the magazine when done
    pub fn advance_reload(&mut self, dt: f32) {
        if let Some(remaining) = self.reload_remaining.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.finish_reload();
            }
        }
    }

    fn finish_reload(&mut self) {
        self.reload_remaining = None;
        self.ammo = self.capacity();
        self.events.push(SessionEvent::ReloadFinished { ammo: self.ammo });
    }

    /// Terminate the run and produce its result. Only the first call from
    /// `Active` does anything.
    pub fn end(&mut self) -> Option<SessionResult> {
        if self.phase != SessionPhase::Active {
            return None;
        }

        let time_used = self.time_used();
        self.phase = SessionPhase::Ended;
        self.reload_remaining = None;
        self.pending_end = None;

        let result = SessionResult {
            level_id: self.level.as_ref().map(|l| l.id.to_string()).unwrap_or_default(),
            weapon_id: self.weapon.as_ref().map(|w| w.id.to_string()).unwrap_or_default(),
            target_count: self.targets.len() as u32,
            score: self.score,
            accuracy: accuracy_percent(self.hits(), self.total_shots()),
            shots: self.shots.clone(),
            time_used,
        };

        log::info!(
            "Session ended: score={} accuracy={:.1}% hits={}/{} time={:.1}s",
            result.score,
            result.accuracy,
            result.hits(),
            result.total_shots(),
            result.time_used
        );
        self.events.push(SessionEvent::Ended {
            score: result.score,
            accuracy: result.accuracy,
        });
        self.result = Some(result.clone());
        Some(result)
    }

    /// Tear the session down: cancel every pending timer and return to `Idle`
    /// without producing a result.
    pub fn dispose(&mut self) {
        if self.phase == SessionPhase::Active {
            log::info!("Session disposed with {}s remaining", self.time_left);
        }
        self.reload_remaining = None;
        self.pending_end = None;
        self.motion_accum = 0.0;
        self.clock_accum = 0.0;
        self.targets.clear();
        self.shots.clear();
        self.events.clear();
        self.phase = SessionPhase::Idle;
    }

    /// Advance the session by `dt` seconds of wall time.
    ///
    /// Order within an update: input (aim, reload, fire), reload timer,
    /// motion substeps, end delay, countdown.
    pub fn update(&mut self, input: &SessionInput, dt: f32) {
        if let Some(aim) = input.aim {
            self.aim = clamp_to_plane(aim);
        }
        if self.phase != SessionPhase::Active {
            return;
        }
        let dt = dt.max(0.0);
        // An end scheduled by this update's shot starts counting next update
        let end_was_pending = self.pending_end.is_some();

        if input.reload {
            self.reload();
        }
        if input.fire {
            let aim = self.aim;
            self.shoot(aim.x, aim.y);
        }

        self.advance_reload(dt);

        self.motion_accum += dt;
        let mut substeps = 0;
        while self.motion_accum >= MOTION_DT && substeps < MAX_SUBSTEPS {
            self.tick(MOTION_DT);
            self.motion_accum -= MOTION_DT;
            substeps += 1;
        }
        // Drop backlog the substep cap could not absorb
        self.motion_accum = self.motion_accum.min(MOTION_DT);

        if let Some(remaining) = self.pending_end.as_mut().filter(|_| end_was_pending) {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.end();
            }
        }

        if self.phase == SessionPhase::Active {
            self.clock_accum += dt;
            while self.clock_accum >= CLOCK_DT && self.phase == SessionPhase::Active {
                self.clock_accum -= CLOCK_DT;
                self.advance_clock();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TargetKind, training_level, weapon};
    use crate::sim::SessionEvent;

    fn started(seed: u64, level: &str) -> Session {
        let mut session = Session::new(seed).with_end_delay(0.0);
        assert!(session.start(training_level(level).unwrap(), weapon("glock17").unwrap()));
        session
    }

    fn target_pos(session: &Session, i: usize) -> Vec2 {
        session.targets[i].pos
    }

    #[test]
    fn test_start_resets_state() {
        let session = started(1, "basic1");
        assert_eq!(session.phase, SessionPhase::Active);
        assert_eq!(session.time_left, 30);
        assert_eq!(session.ammo, 17);
        assert_eq!(session.score, 0);
        assert_eq!(session.targets.len(), 5);
        assert!(session.shots.is_empty());
    }

    #[test]
    fn test_start_rejected_while_active() {
        let mut session = started(1, "basic1");
        let before = session.targets.clone();
        assert!(!session.start(training_level("basic2").unwrap(), weapon("glock17").unwrap()));
        assert_eq!(session.targets, before);
    }

    #[test]
    fn test_shoot_before_start_is_noop() {
        let mut session = Session::new(1);
        assert!(session.shoot(50.0, 50.0).is_none());
        assert!(session.shots.is_empty());
    }

    #[test]
    fn test_hit_scores_and_marks_target() {
        let mut session = started(2, "basic1");
        let pos = target_pos(&session, 0);
        let shot = session.shoot(pos.x, pos.y).unwrap();
        assert!(shot.hit);
        assert_eq!(shot.points, TARGET_POINTS);
        assert_eq!(shot.target_id, Some(session.targets[0].id));
        assert!(session.targets[0].hit);
        assert_eq!(session.score, TARGET_POINTS);
        assert_eq!(session.ammo, 16);
    }

    #[test]
    fn test_miss_costs_ammo_only() {
        let mut session = started(2, "basic1");
        let shot = session.shoot(0.0, 0.0).unwrap();
        assert!(!shot.hit);
        assert_eq!(shot.points, 0);
        assert!(shot.target_id.is_none());
        assert_eq!(session.score, 0);
        assert_eq!(session.ammo, 16);
    }

    #[test]
    fn test_hit_target_cannot_be_hit_again() {
        let mut session = started(3, "basic1");
        let pos = target_pos(&session, 0);
        let id = session.targets[0].id;
        session.shoot(pos.x, pos.y);
        let second = session.shoot(pos.x, pos.y).unwrap();
        assert_ne!(second.target_id, Some(id));
        assert_eq!(session.shots.iter().filter(|s| s.target_id == Some(id)).count(), 1);
    }

    #[test]
    fn test_empty_magazine_rejects_shot() {
        let mut session = started(4, "basic1");
        session.ammo = 0;
        assert!(session.shoot(50.0, 50.0).is_none());
        assert!(session.shots.is_empty());
        assert_eq!(session.score, 0);
        assert!(session.drain_events().contains(&SessionEvent::DryFire));
    }

    #[test]
    fn test_reload_cycle() {
        let mut session = started(5, "basic1");
        // Full magazine: no-op
        assert!(!session.reload());

        session.shoot(0.0, 0.0);
        assert!(session.reload());
        assert!(session.is_reloading());
        // Second reload while reloading is a no-op
        assert!(!session.reload());
        // Shots rejected while reloading
        assert!(session.shoot(0.0, 0.0).is_none());

        session.advance_reload(1.0);
        assert!(session.is_reloading());
        session.advance_reload(1.5);
        assert!(!session.is_reloading());
        assert_eq!(session.ammo, 17);
    }

    #[test]
    fn test_clearing_all_targets_ends_run() {
        let mut session = started(6, "basic1");
        for i in 0..session.targets.len() {
            let pos = target_pos(&session, i);
            session.shoot(pos.x, pos.y);
        }
        assert_eq!(session.phase, SessionPhase::Ended);
        let result = session.take_result().unwrap();
        assert_eq!(result.score, 500);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.hits(), 5);
        assert!(result.all_targets_hit());
        assert!(session.take_result().is_none());
    }

    #[test]
    fn test_end_delay_is_honoured() {
        let mut session = Session::new(6);
        session.start(training_level("basic1").unwrap(), weapon("glock17").unwrap());
        for i in 0..session.targets.len() {
            let pos = target_pos(&session, i);
            session.shoot(pos.x, pos.y);
        }
        assert_eq!(session.phase, SessionPhase::Active);
        session.update(&SessionInput::default(), 0.25);
        assert_eq!(session.phase, SessionPhase::Active);
        session.update(&SessionInput::default(), 0.25);
        assert_eq!(session.phase, SessionPhase::Ended);
    }

    #[test]
    fn test_end_delay_counts_from_the_clearing_update() {
        let mut session = Session::new(6);
        session.start(training_level("basic1").unwrap(), weapon("glock17").unwrap());
        let last = session.targets.len() - 1;
        for i in 0..last {
            let pos = target_pos(&session, i);
            session.shoot(pos.x, pos.y);
        }

        let fire_at_last = SessionInput {
            aim: Some(target_pos(&session, last)),
            fire: true,
            reload: false,
        };
        session.update(&fire_at_last, 0.25);
        assert!(session.all_targets_hit());
        assert_eq!(session.pending_end, Some(0.5));

        session.update(&SessionInput::default(), 0.25);
        assert_eq!(session.phase, SessionPhase::Active);
        session.update(&SessionInput::default(), 0.25);
        assert_eq!(session.phase, SessionPhase::Ended);
    }

    #[test]
    fn test_countdown_expiry_with_no_shots() {
        let mut session = started(7, "basic1");
        let mut result = None;
        for _ in 0..30 {
            assert!(result.is_none());
            result = session.advance_clock();
        }
        let result = result.unwrap();
        assert_eq!(result.accuracy, 0.0);
        assert!(result.shots.is_empty());
        assert_eq!(result.time_used, 30.0);
        assert_eq!(session.phase, SessionPhase::Ended);
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut session = started(8, "basic1");
        assert!(session.end().is_some());
        assert!(session.end().is_none());
        let ended = session
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::Ended { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_ended_session_is_frozen() {
        let mut session = started(9, "basic2");
        session.end();
        let targets = session.targets.clone();
        session.tick(MOTION_DT);
        assert!(session.shoot(50.0, 50.0).is_none());
        assert!(!session.reload());
        assert_eq!(session.targets, targets);
    }

    #[test]
    fn test_restart_after_end() {
        let mut session = started(10, "basic1");
        session.shoot(0.0, 0.0);
        session.end();
        assert!(session.start(training_level("basic1").unwrap(), weapon("m4a1").unwrap()));
        assert!(session.shots.is_empty());
        assert_eq!(session.ammo, 30);
        assert!(session.result().is_none());
    }

    #[test]
    fn test_dispose_cancels_timers() {
        let mut session = started(11, "basic2");
        session.shoot(0.0, 0.0);
        session.reload();
        session.dispose();
        assert_eq!(session.phase, SessionPhase::Idle);
        assert!(!session.is_reloading());

        // Stale updates can no longer touch the session
        session.update(&SessionInput::default(), 10.0);
        assert_eq!(session.phase, SessionPhase::Idle);
        assert!(session.result().is_none());
        assert!(session.advance_clock().is_none());
    }

    #[test]
    fn test_update_drives_countdown() {
        let mut session = started(12, "basic1");
        let input = SessionInput::default();
        for _ in 0..21 {
            session.update(&input, 0.05);
        }
        assert_eq!(session.time_left, 29);
        assert!(session.time_used() < 1.1);
        for _ in 0..29 {
            session.update(&input, 1.0);
        }
        assert_eq!(session.phase, SessionPhase::Ended);
        assert_eq!(session.result().unwrap().time_used, 30.0);
    }

    #[test]
    fn test_update_moves_targets() {
        let mut session = started(13, "advanced1");
        let before = session.targets.clone();
        session.update(&SessionInput::default(), MOTION_DT);
        for (a, b) in before.iter().zip(&session.targets) {
            match a.kind {
                TargetKind::Moving => assert_ne!(a.pos, b.pos),
                TargetKind::Static => assert_eq!(a.pos, b.pos),
            }
        }
    }

    #[test]
    fn test_update_fires_at_clamped_aim() {
        let mut session = started(14, "basic1");
        let input = SessionInput {
            aim: Some(Vec2::new(-20.0, 140.0)),
            fire: true,
            ..Default::default()
        };
        session.update(&input, 0.0);
        assert_eq!(session.aim, Vec2::new(0.0, 100.0));
        assert_eq!(session.shots[0].pos, Vec2::new(0.0, 100.0));
    }

    #[test]
    fn test_update_completes_reload() {
        let mut session = started(15, "basic1");
        session.shoot(0.0, 0.0);
        let input = SessionInput {
            reload: true,
            ..Default::default()
        };
        session.update(&input, 0.0);
        assert!(session.is_reloading());
        session.update(&SessionInput::default(), 2.5);
        assert!(!session.is_reloading());
        assert_eq!(session.ammo, 17);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Action {
            Shoot(f32, f32),
            ShootTarget(usize),
            Reload,
            Update(f32),
            Clock,
        }

        fn action() -> impl Strategy<Value = Action> {
            prop_oneof![
                (0.0f32..100.0, 0.0f32..100.0).prop_map(|(x, y)| Action::Shoot(x, y)),
                (0usize..12).prop_map(Action::ShootTarget),
                Just(Action::Reload),
                (0.0f32..0.5).prop_map(Action::Update),
                Just(Action::Clock),
            ]
        }

        proptest! {
            #[test]
            fn prop_session_invariants(
                seed in any::<u64>(),
                actions in prop::collection::vec(action(), 0..200),
            ) {
                let mut session = Session::new(seed);
                session.start(training_level("advanced1").unwrap(), weapon("glock17").unwrap());
                let capacity = session.capacity();
                let mut was_hit = vec![false; session.targets.len()];

                for action in &actions {
                    let shots_before = session.total_shots();
                    let score_before = session.score;
                    let rejected = !session.is_active() || session.is_reloading() || session.ammo == 0;
                    let empty = session.ammo == 0;

                    let fired = match action {
                        Action::Shoot(x, y) => Some(session.shoot(*x, *y)),
                        Action::ShootTarget(i) => {
                            let pos = session.targets.get(*i).map(|t| t.pos);
                            pos.map(|p| session.shoot(p.x, p.y))
                        }
                        Action::Reload => {
                            session.reload();
                            None
                        }
                        Action::Update(dt) => {
                            session.update(&SessionInput::default(), *dt);
                            None
                        }
                        Action::Clock => {
                            session.advance_clock();
                            None
                        }
                    };

                    if let Some(shot) = fired {
                        prop_assert_eq!(shot.is_none(), rejected);
                        if empty {
                            prop_assert_eq!(session.total_shots(), shots_before);
                            prop_assert_eq!(session.score, score_before);
                        }
                    }

                    let hits = session.hits();
                    prop_assert!(hits <= session.total_shots());
                    prop_assert!((0.0..=100.0).contains(&session.accuracy()));
                    prop_assert_eq!(session.score, hits * TARGET_POINTS);
                    prop_assert_eq!(session.targets_hit(), hits);
                    prop_assert!(session.ammo <= capacity);
                    for (i, t) in session.targets.iter().enumerate() {
                        if was_hit[i] {
                            prop_assert!(t.hit);
                        }
                        was_hit[i] = t.hit;
                    }
                }
            }

            #[test]
            fn prop_reload_restores_capacity(seed in any::<u64>(), spent in 1u32..30) {
                let mut session = Session::new(seed);
                session.start(training_level("basic1").unwrap(), weapon("m4a1").unwrap());
                for _ in 0..spent {
                    session.shoot(0.0, 0.0);
                }
                prop_assert!(session.reload());
                session.advance_reload(3.1);
                prop_assert!(!session.is_reloading());
                prop_assert_eq!(session.ammo, 30);
            }
        }
    }
}
