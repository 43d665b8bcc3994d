//! Phoenix Range entry point
//!
//! Native: runs one autopilot session against the saved player and persists
//! the outcome. Web: exposes the range to the page through `RangeApp`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_range {
    use glam::Vec2;
    use wasm_bindgen::prelude::*;

    use phoenix_range::catalog;
    use phoenix_range::persistence::{
        AvatarRef, KeyValueStore, LocalStorageStore, MemoryStore, PlayerStore,
    };
    use phoenix_range::platform::{clock_seed, now_ms};
    use phoenix_range::progression::advance_session;
    use phoenix_range::sim::{Autopilot, Session, SessionEvent, SessionInput};
    use phoenix_range::{Player, Settings};

    /// The range as seen from JavaScript. The page forwards pointer input and
    /// calls `update` from requestAnimationFrame; everything else happens here.
    #[wasm_bindgen]
    pub struct RangeApp {
        store: PlayerStore<Box<dyn KeyValueStore>>,
        settings: Settings,
        player: Player,
        session: Session,
        input: SessionInput,
        autopilot: Option<Autopilot>,
        last_report: Option<String>,
    }

    #[wasm_bindgen]
    impl RangeApp {
        #[wasm_bindgen(constructor)]
        pub fn new() -> RangeApp {
            let backend: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
                Some(local) => Box::new(local),
                None => {
                    log::warn!("LocalStorage unavailable, progress will not persist");
                    Box::new(MemoryStore::new())
                }
            };
            let store = PlayerStore::new(backend);
            let player = store.load_or_default();
            let settings = Settings::load(store.store());
            RangeApp {
                store,
                settings,
                player,
                session: Session::new(clock_seed()),
                input: SessionInput::default(),
                autopilot: None,
                last_report: None,
            }
        }

        /// Start a run with the selected weapon and level
        pub fn start(&mut self) -> bool {
            let seed = self.settings.seed.unwrap_or_else(clock_seed);
            self.session = Session::new(seed).with_end_delay(self.settings.end_delay_secs);
            self.last_report = None;
            let (level, weapon) = self.settings.resolve(&self.player);
            self.session.start(level, weapon)
        }

        pub fn select_weapon(&mut self, id: &str) -> bool {
            let Some(weapon) = catalog::weapon(id) else {
                return false;
            };
            let changed = self.settings.select_weapon(&self.player, weapon);
            if changed {
                self.save_settings();
            }
            changed
        }

        pub fn select_level(&mut self, id: &str) -> bool {
            let Some(level) = catalog::training_level(id) else {
                return false;
            };
            let changed = self.settings.select_level(&self.player, level);
            if changed {
                self.save_settings();
            }
            changed
        }

        pub fn set_aim(&mut self, x: f32, y: f32) {
            self.input.aim = Some(Vec2::new(x, y));
        }

        pub fn fire(&mut self) {
            self.input.fire = true;
        }

        pub fn reload(&mut self) {
            self.input.reload = true;
        }

        /// Let the bot play (idle/demo mode)
        pub fn set_autopilot(&mut self, on: bool) {
            self.autopilot = on.then(Autopilot::new);
        }

        /// Advance by `dt_ms` of wall time. Returns true when the run ended
        /// during this call.
        pub fn update(&mut self, dt_ms: f64) -> bool {
            let dt = (dt_ms / 1000.0).min(0.1) as f32;
            let input = match self.autopilot.as_mut() {
                Some(pilot) => pilot.plan(&self.session, dt),
                None => std::mem::take(&mut self.input),
            };
            self.session.update(&input, dt);

            let ended = self
                .session
                .drain_events()
                .iter()
                .any(|e| matches!(e, SessionEvent::Ended { .. }));
            if ended {
                self.finish();
            }
            ended
        }

        /// Navigating away: stop every timer of the current run
        pub fn dispose(&mut self) {
            self.session.dispose();
        }

        pub fn score(&self) -> u32 {
            self.session.score
        }

        pub fn ammo(&self) -> u32 {
            self.session.ammo
        }

        pub fn time_left(&self) -> u32 {
            self.session.time_left
        }

        pub fn reloading(&self) -> bool {
            self.session.is_reloading()
        }

        pub fn targets_json(&self) -> String {
            serde_json::to_string(&self.session.targets).unwrap_or_default()
        }

        pub fn player_json(&self) -> String {
            serde_json::to_string(&self.player).unwrap_or_default()
        }

        /// Report of the last finished run
        pub fn report_json(&self) -> Option<String> {
            self.last_report.clone()
        }

        pub fn avatar(&self) -> Option<String> {
            self.store.load_avatar().map(AvatarRef::into_inner)
        }

        /// Store an uploaded avatar (already encoded as a data URI)
        pub fn set_avatar(&mut self, content_type: &str, size: usize, data_uri: &str) -> Result<(), JsValue> {
            let avatar = AvatarRef::from_upload(content_type, size, data_uri)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            self.store
                .save_avatar(&avatar)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        }

        pub fn clear_avatar(&mut self) {
            if let Err(e) = self.store.clear_avatar() {
                log::warn!("Failed to clear avatar: {}", e);
            }
        }
    }

    impl RangeApp {
        /// Fold the finished run into the player and persist it
        fn finish(&mut self) {
            let Some((_, player, report)) =
                advance_session(&self.player, &mut self.session, catalog::weapons(), now_ms())
            else {
                return;
            };
            self.player = player;
            self.last_report = serde_json::to_string(&report).ok();
            if let Err(e) = self.store.save_player(&self.player) {
                log::warn!("Failed to save player: {}", e);
            }
        }

        fn save_settings(&mut self) {
            if let Err(e) = self.settings.save(self.store.store_mut()) {
                log::warn!("Failed to save settings: {}", e);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Phoenix Range (web) ready");
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use phoenix_range::catalog;
    use phoenix_range::persistence::{FileStore, KeyValueStore, MemoryStore, PlayerStore};
    use phoenix_range::platform::{clock_seed, data_dir, now_ms};
    use phoenix_range::progression::advance_session;
    use phoenix_range::sim::{Autopilot, Session, SessionEvent, SessionPhase};
    use phoenix_range::Settings;

    env_logger::init();
    log::info!("Phoenix Range (native) starting...");

    let backend: Box<dyn KeyValueStore> = match FileStore::open(data_dir()) {
        Ok(files) => {
            log::info!("Saving to {}", files.dir().display());
            Box::new(files)
        }
        Err(e) => {
            log::warn!("Cannot open save directory ({}), progress will not persist", e);
            Box::new(MemoryStore::new())
        }
    };
    let mut store = PlayerStore::new(backend);
    let player = store.load_or_default();
    let mut settings = Settings::load(store.store());

    // Optional: phoenix-range [level_id] [weapon_id]
    let mut args = std::env::args().skip(1);
    if let Some(id) = args.next() {
        match catalog::training_level(&id) {
            Some(level) if settings.select_level(&player, level) => {}
            _ => log::warn!("Level '{}' is unknown or locked", id),
        }
    }
    if let Some(id) = args.next() {
        match catalog::weapon(&id) {
            Some(weapon) if settings.select_weapon(&player, weapon) => {}
            _ => log::warn!("Weapon '{}' is unknown or locked", id),
        }
    }

    let (level, weapon) = settings.resolve(&player);

    let seed = settings.seed.unwrap_or_else(clock_seed);
    let mut session = Session::new(seed).with_end_delay(settings.end_delay_secs);
    session.start(level, weapon);

    let mut pilot = Autopilot::new();
    let dt = 1.0 / 60.0;
    let max_frames = (level.time_limit as usize + 2) * 60;
    for _ in 0..max_frames {
        let input = pilot.plan(&session, dt);
        session.update(&input, dt);
        for event in session.drain_events() {
            log::debug!("{:?}", event);
            if let SessionEvent::TargetHit { target_id, points } = event {
                println!("  hit target {} (+{})", target_id, points);
            }
        }
        if session.phase == SessionPhase::Ended {
            break;
        }
    }

    let Some((result, next, report)) =
        advance_session(&player, &mut session, catalog::weapons(), now_ms())
    else {
        log::warn!("Session did not finish");
        return;
    };

    println!("\n{} with {}", level.name, weapon.name);
    println!(
        "  score {}  accuracy {:.1}%  grade {}  time {:.1}s",
        result.score,
        result.accuracy,
        report.grade.as_str(),
        result.time_used
    );
    if report.leveled_up {
        println!("  promoted to level {} (+{} xp)", report.level, report.experience_gained);
    }
    for id in &report.new_weapons {
        println!("  unlocked weapon {}", id);
    }
    for id in &report.new_achievements {
        if let Some(def) = catalog::achievement(id) {
            println!("  {} {}", def.icon, def.name);
        }
    }

    if let Err(e) = store.save_player(&next) {
        log::error!("Failed to save player: {}", e);
    }
    if let Err(e) = settings.save(store.store_mut()) {
        log::error!("Failed to save settings: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
