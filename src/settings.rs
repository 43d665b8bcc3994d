//! Player preferences
//!
//! Persisted separately from the player record in the same key/value store.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, STARTER_WEAPON, TrainingLevel, Weapon};
use crate::consts::END_DELAY_SECS;
use crate::persistence::{KeyValueStore, StorageError};
use crate::player::Player;
use crate::progression::{can_select_level, can_select_weapon};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Weapon picked on the loadout screen
    pub weapon_id: String,
    /// Training level picked on the level screen
    pub level_id: String,
    /// Pause between clearing the range and the results (seconds)
    pub end_delay_secs: f32,
    /// Fixed spawn seed (None = seed from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weapon_id: STARTER_WEAPON.to_string(),
            level_id: catalog::training_levels()[0].id.to_string(),
            end_delay_secs: END_DELAY_SECS,
            seed: None,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "phoenix-settings";

    /// Selected weapon, falling back to the starter weapon
    pub fn weapon(&self) -> &'static Weapon {
        catalog::weapon(&self.weapon_id)
            .or_else(|| catalog::weapon(STARTER_WEAPON))
            .unwrap_or(&catalog::WEAPONS[0])
    }

    /// Selected level, falling back to the first level
    pub fn level(&self) -> &'static TrainingLevel {
        catalog::training_level(&self.level_id).unwrap_or(&catalog::TRAINING_LEVELS[0])
    }

    /// Level and weapon to start a run with. Stored selections are re-checked
    /// against `player`, since the record may have been reset since they were
    /// made; locked picks fall back to the first level and the starter weapon.
    pub fn resolve(&self, player: &Player) -> (&'static TrainingLevel, &'static Weapon) {
        let mut level = self.level();
        if !can_select_level(player, level) {
            log::warn!("Level {} is locked, using {}", level.id, catalog::TRAINING_LEVELS[0].id);
            level = &catalog::TRAINING_LEVELS[0];
        }
        let mut weapon = self.weapon();
        if !can_select_weapon(player, weapon) {
            log::warn!("Weapon {} is locked, using {}", weapon.id, STARTER_WEAPON);
            weapon = catalog::weapon(STARTER_WEAPON).unwrap_or(&catalog::WEAPONS[0]);
        }
        (level, weapon)
    }

    /// Pick a weapon. Ignored unless the player has unlocked it.
    pub fn select_weapon(&mut self, player: &Player, weapon: &Weapon) -> bool {
        if !can_select_weapon(player, weapon) {
            return false;
        }
        self.weapon_id = weapon.id.to_string();
        true
    }

    /// Pick a level. Ignored unless the player's level allows it.
    pub fn select_level(&mut self, player: &Player, level: &TrainingLevel) -> bool {
        if !can_select_level(player, level) {
            return false;
        }
        self.level_id = level.id.to_string();
        true
    }

    /// Load settings, using defaults when missing or unreadable
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read settings: {}", e),
        }
        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
