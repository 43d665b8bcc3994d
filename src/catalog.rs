//! Static reference data: weapons, training levels and achievements
//!
//! Loaded once, never mutated. Everything else refers to entries by id.

use serde::{Deserialize, Serialize};

/// Weapon class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponClass {
    Pistol,
    Rifle,
    Sniper,
}

/// A weapon definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weapon {
    pub id: &'static str,
    pub name: &'static str,
    pub class: WeaponClass,
    /// 0-100
    pub damage: u8,
    /// 0-100
    pub accuracy: u8,
    /// Rounds per minute
    pub fire_rate: u32,
    /// Seconds
    pub reload_time: f32,
    /// Magazine size (>= 1)
    pub ammo_capacity: u32,
    /// Player level required (>= 1)
    pub unlock_level: u32,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Target behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Static,
    Moving,
}

/// Environmental effect tags. Decorative only: they never change hit detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Smoke,
    Flash,
    Darkness,
}

/// A training level definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingLevel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Targets spawned per session (>= 1)
    pub target_count: u32,
    /// Whole seconds (>= 1)
    pub time_limit: u32,
    pub difficulty: Difficulty,
    /// Kinds a spawned target may take, drawn uniformly
    pub target_kinds: &'static [TargetKind],
    pub effects: &'static [Effect],
    pub unlock_level: u32,
}

/// Achievement ids known to the progression updater
pub mod achievement_ids {
    pub const MARKSMAN: &str = "marksman";
    pub const SPEED_SHOOTER: &str = "speed_shooter";
    pub const PERFECT_ACCURACY: &str = "perfect_accuracy";
    pub const FIRST_BLOOD: &str = "first_blood";
    pub const WEAPON_MASTER: &str = "weapon_master";
}

/// Catalog half of an achievement. Per-player unlock state lives on `Player`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Weapon every new player starts with
pub const STARTER_WEAPON: &str = "glock17";

pub static WEAPONS: [Weapon; 3] = [
    Weapon {
        id: "glock17",
        name: "Glock 17",
        class: WeaponClass::Pistol,
        damage: 35,
        accuracy: 85,
        fire_rate: 400,
        reload_time: 2.5,
        ammo_capacity: 17,
        unlock_level: 1,
        description: "Standard issue 9mm pistol. Reliable and accurate for basic training.",
    },
    Weapon {
        id: "m4a1",
        name: "M4A1 Carbine",
        class: WeaponClass::Rifle,
        damage: 55,
        accuracy: 90,
        fire_rate: 700,
        reload_time: 3.1,
        ammo_capacity: 30,
        unlock_level: 5,
        description: "Military assault rifle with excellent range and stopping power.",
    },
    Weapon {
        id: "barrett",
        name: "Barrett M82",
        class: WeaponClass::Sniper,
        damage: 95,
        accuracy: 98,
        fire_rate: 60,
        reload_time: 4.2,
        ammo_capacity: 10,
        unlock_level: 10,
        description: "High-powered sniper rifle for precision long-range engagements.",
    },
];

pub static TRAINING_LEVELS: [TrainingLevel; 3] = [
    TrainingLevel {
        id: "basic1",
        name: "Basic Training I",
        description: "5 static targets, 30 seconds",
        target_count: 5,
        time_limit: 30,
        difficulty: Difficulty::Easy,
        target_kinds: &[TargetKind::Static],
        effects: &[],
        unlock_level: 1,
    },
    TrainingLevel {
        id: "basic2",
        name: "Basic Training II",
        description: "8 mixed targets, 45 seconds",
        target_count: 8,
        time_limit: 45,
        difficulty: Difficulty::Medium,
        target_kinds: &[TargetKind::Static, TargetKind::Moving],
        effects: &[],
        unlock_level: 2,
    },
    TrainingLevel {
        id: "advanced1",
        name: "Advanced Training",
        description: "12 targets with distractions",
        target_count: 12,
        time_limit: 60,
        difficulty: Difficulty::Hard,
        target_kinds: &[TargetKind::Static, TargetKind::Moving],
        effects: &[Effect::Smoke, Effect::Flash],
        unlock_level: 3,
    },
];

pub static ACHIEVEMENTS: [AchievementDef; 5] = [
    AchievementDef {
        id: achievement_ids::MARKSMAN,
        name: "Marksman",
        description: "Achieve 90% accuracy in a training session",
        icon: "🎯",
    },
    AchievementDef {
        id: achievement_ids::SPEED_SHOOTER,
        name: "Speed Shooter",
        description: "Complete a level in under 20 seconds",
        icon: "⚡",
    },
    AchievementDef {
        id: achievement_ids::PERFECT_ACCURACY,
        name: "Perfect Accuracy",
        description: "Hit all targets without missing",
        icon: "💯",
    },
    AchievementDef {
        id: achievement_ids::FIRST_BLOOD,
        name: "First Blood",
        description: "Complete your first training session",
        icon: "🩸",
    },
    AchievementDef {
        id: achievement_ids::WEAPON_MASTER,
        name: "Weapon Master",
        description: "Unlock all weapons",
        icon: "🔫",
    },
];

pub fn weapons() -> &'static [Weapon] {
    &WEAPONS
}

pub fn training_levels() -> &'static [TrainingLevel] {
    &TRAINING_LEVELS
}

pub fn achievements() -> &'static [AchievementDef] {
    &ACHIEVEMENTS
}

pub fn weapon(id: &str) -> Option<&'static Weapon> {
    WEAPONS.iter().find(|w| w.id == id)
}

pub fn training_level(id: &str) -> Option<&'static TrainingLevel> {
    TRAINING_LEVELS.iter().find(|l| l.id == id)
}

pub fn achievement(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        for (i, w) in WEAPONS.iter().enumerate() {
            assert!(WEAPONS[i + 1..].iter().all(|o| o.id != w.id));
        }
        for (i, l) in TRAINING_LEVELS.iter().enumerate() {
            assert!(TRAINING_LEVELS[i + 1..].iter().all(|o| o.id != l.id));
        }
        for (i, a) in ACHIEVEMENTS.iter().enumerate() {
            assert!(ACHIEVEMENTS[i + 1..].iter().all(|o| o.id != a.id));
        }
    }

    #[test]
    fn test_catalog_ranges() {
        for w in weapons() {
            assert!(w.damage <= 100 && w.accuracy <= 100);
            assert!(w.ammo_capacity >= 1);
            assert!(w.unlock_level >= 1);
        }
        for l in training_levels() {
            assert!(l.target_count >= 1);
            assert!(l.time_limit >= 1);
            assert!(!l.target_kinds.is_empty());
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(weapon("m4a1").map(|w| w.ammo_capacity), Some(30));
        assert_eq!(training_level("basic2").map(|l| l.unlock_level), Some(2));
        assert!(achievement("first_blood").is_some());
        assert!(weapon("bazooka").is_none());
        assert!(weapon(STARTER_WEAPON).is_some());
    }
}
