//! Progression: fold a finished session into the persistent player
//!
//! Pure functions. The input player is never modified; a new record comes
//! back, so a fold is applied completely or not at all.

use serde::{Deserialize, Serialize};

use crate::catalog::{TrainingLevel, Weapon, achievement_ids};
use crate::consts::*;
use crate::player::Player;
use crate::sim::{Session, SessionResult, accuracy_percent};

/// Letter grade shown on the results screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Grade::S
        } else if accuracy >= 80.0 {
            Grade::A
        } else if accuracy >= 70.0 {
            Grade::B
        } else if accuracy >= 60.0 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

/// What a fold changed, for the results screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub grade: Grade,
    /// Enough hits to clear the level
    pub session_complete: bool,
    pub leveled_up: bool,
    pub level: u32,
    pub experience_gained: u64,
    /// Weapon ids unlocked by this fold
    pub new_weapons: Vec<String>,
    /// Achievement ids unlocked by this fold
    pub new_achievements: Vec<String>,
}

/// A session clears its level at 60% of the targets hit
pub fn is_session_complete(hits: u32, level: &TrainingLevel) -> bool {
    hits as f64 >= COMPLETION_RATIO * level.target_count as f64
}

/// Fold `result` (played on `level`) into `player`. `now` is a unix
/// timestamp in ms used for achievement stamps.
pub fn advance(
    player: &Player,
    result: &SessionResult,
    level: &TrainingLevel,
    weapons: &[Weapon],
    now: f64,
) -> Player {
    advance_with_report(player, result, level, weapons, now).0
}

/// `advance`, plus a summary of what changed
pub fn advance_with_report(
    player: &Player,
    result: &SessionResult,
    level: &TrainingLevel,
    weapons: &[Weapon],
    now: f64,
) -> (Player, ProgressReport) {
    let hits = result.hits();
    let shots = result.total_shots();
    debug_assert!(hits <= shots, "more hits than shots");
    debug_assert!(
        (accuracy_percent(hits, shots) - result.accuracy).abs() < 1e-9,
        "accuracy does not match the shot log"
    );
    debug_assert!(
        result.level_id.is_empty() || result.level_id == level.id,
        "result was played on another level"
    );

    let mut next = player.clone();
    fold_stats(&mut next, result);

    let session_complete = is_session_complete(hits, level);
    // Only the player's frontier level grants progression; replays never do
    let leveled_up = session_complete && next.level == level.unlock_level;
    let mut experience_gained = 0;
    let mut new_weapons = Vec::new();
    if leveled_up {
        next.level += 1;
        experience_gained = result.score as u64;
        next.experience += experience_gained;
        new_weapons = unlock_weapons(&mut next, weapons);
        log::info!("Player {} reached level {}", next.id, next.level);
    }

    let new_achievements = evaluate_achievements(&mut next, result, weapons, now);
    for id in &new_achievements {
        log::info!("Achievement unlocked: {}", id);
    }

    let report = ProgressReport {
        grade: Grade::from_accuracy(result.accuracy),
        session_complete,
        leveled_up,
        level: next.level,
        experience_gained,
        new_weapons,
        new_achievements,
    };
    (next, report)
}

/// Take the finished run out of `session` and fold it against the level it
/// was started on. Whatever is selected for the next run plays no part.
///
/// None if the session holds no result.
pub fn advance_session(
    player: &Player,
    session: &mut Session,
    weapons: &[Weapon],
    now: f64,
) -> Option<(SessionResult, Player, ProgressReport)> {
    let level = session.level()?.clone();
    let result = session.take_result()?;
    let (next, report) = advance_with_report(player, &result, &level, weapons, now);
    Some((result, next, report))
}

/// Fold the session into lifetime stats
fn fold_stats(player: &mut Player, result: &SessionResult) {
    let stats = &mut player.stats;
    let games = stats.games_played as f64;

    stats.total_shots += result.total_shots() as u64;
    stats.total_hits += result.hits() as u64;
    // Running mean over sessions, not lifetime hits / shots
    stats.accuracy = (stats.accuracy * games + result.accuracy) / (games + 1.0);
    stats.best_time = if stats.best_time == 0.0 {
        result.time_used
    } else {
        stats.best_time.min(result.time_used)
    };
    stats.highest_score = stats.highest_score.max(result.score);
    stats.games_played += 1;
}

/// Append every weapon the player's level now allows. Returns the new ids.
fn unlock_weapons(player: &mut Player, weapons: &[Weapon]) -> Vec<String> {
    let mut unlocked = Vec::new();
    for weapon in weapons {
        if weapon.unlock_level <= player.level && !player.has_weapon(weapon.id) {
            player.unlocked_weapons.push(weapon.id.to_string());
            unlocked.push(weapon.id.to_string());
        }
    }
    unlocked
}

/// Check each achievement independently. Already-unlocked ones are left alone.
fn evaluate_achievements(
    player: &mut Player,
    result: &SessionResult,
    weapons: &[Weapon],
    now: f64,
) -> Vec<String> {
    let all_weapons = weapons.iter().all(|w| player.has_weapon(w.id));
    let checks = [
        (achievement_ids::MARKSMAN, result.accuracy >= MARKSMAN_ACCURACY),
        (achievement_ids::PERFECT_ACCURACY, result.accuracy == 100.0),
        (achievement_ids::SPEED_SHOOTER, result.time_used <= SPEED_SHOOTER_SECS),
        (achievement_ids::FIRST_BLOOD, player.stats.games_played == 1),
        (achievement_ids::WEAPON_MASTER, all_weapons),
    ];

    checks
        .into_iter()
        .filter(|(id, earned)| *earned && player.unlock_achievement(id, now))
        .map(|(id, _)| id.to_string())
        .collect()
}

/// A weapon can be picked once unlocked
pub fn can_select_weapon(player: &Player, weapon: &Weapon) -> bool {
    player.has_weapon(weapon.id)
}

/// A level can be picked once the player's level reaches its unlock level
pub fn can_select_level(player: &Player, level: &TrainingLevel) -> bool {
    player.level >= level.unlock_level
}

/// The level after `current` in `levels`, if the player may play it
pub fn next_level<'a>(
    player: &Player,
    current: &TrainingLevel,
    levels: &'a [TrainingLevel],
) -> Option<&'a TrainingLevel> {
    let index = levels.iter().position(|l| l.id == current.id)?;
    levels
        .get(index + 1)
        .filter(|next| can_select_level(player, next))
}
