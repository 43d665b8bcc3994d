//! Persistent player record
//!
//! The only state that outlives a session. Achievement names and icons stay
//! in the catalog; the player carries just the per-id unlock state.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{self, STARTER_WEAPON};

/// Lifetime shooting statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub total_shots: u64,
    pub total_hits: u64,
    /// Mean of per-session accuracies, weighted by game count
    pub accuracy: f64,
    /// Fastest time used in seconds (0 = unset)
    pub best_time: f64,
    pub highest_score: u32,
    pub games_played: u32,
}

/// Per-player state of one catalog achievement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementState {
    /// Only ever goes false -> true
    pub unlocked: bool,
    /// Unix timestamp (ms) of the unlock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<f64>,
}

/// The persistent player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    /// >= 1, only increases
    pub level: u32,
    /// Only increases
    pub experience: u64,
    /// Weapon ids in unlock order, no duplicates
    pub unlocked_weapons: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_achievements")]
    pub achievements: BTreeMap<String, AchievementState>,
    #[serde(default)]
    pub stats: PlayerStats,
}

/// `achievements` as stored: the id-keyed map, or the older list of full
/// achievement objects (`{"id", "name", ..., "unlocked", "unlockedAt"}`)
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAchievements {
    Map(BTreeMap<String, AchievementState>),
    List(Vec<ListedAchievement>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListedAchievement {
    id: String,
    #[serde(default)]
    unlocked: bool,
    #[serde(default)]
    unlocked_at: Option<Stamp>,
}

/// Unlock time: unix ms, or an ISO 8601 UTC string in list records
#[derive(Deserialize)]
#[serde(untagged)]
enum Stamp {
    Millis(f64),
    Iso(String),
}

impl Stamp {
    fn to_millis(&self) -> Option<f64> {
        match self {
            Stamp::Millis(ms) => Some(*ms),
            Stamp::Iso(text) => iso_to_unix_ms(text),
        }
    }
}

fn deserialize_achievements<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, AchievementState>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StoredAchievements::deserialize(deserializer)? {
        StoredAchievements::Map(map) => map,
        StoredAchievements::List(list) => list
            .into_iter()
            .map(|a| {
                let unlocked_at = if a.unlocked {
                    a.unlocked_at.as_ref().and_then(Stamp::to_millis)
                } else {
                    None
                };
                let state = AchievementState {
                    unlocked: a.unlocked,
                    unlocked_at,
                };
                (a.id, state)
            })
            .collect(),
    })
}

/// Parse `YYYY-MM-DDTHH:MM:SS[.sss]Z` into unix milliseconds
fn iso_to_unix_ms(text: &str) -> Option<f64> {
    let (date, time) = text.strip_suffix('Z')?.split_once('T')?;
    let mut ymd = date.splitn(3, '-').map(|p| p.parse::<i64>().ok());
    let (year, month, day) = (ymd.next()??, ymd.next()??, ymd.next()??);
    let mut hms = time.splitn(3, ':');
    let hour: i64 = hms.next()?.parse().ok()?;
    let minute: i64 = hms.next()?.parse().ok()?;
    let second: f64 = hms.next()?.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    // Days since 1970-01-01 in the proleptic Gregorian calendar
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let doy = (153 * ((month + 9) % 12) + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    let days = era * 146_097 + doe - 719_468;

    let whole = days * 86_400 + hour * 3_600 + minute * 60;
    Some((whole as f64 + second) * 1000.0)
}

impl Default for Player {
    fn default() -> Self {
        Self {
            id: "phoenix".to_string(),
            name: "Marcus \"Phoenix\" Rivera".to_string(),
            level: 1,
            experience: 0,
            unlocked_weapons: vec![STARTER_WEAPON.to_string()],
            achievements: catalog::achievements()
                .iter()
                .map(|a| (a.id.to_string(), AchievementState::default()))
                .collect(),
            stats: PlayerStats::default(),
        }
    }
}

impl Player {
    pub fn has_weapon(&self, weapon_id: &str) -> bool {
        self.unlocked_weapons.iter().any(|w| w == weapon_id)
    }

    pub fn is_unlocked(&self, achievement_id: &str) -> bool {
        self.achievements
            .get(achievement_id)
            .is_some_and(|a| a.unlocked)
    }

    /// Unlock an achievement, stamping `now`. Returns false if it was already
    /// unlocked (the original stamp is kept).
    pub fn unlock_achievement(&mut self, achievement_id: &str, now: f64) -> bool {
        let state = self.achievements.entry(achievement_id.to_string()).or_default();
        if state.unlocked {
            return false;
        }
        state.unlocked = true;
        state.unlocked_at = Some(now);
        true
    }

    /// Unlocked achievement ids in catalog order
    pub fn unlocked_achievements(&self) -> Vec<&'static str> {
        catalog::achievements()
            .iter()
            .filter(|a| self.is_unlocked(a.id))
            .map(|a| a.id)
            .collect()
    }

    /// Repair a record loaded from storage: add missing catalog achievements
    /// (locked), make sure the starter weapon is present, drop duplicate
    /// weapon ids and keep the level at least 1.
    pub fn normalize(&mut self) {
        for def in catalog::achievements() {
            self.achievements.entry(def.id.to_string()).or_default();
        }
        if !self.has_weapon(STARTER_WEAPON) {
            self.unlocked_weapons.insert(0, STARTER_WEAPON.to_string());
        }
        let mut seen = Vec::with_capacity(self.unlocked_weapons.len());
        self.unlocked_weapons.retain(|w| {
            if seen.contains(w) {
                false
            } else {
                seen.push(w.clone());
                true
            }
        });
        self.level = self.level.max(1);
    }
}
