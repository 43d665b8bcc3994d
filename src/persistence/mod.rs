//! Save/load of the player record and avatar
//!
//! Features:
//! - JSON player document under a fixed key
//! - Separately keyed avatar reference
//! - Corruption detection and recovery to the default player

pub mod avatar;
pub mod store;

pub use avatar::{AvatarRef, validate_avatar_upload};
pub use store::{FileStore, KeyValueStore, MemoryStore};
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;

use crate::player::Player;

/// Storage key of the player document
pub const PLAYER_KEY: &str = "phoenix-player";
/// Storage key of the avatar reference
pub const AVATAR_KEY: &str = "phoenix-avatar";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode record: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvatarError {
    #[error("not an image: {0}")]
    NotAnImage(String),
    #[error("image is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },
}

/// Gateway between the game and the key/value store
#[derive(Debug, Clone)]
pub struct PlayerStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PlayerStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Load the saved player. None if nothing is stored; a corrupt or
    /// unreadable record is replaced by the default player.
    pub fn load_player(&self) -> Option<Player> {
        let json = match self.store.get(PLAYER_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read player data: {}", e);
                return Some(Player::default());
            }
        };

        match serde_json::from_str::<Player>(&json) {
            Ok(mut player) => {
                player.normalize();
                log::info!("Loaded player {} (level {})", player.id, player.level);
                Some(player)
            }
            Err(e) => {
                log::warn!("Failed to load player data, starting fresh: {}", e);
                Some(Player::default())
            }
        }
    }

    /// Startup load: the saved player or a new one
    pub fn load_or_default(&self) -> Player {
        self.load_player().unwrap_or_else(|| {
            log::info!("No saved player, starting fresh");
            Player::default()
        })
    }

    pub fn save_player(&mut self, player: &Player) -> Result<(), StorageError> {
        let json = serde_json::to_string(player)?;
        self.store.set(PLAYER_KEY, &json)?;
        log::info!("Player saved (level {}, {} games)", player.level, player.stats.games_played);
        Ok(())
    }

    pub fn load_avatar(&self) -> Option<AvatarRef> {
        match self.store.get(AVATAR_KEY) {
            Ok(value) => value.filter(|v| !v.is_empty()).map(AvatarRef::new),
            Err(e) => {
                log::warn!("Failed to read avatar: {}", e);
                None
            }
        }
    }

    pub fn save_avatar(&mut self, avatar: &AvatarRef) -> Result<(), StorageError> {
        self.store.set(AVATAR_KEY, avatar.as_str())
    }

    pub fn clear_avatar(&mut self) -> Result<(), StorageError> {
        self.store.remove(AVATAR_KEY)
    }
}
