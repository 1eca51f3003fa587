use crate::database::Database;
use crate::deeplink::PlayerUriMapper;
use crate::network::RemoteSource;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

mod core;
mod db;

pub use self::core::{decide_refresh, COOLDOWN_WINDOW_MS};

/// Persisted wallpaper cache fields.
/// Overwritten only after a successful fetch; monotonic in `last_update_ms`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheState {
    pub last_uri: String,
    pub last_author: String,
    pub last_action_uri: String,
    pub last_update_ms: i64,
}

/// Wallpaper resolution engine — the single entry point for the host.
///
/// Holds the preference store, the remote status source and the candidate
/// selection rng. The host serializes calls: at most one `resolve` is in
/// flight at a time.
pub struct WallpaperEngine<S> {
    pub(crate) prefs: Arc<Database>,
    pub(crate) source: S,
    pub(crate) mapper: Option<Box<dyn PlayerUriMapper>>,
    pub(crate) rng: Mutex<StdRng>,
}

impl<S: RemoteSource> WallpaperEngine<S> {
    pub fn new(prefs: Arc<Database>, source: S) -> Self {
        Self {
            prefs,
            source,
            mapper: None,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic candidate selection (tests and reproduction runs).
    pub fn new_seeded(prefs: Arc<Database>, source: S, seed: u64) -> Self {
        Self {
            prefs,
            source,
            mapper: None,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Attach the host's media-server URI mapping collaborator.
    pub fn with_player_mapper(mut self, mapper: Box<dyn PlayerUriMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }
}
