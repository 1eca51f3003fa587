use crate::deeplink::translate_action;
use crate::engine::{CacheState, WallpaperEngine};
use crate::models::{
    DisplayMode, LifecycleEvent, RefreshDecision, ResolvedWallpaper, Settings, WallpaperCandidate,
    WallpaperType,
};
use crate::network::RemoteSource;
use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

/// Minimum gap between two tick-triggered fetches.
/// Avoids flicker when the host restarts the service in quick succession.
pub const COOLDOWN_WINDOW_MS: i64 = 60_000;

/// Decide what one incoming event should do.
///
/// Pure function of (event, idle-exit toggle, last update, now); no hidden
/// state. The cooldown applies to `TimeElapsed` only: idle-exit refreshes
/// are always honored when the toggle is set, even back to back. Two
/// idle-exit events in a row therefore fetch twice — deduplicating them is
/// not this function's job.
pub fn decide_refresh(
    event: LifecycleEvent,
    refresh_on_idle_exit: bool,
    last_update_ms: i64,
    now_ms: i64,
) -> RefreshDecision {
    match event {
        // Wallpaper must not change while the display is idle.
        LifecycleEvent::IdleModeChanged { is_idle: true } => RefreshDecision::Suppress,
        LifecycleEvent::IdleModeChanged { is_idle: false } => {
            if refresh_on_idle_exit {
                RefreshDecision::FetchNow
            } else {
                RefreshDecision::UseCache
            }
        }
        LifecycleEvent::TimeElapsed => {
            let elapsed = now_ms.saturating_sub(last_update_ms);
            if elapsed < COOLDOWN_WINDOW_MS {
                RefreshDecision::UseCache
            } else {
                RefreshDecision::FetchNow
            }
        }
    }
}

impl<S: RemoteSource> WallpaperEngine<S> {
    /// Resolve the wallpaper for one lifecycle event.
    ///
    /// Always returns a definite (possibly empty) list. Every fetch-path
    /// failure (transport, bad status, malformed body, empty candidate set,
    /// unconfigured URL) degrades to the cached entry; nothing propagates
    /// past this boundary.
    pub async fn resolve(&self, event: LifecycleEvent, now_ms: i64) -> Vec<ResolvedWallpaper> {
        let settings = self.prefs.load_settings();
        let cache = self.load_cache();

        let decision = decide_refresh(
            event,
            settings.refresh_on_idle_exit,
            cache.last_update_ms,
            now_ms,
        );
        debug!("[RESOLVE] Event {:?} -> {:?}", event, decision);

        match decision {
            RefreshDecision::Suppress => Vec::new(),
            RefreshDecision::UseCache => self.cached_wallpaper(&cache),
            RefreshDecision::FetchNow => {
                match self
                    .source
                    .fetch_wallpaper_status(&settings.server_url)
                    .await
                {
                    Ok(candidates) if !candidates.is_empty() => {
                        self.apply_candidates(candidates, &settings, now_ms)
                    }
                    Ok(_) => {
                        info!("[RESOLVE] Status endpoint returned no candidates, serving cache");
                        self.cached_wallpaper(&cache)
                    }
                    Err(e) => {
                        warn!("[RESOLVE] Fetch failed ({}), serving cache", e);
                        self.cached_wallpaper(&cache)
                    }
                }
            }
        }
    }

    /// Convenience wrapper for hosts that do not carry their own clock.
    pub async fn resolve_now(&self, event: LifecycleEvent) -> Vec<ResolvedWallpaper> {
        self.resolve(event, Utc::now().timestamp_millis()).await
    }

    /// Pick one candidate, translate its action reference and persist the
    /// result as the new cache entry.
    fn apply_candidates(
        &self,
        candidates: Vec<WallpaperCandidate>,
        settings: &Settings,
        now_ms: i64,
    ) -> Vec<ResolvedWallpaper> {
        // Cosmetic variety only; the pick does not need to be strong.
        let index = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..candidates.len()),
            Err(e) => {
                warn!(
                    "[RESOLVE] Rng mutex poisoned: {}. Falling back to first candidate.",
                    e
                );
                0
            }
        };
        let picked = &candidates[index];

        let action_uri = translate_action(
            picked.action_ref.as_deref(),
            settings.target_client,
            self.mapper.as_deref(),
        );

        info!(
            "[RESOLVE] Selected {:?} | Action: {:?}",
            picked.title, action_uri
        );

        if let Err(e) = self.store_cache(&CacheState {
            last_uri: picked.image_uri.clone(),
            last_author: picked.title.clone().unwrap_or_default(),
            last_action_uri: action_uri.clone().unwrap_or_default(),
            last_update_ms: now_ms,
        }) {
            // The wallpaper is still served this pass; only the persisted
            // cache misses the update and the next tick will retry.
            warn!("[RESOLVE] Failed to persist wallpaper cache: {}", e);
        }

        vec![ResolvedWallpaper {
            uri: picked.image_uri.clone(),
            kind: WallpaperType::Image,
            display_mode: DisplayMode::Crop,
            author: picked.title.clone(),
            action_uri,
        }]
    }

    /// Cache fallback: one entry when a wallpaper was ever stored, none
    /// otherwise.
    fn cached_wallpaper(&self, cache: &CacheState) -> Vec<ResolvedWallpaper> {
        if cache.last_uri.is_empty() {
            return Vec::new();
        }
        vec![ResolvedWallpaper {
            uri: cache.last_uri.clone(),
            kind: WallpaperType::Image,
            display_mode: DisplayMode::Crop,
            author: if cache.last_author.is_empty() {
                None
            } else {
                Some(cache.last_author.clone())
            },
            action_uri: if cache.last_action_uri.is_empty() {
                None
            } else {
                Some(cache.last_action_uri.clone())
            },
        }]
    }
}
