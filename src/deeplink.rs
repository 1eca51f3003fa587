//! Deep-link assembly for provider action references.
//!
//! A candidate carries an abstract action reference; the launcher needs a
//! concrete URI it can hand to the selected client application. Translation
//! is pure: no side effects, no network.

use crate::models::TargetClient;

const CATALOG_SEPARATOR: &str = "_tmdb:";
const JELLYFIN_ITEM_PREFIX: &str = "jellyfin://items/";

/// Resolves a direct media-server item reference into a playback URI for the
/// preferred player. Implemented by the host; keyed lookups only.
pub trait PlayerUriMapper: Send + Sync {
    fn uri_for_item(&self, client: TargetClient, item_id: &str) -> Option<String>;
}

/// Catalog media type after synonym folding.
#[derive(Clone, Copy, PartialEq)]
enum CatalogType {
    Movie,
    Tv,
}

/// Translate a provider action reference into a client-ready URI.
///
/// Accepted forms:
/// - `<mediaType>_tmdb:<id>` catalog reference (`movie`/`tv`, synonyms
///   `movies`/`series`; unrecognized types fold into the movie branch)
/// - `jellyfin://items/<id>` direct item reference, resolved via `mapper`
/// - any other non-empty string passes through unchanged
/// - empty or absent yields `None`
pub fn translate_action(
    action_ref: Option<&str>,
    client: TargetClient,
    mapper: Option<&dyn PlayerUriMapper>,
) -> Option<String> {
    let raw = action_ref?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some((kind, id)) = split_catalog_ref(raw) {
        return build_catalog_uri(kind, id, client);
    }

    if let Some(item_id) = raw.strip_prefix(JELLYFIN_ITEM_PREFIX) {
        if let Some(mapper) = mapper {
            if let Some(uri) = mapper.uri_for_item(client, item_id) {
                return Some(uri);
            }
        }
        // No mapping known: hand the reference through untouched.
        return Some(raw.to_string());
    }

    // Opaque URI, already client-ready.
    Some(raw.to_string())
}

fn split_catalog_ref(raw: &str) -> Option<(CatalogType, &str)> {
    let (type_part, id) = raw.split_once(CATALOG_SEPARATOR)?;
    let kind = match type_part {
        "tv" | "series" => CatalogType::Tv,
        _ => CatalogType::Movie,
    };
    Some((kind, id))
}

/// One arm per client; adding a client touches only its own branch.
fn build_catalog_uri(kind: CatalogType, id: &str, client: TargetClient) -> Option<String> {
    match client {
        TargetClient::Stremio => Some(stremio_detail_uri(kind, id)),
        TargetClient::Kodi => Some(kodi_intent_uri(kind, id)),
        // Plex and Emby have no stable catalog deep link; the wallpaper
        // shows without an action.
        TargetClient::Plex | TargetClient::Emby => None,
        TargetClient::None => None,
    }
}

fn stremio_detail_uri(kind: CatalogType, id: &str) -> String {
    let stremio_type = match kind {
        CatalogType::Tv => "series",
        CatalogType::Movie => "movie",
    };
    format!(
        "stremio:///detail/{}/tmdb:{}/tmdb:{}",
        stremio_type, id, id
    )
}

/// Kodi playback URI wrapped in the generic view-intent envelope the
/// launcher expects. Episodic content defaults to the series opener.
fn kodi_intent_uri(kind: CatalogType, id: &str) -> String {
    let media_type = match kind {
        CatalogType::Tv => "tv",
        CatalogType::Movie => "movie",
    };
    let mut plugin_url = format!(
        "plugin://plugin.video.pov/?action=play&media_type={}&tmdb_id={}",
        media_type,
        urlencoding::encode(id)
    );
    if kind == CatalogType::Tv {
        plugin_url.push_str("&season=1&episode=1");
    }
    format!(
        "intent:#Intent;action=android.intent.action.VIEW;scheme=plugin;dat={};package=org.xbmc.kodi;end",
        plugin_url
    )
}
