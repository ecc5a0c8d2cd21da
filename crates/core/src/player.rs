//! Partial schema of the player configuration a YouTube watch page exposes.
//!
//! The host gives no guarantees about this object, so every field is optional and
//! deserialized leniently: a field of the wrong type reads as absent instead of
//! failing the whole document. Lookups walk the schema with `Option` chains and only
//! turn absence into an error at the point where no usable path is left.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use tracing::debug;

use crate::error::{Result, TldwError};

/// Track kind YouTube uses for automatic speech recognition captions.
pub const ASR_KIND: &str = "asr";

/// The window-level globals a watch page may define.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct HostConfig {
    /// Modern shape: `window.ytInitialPlayerResponse`.
    #[serde(
        rename = "ytInitialPlayerResponse",
        default,
        deserialize_with = "lenient"
    )]
    pub initial_player_response: Option<PlayerResponse>,

    /// Legacy shape: `window.ytplayer.config.args.raw_player_response`.
    #[serde(default, deserialize_with = "lenient")]
    pub ytplayer: Option<LegacyPlayer>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LegacyPlayer {
    #[serde(default, deserialize_with = "lenient")]
    pub config: Option<LegacyConfig>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LegacyConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub args: Option<LegacyArgs>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LegacyArgs {
    #[serde(default, deserialize_with = "lenient")]
    pub raw_player_response: Option<PlayerResponse>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlayerResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub captions: Option<Captions>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Captions {
    #[serde(
        rename = "playerCaptionsTracklistRenderer",
        default,
        deserialize_with = "lenient"
    )]
    pub tracklist: Option<CaptionTracklist>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CaptionTracklist {
    #[serde(rename = "captionTracks", default, deserialize_with = "lenient_tracks")]
    pub caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CaptionTrack {
    #[serde(default, deserialize_with = "lenient")]
    pub kind: Option<String>,

    #[serde(rename = "baseUrl", default, deserialize_with = "lenient")]
    pub base_url: Option<String>,

    #[serde(rename = "languageCode", default, deserialize_with = "lenient")]
    pub language_code: Option<String>,
}

impl CaptionTrack {
    pub fn is_asr(&self) -> bool {
        self.kind.as_deref() == Some(ASR_KIND)
    }
}

/// Deserialize into `T`, reading `null` or a mismatched shape as `None`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Read a track list element by element. A malformed entry becomes an empty track so
/// the positions of the others, and "first track" fallback, are unchanged.
fn lenient_tracks<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<CaptionTrack>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let Ok(items) = serde_json::from_value::<Vec<serde_json::Value>>(value) else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
    ))
}

impl HostConfig {
    /// Parse a window-shaped JSON object. Unknown or malformed fields are ignored.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Wrap a player response scraped from elsewhere as the modern host shape.
    pub fn from_player_response(response: PlayerResponse) -> Self {
        Self {
            initial_player_response: Some(response),
            ytplayer: None,
        }
    }

    fn legacy_player_response(&self) -> Option<&PlayerResponse> {
        self.ytplayer
            .as_ref()?
            .config
            .as_ref()?
            .args
            .as_ref()?
            .raw_player_response
            .as_ref()
    }
}

impl PlayerResponse {
    fn caption_tracks(&self) -> Option<&[CaptionTrack]> {
        self.captions
            .as_ref()?
            .tracklist
            .as_ref()?
            .caption_tracks
            .as_deref()
    }
}

/// Pick the first present player response: modern shape first, then legacy.
pub fn locate_player_response(host: &HostConfig) -> Result<&PlayerResponse> {
    host.initial_player_response
        .as_ref()
        .or_else(|| host.legacy_player_response())
        .ok_or(TldwError::ConfigNotFound)
}

/// Caption tracks listed by the player, failing when the list is absent or empty.
pub fn caption_tracks(response: &PlayerResponse) -> Result<&[CaptionTrack]> {
    match response.caption_tracks() {
        Some(tracks) if !tracks.is_empty() => Ok(tracks),
        _ => Err(TldwError::NoCaptions),
    }
}

/// Prefer the auto-generated track, otherwise take the first one listed.
///
/// Returns the chosen track together with its URL; a chosen track without a
/// non-empty `baseUrl` is rejected rather than falling through to another track.
pub fn select_track(tracks: &[CaptionTrack]) -> Result<(&CaptionTrack, &str)> {
    let track = tracks
        .iter()
        .find(|t| t.is_asr())
        .or_else(|| tracks.first())
        .ok_or(TldwError::NoCaptions)?;

    let url = track
        .base_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or(TldwError::InvalidTrack)?;

    debug!(
        kind = track.kind.as_deref().unwrap_or("manual"),
        lang = track.language_code.as_deref().unwrap_or("?"),
        "selected caption track"
    );
    Ok((track, url))
}
