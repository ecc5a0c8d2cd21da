use tracing::debug;

use crate::{
    error::Result,
    http::get_text,
    player::{HostConfig, caption_tracks, locate_player_response, select_track},
    timedtext::extract_cue_texts,
};

/// Plain-text transcript of one caption track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcript {
    /// URL of the timed-text document the lines came from.
    pub source_url: String,
    /// `Some("asr")` for auto-generated captions.
    pub kind: Option<String>,
    pub language_code: Option<String>,
    /// One entry per caption cue, in document order.
    pub lines: Vec<String>,
}

impl Transcript {
    /// Cues joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// True when the track was fetched but held no cue text.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_auto_generated(&self) -> bool {
        self.kind.as_deref() == Some(crate::player::ASR_KIND)
    }
}

/// Locate the caption track in `host`, download its timed text and flatten it.
///
/// An empty `lines` list is a successful result; every upstream failure is an error.
pub async fn extract_transcript(host: &HostConfig, client: &reqwest::Client) -> Result<Transcript> {
    let response = locate_player_response(host)?;
    let tracks = caption_tracks(response)?;
    let (track, url) = select_track(tracks)?;

    let xml = get_text(client, url).await?;
    let lines = extract_cue_texts(&xml);
    debug!(bytes = xml.len(), cues = lines.len(), "parsed timed text");

    Ok(Transcript {
        source_url: url.to_string(),
        kind: track.kind.clone(),
        language_code: track.language_code.clone(),
        lines,
    })
}
