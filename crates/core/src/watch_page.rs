use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::{
    error::{Result, TldwError},
    http::get_text,
    player::{HostConfig, PlayerResponse},
};

fn assignment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"ytInitialPlayerResponse\s*=\s*\{").unwrap())
}

/// Slice the JSON object assigned to `ytInitialPlayerResponse` out of watch-page HTML.
///
/// Braces are balanced with string literals and escapes taken into account, so a
/// `};` inside a description does not end the object early.
pub fn find_player_response_json(html: &str) -> Option<&str> {
    let start = assignment_regex().find(html)?.end() - 1;
    let bytes = html.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&html[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Download a watch page and return its embedded player response as a host config.
pub async fn fetch_host_config(client: &reqwest::Client, video_url: &str) -> Result<HostConfig> {
    let html = get_text(client, video_url).await?;
    let json = find_player_response_json(&html).ok_or_else(|| {
        TldwError::PlayerResponseNotFound {
            url: video_url.to_string(),
        }
    })?;
    debug!(bytes = json.len(), "found player response in watch page");

    let response: PlayerResponse = serde_json::from_str(json)?;
    Ok(HostConfig::from_player_response(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_balanced_object() {
        let html = r#"<script>var ytInitialPlayerResponse = {"a": {"b": "x};y{"}, "c": "q\"}"};var meta = {};</script>"#;
        assert_eq!(
            find_player_response_json(html),
            Some(r#"{"a": {"b": "x};y{"}, "c": "q\"}"}"#)
        );
    }

    #[test]
    fn missing_or_unterminated_is_none() {
        assert_eq!(find_player_response_json("<html></html>"), None);
        assert_eq!(
            find_player_response_json("ytInitialPlayerResponse = {\"a\": 1"),
            None
        );
    }

    #[test]
    fn sliced_json_parses_into_host_config() {
        let html = r#"ytInitialPlayerResponse={"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://t/1","kind":"asr"}]}}};"#;
        let json = find_player_response_json(html).unwrap();
        let response: PlayerResponse = serde_json::from_str(json).unwrap();
        let host = HostConfig::from_player_response(response);
        let located = crate::player::locate_player_response(&host).unwrap();
        let tracks = crate::player::caption_tracks(located).unwrap();
        assert!(tracks[0].is_asr());
    }
}
