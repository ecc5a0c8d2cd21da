use std::sync::OnceLock;

use regex::Regex;

fn cue_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<text[^>]*>([^<]+)").unwrap())
}

/// Extract the text of every `<text ...>` cue in a timed-text document, in document order.
///
/// This is a tolerant scan, not an XML parse:
/// - attributes on the opening tag are skipped;
/// - HTML entities (`&amp;#39;` and friends) are returned as-is, not decoded;
/// - only the text up to the first nested tag is kept, and cues with no leading
///   text are dropped.
///
/// A document with no cues yields an empty list.
pub fn extract_cue_texts(xml: &str) -> Vec<String> {
    cue_regex()
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
