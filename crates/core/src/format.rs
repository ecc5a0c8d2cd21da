use crate::transcript::Transcript;

/// Characters of transcript shown in a notification.
pub const PREVIEW_CHARS: usize = 300;

/// First `max_chars` characters of `text`, with `…` appended when anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let mut output: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        output.push('…');
    }
    output
}

/// One-line description of where a transcript came from.
pub fn describe_transcript(transcript: &Transcript) -> String {
    let kind = if transcript.is_auto_generated() {
        "auto-generated"
    } else {
        "manual"
    };
    let lang = transcript.language_code.as_deref().unwrap_or("unknown language");
    format!("{} lines, {} captions, {}", transcript.lines.len(), kind, lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_marks_truncation() {
        assert_eq!(preview("short", 300), "short");
        assert_eq!(preview("abcdef", 3), "abc…");
        assert_eq!(preview("abc", 3), "abc");
        assert_eq!(preview("ääää", 2), "ää…");
    }

    #[test]
    fn describes_source_track() {
        let transcript = Transcript {
            source_url: "u".into(),
            kind: Some("asr".into()),
            language_code: Some("en".into()),
            lines: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            describe_transcript(&transcript),
            "2 lines, auto-generated captions, en"
        );
    }
}
