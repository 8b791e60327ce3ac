//! Timestamped lyric text parsing.
//!
//! Recognizes one LRC-style grammar: a line starting with `[MM:SS.CC]`
//! followed by the lyric text. Anything else is dropped without error.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::LyricFormat;

/// Regex matching a leading `[MM:SS.CC]` tag and capturing the remainder.
#[allow(clippy::expect_used)]
static RE_LRC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{2}):(\d{2})\.(\d{2})\](.*)$").expect("valid regex: RE_LRC_LINE")
});

/// A single lyric line with its start offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricLine {
    /// Offset from the start of the track, in milliseconds.
    pub time_ms: u64,
    /// Lyric text with the leading tag removed and surrounding whitespace trimmed.
    pub text: String,
}

impl LyricLine {
    /// Create a line at `time_ms`.
    pub fn new(time_ms: u64, text: impl Into<String>) -> Self {
        Self { time_ms, text: text.into() }
    }
}

/// Parse `raw` according to its declared format.
///
/// Only the synchronized LRC formats produce lines; every other format yields
/// an empty sequence.
pub fn parse(raw: &str, format: LyricFormat) -> Vec<LyricLine> {
    if !format.is_synchronized() {
        return Vec::new();
    }
    parse_lrc(raw)
}

/// Parse LRC text into lines sorted by time.
///
/// Lines with equal timestamps keep their input order.
pub fn parse_lrc(raw: &str) -> Vec<LyricLine> {
    let mut lines: Vec<LyricLine> = raw.split('\n').filter_map(parse_line).collect();
    lines.sort_by_key(|line| line.time_ms);

    tracing::debug!("Parsed {} lyric lines", lines.len());
    lines
}

fn parse_line(line: &str) -> Option<LyricLine> {
    let caps = RE_LRC_LINE.captures(line.trim())?;
    let minutes: u64 = caps[1].parse().ok()?;
    let seconds: u64 = caps[2].parse().ok()?;
    let centis: u64 = caps[3].parse().ok()?;

    Some(LyricLine {
        time_ms: minutes * 60_000 + seconds * 1_000 + centis * 10,
        text: caps[4].trim().to_string(),
    })
}

/// Format a millisecond offset as `mm:ss`, or `h:mm:ss` from one hour on.
pub fn format_time(ms: u64) -> String {
    let total_secs = ms / 1_000;
    let (hours, minutes, seconds) = (total_secs / 3_600, (total_secs / 60) % 60, total_secs % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Format a millisecond offset as an LRC tag, `[MM:SS.CC]`.
pub fn format_tag(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms / 1_000) % 60;
    let centis = (ms % 1_000) / 10;
    format!("[{minutes:02}:{seconds:02}.{centis:02}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorders_by_time() {
        let lines = parse_lrc("[00:01.50]Hello\n[00:00.00]World");
        assert_eq!(
            lines,
            vec![LyricLine::new(0, "World"), LyricLine::new(1_500, "Hello")]
        );
    }

    #[test]
    fn test_no_timestamp_is_empty() {
        assert!(parse_lrc("no timestamp here").is_empty());
        assert!(parse_lrc("").is_empty());
    }

    #[test]
    fn test_centiseconds_scale_by_ten() {
        let lines = parse_lrc("[02:03.45]x");
        assert_eq!(lines[0].time_ms, 2 * 60_000 + 3_000 + 450);
    }

    #[test]
    fn test_trailing_brackets_stay_in_text() {
        let lines = parse_lrc("  [00:10.00]  [00:12.00]echo [ad-lib]  \r");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "[00:12.00]echo [ad-lib]");
    }

    #[test]
    fn test_malformed_lines_dropped() {
        let raw = "[ar:Someone]\n[0:01.00]short minutes\n[00:01.5]short centis\nplain [00:02.00]late tag\n[00:03.00]ok";
        let lines = parse_lrc(raw);
        assert_eq!(lines, vec![LyricLine::new(3_000, "ok")]);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let lines = parse_lrc("[00:05.00]b\n[00:01.00]a\n[00:05.00]c");
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn test_unsynchronized_formats_yield_nothing() {
        let raw = "[00:01.00]line";
        assert!(parse(raw, LyricFormat::None).is_empty());
        assert!(parse(raw, LyricFormat::Srt).is_empty());
        assert!(parse(raw, LyricFormat::Ass).is_empty());
        assert_eq!(parse(raw, LyricFormat::LrcEsLyric).len(), 1);
        assert_eq!(parse(raw, LyricFormat::LrcWordByWord).len(), 1);
    }

    #[test]
    fn test_output_sorted_for_arbitrary_input() {
        let raw = "[00:09.99]a\n[01:00.00]b\n[00:00.01]c\nx\n[00:09.99]d\n[00:30.00]e";
        let lines = parse_lrc(raw);
        assert_eq!(lines.len(), 5);
        assert!(lines.windows(2).all(|w| w[0].time_ms <= w[1].time_ms));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(61_999), "01:01");
        assert_eq!(format_time(3_600_000), "1:00:00");
        assert_eq!(format_time(3_725_000), "1:02:05");
    }

    #[test]
    fn test_format_tag() {
        assert_eq!(format_tag(1_500), "[00:01.50]");
        assert_eq!(format_tag(123_450), "[02:03.45]");
    }
}
