// ── Display formatting ──
//
// Pure helpers shared by every renderer. None of them fail: anything
// that cannot be interpreted is shown as-is.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Shown for absent values.
pub const PLACEHOLDER: &str = "-";

/// `5 Mar 2024, 09:15`
const DISPLAY_FORMAT: &str = "%-d %b %Y, %H:%M";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse the timestamp shapes the API is known to emit.
///
/// Offsets are kept as wall-clock time in the stated zone.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Human-readable timestamp, `-` when absent, the input unchanged when
/// it cannot be parsed.
pub fn format_timestamp(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|s| !s.trim().is_empty()) else {
        return PLACEHOLDER.to_owned();
    };
    parse_timestamp(raw).map_or_else(
        || raw.to_owned(),
        |dt| dt.format(DISPLAY_FORMAT).to_string(),
    )
}

/// Escape `& < > " '` so the value is inert inside generated markup.
pub fn escape_text(value: Option<&str>) -> String {
    let Some(s) = value else {
        return String::new();
    };
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The value itself, or `-` when absent or blank.
pub fn display_or_dash(value: Option<&str>) -> &str {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => PLACEHOLDER,
    }
}
