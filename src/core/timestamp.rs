// Header timestamp line: `#<date-time>` normalized to UTC

use crate::core::error::{ForceFileError, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC+0000";

// Day-first where ambiguous.
const INPUT_FORMATS: [&str; 7] = [
    "%a %b %d %H:%M:%S %Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d.%m.%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
];

// Offsets in hours east of UTC
const ZONE_ABBREVIATIONS: [(&str, i32); 19] = [
    ("UTC", 0),
    ("GMT", 0),
    ("Z", 0),
    ("WET", 0),
    ("WEST", 1),
    ("BST", 1),
    ("CET", 1),
    ("CEST", 2),
    ("EET", 2),
    ("EEST", 3),
    ("MSK", 3),
    ("EST", -5),
    ("EDT", -4),
    ("CST", -6),
    ("CDT", -5),
    ("MST", -7),
    ("MDT", -6),
    ("PST", -8),
    ("PDT", -7),
];

/// Parses the first line of a property file and returns the canonical
/// `YYYY-MM-DD HH:MM:SS UTC+0000` form.
pub fn parse_header_timestamp(line: &str) -> Result<String> {
    let raw = line
        .strip_prefix('#')
        .ok_or_else(|| ForceFileError::corrupted(line, "header line does not start with '#'"))?;

    // property files escape ':' as '\:'
    let raw = raw.replace('\\', "");

    let mut offset_seconds = 0;
    let mut tokens = Vec::new();
    for token in raw.split_whitespace() {
        match zone_offset(token) {
            Some(seconds) => offset_seconds = seconds,
            None => tokens.push(token),
        }
    }
    let stripped = tokens.join(" ");

    let naive = INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&stripped, fmt).ok())
        .ok_or_else(|| ForceFileError::corrupted(line, "unparseable header timestamp"))?;

    let offset = FixedOffset::east_opt(offset_seconds)
        .ok_or_else(|| ForceFileError::corrupted(line, "timezone offset out of range"))?;
    let local = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ForceFileError::corrupted(line, "ambiguous local time"))?;

    let utc: DateTime<Utc> = local.with_timezone(&Utc);
    Ok(utc.format(OUTPUT_FORMAT).to_string())
}

/// Seconds east of UTC when `token` names a zone. Unknown upper-case
/// abbreviations count as UTC.
fn zone_offset(token: &str) -> Option<i32> {
    if let Some(hours) = ZONE_ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, hours)| *hours)
    {
        return Some(hours * 3600);
    }

    for prefix in ["GMT", "UTC"] {
        if let Some(rest) = token.strip_prefix(prefix) {
            if let Some(seconds) = numeric_offset(rest) {
                return Some(seconds);
            }
        }
    }

    if let Some(seconds) = numeric_offset(token) {
        return Some(seconds);
    }

    let is_abbreviation = (2..=5).contains(&token.len())
        && token.chars().all(|c| c.is_ascii_uppercase());
    if is_abbreviation {
        return Some(0);
    }

    None
}

// +HHMM, -HHMM, +HH:MM, +HH
fn numeric_offset(token: &str) -> Option<i32> {
    let sign = match token.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    let digits: String = token[1..].chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}
