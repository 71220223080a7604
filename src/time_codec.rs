//! Codec for the registration system's encoded meeting-time strings.
//!
//! A times string is a list of meeting entries separated by `@n`. Each entry is
//!
//! ```text
//! <day digits separated by spaces> @t H:MM <p> - H:MM <p> [@r <room>]
//! ```
//!
//! where `<p>` is one of the two period glyphs (`ص` before noon, `م` after).
//! Example: `1 3@t 8:00 ص - 9:40 ص@r 2-104@n2@t 1:00 م - 2:40 م`.
//!
//! Parsing is lenient at entry granularity: a broken entry is logged and
//! skipped, the rest of the string still yields slots.

use crate::data::{Day, FIRST_DAY, LAST_DAY, Minute, TimeSlot};
use log::{debug, warn};
use std::fmt;

pub const ENTRY_SEPARATOR: &str = "@n";
pub const TIME_MARKER: &str = "@t";
pub const ROOM_MARKER: &str = "@r";
pub const AM_GLYPH: char = 'ص';
pub const PM_GLYPH: char = 'م';

/// Same-day slots separated by at most this many minutes are one occupied block.
pub const MERGE_GAP_MINUTES: Minute = 10;

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Am,
    Pm,
}

/// Why a single meeting entry was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    NoDays,
    MissingTimeRange,
    MalformedTime(String),
    EmptyRange { start: Minute, end: Minute },
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryError::NoDays => write!(f, "no day digits"),
            EntryError::MissingTimeRange => write!(f, "missing '{}' time range", TIME_MARKER),
            EntryError::MalformedTime(tok) => write!(f, "malformed time '{}'", tok),
            EntryError::EmptyRange { start, end } => {
                write!(f, "start {} is not before end {}", start, end)
            }
        }
    }
}

/// Parses an encoded times string into merged, sorted slots.
///
/// Empty or blank input yields no slots; that is a course without fixed
/// meeting times, not an error.
pub fn parse_time_slots(raw: &str) -> Vec<TimeSlot> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for entry in raw.split(ENTRY_SEPARATOR) {
        match parse_entry(entry) {
            Ok(entry_slots) => slots.extend(entry_slots),
            Err(EntryError::NoDays) => debug!("Ignoring entry without days: {:?}", entry.trim()),
            Err(e) => warn!("Skipping meeting entry {:?}: {}", entry.trim(), e),
        }
    }
    merge_slots(slots)
}

/// Expands one meeting entry into a slot per supported day.
pub fn parse_entry(entry: &str) -> Result<Vec<TimeSlot>, EntryError> {
    let (days_part, rest) = match entry.find(TIME_MARKER) {
        Some(idx) => (&entry[..idx], Some(&entry[idx + TIME_MARKER.len()..])),
        None => (entry, None),
    };

    let days: Vec<u32> = days_part
        .split_whitespace()
        .filter_map(|tok| tok.parse::<u32>().ok())
        .collect();
    if days.is_empty() {
        return Err(EntryError::NoDays);
    }

    let rest = rest.ok_or(EntryError::MissingTimeRange)?;
    // The range runs up to the room marker (or any other in-band marker).
    let range = rest.split('@').next().unwrap_or_default();
    let (start, end) = parse_range(range)?;

    Ok(days
        .into_iter()
        .filter(|d| (FIRST_DAY as u32..=LAST_DAY as u32).contains(d))
        .map(|d| TimeSlot {
            day: d as Day,
            start_minute: start,
            end_minute: end,
        })
        .collect())
}

/// Parses `H:MM <p> - H:MM <p>` into a half-open minute interval.
pub fn parse_range(range: &str) -> Result<(Minute, Minute), EntryError> {
    let (start_tok, end_tok) = range
        .split_once('-')
        .ok_or_else(|| EntryError::MalformedTime(range.trim().to_string()))?;
    let start = parse_clock(start_tok)?;
    let end = parse_clock(end_tok)?;
    if start >= end {
        return Err(EntryError::EmptyRange { start, end });
    }
    Ok((start, end))
}

/// Converts `H:MM <p>` to minutes since midnight.
pub fn parse_clock(token: &str) -> Result<Minute, EntryError> {
    let malformed = || EntryError::MalformedTime(token.trim().to_string());
    let token = token.trim();

    let (clock, period) = if let Some(clock) = token.strip_suffix(AM_GLYPH) {
        (clock, Period::Am)
    } else if let Some(clock) = token.strip_suffix(PM_GLYPH) {
        (clock, Period::Pm)
    } else {
        return Err(malformed());
    };

    let (hours, minutes) = clock.trim().split_once(':').ok_or_else(malformed)?;
    let hours: u32 = hours.parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.parse().map_err(|_| malformed())?;
    // 12-hour clock: anything past 12 is not a clock reading.
    if hours > 12 || minutes >= 60 {
        return Err(malformed());
    }

    let mut total = hours * 60 + minutes;
    match period {
        Period::Pm if hours != 12 => total += 12 * 60,
        Period::Am if hours == 12 => total -= 12 * 60,
        _ => {}
    }
    if total >= MINUTES_PER_DAY {
        return Err(malformed());
    }
    Ok(total as Minute)
}

/// Sorts slots by (day, start) and fuses back-to-back or nested blocks.
///
/// Applying it to its own output is a no-op.
pub fn merge_slots(mut slots: Vec<TimeSlot>) -> Vec<TimeSlot> {
    slots.sort();

    let mut merged: Vec<TimeSlot> = Vec::with_capacity(slots.len());
    for slot in slots {
        match merged.last_mut() {
            Some(current)
                if current.day == slot.day
                    && (slot.start_minute <= current.end_minute + MERGE_GAP_MINUTES
                        || slot.end_minute <= current.end_minute) =>
            {
                current.end_minute = current.end_minute.max(slot.end_minute);
            }
            _ => merged.push(slot),
        }
    }
    merged
}

/// Renders minutes since midnight as a 12-hour clock with a period glyph, e.g. `1:30 م`.
pub fn format_minutes(minutes: Minute) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    let glyph = if hours >= 12 { PM_GLYPH } else { AM_GLYPH };
    let display = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display, mins, glyph)
}

/// Encodes slots back into the wire format (one entry per slot, no rooms).
pub fn encode_slots(slots: &[TimeSlot]) -> String {
    slots
        .iter()
        .map(|s| {
            format!(
                "{}{} {} - {}",
                s.day,
                TIME_MARKER,
                format_minutes(s.start_minute),
                format_minutes(s.end_minute)
            )
        })
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}
