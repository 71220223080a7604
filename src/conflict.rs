// Overlap checks between sections. Intervals are half-open: a class ending
// at 10:00 does not clash with one starting at 10:00.
use crate::data::{ConflictRecord, Section, TimeSlot, TimedSection};
use crate::time_codec::parse_time_slots;
use itertools::Itertools;

/// Result of checking a set of sections against each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictCheck {
    pub conflict: bool,
    pub pairs: Vec<ConflictRecord>,
}

pub fn slots_overlap(a: &TimeSlot, b: &TimeSlot) -> bool {
    a.day == b.day && !(a.end_minute <= b.start_minute || a.start_minute >= b.end_minute)
}

pub fn slot_sets_overlap(a: &[TimeSlot], b: &[TimeSlot]) -> bool {
    a.iter().any(|x| b.iter().any(|y| slots_overlap(x, y)))
}

/// True iff the two sections meet on a common day at intersecting times.
pub fn overlaps(a: &Section, b: &Section) -> bool {
    slot_sets_overlap(&parse_time_slots(&a.times_raw), &parse_time_slots(&b.times_raw))
}

fn record(a: &TimedSection, b: &TimedSection) -> ConflictRecord {
    ConflictRecord {
        section_a: a.section.clone(),
        section_b: b.section.clone(),
        slots_a: a.slots.clone(),
        slots_b: b.slots.clone(),
    }
}

/// Checks every unordered pair and records all of the clashing ones.
pub fn has_conflict(sections: &[&TimedSection]) -> ConflictCheck {
    let pairs: Vec<ConflictRecord> = sections
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| slot_sets_overlap(&a.slots, &b.slots))
        .map(|(a, b)| record(a, b))
        .collect();
    ConflictCheck {
        conflict: !pairs.is_empty(),
        pairs,
    }
}

/// Conflicts introduced by appending `added` to an already conflict-free `existing` set.
pub fn conflicts_with(existing: &[&TimedSection], added: &[&TimedSection]) -> Vec<ConflictRecord> {
    let mut pairs = Vec::new();
    for (i, new) in added.iter().enumerate() {
        for old in existing.iter().chain(added[..i].iter()) {
            if slot_sets_overlap(&old.slots, &new.slots) {
                pairs.push(record(old, new));
            }
        }
    }
    pairs
}
