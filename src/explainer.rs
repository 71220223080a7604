//! Advice for runs that produced no schedule.
//!
//! Works purely on the conflict log gathered during generation; nothing here
//! changes the student's selection.

use crate::data::{ConflictRecord, CourseId, PairConflictSummary, RemovalSuggestion};
use itertools::Itertools;
use std::collections::{BTreeSet, HashMap};

/// Ranks courses by how many logged conflicts they take part in, and lists the
/// courses each one clashes with.
///
/// A record counts once per distinct course on it, so a lecture/lab clash
/// inside one course adds one to that course. When `selected` is non-empty,
/// only those courses are suggested for removal. Ties keep first-seen order.
pub fn explain(log: &[ConflictRecord], selected: &BTreeSet<CourseId>) -> Vec<RemovalSuggestion> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for record in log {
        let a = record.section_a.course_id.as_str();
        let b = record.section_b.course_id.as_str();
        for course in [a, b].into_iter().unique() {
            if !selected.is_empty() && !selected.contains(course) {
                continue;
            }
            let count = counts.entry(course).or_insert_with(|| {
                order.push(course);
                0
            });
            *count += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = order.into_iter().map(|c| (c, counts[c])).collect();
    ranked.sort_by(|x, y| y.1.cmp(&x.1));

    ranked
        .into_iter()
        .map(|(course, conflict_count)| {
            let conflicts: Vec<ConflictRecord> =
                log.iter().filter(|r| r.involves(course)).cloned().collect();
            let resolved_courses = conflicts
                .iter()
                .flat_map(|r| [&r.section_a.course_id, &r.section_b.course_id])
                .filter(|c| c.as_str() != course)
                .unique()
                .cloned()
                .collect();
            RemovalSuggestion {
                course_id: course.to_string(),
                conflict_count,
                resolved_courses,
                conflicts,
            }
        })
        .collect()
}

/// Groups the log by unordered course pair, in first-seen order.
///
/// The slots kept for a pair are those of its first logged clash, oriented so
/// `slots_a` belongs to `courses.0`.
pub fn summarize_pairs(log: &[ConflictRecord]) -> Vec<PairConflictSummary> {
    let mut summaries: Vec<PairConflictSummary> = Vec::new();
    let mut index: HashMap<(CourseId, CourseId), usize> = HashMap::new();

    for record in log {
        let a = &record.section_a.course_id;
        let b = &record.section_b.course_id;
        let (key, slots_a, slots_b) = if a <= b {
            ((a.clone(), b.clone()), &record.slots_a, &record.slots_b)
        } else {
            ((b.clone(), a.clone()), &record.slots_b, &record.slots_a)
        };

        match index.get(&key) {
            Some(&i) => summaries[i].count += 1,
            None => {
                index.insert(key.clone(), summaries.len());
                summaries.push(PairConflictSummary {
                    courses: key,
                    count: 1,
                    slots_a: slots_a.clone(),
                    slots_b: slots_b.clone(),
                });
            }
        }
    }
    summaries
}
