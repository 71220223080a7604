use crate::conflict::conflicts_with;
use crate::data::{Combination, ConflictRecord, CourseGroup, DoctorPreference, Section, TimedSection};
use crate::time_codec::parse_time_slots;
use log::{debug, info, trace};
use std::collections::HashMap;
use std::time::Instant;

/// State owned by one generation run. A fresh context per run keeps the
/// conflict log of independent runs apart.
#[derive(Debug, Default)]
pub struct GenerationContext {
    conflicts: Vec<ConflictRecord>,
    extensions_tried: usize,
    extensions_pruned: usize,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conflicts logged while extending partial combinations.
    pub fn conflicts(&self) -> &[ConflictRecord] {
        &self.conflicts
    }

    pub fn into_conflicts(self) -> Vec<ConflictRecord> {
        self.conflicts
    }

    pub fn extensions_tried(&self) -> usize {
        self.extensions_tried
    }

    pub fn extensions_pruned(&self) -> usize {
        self.extensions_pruned
    }

    fn reset(&mut self) {
        self.conflicts.clear();
        self.extensions_tried = 0;
        self.extensions_pruned = 0;
    }
}

/// Sections with no declared time cannot be placed on a timetable.
fn admissible<'a>(
    sections: &'a [Section],
    pref: Option<&'a DoctorPreference>,
) -> impl Iterator<Item = &'a Section> + 'a {
    sections
        .iter()
        .filter(move |s| s.has_declared_times() && pref.is_none_or(|p| p.admits(s)))
}

/// Candidate picks for one course, as indices into the run's section arena.
fn course_picks(
    group: &CourseGroup,
    pref: Option<&DoctorPreference>,
    arena: &mut Vec<TimedSection>,
) -> Vec<Vec<usize>> {
    let mut place = |section: &Section| {
        arena.push(TimedSection {
            section: section.clone(),
            slots: parse_time_slots(&section.times_raw),
        });
        arena.len() - 1
    };

    let lectures: Vec<usize> = admissible(&group.lectures, pref).map(&mut place).collect();
    let labs: Vec<usize> = admissible(&group.labs, pref).map(&mut place).collect();

    if group.labs.is_empty() {
        lectures.into_iter().map(|lec| vec![lec]).collect()
    } else if group.lectures.is_empty() {
        labs.into_iter().map(|lab| vec![lab]).collect()
    } else {
        lectures
            .iter()
            .flat_map(|&lec| labs.iter().map(move |&lab| vec![lec, lab]))
            .collect()
    }
}

/// Enumerates every conflict-free combination covering all `groups`.
///
/// Courses are processed in the given order. Each partial combination is
/// extended with every admissible pick of the next course and the extension
/// is checked immediately; clashing extensions are dropped and their pairs go
/// to `ctx`'s conflict log. An empty result is a normal outcome.
pub fn generate(
    groups: &[CourseGroup],
    prefs: &HashMap<String, DoctorPreference>,
    ctx: &mut GenerationContext,
) -> Vec<Combination> {
    ctx.reset();
    let start_time = Instant::now();

    if groups.is_empty() {
        return Vec::new();
    }

    let mut arena: Vec<TimedSection> = Vec::new();
    let mut frontier: Vec<Vec<usize>> = vec![Vec::new()];

    for group in groups {
        let picks = course_picks(group, prefs.get(&group.course_id), &mut arena);
        trace!(
            "Course {}: {} candidate picks against {} partial combinations",
            group.course_id,
            picks.len(),
            frontier.len()
        );

        let mut next = Vec::with_capacity(frontier.len() * picks.len().max(1));
        for partial in &frontier {
            let existing: Vec<&TimedSection> = partial.iter().map(|&i| &arena[i]).collect();
            for pick in &picks {
                ctx.extensions_tried += 1;
                let added: Vec<&TimedSection> = pick.iter().map(|&i| &arena[i]).collect();
                let clashes = conflicts_with(&existing, &added);
                if clashes.is_empty() {
                    let mut extended = partial.clone();
                    extended.extend_from_slice(pick);
                    next.push(extended);
                } else {
                    ctx.extensions_pruned += 1;
                    ctx.conflicts.extend(clashes);
                }
            }
        }
        frontier = next;

        if frontier.is_empty() {
            debug!("No partial combination survives course {}", group.course_id);
            break;
        }
    }

    let combinations: Vec<Combination> = frontier
        .into_iter()
        .map(|indices| Combination {
            sections: indices.into_iter().map(|i| arena[i].clone()).collect(),
        })
        .collect();

    info!(
        "Generated {} combinations for {} courses in {:.2?} ({} extensions tried, {} pruned, {} conflicts logged)",
        combinations.len(),
        groups.len(),
        start_time.elapsed(),
        ctx.extensions_tried,
        ctx.extensions_pruned,
        ctx.conflicts.len()
    );
    combinations
}
