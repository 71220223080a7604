use crate::data::{
    Combination, ConflictRecord, CourseGroup, CourseId, Day, DoctorPreference, FIRST_DAY, LAST_DAY,
    Objective, PairConflictSummary, RemovalImpact, RemovalSuggestion, ScheduleResult, Section,
};
use crate::explainer::{explain, summarize_pairs};
use crate::generator::{GenerationContext, generate};
use crate::locale::Locale;
use crate::overview::{ScheduleOverview, overview};
use crate::selector::select;
use crate::validation::{ValidationError, parse_sections_json};
use itertools::Itertools;
use log::{debug, info};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Everything one `generate` call produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub result: ScheduleResult,
    /// Number of conflict-free combinations before ranking.
    pub combination_count: usize,
    pub conflicts: Vec<ConflictRecord>,
    pub suggestions: Vec<RemovalSuggestion>,
    pub pair_conflicts: Vec<PairConflictSummary>,
    pub overview: ScheduleOverview,
}

/// The student's working state: loaded sections plus their choices.
#[derive(Debug, Clone)]
pub struct SchedulingSession {
    sections: Vec<Section>,
    selected_courses: BTreeSet<CourseId>,
    preferences: HashMap<CourseId, DoctorPreference>,
    include_closed_sections: bool,
    locale: Locale,
}

impl Default for SchedulingSession {
    fn default() -> Self {
        Self {
            sections: Vec::new(),
            selected_courses: BTreeSet::new(),
            preferences: HashMap::new(),
            include_closed_sections: true,
            locale: Locale::default(),
        }
    }
}

impl SchedulingSession {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            ..Self::default()
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Replaces the dataset with a fresh export. Selections are cleared.
    pub fn load_json(&mut self, text: &str) -> Result<usize, Vec<ValidationError>> {
        let sections = parse_sections_json(text)?;
        self.load_sections(sections);
        Ok(self.sections.len())
    }

    pub fn load_sections(&mut self, sections: Vec<Section>) {
        info!("Loaded {} sections", sections.len());
        self.sections = sections;
        self.selected_courses.clear();
        self.preferences.clear();
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Distinct course ids in dataset order.
    pub fn available_courses(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.course_id.as_str()).unique().collect()
    }

    /// Instructors teaching lectures and labs of `course_id`, each list in dataset order.
    pub fn instructors_for(&self, course_id: &str) -> (Vec<&str>, Vec<&str>) {
        let (labs, lectures): (Vec<&Section>, Vec<&Section>) = self
            .sections
            .iter()
            .filter(|s| s.course_id == course_id)
            .partition(|s| s.is_lab());
        (instructor_names(lectures), instructor_names(labs))
    }

    pub fn selected_courses(&self) -> &BTreeSet<CourseId> {
        &self.selected_courses
    }

    /// Returns false if the course is not in the dataset.
    pub fn select_course(&mut self, course_id: &str) -> bool {
        if !self.sections.iter().any(|s| s.course_id == course_id) {
            return false;
        }
        self.selected_courses.insert(course_id.to_string());
        true
    }

    /// Deselecting also forgets the course's instructor preference.
    pub fn deselect_course(&mut self, course_id: &str) {
        self.selected_courses.remove(course_id);
        self.preferences.remove(course_id);
    }

    pub fn set_preference(&mut self, course_id: &str, preference: DoctorPreference) {
        if preference.lecture.is_none() && preference.lab.is_none() {
            self.preferences.remove(course_id);
        } else {
            self.preferences.insert(course_id.to_string(), preference);
        }
    }

    pub fn clear_preference(&mut self, course_id: &str) {
        self.preferences.remove(course_id);
    }

    pub fn preferences(&self) -> &HashMap<CourseId, DoctorPreference> {
        &self.preferences
    }

    pub fn include_closed_sections(&self) -> bool {
        self.include_closed_sections
    }

    pub fn set_include_closed(&mut self, include: bool) {
        self.include_closed_sections = include;
    }

    fn admits(&self, section: &Section, courses: &BTreeSet<CourseId>) -> bool {
        if !self.include_closed_sections && section.is_closed() {
            return false;
        }
        if !courses.contains(&section.course_id) {
            return false;
        }
        self.preferences
            .get(&section.course_id)
            .is_none_or(|p| p.admits(section))
    }

    /// Groups eligible sections of `courses` by course, in dataset order.
    pub fn course_groups(&self, courses: &BTreeSet<CourseId>) -> Vec<CourseGroup> {
        let mut groups: Vec<CourseGroup> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for section in self.sections.iter().filter(|s| self.admits(s, courses)) {
            let i = *index.entry(section.course_id.as_str()).or_insert_with(|| {
                groups.push(CourseGroup::new(section.course_id.clone()));
                groups.len() - 1
            });
            groups[i].push(section.clone());
        }
        groups
    }

    fn combinations_for(&self, courses: &BTreeSet<CourseId>) -> (Vec<Combination>, GenerationContext) {
        let groups = self.course_groups(courses);
        let mut ctx = GenerationContext::new();
        // A selected course with no eligible section at all can never be covered.
        if groups.len() < courses.len() {
            debug!(
                "{} of {} selected courses have no eligible sections",
                courses.len() - groups.len(),
                courses.len()
            );
            return (Vec::new(), ctx);
        }
        let combinations = generate(&groups, &self.preferences, &mut ctx);
        (combinations, ctx)
    }

    /// Runs the full pipeline for the current selection.
    ///
    /// Errors only on caller mistakes: nothing selected, or a target day
    /// outside the modeled week. Finding no schedule is a normal report.
    pub fn generate(&self, objective: Objective) -> Result<GenerationReport, String> {
        if self.selected_courses.is_empty() {
            return Err("Please select at least one course".to_string());
        }
        if let Objective::TargetDayOff { day } = objective {
            validate_day(day)?;
        }

        let (combinations, ctx) = self.combinations_for(&self.selected_courses);
        let result = select(&combinations, objective, self.locale);
        let conflicts = ctx.into_conflicts();
        let suggestions = if combinations.is_empty() {
            explain(&conflicts, &self.selected_courses)
        } else {
            Vec::new()
        };
        let pair_conflicts = summarize_pairs(&conflicts);
        let overview = overview(&result.schedules, self.locale);

        Ok(GenerationReport {
            result,
            combination_count: combinations.len(),
            conflicts,
            suggestions,
            pair_conflicts,
            overview,
        })
    }

    fn best_schedule(&self, courses: &BTreeSet<CourseId>) -> Option<Combination> {
        let (combinations, _) = self.combinations_for(courses);
        select(&combinations, Objective::MaxDaysOff, self.locale)
            .schedules
            .into_iter()
            .next()
    }

    /// For each selected course, how many days off dropping it would gain.
    ///
    /// Sorted by days gained, most first.
    pub fn removal_impact(&self) -> Vec<RemovalImpact> {
        let current = self.best_schedule(&self.selected_courses);
        let current_days_off = current.as_ref().map_or(0, |c| c.days_off());

        let mut impact: Vec<RemovalImpact> = self
            .selected_courses
            .iter()
            .map(|course| {
                let mut remaining = self.selected_courses.clone();
                remaining.remove(course);
                // Dropping the last course leaves an empty, fully free week.
                let without = if remaining.is_empty() {
                    Some(Combination::default())
                } else {
                    self.best_schedule(&remaining)
                };
                let new_days_off = without.as_ref().map_or(0, |c| c.days_off());
                let freed_days = match (&current, &without) {
                    (Some(cur), Some(new)) => freed_days(cur, new, course),
                    _ => Vec::new(),
                };
                RemovalImpact {
                    course_id: course.clone(),
                    current_days_off,
                    new_days_off,
                    days_gained: new_days_off as i64 - current_days_off as i64,
                    freed_days,
                }
            })
            .collect();
        impact.sort_by(|a, b| b.days_gained.cmp(&a.days_gained));
        impact
    }
}

fn instructor_names(sections: Vec<&Section>) -> Vec<&str> {
    sections
        .into_iter()
        .map(|s| s.instructor.as_str())
        .unique()
        .collect()
}

pub fn validate_day(day: Day) -> Result<(), String> {
    if (FIRST_DAY..=LAST_DAY).contains(&day) {
        Ok(())
    } else {
        Err(format!(
            "Target day {} is outside the modeled week ({}-{})",
            day, FIRST_DAY, LAST_DAY
        ))
    }
}

/// Days the removed course occupied in `current` that `new` leaves empty.
fn freed_days(current: &Combination, new: &Combination, removed: &str) -> Vec<Day> {
    let new_days = new.used_days();
    current
        .sections
        .iter()
        .filter(|s| s.section.course_id == removed)
        .flat_map(|s| s.slots.iter().map(|slot| slot.day))
        .filter(|day| !new_days.contains(day))
        .unique()
        .sorted()
        .collect()
}
