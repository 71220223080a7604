use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for clarity
pub type CourseId = String;
pub type Day = u8;
pub type Minute = u16;

/// First and last modeled weekday (Sunday..Thursday).
pub const FIRST_DAY: Day = 1;
pub const LAST_DAY: Day = 5;
pub const WEEK_DAYS: usize = 5;

/// Maximum number of schedules handed back to the caller, whatever the objective.
pub const DISPLAY_CAP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    Lecture,
    Lab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Availability {
    Open,
    Closed,
}

/// One offered instance of a course component, as exported from the registration table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub course_id: CourseId,
    pub section_number: String,
    pub section_type: SectionType,
    pub credit_hours: u32,
    pub availability: Availability,
    /// Encoded meeting times; empty means no fixed meeting time.
    pub times_raw: String,
    pub instructor: String,
}

impl Section {
    pub fn is_lab(&self) -> bool {
        self.section_type == SectionType::Lab
    }

    pub fn is_closed(&self) -> bool {
        self.availability == Availability::Closed
    }

    pub fn has_declared_times(&self) -> bool {
        !self.times_raw.trim().is_empty()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.section_type {
            SectionType::Lecture => "lecture",
            SectionType::Lab => "lab",
        };
        write!(f, "{} #{} ({}, {})", self.course_id, self.section_number, kind, self.instructor)
    }
}

/// A single occupied interval on one weekday, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub day: Day,
    pub start_minute: Minute,
    pub end_minute: Minute,
}

/// A section together with the slots parsed from its encoded times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedSection {
    #[serde(flatten)]
    pub section: Section,
    pub slots: Vec<TimeSlot>,
}

/// All sections of one course, split by component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGroup {
    pub course_id: CourseId,
    pub lectures: Vec<Section>,
    pub labs: Vec<Section>,
}

impl CourseGroup {
    pub fn new(course_id: impl Into<CourseId>) -> Self {
        Self {
            course_id: course_id.into(),
            lectures: Vec::new(),
            labs: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        if section.is_lab() {
            self.labs.push(section);
        } else {
            self.lectures.push(section);
        }
    }
}

/// One complete, conflict-free pick of sections covering every selected course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Combination {
    pub sections: Vec<TimedSection>,
}

impl Combination {
    pub fn slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.sections.iter().flat_map(|s| s.slots.iter())
    }

    /// Distinct weekdays this combination occupies, ascending.
    pub fn used_days(&self) -> Vec<Day> {
        self.slots().map(|slot| slot.day).unique().sorted().collect()
    }

    pub fn days_off(&self) -> usize {
        WEEK_DAYS.saturating_sub(self.used_days().len())
    }

    pub fn uses_day(&self, day: Day) -> bool {
        self.slots().any(|slot| slot.day == day)
    }

    /// True when some section declared times but none of them survived parsing.
    pub fn has_unparsed_times(&self) -> bool {
        self.sections.iter().any(|s| s.slots.is_empty())
    }

    pub fn course_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.section.course_id.as_str())
    }
}

/// Instructor the student wants for a course, per component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPreference {
    #[serde(default)]
    pub lecture: Option<String>,
    #[serde(default)]
    pub lab: Option<String>,
}

impl DoctorPreference {
    /// Whether `section` is taught by the preferred instructor for its component (if any).
    pub fn admits(&self, section: &Section) -> bool {
        let wanted = match section.section_type {
            SectionType::Lecture => self.lecture.as_deref(),
            SectionType::Lab => self.lab.as_deref(),
        };
        wanted.is_none_or(|name| name.is_empty() || section.instructor == name)
    }
}

/// The criterion schedules are ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Objective {
    MaxDaysOff,
    TargetDayOff {
        #[serde(default = "default_target_day")]
        day: Day,
    },
    PreferenceMatch,
}

fn default_target_day() -> Day {
    LAST_DAY
}

/// Ranked and capped selection handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub schedules: Vec<Combination>,
    pub message: String,
    /// Schedules satisfying the objective before the display cap.
    pub total_count: usize,
    pub shown_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_off: Option<usize>,
}

/// Two sections rejected together while extending a partial combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRecord {
    pub section_a: Section,
    pub section_b: Section,
    pub slots_a: Vec<TimeSlot>,
    pub slots_b: Vec<TimeSlot>,
}

impl ConflictRecord {
    pub fn involves(&self, course_id: &str) -> bool {
        self.section_a.course_id == course_id || self.section_b.course_id == course_id
    }
}

impl fmt::Display for ConflictRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} conflicts with {}", self.section_a, self.section_b)
    }
}

/// "Drop this course to clear its conflicts with these others."
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalSuggestion {
    pub course_id: CourseId,
    pub conflict_count: usize,
    pub resolved_courses: Vec<CourseId>,
    pub conflicts: Vec<ConflictRecord>,
}

/// How often one pair of courses clashed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairConflictSummary {
    pub courses: (CourseId, CourseId),
    pub count: usize,
    pub slots_a: Vec<TimeSlot>,
    pub slots_b: Vec<TimeSlot>,
}

/// Effect on the best achievable days off of dropping one selected course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalImpact {
    pub course_id: CourseId,
    pub current_days_off: usize,
    pub new_days_off: usize,
    pub days_gained: i64,
    pub freed_days: Vec<Day>,
}
