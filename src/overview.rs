// Variation overview: which instructors, days and time blocks each course
// takes across a set of returned schedules.
use crate::data::{Combination, CourseId, Day, Minute, TimeSlot};
use crate::locale::Locale;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionVariation {
    pub instructor: String,
    pub times_raw: String,
    /// 1-based positions of the schedules using this variation.
    pub schedule_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseVariation {
    pub course_id: CourseId,
    pub instructors: Vec<String>,
    pub days: Vec<Day>,
    pub time_slots: Vec<String>,
    pub variations: Vec<SectionVariation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOverview {
    pub courses: Vec<CourseVariation>,
}

fn clock_24h(minutes: Minute) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Label such as `Monday 9:00 - 10:40`.
pub fn slot_label(slot: &TimeSlot, locale: Locale) -> String {
    let day = locale.day_name(slot.day).unwrap_or_default();
    format!(
        "{} {} - {}",
        day,
        clock_24h(slot.start_minute),
        clock_24h(slot.end_minute)
    )
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Summarizes how each course varies across `schedules`, courses in first-seen order.
pub fn overview(schedules: &[Combination], locale: Locale) -> ScheduleOverview {
    let mut courses: Vec<CourseVariation> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (n, schedule) in schedules.iter().enumerate() {
        for timed in &schedule.sections {
            let section = &timed.section;
            let i = *index.entry(section.course_id.as_str()).or_insert_with(|| {
                courses.push(CourseVariation {
                    course_id: section.course_id.clone(),
                    instructors: Vec::new(),
                    days: Vec::new(),
                    time_slots: Vec::new(),
                    variations: Vec::new(),
                });
                courses.len() - 1
            });
            let course = &mut courses[i];

            push_unique(&mut course.instructors, section.instructor.clone());
            for slot in &timed.slots {
                push_unique(&mut course.days, slot.day);
                push_unique(&mut course.time_slots, slot_label(slot, locale));
            }

            let schedule_no = n + 1;
            match course
                .variations
                .iter_mut()
                .find(|v| v.instructor == section.instructor && v.times_raw == section.times_raw)
            {
                Some(v) => push_unique(&mut v.schedule_indices, schedule_no),
                None => course.variations.push(SectionVariation {
                    instructor: section.instructor.clone(),
                    times_raw: section.times_raw.clone(),
                    schedule_indices: vec![schedule_no],
                }),
            }
        }
    }

    for course in &mut courses {
        course.days.sort_unstable();
    }
    ScheduleOverview { courses }
}
