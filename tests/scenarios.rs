use section_scheduler::conflict::{has_conflict, overlaps};
use section_scheduler::data::{DISPLAY_CAP, Objective, TimedSection};
use section_scheduler::locale::Locale;
use section_scheduler::session::SchedulingSession;
use section_scheduler::time_codec::{merge_slots, parse_time_slots};
use section_scheduler::validation::parse_sections_json;
use serde_json::{Value, json};

fn record(course: &str, number: &str, kind: &str, instructor: &str, times: &str) -> Value {
    json!({
        "section_number": number,
        "section_course": course,
        "section_type": kind,
        "section_credit": "3",
        "section_availability": "مفتوحة",
        "section_times": times,
        "section_instructor": instructor
    })
}

fn session_from(records: Vec<Value>, courses: &[&str]) -> SchedulingSession {
    let text = Value::Array(records).to_string();
    let mut session = SchedulingSession::default();
    session.load_json(&text).expect("export should validate");
    session.set_locale(Locale::English);
    for c in courses {
        assert!(session.select_course(c), "course {c} missing from export");
    }
    session
}

/// A realistic term: two courses with labs, one lecture-only course.
fn term() -> Vec<Value> {
    vec![
        record("CS101", "101", "نظري", "Dr. Sami", "1 3@t 8:00 ص - 9:40 ص@r 2-104"),
        record("CS101", "102", "نظري", "Dr. Huda", "2 4@t 10:00 ص - 11:40 ص@r 2-105"),
        record("CS101", "111", "عملي", "Eng. Omar", "5@t 8:00 ص - 9:50 ص@r Lab1"),
        record("CS101", "112", "عملي", "Eng. Omar", "1@t 10:00 ص - 11:50 ص@r Lab1"),
        record("MATH201", "201", "نظري", "Dr. Lina", "1 3@t 10:00 ص - 11:40 ص"),
        record("MATH201", "202", "نظري", "Dr. Lina", "2 4@t 8:00 ص - 9:40 ص"),
        record("PHY110", "301", "نظري", "Dr. Karim", "1 3@t 12:00 م - 1:40 م"),
        record("PHY110", "302", "نظري", "Dr. Nour", "2@t 12:00 م - 1:40 م@n4@t 12:00 م - 1:40 م"),
        record("PHY110", "311", "عملي", "Eng. Reem", "3@t 2:00 م - 3:50 م"),
        record("PHY110", "312", "عملي", "Eng. Reem", "4@t 2:00 م - 3:50 م"),
    ]
}

#[test]
fn every_generated_schedule_is_conflict_free() {
    let session = session_from(term(), &["CS101", "MATH201", "PHY110"]);
    let report = session.generate(Objective::PreferenceMatch).unwrap();
    assert!(report.combination_count > 0);

    for schedule in &report.result.schedules {
        let refs: Vec<&TimedSection> = schedule.sections.iter().collect();
        assert!(!has_conflict(&refs).conflict);
        // one lecture + one lab for CS101 and PHY110, one lecture for MATH201
        assert_eq!(schedule.sections.len(), 5);
    }
}

#[test]
fn max_days_off_is_never_beaten() {
    let session = session_from(term(), &["CS101", "MATH201", "PHY110"]);
    let all = session.generate(Objective::PreferenceMatch).unwrap();
    let best = session.generate(Objective::MaxDaysOff).unwrap();

    let best_days = best.result.days_off.expect("schedules exist");
    assert!(!best.result.schedules.is_empty());
    for shown in &best.result.schedules {
        assert_eq!(shown.days_off(), best_days);
    }
    assert!(all.result.schedules.iter().all(|c| c.days_off() <= best_days));
    assert!(best.result.message.contains(&format!("{} day(s) off", best_days)));
}

#[test]
fn three_courses_two_lectures_each_gives_eight() {
    let records = vec![
        record("A", "1", "نظري", "Dr", "1@t 8:00 ص - 9:00 ص"),
        record("A", "2", "نظري", "Dr", "2@t 8:00 ص - 9:00 ص"),
        record("B", "1", "نظري", "Dr", "3@t 8:00 ص - 9:00 ص"),
        record("B", "2", "نظري", "Dr", "4@t 8:00 ص - 9:00 ص"),
        record("C", "1", "نظري", "Dr", "5@t 8:00 ص - 9:00 ص"),
        record("C", "2", "نظري", "Dr", "1@t 10:00 ص - 11:00 ص"),
    ];
    let session = session_from(records, &["A", "B", "C"]);
    let report = session.generate(Objective::PreferenceMatch).unwrap();
    assert_eq!(report.combination_count, 8);
    assert_eq!(report.result.shown_count, 8);
    assert!(report.conflicts.is_empty());
}

#[test]
fn alternative_lectures_of_one_course_stay_apart() {
    let records = vec![
        record("CS101", "1", "نظري", "Dr", "1@t9:00 ص - 10:00 ص"),
        record("CS101", "2", "نظري", "Dr", "1@t9:30 ص - 10:30 ص"),
    ];
    let session = session_from(records, &["CS101"]);
    let report = session.generate(Objective::PreferenceMatch).unwrap();
    assert_eq!(report.combination_count, 2);
    assert!(report.result.schedules.iter().all(|s| s.sections.len() == 1));
}

#[test]
fn touching_sections_do_not_overlap() {
    let sections = parse_sections_json(
        &Value::Array(vec![
            record("A", "1", "نظري", "Dr", "2@t9:00ص-10:00ص"),
            record("B", "1", "نظري", "Dr", "2@t10:00ص-11:00ص"),
        ])
        .to_string(),
    )
    .unwrap();
    assert!(!overlaps(&sections[0], &sections[1]));
    assert_eq!(overlaps(&sections[0], &sections[1]), overlaps(&sections[1], &sections[0]));
}

#[test]
fn untimed_mandatory_course_empties_the_result() {
    let mut records = term();
    records.push(record("GRAD499", "900", "نظري", "Dr. Adv", ""));
    let session = session_from(records, &["CS101", "GRAD499"]);
    let report = session.generate(Objective::MaxDaysOff).unwrap();
    assert_eq!(report.combination_count, 0);
    assert!(report.result.schedules.is_empty());
    assert!(report.conflicts.is_empty());
}

#[test]
fn thursday_off_with_no_candidate() {
    let records = vec![
        record("A", "1", "نظري", "Dr", "5@t 8:00 ص - 9:00 ص"),
        record("A", "2", "نظري", "Dr", "1 5@t 10:00 ص - 11:00 ص"),
    ];
    let session = session_from(records, &["A"]);
    let report = session
        .generate(Objective::TargetDayOff { day: 5 })
        .unwrap();
    assert_eq!(report.combination_count, 2);
    assert!(report.result.schedules.is_empty());
    assert_eq!(report.result.total_count, 0);
    assert!(report.result.message.contains('0'));
}

#[test]
fn display_cap_reports_true_total() {
    let mut records = Vec::new();
    for i in 0..4 {
        records.push(record("A", &format!("a{i}"), "نظري", "Dr", &format!("{}@t 8:00 ص - 9:00 ص", i + 1)));
        records.push(record("B", &format!("b{i}"), "نظري", "Dr", &format!("{}@t 9:00 ص - 10:00 ص", i + 1)));
    }
    let session = session_from(records, &["A", "B"]);
    let report = session.generate(Objective::PreferenceMatch).unwrap();
    assert_eq!(report.combination_count, 16);
    assert_eq!(report.result.schedules.len(), DISPLAY_CAP);
    assert_eq!(report.result.message, "Found 10 of 16 schedule(s)");
}

#[test]
fn conflicting_selection_gets_removal_advice() {
    let records = vec![
        record("A", "1", "نظري", "Dr", "1@t 8:00 ص - 10:00 ص"),
        record("B", "1", "نظري", "Dr", "1@t 9:00 ص - 10:00 ص"),
        record("C", "1", "نظري", "Dr", "1@t 9:30 ص - 11:00 ص"),
    ];
    let session = session_from(records, &["A", "B", "C"]);
    let report = session.generate(Objective::MaxDaysOff).unwrap();
    assert!(report.result.schedules.is_empty());
    assert!(!report.conflicts.is_empty());
    assert_eq!(report.suggestions[0].course_id, "A");
    assert_eq!(report.suggestions[0].resolved_courses, vec!["B".to_string()]);
}

#[test]
fn independent_sessions_do_not_share_conflicts() {
    let clashing = session_from(
        vec![
            record("A", "1", "نظري", "Dr", "1@t 8:00 ص - 10:00 ص"),
            record("B", "1", "نظري", "Dr", "1@t 9:00 ص - 10:00 ص"),
        ],
        &["A", "B"],
    );
    let clean = session_from(term(), &["MATH201"]);

    let first = clashing.generate(Objective::MaxDaysOff).unwrap();
    let second = clean.generate(Objective::MaxDaysOff).unwrap();
    let again = clashing.generate(Objective::MaxDaysOff).unwrap();

    assert_eq!(first.conflicts.len(), 1);
    assert!(second.conflicts.is_empty());
    assert_eq!(again.conflicts, first.conflicts);
}

#[test]
fn merged_slots_are_stable() {
    let raw = "1 3@t 8:00 ص - 9:40 ص@n1@t 9:50 ص - 11:30 ص@n3@t 1:00 م - 2:00 م";
    let slots = parse_time_slots(raw);
    assert_eq!(merge_slots(slots.clone()), slots);
    assert_eq!(parse_time_slots(raw), slots);
}
