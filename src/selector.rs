use crate::data::{Combination, DISPLAY_CAP, Day, Objective, ScheduleResult};
use crate::locale::Locale;
use log::{info, warn};

/// Ranks `combinations` by `objective` and keeps at most [`DISPLAY_CAP`] of them.
///
/// Ties keep generator order. The message always carries the true number of
/// matching schedules, not just the shown ones.
pub fn select(combinations: &[Combination], objective: Objective, locale: Locale) -> ScheduleResult {
    if combinations.is_empty() {
        return ScheduleResult {
            message: locale.no_schedule_found(),
            ..ScheduleResult::default()
        };
    }

    let result = match objective {
        Objective::MaxDaysOff => most_days_off(combinations, locale),
        Objective::TargetDayOff { day } => with_day_off(combinations, day, locale),
        Objective::PreferenceMatch => {
            let total = combinations.len();
            capped(combinations.iter(), total, locale.schedules_found(total))
        }
    };
    info!(
        "Objective {:?}: {} matching schedules, showing {}",
        objective, result.total_count, result.shown_count
    );
    result
}

fn capped<'a>(
    matching: impl Iterator<Item = &'a Combination>,
    total: usize,
    message: String,
) -> ScheduleResult {
    let schedules: Vec<Combination> = matching.take(DISPLAY_CAP).cloned().collect();
    ScheduleResult {
        shown_count: schedules.len(),
        schedules,
        message,
        total_count: total,
        days_off: None,
    }
}

fn most_days_off(combinations: &[Combination], locale: Locale) -> ScheduleResult {
    // A combination whose declared times all failed to parse would look like a
    // free week; leave it out of the ranking.
    let scored: Vec<(&Combination, usize)> = combinations
        .iter()
        .filter(|c| {
            if c.has_unparsed_times() {
                warn!("Skipping combination with unparseable times: {:?}", unparsed_times(c));
                false
            } else {
                true
            }
        })
        .map(|c| (c, c.days_off()))
        .collect();

    let Some(max_days_off) = scored.iter().map(|(_, d)| *d).max() else {
        return ScheduleResult {
            message: locale.invalid_time_data(),
            ..ScheduleResult::default()
        };
    };

    let best = scored
        .iter()
        .filter(|(_, d)| *d == max_days_off)
        .map(|(c, _)| *c);
    let total = best.clone().count();
    ScheduleResult {
        days_off: Some(max_days_off),
        ..capped(best, total, locale.schedules_with_days_off(total, max_days_off))
    }
}

fn with_day_off(combinations: &[Combination], day: Day, locale: Locale) -> ScheduleResult {
    // Unparsed times occupy no day, so such combinations still count as free.
    for c in combinations.iter().filter(|c| c.has_unparsed_times() && !c.uses_day(day)) {
        warn!("Counting day {} as free despite unparseable times: {:?}", day, unparsed_times(c));
    }
    let free = combinations.iter().filter(|c| !c.uses_day(day));
    let total = free.clone().count();
    capped(free, total, locale.schedules_with_day_free(total, day))
}

fn unparsed_times(combination: &Combination) -> Vec<&str> {
    combination
        .sections
        .iter()
        .filter(|s| s.slots.is_empty())
        .map(|s| s.section.times_raw.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Availability, Section, SectionType, TimedSection};
    use crate::time_codec::parse_time_slots;

    fn combo(times: &[&str]) -> Combination {
        Combination {
            sections: times
                .iter()
                .enumerate()
                .map(|(i, t)| TimedSection {
                    section: Section {
                        course_id: format!("C{}", i),
                        section_number: "1".to_string(),
                        section_type: SectionType::Lecture,
                        credit_hours: 3,
                        availability: Availability::Open,
                        times_raw: t.to_string(),
                        instructor: "Dr. A".to_string(),
                    },
                    slots: parse_time_slots(t),
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_input() {
        let result = select(&[], Objective::MaxDaysOff, Locale::English);
        assert!(result.schedules.is_empty());
        assert_eq!(result.message, Locale::English.no_schedule_found());
        assert_eq!(result.total_count, 0);
    }

    #[test]
    fn test_max_days_off_keeps_only_best() {
        let combos = vec![
            combo(&["1@t 8:00 ص - 9:00 ص", "2@t 8:00 ص - 9:00 ص"]),
            combo(&["1@t 8:00 ص - 9:00 ص", "1@t 9:00 ص - 10:00 ص"]),
            combo(&["1 2 3@t 8:00 ص - 9:00 ص", "4@t 8:00 ص - 9:00 ص"]),
            combo(&["3@t 8:00 ص - 9:00 ص", "3@t 10:00 ص - 11:00 ص"]),
        ];
        let result = select(&combos, Objective::MaxDaysOff, Locale::English);
        assert_eq!(result.days_off, Some(4));
        assert_eq!(result.schedules, vec![combos[1].clone(), combos[3].clone()]);
        assert_eq!(result.total_count, 2);
        for shown in &result.schedules {
            assert!(combos.iter().all(|c| shown.days_off() >= c.days_off()));
        }
    }

    #[test]
    fn test_max_days_off_caps_but_counts_all() {
        let combos: Vec<Combination> = (0..13).map(|_| combo(&["1@t 8:00 ص - 9:00 ص"])).collect();
        let result = select(&combos, Objective::MaxDaysOff, Locale::English);
        assert_eq!(result.shown_count, DISPLAY_CAP);
        assert_eq!(result.total_count, 13);
        assert_eq!(result.message, "Found 10 of 13 schedule(s) with 4 day(s) off");
    }

    #[test]
    fn test_max_days_off_skips_unparseable() {
        let combos = vec![
            combo(&["garbage"]),
            combo(&["1 2@t 8:00 ص - 9:00 ص"]),
        ];
        let result = select(&combos, Objective::MaxDaysOff, Locale::English);
        assert_eq!(result.days_off, Some(3));
        assert_eq!(result.total_count, 1);

        let only_bad = vec![combo(&["garbage"])];
        let result = select(&only_bad, Objective::MaxDaysOff, Locale::English);
        assert!(result.schedules.is_empty());
        assert_eq!(result.message, Locale::English.invalid_time_data());
    }

    #[test]
    fn test_target_day_off_none_free() {
        let combos = vec![
            combo(&["5@t 8:00 ص - 9:00 ص"]),
            combo(&["1 5@t 10:00 ص - 11:00 ص"]),
        ];
        let result = select(&combos, Objective::TargetDayOff { day: 5 }, Locale::English);
        assert!(result.schedules.is_empty());
        assert_eq!(result.total_count, 0);
        assert_eq!(result.message, "Found 0 schedule(s) with Thursday off");
    }

    #[test]
    fn test_target_day_off_filters() {
        let combos = vec![
            combo(&["5@t 8:00 ص - 9:00 ص"]),
            combo(&["1@t 10:00 ص - 11:00 ص"]),
        ];
        let result = select(&combos, Objective::TargetDayOff { day: 5 }, Locale::Arabic);
        assert_eq!(result.schedules, vec![combos[1].clone()]);
        assert!(result.message.contains("الخميس"));
    }

    #[test]
    fn test_target_day_off_keeps_unparseable() {
        let combos = vec![combo(&["garbage"]), combo(&["5@t 8:00 ص - 9:00 ص"])];
        let result = select(&combos, Objective::TargetDayOff { day: 5 }, Locale::English);
        assert_eq!(result.schedules, vec![combos[0].clone()]);
        assert_eq!(result.total_count, 1);
    }

    #[test]
    fn test_preference_match_caps_full_list() {
        let combos: Vec<Combination> = (1..=5)
            .cycle()
            .take(25)
            .map(|d| {
                let times = format!("{}@t 8:00 ص - 9:00 ص", d);
                combo(&[times.as_str()])
            })
            .collect();
        let result = select(&combos, Objective::PreferenceMatch, Locale::English);
        assert_eq!(result.schedules, combos[..DISPLAY_CAP].to_vec());
        assert_eq!(result.total_count, 25);
        assert_eq!(result.days_off, None);
    }
}
