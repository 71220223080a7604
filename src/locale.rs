// Fixed vocabulary of the registration data: Arabic as exported, English for display.
use crate::data::{Availability, DISPLAY_CAP, Day, SectionType};
use serde::{Deserialize, Serialize};

pub const LAB_LABEL_AR: &str = "عملي";
pub const LECTURE_LABEL_AR: &str = "نظري";
pub const OPEN_LABEL_AR: &str = "مفتوحة";
pub const CLOSED_LABEL_AR: &str = "مغلقة";

const DAY_NAMES_AR: [&str; 5] = ["الأحد", "الاثنين", "الثلاثاء", "الأربعاء", "الخميس"];
const DAY_NAMES_EN: [&str; 5] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
}

/// Maps the exported `section_type` text. Anything that is not a lab is a lecture.
pub fn section_type_from_label(label: &str) -> SectionType {
    let label = label.trim();
    if label == LAB_LABEL_AR || label.to_lowercase().contains("lab") {
        SectionType::Lab
    } else {
        SectionType::Lecture
    }
}

pub fn availability_from_label(label: &str) -> Availability {
    let label = label.trim();
    if label == CLOSED_LABEL_AR || label.eq_ignore_ascii_case("closed") {
        Availability::Closed
    } else {
        Availability::Open
    }
}

impl Locale {
    pub fn day_name(self, day: Day) -> Option<&'static str> {
        let idx = (day as usize).checked_sub(1)?;
        match self {
            Locale::Arabic => DAY_NAMES_AR.get(idx).copied(),
            Locale::English => DAY_NAMES_EN.get(idx).copied(),
        }
    }

    pub fn no_schedule_found(self) -> String {
        match self {
            Locale::Arabic => "لم يتم العثور على جداول تلبي المتطلبات".to_string(),
            Locale::English => "No schedules found that meet the requirements".to_string(),
        }
    }

    pub fn invalid_time_data(self) -> String {
        match self {
            Locale::Arabic => {
                "لم يتم العثور على جداول صالحة - قد تكون هناك مشكلة في تنسيق البيانات".to_string()
            }
            Locale::English => "No valid schedules found - the time data may be malformed".to_string(),
        }
    }

    /// "10 of 37" when the cap hides some schedules, otherwise just the total.
    fn count_phrase(self, total: usize) -> String {
        if total > DISPLAY_CAP {
            match self {
                Locale::Arabic => format!("{} من أصل {}", DISPLAY_CAP, total),
                Locale::English => format!("{} of {}", DISPLAY_CAP, total),
            }
        } else {
            total.to_string()
        }
    }

    pub fn schedules_found(self, total: usize) -> String {
        match self {
            Locale::Arabic => format!("تم العثور على {} جدول دراسي", self.count_phrase(total)),
            Locale::English => format!("Found {} schedule(s)", self.count_phrase(total)),
        }
    }

    pub fn schedules_with_days_off(self, total: usize, days_off: usize) -> String {
        match self {
            Locale::Arabic => format!(
                "تم العثور على {} جدول دراسي مع {} {}",
                self.count_phrase(total),
                days_off,
                arabic_days_off_form(days_off)
            ),
            Locale::English => format!(
                "Found {} schedule(s) with {} day(s) off",
                self.count_phrase(total),
                days_off
            ),
        }
    }

    pub fn schedules_with_day_free(self, total: usize, day: Day) -> String {
        let name = self.day_name(day).unwrap_or_default();
        match self {
            Locale::Arabic => format!(
                "تم العثور على {} جدول دراسي مع يوم {} فارغ",
                self.count_phrase(total),
                name
            ),
            Locale::English => format!(
                "Found {} schedule(s) with {} off",
                self.count_phrase(total),
                name
            ),
        }
    }
}

// Arabic dual form for two, singular for zero or one, plural otherwise.
fn arabic_days_off_form(n: usize) -> &'static str {
    match n {
        2 => "يومين فراغ",
        0 | 1 => "يوم فراغ",
        _ => "أيام فراغ",
    }
}
