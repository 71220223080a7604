//! Structural validation of exported section records.
//!
//! The export is a JSON array of flat objects keyed `section_*`. Every record
//! is checked and all problems are reported together; a record that passes
//! becomes a typed [`Section`].

use crate::data::{Availability, Section, SectionType};
use crate::locale::{
    CLOSED_LABEL_AR, LAB_LABEL_AR, LECTURE_LABEL_AR, OPEN_LABEL_AR, availability_from_label,
    section_type_from_label,
};
use serde_json::{Map, Value};

/// Validation result.
pub type ValidationResult<T> = Result<T, Vec<ValidationError>>;

/// Fields a record cannot do without.
pub const REQUIRED_FIELDS: [&str; 4] = [
    "section_course",
    "section_instructor",
    "section_type",
    "section_times",
];

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Index of the offending record, if the error is about one record.
    pub record: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Input is not JSON at all.
    InvalidJson,
    /// Top-level value is not an array.
    NotAnArray,
    /// A record is not a JSON object.
    NotAnObject,
    /// A required field is absent.
    MissingField,
    /// A field holds the wrong JSON type.
    WrongType,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, record: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            kind,
            record,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.record {
            Some(i) => write!(f, "record {}: {}", i, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Parses and validates a JSON document holding the section export.
pub fn parse_sections_json(text: &str) -> ValidationResult<Vec<Section>> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        vec![ValidationError::new(
            ValidationErrorKind::InvalidJson,
            None,
            format!("Invalid JSON: {}", e),
        )]
    })?;
    parse_sections(&value)
}

/// Validates an already-decoded export.
pub fn parse_sections(value: &Value) -> ValidationResult<Vec<Section>> {
    let records = value.as_array().ok_or_else(|| {
        vec![ValidationError::new(
            ValidationErrorKind::NotAnArray,
            None,
            "Section data must be a JSON array",
        )]
    })?;
    parse_records(records)
}

pub fn parse_records(records: &[Value]) -> ValidationResult<Vec<Section>> {
    let mut errors = Vec::new();
    let mut sections = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        match parse_record(i, record) {
            Ok(section) => sections.push(section),
            Err(mut e) => errors.append(&mut e),
        }
    }

    if errors.is_empty() {
        Ok(sections)
    } else {
        Err(errors)
    }
}

fn parse_record(i: usize, record: &Value) -> ValidationResult<Section> {
    let Some(obj) = record.as_object() else {
        return Err(vec![ValidationError::new(
            ValidationErrorKind::NotAnObject,
            Some(i),
            "Section record must be a JSON object",
        )]);
    };

    let mut errors = Vec::new();
    for field in REQUIRED_FIELDS {
        if !obj.contains_key(field) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingField,
                Some(i),
                format!("Missing field '{}'", field),
            ));
        }
    }

    let mut text = |field: &str| -> String {
        match obj.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::WrongType,
                    Some(i),
                    format!("Field '{}' must be a string", field),
                ));
                String::new()
            }
        }
    };

    let course_id = text("section_course");
    let instructor = text("section_instructor");
    let section_type = text("section_type");
    let times_raw = text("section_times");
    let section_number = text("section_number");
    let availability = text("section_availability");
    let credit = text("section_credit");

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Section {
        course_id,
        section_number,
        section_type: section_type_from_label(&section_type),
        credit_hours: parse_credit(&credit),
        availability: availability_from_label(&availability),
        times_raw,
        instructor,
    })
}

// Credit hours arrive as text like "3"; anything unreadable counts as zero.
fn parse_credit(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(0)
}

/// Re-encodes a section as an export record.
pub fn to_record(section: &Section) -> Value {
    let mut obj = Map::new();
    obj.insert("section_course".into(), section.course_id.clone().into());
    obj.insert("section_number".into(), section.section_number.clone().into());
    let kind = match section.section_type {
        SectionType::Lab => LAB_LABEL_AR,
        SectionType::Lecture => LECTURE_LABEL_AR,
    };
    obj.insert("section_type".into(), kind.into());
    obj.insert("section_credit".into(), section.credit_hours.to_string().into());
    let availability = match section.availability {
        Availability::Open => OPEN_LABEL_AR,
        Availability::Closed => CLOSED_LABEL_AR,
    };
    obj.insert("section_availability".into(), availability.into());
    obj.insert("section_times".into(), section.times_raw.clone().into());
    obj.insert("section_instructor".into(), section.instructor.clone().into());
    Value::Object(obj)
}
