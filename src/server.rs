use crate::config::AppConfig;
use crate::data::{DoctorPreference, Objective, RemovalImpact};
use crate::locale::Locale;
use crate::session::{GenerationReport, SchedulingSession};
use crate::validation::parse_sections;
use axum::{Json, Router, http::StatusCode, routing::post};
use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

type ApiError = (StatusCode, String);

/// Request body shared by the schedule endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// Raw export records, validated before use.
    pub sections: Value,
    #[serde(default)]
    pub selected_courses: Vec<String>,
    #[serde(default)]
    pub preferences: HashMap<String, DoctorPreference>,
    #[serde(default = "default_objective")]
    pub objective: Objective,
    #[serde(default)]
    pub include_closed_sections: Option<bool>,
    #[serde(default)]
    pub locale: Locale,
}

fn default_objective() -> Objective {
    Objective::MaxDaysOff
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub count: usize,
    pub courses: Vec<String>,
}

fn bad_request(msg: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, msg.into())
}

fn build_session(request: &ScheduleRequest) -> Result<SchedulingSession, ApiError> {
    let sections = parse_sections(&request.sections)
        .map_err(|errors| bad_request(errors.iter().join("; ")))?;

    let mut session = SchedulingSession::new(sections).with_locale(request.locale);
    if let Some(include) = request.include_closed_sections {
        session.set_include_closed(include);
    }
    for course in &request.selected_courses {
        if !session.select_course(course) {
            return Err(bad_request(format!("Unknown course '{}'", course)));
        }
    }
    for (course, preference) in &request.preferences {
        session.set_preference(course, preference.clone());
    }
    Ok(session)
}

// Generation is CPU-bound; keep it off the async workers.
async fn run_blocking<T, F>(job: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, String> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(bad_request(e)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("task join error: {}", e),
        )),
    }
}

async fn generate_handler(
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<GenerationReport>, ApiError> {
    let session = build_session(&request)?;
    let objective = request.objective;
    let report = run_blocking(move || session.generate(objective)).await?;
    info!(
        "generate: {} courses, {} combinations, {} shown",
        request.selected_courses.len(),
        report.combination_count,
        report.result.shown_count
    );
    Ok(Json(report))
}

async fn removal_impact_handler(
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<Vec<RemovalImpact>>, ApiError> {
    let session = build_session(&request)?;
    if session.selected_courses().is_empty() {
        return Err(bad_request("Please select at least one course"));
    }
    let impact = run_blocking(move || Ok(session.removal_impact())).await?;
    Ok(Json(impact))
}

async fn validate_handler(Json(records): Json<Value>) -> Result<Json<ValidationSummary>, ApiError> {
    match parse_sections(&records) {
        Ok(sections) => {
            let courses = sections.iter().map(|s| s.course_id.clone()).unique().collect();
            Ok(Json(ValidationSummary {
                count: sections.len(),
                courses,
            }))
        }
        Err(errors) => {
            warn!("Rejected section export with {} errors", errors.len());
            Err(bad_request(errors.iter().join("; ")))
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/v1/schedule/generate", post(generate_handler))
        .route("/v1/schedule/removal-impact", post(removal_impact_handler))
        .route("/v1/sections/validate", post(validate_handler))
}

pub async fn run_server(config: &AppConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, router()).await
}
