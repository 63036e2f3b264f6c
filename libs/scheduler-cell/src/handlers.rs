use std::sync::Arc;

use axum::{
    extract::{Form, State},
    response::{Html, Redirect},
    Json,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use shared_models::error::AppError;

use crate::error::SchedulerError;
use crate::html::render_page;
use crate::screen::SchedulerScreen;
use crate::view::SchedulerView;

const SCHEDULER_PAGE: &str = "/scheduler";

#[derive(Debug, Default, Deserialize)]
pub struct TitleForm {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct RangeForm {
    pub start: String,
    pub end: String,
}

/// Accepts RFC 3339 or the `datetime-local` input format (taken as UTC).
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, SchedulerError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| SchedulerError::InvalidTime(raw.to_string()))
}

pub async fn scheduler_page(State(view): State<Arc<SchedulerView>>) -> Html<String> {
    Html(render_page(&view.screen().await))
}

pub async fn scheduler_screen(State(view): State<Arc<SchedulerView>>) -> Json<SchedulerScreen> {
    Json(view.screen().await)
}

pub async fn set_title(
    State(view): State<Arc<SchedulerView>>,
    Form(form): Form<TitleForm>,
) -> Redirect {
    view.set_title(&form.title).await;
    Redirect::to(SCHEDULER_PAGE)
}

pub async fn select_range(
    State(view): State<Arc<SchedulerView>>,
    Form(form): Form<RangeForm>,
) -> Result<Redirect, AppError> {
    let start = parse_instant(&form.start).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let end = parse_instant(&form.end).map_err(|e| AppError::BadRequest(e.to_string()))?;

    view.select_range(start, end).await;
    Ok(Redirect::to(SCHEDULER_PAGE))
}

/// The create form carries the title along with the submit.
pub async fn create_appointment(
    State(view): State<Arc<SchedulerView>>,
    Form(form): Form<TitleForm>,
) -> Redirect {
    view.set_title(&form.title).await;
    let outcome = view.create_appointment().await;
    debug!("Create appointment outcome: {:?}", outcome);
    Redirect::to(SCHEDULER_PAGE)
}

pub async fn reload(State(view): State<Arc<SchedulerView>>) -> Redirect {
    view.load_appointments().await;
    Redirect::to(SCHEDULER_PAGE)
}
