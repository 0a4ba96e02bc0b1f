use crate::checkin;
use crate::errors::AppError;
use crate::models::{
    ClosePeriodRequest, ClosePeriodResponse, DeleteRequest, DeleteResponse, MarkRequest, Person,
    PersonSummary, PhotoRequest, RegisterRequest, SubmitResponse,
};
use crate::report::{self, PersonReport};
use crate::state::AppState;
use crate::storage::persist_roster;
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

pub async fn list_people(State(state): State<AppState>) -> Json<Vec<PersonSummary>> {
    let roster = state.roster.lock().await;
    let people = roster
        .iter()
        .map(|(name, person)| PersonSummary {
            name: name.clone(),
            has_photo: !person.photo.is_empty(),
            pending: person.pending,
            record_count: person.attendance.len(),
        })
        .collect();
    Json(people)
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<PersonSummary>, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }

    let mut roster = state.roster.lock().await;
    if roster.contains_key(&name) {
        return Err(AppError::bad_request(format!("{name} already exists")));
    }

    roster.insert(name.clone(), Person::default());
    persist_roster(&state.data_path, &roster).await?;
    info!(%name, "registered");

    Ok(Json(PersonSummary {
        name,
        has_photo: false,
        pending: None,
        record_count: 0,
    }))
}

pub async fn mark(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<MarkRequest>,
) -> Result<Json<PersonSummary>, AppError> {
    let mut roster = state.roster.lock().await;
    let person = roster
        .get_mut(&name)
        .ok_or_else(|| AppError::not_found(format!("unknown person {name}")))?;

    checkin::mark(person, payload.status);
    let summary = PersonSummary {
        name: name.clone(),
        has_photo: !person.photo.is_empty(),
        pending: person.pending,
        record_count: person.attendance.len(),
    };
    persist_roster(&state.data_path, &roster).await?;

    Ok(Json(summary))
}

pub async fn submit(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SubmitResponse>, AppError> {
    let mut roster = state.roster.lock().await;
    let person = roster
        .get_mut(&name)
        .ok_or_else(|| AppError::not_found(format!("unknown person {name}")))?;

    let record = checkin::submit(person)?;
    persist_roster(&state.data_path, &roster).await?;
    info!(%name, arrive = %record.arrive, "attendance saved");

    Ok(Json(SubmitResponse { name, record }))
}

pub async fn attach_photo(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<PhotoRequest>,
) -> Result<Json<PersonSummary>, AppError> {
    let mut roster = state.roster.lock().await;
    let person = roster
        .get_mut(&name)
        .ok_or_else(|| AppError::not_found(format!("unknown person {name}")))?;

    person.photo = payload.photo;
    let summary = PersonSummary {
        name: name.clone(),
        has_photo: !person.photo.is_empty(),
        pending: person.pending,
        record_count: person.attendance.len(),
    };
    persist_roster(&state.data_path, &roster).await?;

    Ok(Json(summary))
}

/// Irreversible removal of a person and all records. The confirmation flag
/// arrives pre-answered; declining is a no-op, not an error.
pub async fn delete(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, AppError> {
    let mut roster = state.roster.lock().await;
    if !roster.contains_key(&name) {
        return Err(AppError::not_found(format!("unknown person {name}")));
    }

    if !payload.confirm {
        return Ok(Json(DeleteResponse {
            name,
            deleted: false,
        }));
    }

    roster.remove(&name);
    persist_roster(&state.data_path, &roster).await?;
    info!(%name, "deleted");

    Ok(Json(DeleteResponse {
        name,
        deleted: true,
    }))
}

/// Exports the person's full history, then clears it when the second
/// confirmation was given. The person and photo stay in place either way.
pub async fn close_period(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<ClosePeriodRequest>,
) -> Result<Json<ClosePeriodResponse>, AppError> {
    let mut roster = state.roster.lock().await;
    let person = roster
        .get_mut(&name)
        .ok_or_else(|| AppError::not_found(format!("unknown person {name}")))?;

    if !payload.confirm {
        return Ok(Json(ClosePeriodResponse {
            name,
            export: String::new(),
            cleared: false,
        }));
    }

    let export = report::render_export(&name, person);
    let cleared = payload.clear;
    if cleared {
        person.attendance.clear();
        persist_roster(&state.data_path, &roster).await?;
        info!(%name, "period closed, history cleared");
    }

    Ok(Json(ClosePeriodResponse {
        name,
        export,
        cleared,
    }))
}

pub async fn get_report(State(state): State<AppState>) -> Json<Vec<PersonReport>> {
    let roster = state.roster.lock().await;
    Json(report::build_report(&roster))
}
