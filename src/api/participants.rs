//! Participant API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateParticipantRequest, Participant, ReplaceParticipantRequest};
use crate::views::{self, OpportunityWithEvent, ParticipantSummary};
use crate::AppState;

/// One person's attendance history: their raw records plus the
/// opportunities they attended, each joined with its event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantAttendance {
    pub participants: Vec<Participant>,
    pub opportunities: Vec<OpportunityWithEvent>,
}

/// GET /api/participants - List all participant records.
pub async fn list_participants(State(state): State<AppState>) -> ApiResult<Vec<Participant>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_participants().await {
        Ok(participants) => success(participants, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/participants/summary - People deduplicated by name, sorted by
/// name ascending, with distinct-opportunity counts.
pub async fn participant_summary(
    State(state): State<AppState>,
) -> ApiResult<Vec<ParticipantSummary>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_participants().await {
        Ok(participants) => success(views::unique_participants_by_name(&participants), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/participants/by-name/:name - Attendance history for an exact
/// name. 404 when no record carries the name; a person whose every record
/// points at deleted opportunities still resolves, with an empty list.
pub async fn participant_attendance(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<ParticipantAttendance> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let participants = match state.repo.list_participants().await {
        Ok(participants) => participants,
        Err(e) => return error(e, revision_id),
    };

    let matching: Vec<Participant> = participants
        .iter()
        .filter(|p| p.name == name)
        .cloned()
        .collect();
    if matching.is_empty() {
        return error(
            AppError::NotFound(format!("Participant {} not found", name)),
            revision_id,
        );
    }

    let events = match state.repo.list_events().await {
        Ok(events) => events,
        Err(e) => return error(e, revision_id),
    };
    let opportunities = match state.repo.list_opportunities().await {
        Ok(opportunities) => opportunities,
        Err(e) => return error(e, revision_id),
    };

    let attended =
        views::opportunities_for_participant_name(&name, &events, &opportunities, &participants);

    success(
        ParticipantAttendance {
            participants: matching,
            opportunities: attended,
        },
        revision_id,
    )
}

/// GET /api/participants/:id - Get a single participant record.
pub async fn get_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Participant> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_participant(&id).await {
        Ok(Some(participant)) => success(participant, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Participant {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/participants - Create a new participant record.
pub async fn create_participant(
    State(state): State<AppState>,
    Json(request): Json<CreateParticipantRequest>,
) -> ApiResult<Participant> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_participant(&request).await {
        Ok(participant) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(participant, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/participants/:id - Replace a participant record.
pub async fn replace_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReplaceParticipantRequest>,
) -> ApiResult<Participant> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.replace_participant(&id, &request).await {
        Ok(participant) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(participant, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/participants/:id - Delete a participant record.
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_participant(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
