//! Event API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateEventRequest, Event, ReplaceEventRequest};
use crate::views::{self, OpportunityDetail};
use crate::AppState;

/// GET /api/events - List all events, newest start date first.
pub async fn list_events(State(state): State<AppState>) -> ApiResult<Vec<Event>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_events().await {
        Ok(events) => success(views::sort_events_by_start_date_desc(&events), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/events/:id - Get a single event.
pub async fn get_event(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Event> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_event(&id).await {
        Ok(Some(event)) => success(event, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Event {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/events/:id/opportunities - The event's opportunities with
/// participants attached, newest first.
pub async fn list_event_opportunities(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<OpportunityDetail>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let event = match state.repo.get_event(&id).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return error(
                AppError::NotFound(format!("Event {} not found", id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    };

    let opportunities = match state.repo.list_opportunities().await {
        Ok(opportunities) => opportunities,
        Err(e) => return error(e, revision_id),
    };
    let participants = match state.repo.list_participants().await {
        Ok(participants) => participants,
        Err(e) => return error(e, revision_id),
    };

    let events = [event];
    let details: Vec<OpportunityDetail> = views::sort_opportunities_by_date_desc(
        &views::opportunities_for_event(&id, &opportunities),
    )
    .iter()
    .map(|o| views::join_opportunity(o, &events, &participants))
    .collect();

    success(details, revision_id)
}

/// POST /api/events - Create a new event.
pub async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> ApiResult<Event> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_event(&request).await {
        Ok(event) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(event, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/events/:id - Replace an event with a full record.
pub async fn replace_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReplaceEventRequest>,
) -> ApiResult<Event> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.replace_event(&id, &request).await {
        Ok(event) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(event, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/events/:id - Delete an event and its dependent records.
pub async fn delete_event(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_event(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
