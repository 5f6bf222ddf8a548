//! Opportunity API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateOpportunityRequest, Opportunity, ReplaceOpportunityRequest};
use crate::views::{self, OpportunityDetail};
use crate::AppState;

/// GET /api/opportunities - List all opportunities, flat and unsorted.
pub async fn list_opportunities(State(state): State<AppState>) -> ApiResult<Vec<Opportunity>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_opportunities().await {
        Ok(opportunities) => success(opportunities, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/opportunities/:id - The joined view: opportunity, optional
/// parent event, and participants. A dangling event reference yields
/// `event: null`, not an error.
pub async fn get_opportunity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<OpportunityDetail> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let opportunities = match state.repo.list_opportunities().await {
        Ok(opportunities) => opportunities,
        Err(e) => return error(e, revision_id),
    };
    let events = match state.repo.list_events().await {
        Ok(events) => events,
        Err(e) => return error(e, revision_id),
    };
    let participants = match state.repo.list_participants().await {
        Ok(participants) => participants,
        Err(e) => return error(e, revision_id),
    };

    match views::opportunity_by_id(&id, &opportunities) {
        Some(opportunity) => success(
            views::join_opportunity(opportunity, &events, &participants),
            revision_id,
        ),
        None => error(
            AppError::NotFound(format!("Opportunity {} not found", id)),
            revision_id,
        ),
    }
}

/// POST /api/opportunities - Create a new opportunity.
pub async fn create_opportunity(
    State(state): State<AppState>,
    Json(request): Json<CreateOpportunityRequest>,
) -> ApiResult<Opportunity> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.create_opportunity(&request).await {
        Ok(opportunity) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(opportunity, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/opportunities/:id - Replace an opportunity with a full record.
pub async fn replace_opportunity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ReplaceOpportunityRequest>,
) -> ApiResult<Opportunity> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.replace_opportunity(&id, &request).await {
        Ok(opportunity) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(opportunity, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/opportunities/:id - Delete an opportunity and its
/// participant records.
pub async fn delete_opportunity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_opportunity(&id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
