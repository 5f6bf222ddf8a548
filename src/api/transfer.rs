//! CSV import/export endpoints.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::{error, success, ApiResult};
use crate::errors::{AppError, AppErrorWithRevision};
use crate::models::{
    CreateEventRequest, CreateOpportunityRequest, CreateParticipantRequest, Event, Opportunity,
    Participant,
};
use crate::transfer;
use crate::AppState;

/// The record collections CSV transfer operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Events,
    Opportunities,
    Participants,
}

impl RecordKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "events" => Some(RecordKind::Events),
            "opportunities" => Some(RecordKind::Opportunities),
            "participants" => Some(RecordKind::Participants),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Events => "events",
            RecordKind::Opportunities => "opportunities",
            RecordKind::Participants => "participants",
        }
    }
}

/// Result of a CSV import.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
}

/// GET /api/export/:kind - Download a collection as a CSV attachment.
pub async fn export_csv(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Response, AppErrorWithRevision> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let kind = RecordKind::parse(&kind).ok_or_else(|| AppErrorWithRevision {
        error: AppError::BadRequest(format!("Unknown record kind: {}", kind)),
        revision_id,
    })?;

    let csv = match kind {
        RecordKind::Events => {
            let events = fetch(state.repo.list_events().await, revision_id)?;
            transfer::export_events(&events)
        }
        RecordKind::Opportunities => {
            let opportunities = fetch(state.repo.list_opportunities().await, revision_id)?;
            transfer::export_opportunities(&opportunities)
        }
        RecordKind::Participants => {
            let participants = fetch(state.repo.list_participants().await, revision_id)?;
            transfer::export_participants(&participants)
        }
    };
    let csv = fetch(csv, revision_id)?;

    let disposition = format!("attachment; filename=\"{}.csv\"", kind.as_str());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, disposition.as_str()),
        ],
        csv,
    )
        .into_response())
}

/// POST /api/import/:kind - Merge CSV rows into a collection.
///
/// Rows are upserted by id; rows without an id get a generated one, so a
/// re-import of an exported file replaces rather than duplicates.
pub async fn import_csv(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    body: String,
) -> ApiResult<ImportSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let Some(kind) = RecordKind::parse(&kind) else {
        return error(
            AppError::BadRequest(format!("Unknown record kind: {}", kind)),
            revision_id,
        );
    };

    let imported = match kind {
        RecordKind::Events => {
            let rows: Vec<CreateEventRequest> = match transfer::from_csv(&body) {
                Ok(rows) => rows,
                Err(e) => return error(e, revision_id),
            };
            let records: Vec<Event> = rows
                .into_iter()
                .map(|r| {
                    let id = r.id.clone().unwrap_or_else(generate_id);
                    r.into_event(id)
                })
                .collect();
            state.repo.upsert_many_events(&records).await
        }
        RecordKind::Opportunities => {
            let rows: Vec<CreateOpportunityRequest> = match transfer::from_csv(&body) {
                Ok(rows) => rows,
                Err(e) => return error(e, revision_id),
            };
            let records: Vec<Opportunity> = rows
                .into_iter()
                .map(|r| {
                    let id = r.id.clone().unwrap_or_else(generate_id);
                    r.into_opportunity(id)
                })
                .collect();
            state.repo.upsert_many_opportunities(&records).await
        }
        RecordKind::Participants => {
            let rows: Vec<CreateParticipantRequest> = match transfer::from_csv(&body) {
                Ok(rows) => rows,
                Err(e) => return error(e, revision_id),
            };
            let records: Vec<Participant> = rows
                .into_iter()
                .map(|r| {
                    let id = r.id.clone().unwrap_or_else(generate_id);
                    r.into_participant(id)
                })
                .collect();
            state.repo.upsert_many_participants(&records).await
        }
    };

    match imported {
        Ok(count) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(ImportSummary { imported: count }, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn fetch<T>(result: Result<T, AppError>, revision_id: i64) -> Result<T, AppErrorWithRevision> {
    result.map_err(|error| AppErrorWithRevision { error, revision_id })
}
