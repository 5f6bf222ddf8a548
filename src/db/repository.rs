//! Database repository for CRUD operations.
//!
//! The record store gateway: flat collections in, flat collections out.
//! All derived views are computed elsewhere from what this module returns.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    CreateEventRequest, CreateOpportunityRequest, CreateParticipantRequest, Datastore, Event,
    Opportunity, Participant, ReplaceEventRequest, ReplaceOpportunityRequest,
    ReplaceParticipantRequest, RevisionInfo,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    /// Get the full datastore.
    pub async fn get_datastore(&self) -> Result<Datastore, AppError> {
        let meta =
            sqlx::query("SELECT schema_version, revision_id, generated_at FROM meta WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;

        let events = self.list_events().await?;
        let opportunities = self.list_opportunities().await?;
        let participants = self.list_participants().await?;

        Ok(Datastore {
            schema_version: meta.get("schema_version"),
            revision_id: meta.get("revision_id"),
            generated_at: meta.get("generated_at"),
            events,
            opportunities,
            participants,
        })
    }

    // ==================== EVENT OPERATIONS ====================

    /// List all events in insertion order.
    pub async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, start_date, end_date, location, url FROM events ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(event_from_row).collect())
    }

    /// Get an event by ID.
    pub async fn get_event(&self, id: &str) -> Result<Option<Event>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, start_date, end_date, location, url FROM events WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(event_from_row))
    }

    /// Create a new event. The id is caller-supplied or generated here.
    pub async fn create_event(&self, request: &CreateEventRequest) -> Result<Event, AppError> {
        let id = request
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let event = request.clone().into_event(id);

        sqlx::query(
            "INSERT INTO events (id, name, start_date, end_date, location, url) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(&event.start_date)
        .bind(&event.end_date)
        .bind(&event.location)
        .bind(&event.url)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(event)
    }

    /// Replace an event with a full record. Last write wins.
    pub async fn replace_event(
        &self,
        id: &str,
        request: &ReplaceEventRequest,
    ) -> Result<Event, AppError> {
        let event = request.clone().into_event(id.to_string());

        let result = sqlx::query(
            "UPDATE events SET name = ?, start_date = ?, end_date = ?, location = ?, url = ? WHERE id = ?"
        )
        .bind(&event.name)
        .bind(&event.start_date)
        .bind(&event.end_date)
        .bind(&event.location)
        .bind(&event.url)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }

        self.increment_revision().await?;

        Ok(event)
    }

    /// Delete an event together with its opportunities and their
    /// participants. The cascade runs in one transaction.
    pub async fn delete_event(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM participants WHERE opportunity_id IN (SELECT id FROM opportunities WHERE event_id = ?)"
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM opportunities WHERE event_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Insert or replace a batch of events, as one write operation.
    pub async fn upsert_many_events(&self, events: &[Event]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        for event in events {
            sqlx::query(
                "INSERT OR REPLACE INTO events (id, name, start_date, end_date, location, url) VALUES (?, ?, ?, ?, ?, ?)"
            )
            .bind(&event.id)
            .bind(&event.name)
            .bind(&event.start_date)
            .bind(&event.end_date)
            .bind(&event.location)
            .bind(&event.url)
            .execute(&mut *tx)
            .await?;
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(events.len())
    }

    // ==================== OPPORTUNITY OPERATIONS ====================

    /// List all opportunities in insertion order.
    pub async fn list_opportunities(&self) -> Result<Vec<Opportunity>, AppError> {
        let rows = sqlx::query(
            "SELECT id, event_id, name, date, content, related_url FROM opportunities ORDER BY rowid"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(opportunity_from_row).collect())
    }

    /// Get an opportunity by ID.
    pub async fn get_opportunity(&self, id: &str) -> Result<Option<Opportunity>, AppError> {
        let row = sqlx::query(
            "SELECT id, event_id, name, date, content, related_url FROM opportunities WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(opportunity_from_row))
    }

    /// Create a new opportunity.
    ///
    /// The referenced event is not required to exist: orphaned records are
    /// tolerated and surface as an absent parent in joined views.
    pub async fn create_opportunity(
        &self,
        request: &CreateOpportunityRequest,
    ) -> Result<Opportunity, AppError> {
        let id = request
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let opportunity = request.clone().into_opportunity(id);

        sqlx::query(
            "INSERT INTO opportunities (id, event_id, name, date, content, related_url) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(&opportunity.id)
        .bind(&opportunity.event_id)
        .bind(&opportunity.name)
        .bind(&opportunity.date)
        .bind(&opportunity.content)
        .bind(&opportunity.related_url)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(opportunity)
    }

    /// Replace an opportunity with a full record. Last write wins.
    pub async fn replace_opportunity(
        &self,
        id: &str,
        request: &ReplaceOpportunityRequest,
    ) -> Result<Opportunity, AppError> {
        let opportunity = request.clone().into_opportunity(id.to_string());

        let result = sqlx::query(
            "UPDATE opportunities SET event_id = ?, name = ?, date = ?, content = ?, related_url = ? WHERE id = ?"
        )
        .bind(&opportunity.event_id)
        .bind(&opportunity.name)
        .bind(&opportunity.date)
        .bind(&opportunity.content)
        .bind(&opportunity.related_url)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Opportunity {} not found", id)));
        }

        self.increment_revision().await?;

        Ok(opportunity)
    }

    /// Delete an opportunity together with its participants, in one
    /// transaction.
    pub async fn delete_opportunity(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM participants WHERE opportunity_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM opportunities WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Opportunity {} not found", id)));
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Insert or replace a batch of opportunities, as one write operation.
    pub async fn upsert_many_opportunities(
        &self,
        opportunities: &[Opportunity],
    ) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        for opportunity in opportunities {
            sqlx::query(
                "INSERT OR REPLACE INTO opportunities (id, event_id, name, date, content, related_url) VALUES (?, ?, ?, ?, ?, ?)"
            )
            .bind(&opportunity.id)
            .bind(&opportunity.event_id)
            .bind(&opportunity.name)
            .bind(&opportunity.date)
            .bind(&opportunity.content)
            .bind(&opportunity.related_url)
            .execute(&mut *tx)
            .await?;
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(opportunities.len())
    }

    // ==================== PARTICIPANT OPERATIONS ====================

    /// List all participants in insertion order.
    pub async fn list_participants(&self) -> Result<Vec<Participant>, AppError> {
        let rows = sqlx::query(
            "SELECT id, opportunity_id, name, discord_id FROM participants ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(participant_from_row).collect())
    }

    /// Get a participant record by ID.
    pub async fn get_participant(&self, id: &str) -> Result<Option<Participant>, AppError> {
        let row = sqlx::query(
            "SELECT id, opportunity_id, name, discord_id FROM participants WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(participant_from_row))
    }

    /// Create a new participant record.
    pub async fn create_participant(
        &self,
        request: &CreateParticipantRequest,
    ) -> Result<Participant, AppError> {
        let id = request
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let participant = request.clone().into_participant(id);

        sqlx::query(
            "INSERT INTO participants (id, opportunity_id, name, discord_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&participant.id)
        .bind(&participant.opportunity_id)
        .bind(&participant.name)
        .bind(&participant.discord_id)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(participant)
    }

    /// Replace a participant record. Last write wins.
    pub async fn replace_participant(
        &self,
        id: &str,
        request: &ReplaceParticipantRequest,
    ) -> Result<Participant, AppError> {
        let participant = request.clone().into_participant(id.to_string());

        let result = sqlx::query(
            "UPDATE participants SET opportunity_id = ?, name = ?, discord_id = ? WHERE id = ?",
        )
        .bind(&participant.opportunity_id)
        .bind(&participant.name)
        .bind(&participant.discord_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Participant {} not found", id)));
        }

        self.increment_revision().await?;

        Ok(participant)
    }

    /// Delete a participant record.
    pub async fn delete_participant(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM participants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Participant {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    /// Insert or replace a batch of participants, as one write operation.
    pub async fn upsert_many_participants(
        &self,
        participants: &[Participant],
    ) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        for participant in participants {
            sqlx::query(
                "INSERT OR REPLACE INTO participants (id, opportunity_id, name, discord_id) VALUES (?, ?, ?, ?)"
            )
            .bind(&participant.id)
            .bind(&participant.opportunity_id)
            .bind(&participant.name)
            .bind(&participant.discord_id)
            .execute(&mut *tx)
            .await?;
        }

        bump_revision(&mut tx).await?;
        tx.commit().await?;
        Ok(participants.len())
    }
}

/// Increment the revision inside an open transaction.
async fn bump_revision(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>) -> Result<(), AppError> {
    let now = Utc::now().to_rfc3339();
    sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
        .bind(&now)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// Helper functions for row conversion

fn event_from_row(row: &sqlx::sqlite::SqliteRow) -> Event {
    Event {
        id: row.get("id"),
        name: row.get("name"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        location: row.get("location"),
        url: row.get("url"),
    }
}

fn opportunity_from_row(row: &sqlx::sqlite::SqliteRow) -> Opportunity {
    Opportunity {
        id: row.get("id"),
        event_id: row.get("event_id"),
        name: row.get("name"),
        date: row.get("date"),
        content: row.get("content"),
        related_url: row.get("related_url"),
    }
}

fn participant_from_row(row: &sqlx::sqlite::SqliteRow) -> Participant {
    Participant {
        id: row.get("id"),
        opportunity_id: row.get("opportunity_id"),
        name: row.get("name"),
        discord_id: row.get("discord_id"),
    }
}
