//! CSV encode/decode for the three record collections.
//!
//! Headers are the camelCase wire field names, one record per line, the
//! same shape the frontend's export produced. Import is serde-driven and
//! matches columns by header name, so column order does not matter.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Event, Opportunity, Participant};

/// CSV row for an opportunity. Optional fields are written as empty cells
/// rather than omitted, so every row keeps the same column count.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpportunityRow {
    id: String,
    event_id: String,
    name: String,
    date: String,
    content: String,
    related_url: Option<String>,
}

/// CSV row for a participant record.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantRow {
    id: String,
    opportunity_id: String,
    name: String,
    discord_id: Option<String>,
}

/// Serialize records to a CSV string with a header row.
fn to_csv<T: Serialize>(records: impl IntoIterator<Item = T>) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding error: {}", e)))
}

/// Deserialize CSV into records, matching columns by header name.
pub fn from_csv<T: DeserializeOwned>(data: &str) -> Result<Vec<T>, AppError> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(AppError::from)
}

/// Export all events as CSV.
pub fn export_events(events: &[Event]) -> Result<String, AppError> {
    to_csv(events)
}

/// Export all opportunities as CSV.
pub fn export_opportunities(opportunities: &[Opportunity]) -> Result<String, AppError> {
    to_csv(opportunities.iter().map(|o| OpportunityRow {
        id: o.id.clone(),
        event_id: o.event_id.clone(),
        name: o.name.clone(),
        date: o.date.clone(),
        content: o.content.clone(),
        related_url: o.related_url.clone(),
    }))
}

/// Export all participants as CSV.
pub fn export_participants(participants: &[Participant]) -> Result<String, AppError> {
    to_csv(participants.iter().map(|p| ParticipantRow {
        id: p.id.clone(),
        opportunity_id: p.opportunity_id.clone(),
        name: p.name.clone(),
        discord_id: p.discord_id.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateEventRequest, CreateOpportunityRequest, CreateParticipantRequest};

    #[test]
    fn events_round_trip_through_csv() {
        let events = vec![
            Event {
                id: "e1".to_string(),
                name: "RustConf".to_string(),
                start_date: "2024-09-10".to_string(),
                end_date: "2024-09-12".to_string(),
                location: "Montreal".to_string(),
                url: "https://rustconf.com".to_string(),
            },
            Event {
                id: "e2".to_string(),
                name: "FOSDEM".to_string(),
                start_date: "2024-02-03".to_string(),
                end_date: "2024-02-04".to_string(),
                location: "Brussels".to_string(),
                url: "https://fosdem.org".to_string(),
            },
        ];

        let csv = export_events(&events).unwrap();
        assert!(csv.starts_with("id,name,startDate,endDate,location,url"));

        let imported: Vec<CreateEventRequest> = from_csv(&csv).unwrap();
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].id.as_deref(), Some("e1"));
        assert_eq!(imported[1].name, "FOSDEM");
    }

    #[test]
    fn absent_optional_fields_keep_the_column_count() {
        let opportunities = vec![
            Opportunity {
                id: "o1".to_string(),
                event_id: "e1".to_string(),
                name: "Hallway track".to_string(),
                date: "2024-09-10".to_string(),
                content: "Met the compiler team".to_string(),
                related_url: Some("https://example.com".to_string()),
            },
            Opportunity {
                id: "o2".to_string(),
                event_id: "e1".to_string(),
                name: "Dinner".to_string(),
                date: "2024-09-11".to_string(),
                content: String::new(),
                related_url: None,
            },
        ];

        let csv = export_opportunities(&opportunities).unwrap();
        let imported: Vec<CreateOpportunityRequest> = from_csv(&csv).unwrap();
        assert_eq!(imported.len(), 2);
        assert_eq!(
            imported[0].related_url.as_deref(),
            Some("https://example.com")
        );
        assert_eq!(imported[1].related_url, None);
    }

    #[test]
    fn rows_without_id_import_with_no_id() {
        let csv = "opportunityId,name,discordId\no1,Kim,kim#1234\no1,Lee,\n";
        let imported: Vec<CreateParticipantRequest> = from_csv(csv).unwrap();
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].id, None);
        assert_eq!(imported[0].discord_id.as_deref(), Some("kim#1234"));
        assert_eq!(imported[1].discord_id, None);
    }

    #[test]
    fn participants_export_includes_headers() {
        let participants = vec![Participant {
            id: "p1".to_string(),
            opportunity_id: "o1".to_string(),
            name: "Kim".to_string(),
            discord_id: None,
        }];

        let csv = export_participants(&participants).unwrap();
        assert!(csv.starts_with("id,opportunityId,name,discordId"));
    }

    #[test]
    fn malformed_csv_is_a_bad_request() {
        let csv = "id,name,startDate,endDate,location,url\nonly-one-field\n";
        let result: Result<Vec<CreateEventRequest>, AppError> = from_csv(csv);
        match result {
            Err(AppError::BadRequest(_)) => {}
            other => panic!("expected BadRequest, got {:?}", other.map(|v| v.len())),
        }
    }
}
