//! Event model matching the frontend Event interface.

use serde::{Deserialize, Serialize};

/// A conference or gathering with a date range and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    /// ISO date (YYYY-MM-DD) as entered in the form.
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub url: String,
}

/// Request body for creating a new event.
///
/// The id is caller-supplied or generated on creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub url: String,
}

/// Request body for replacing an existing event.
///
/// Events are mutated by full-record replacement; there is no partial patch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceEventRequest {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub url: String,
}

impl CreateEventRequest {
    pub fn into_event(self, id: String) -> Event {
        Event {
            id,
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            location: self.location,
            url: self.url,
        }
    }
}

impl ReplaceEventRequest {
    pub fn into_event(self, id: String) -> Event {
        Event {
            id,
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            location: self.location,
            url: self.url,
        }
    }
}
