//! Datastore model: the full application snapshot.

use serde::{Deserialize, Serialize};

use super::{Event, Opportunity, Participant};

/// The root datastore containing all application data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datastore {
    pub schema_version: i32,
    pub generated_at: String,
    pub revision_id: i64,
    pub events: Vec<Event>,
    pub opportunities: Vec<Opportunity>,
    pub participants: Vec<Participant>,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
