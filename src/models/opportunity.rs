//! Opportunity model matching the frontend Opportunity interface.

use serde::{Deserialize, Serialize};

/// A session, meetup, or interaction occurring within an event.
///
/// `event_id` references an `Event`; a dangling reference is tolerated by
/// the join logic and surfaces as an absent event in joined views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub event_id: String,
    pub name: String,
    /// ISO date (YYYY-MM-DD) as entered in the form.
    pub date: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_url: Option<String>,
}

/// Request body for creating a new opportunity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpportunityRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub event_id: String,
    pub name: String,
    pub date: String,
    pub content: String,
    #[serde(default)]
    pub related_url: Option<String>,
}

/// Request body for replacing an existing opportunity (full record).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOpportunityRequest {
    pub event_id: String,
    pub name: String,
    pub date: String,
    pub content: String,
    #[serde(default)]
    pub related_url: Option<String>,
}

impl CreateOpportunityRequest {
    pub fn into_opportunity(self, id: String) -> Opportunity {
        Opportunity {
            id,
            event_id: self.event_id,
            name: self.name,
            date: self.date,
            content: self.content,
            related_url: self.related_url,
        }
    }
}

impl ReplaceOpportunityRequest {
    pub fn into_opportunity(self, id: String) -> Opportunity {
        Opportunity {
            id,
            event_id: self.event_id,
            name: self.name,
            date: self.date,
            content: self.content,
            related_url: self.related_url,
        }
    }
}
