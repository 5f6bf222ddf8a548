//! Participant model matching the frontend Participant interface.

use serde::{Deserialize, Serialize};

/// A record of one person's presence at one opportunity.
///
/// This is not a unique-person entity: the same person attending several
/// opportunities is stored as several records sharing the same `name` with
/// distinct ids. Identity across opportunities is exact name equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub opportunity_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_id: Option<String>,
}

/// Request body for creating a new participant record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParticipantRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub opportunity_id: String,
    pub name: String,
    #[serde(default)]
    pub discord_id: Option<String>,
}

/// Request body for replacing an existing participant record (full record).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceParticipantRequest {
    pub opportunity_id: String,
    pub name: String,
    #[serde(default)]
    pub discord_id: Option<String>,
}

impl CreateParticipantRequest {
    pub fn into_participant(self, id: String) -> Participant {
        Participant {
            id,
            opportunity_id: self.opportunity_id,
            name: self.name,
            discord_id: self.discord_id,
        }
    }
}

impl ReplaceParticipantRequest {
    pub fn into_participant(self, id: String) -> Participant {
        Participant {
            id,
            opportunity_id: self.opportunity_id,
            name: self.name,
            discord_id: self.discord_id,
        }
    }
}
