//! Summary views: participant deduplication and canonical orderings.

use std::cmp::{Ordering, Reverse};
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Event, Opportunity, Participant};

/// One person in the deduplicated participant listing.
///
/// `representative_id` is the id of the first-seen record with this name,
/// used only as a navigation key. `count` is the number of distinct
/// opportunities attended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub name: String,
    pub representative_id: String,
    pub count: usize,
}

/// Parse a form-entered ISO date. Anything else yields `None`.
pub(crate) fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Ordering used for participant names: Unicode lowercase comparison with
/// exact comparison as tiebreak. Deterministic and total; two
/// differently-spelled names are always distinct entries.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Group participant records by exact name, sorted by name ascending.
pub fn unique_participants_by_name(participants: &[Participant]) -> Vec<ParticipantSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_name: HashMap<&str, (&str, HashSet<&str>)> = HashMap::new();

    for p in participants {
        match by_name.get_mut(p.name.as_str()) {
            Some((_, attended)) => {
                attended.insert(p.opportunity_id.as_str());
            }
            None => {
                order.push(p.name.as_str());
                let mut attended = HashSet::new();
                attended.insert(p.opportunity_id.as_str());
                by_name.insert(p.name.as_str(), (p.id.as_str(), attended));
            }
        }
    }

    let mut summaries: Vec<ParticipantSummary> = order
        .into_iter()
        .map(|name| {
            let (id, attended) = &by_name[name];
            ParticipantSummary {
                name: name.to_string(),
                representative_id: id.to_string(),
                count: attended.len(),
            }
        })
        .collect();

    summaries.sort_by(|a, b| compare_names(&a.name, &b.name));
    summaries
}

/// Opportunities by parsed date, newest first. Stable: equal dates keep
/// input order; unparseable dates order after all parseable ones.
pub fn sort_opportunities_by_date_desc(opportunities: &[Opportunity]) -> Vec<Opportunity> {
    let mut sorted = opportunities.to_vec();
    sorted.sort_by_key(|o| Reverse(parse_date(&o.date)));
    sorted
}

/// Events by parsed start date, newest first. Same contract as the
/// opportunity ordering.
pub fn sort_events_by_start_date_desc(events: &[Event]) -> Vec<Event> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| Reverse(parse_date(&e.start_date)));
    sorted
}
