//! Relational joins across events, opportunities, and participants.
//!
//! Lookups that find nothing return `None` or an empty vec; a dangling
//! foreign key surfaces as an absent parent in the joined view, never as an
//! error. Whether "not found" is worth reporting is the caller's call.

use std::cmp::Reverse;
use std::collections::HashSet;

use serde::Serialize;

use crate::models::{Event, Opportunity, Participant};

use super::aggregate::parse_date;

/// An opportunity joined with its parent event and its participants.
///
/// `event` is `None` when the opportunity's `event_id` matches no known
/// event (orphaned records are tolerated, not rejected).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityDetail {
    pub opportunity: Opportunity,
    pub event: Option<Event>,
    pub participants: Vec<Participant>,
}

/// An opportunity with its parent event attached, as rendered in
/// attendance listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityWithEvent {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    pub event: Option<Event>,
}

/// Look up an event by id.
pub fn event_by_id<'a>(id: &str, events: &'a [Event]) -> Option<&'a Event> {
    events.iter().find(|e| e.id == id)
}

/// Look up an opportunity by id.
pub fn opportunity_by_id<'a>(id: &str, opportunities: &'a [Opportunity]) -> Option<&'a Opportunity> {
    opportunities.iter().find(|o| o.id == id)
}

/// All opportunities belonging to an event, in input order.
pub fn opportunities_for_event(event_id: &str, opportunities: &[Opportunity]) -> Vec<Opportunity> {
    opportunities
        .iter()
        .filter(|o| o.event_id == event_id)
        .cloned()
        .collect()
}

/// All participants recorded at an opportunity, in input order.
pub fn participants_for_opportunity(
    opportunity_id: &str,
    participants: &[Participant],
) -> Vec<Participant> {
    participants
        .iter()
        .filter(|p| p.opportunity_id == opportunity_id)
        .cloned()
        .collect()
}

/// Join one opportunity with its parent event and its participants.
pub fn join_opportunity(
    opportunity: &Opportunity,
    events: &[Event],
    participants: &[Participant],
) -> OpportunityDetail {
    OpportunityDetail {
        opportunity: opportunity.clone(),
        event: event_by_id(&opportunity.event_id, events).cloned(),
        participants: participants_for_opportunity(&opportunity.id, participants),
    }
}

/// All opportunities a person attended, identified by exact name equality,
/// each joined with its parent event and sorted by date descending.
///
/// Duplicate attendance records for the same opportunity collapse to one
/// entry because the opportunity collection is filtered by the id set.
pub fn opportunities_for_participant_name(
    name: &str,
    events: &[Event],
    opportunities: &[Opportunity],
    participants: &[Participant],
) -> Vec<OpportunityWithEvent> {
    let attended: HashSet<&str> = participants
        .iter()
        .filter(|p| p.name == name)
        .map(|p| p.opportunity_id.as_str())
        .collect();

    let mut views: Vec<OpportunityWithEvent> = opportunities
        .iter()
        .filter(|o| attended.contains(o.id.as_str()))
        .map(|o| OpportunityWithEvent {
            event: event_by_id(&o.event_id, events).cloned(),
            opportunity: o.clone(),
        })
        .collect();

    views.sort_by_key(|v| Reverse(parse_date(&v.opportunity.date)));
    views
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, start_date: &str) -> Event {
        Event {
            id: id.to_string(),
            name: format!("Event {}", id),
            start_date: start_date.to_string(),
            end_date: start_date.to_string(),
            location: "Tokyo".to_string(),
            url: "https://example.com".to_string(),
        }
    }

    fn opportunity(id: &str, event_id: &str, date: &str) -> Opportunity {
        Opportunity {
            id: id.to_string(),
            event_id: event_id.to_string(),
            name: format!("Opportunity {}", id),
            date: date.to_string(),
            content: String::new(),
            related_url: None,
        }
    }

    fn participant(id: &str, opportunity_id: &str, name: &str) -> Participant {
        Participant {
            id: id.to_string(),
            opportunity_id: opportunity_id.to_string(),
            name: name.to_string(),
            discord_id: None,
        }
    }

    #[test]
    fn participants_for_opportunity_returns_exact_subset() {
        let participants = vec![
            participant("p1", "o1", "Kim"),
            participant("p2", "o2", "Lee"),
            participant("p3", "o1", "Sato"),
        ];

        let matched = participants_for_opportunity("o1", &participants);
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|p| p.opportunity_id == "o1"));
        assert_eq!(matched[0].id, "p1");
        assert_eq!(matched[1].id, "p3");

        // Same subset regardless of collection order.
        let mut reversed = participants.clone();
        reversed.reverse();
        let matched_rev = participants_for_opportunity("o1", &reversed);
        assert_eq!(matched_rev.len(), 2);
        assert!(matched_rev.iter().all(|p| p.opportunity_id == "o1"));
    }

    #[test]
    fn opportunities_for_event_partitions_by_key() {
        let opportunities = vec![
            opportunity("o1", "e1", "2024-01-01"),
            opportunity("o2", "e2", "2024-01-02"),
            opportunity("o3", "e1", "2024-01-03"),
            opportunity("o4", "ghost", "2024-01-04"),
        ];

        let keys: HashSet<&str> = opportunities.iter().map(|o| o.event_id.as_str()).collect();
        let mut partitioned: Vec<Opportunity> = Vec::new();
        for key in &keys {
            let slice = opportunities_for_event(key, &opportunities);
            assert!(slice.iter().all(|o| o.event_id == *key));
            partitioned.extend(slice);
        }

        // No element duplicated or dropped across the key partition.
        assert_eq!(partitioned.len(), opportunities.len());
        let ids: HashSet<&str> = partitioned.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids.len(), opportunities.len());
    }

    #[test]
    fn empty_matches_are_empty_not_errors() {
        assert!(opportunities_for_event("e1", &[]).is_empty());
        assert!(participants_for_opportunity("o1", &[]).is_empty());
        assert!(event_by_id("e1", &[]).is_none());
        assert!(opportunity_by_id("o1", &[]).is_none());
    }

    #[test]
    fn join_is_idempotent_and_does_not_mutate_inputs() {
        let events = vec![event("e1", "2024-01-10")];
        let opportunities = vec![opportunity("o1", "e1", "2024-01-11")];
        let participants = vec![participant("p1", "o1", "Kim")];
        let events_before = events.clone();
        let participants_before = participants.clone();

        let first = join_opportunity(&opportunities[0], &events, &participants);
        let second = join_opportunity(&opportunities[0], &events, &participants);
        assert_eq!(first, second);
        assert_eq!(events, events_before);
        assert_eq!(participants, participants_before);
    }

    #[test]
    fn missing_parent_event_is_absent_not_an_error() {
        let events = vec![event("e1", "2024-01-10")];
        let opportunities = vec![opportunity("o1", "ghost", "2024-01-11")];
        let participants = vec![
            participant("p1", "o1", "Kim"),
            participant("p2", "o2", "Lee"),
        ];

        let detail = join_opportunity(&opportunities[0], &events, &participants);
        assert!(detail.event.is_none());
        assert_eq!(detail.participants.len(), 1);
        assert_eq!(detail.participants[0].name, "Kim");
    }

    #[test]
    fn attendance_resolves_through_opportunity_to_event() {
        let events = vec![event("e1", "2024-01-10")];
        let opportunities = vec![opportunity("o1", "e1", "2024-01-11")];
        let participants = vec![participant("p1", "o1", "Kim")];

        let attended =
            opportunities_for_participant_name("Kim", &events, &opportunities, &participants);
        assert_eq!(attended.len(), 1);
        assert_eq!(attended[0].opportunity.id, "o1");
        assert_eq!(attended[0].event.as_ref().map(|e| e.id.as_str()), Some("e1"));
    }

    #[test]
    fn attendance_is_sorted_date_descending_with_duplicates_collapsed() {
        let events = vec![event("e1", "2024-01-10")];
        let opportunities = vec![
            opportunity("o1", "e1", "2024-03-01"),
            opportunity("o2", "e1", "2024-05-01"),
            opportunity("o3", "ghost", "2024-04-01"),
        ];
        let participants = vec![
            participant("p1", "o1", "Kim"),
            participant("p2", "o2", "Kim"),
            participant("p3", "o3", "Kim"),
            // Duplicate attendance record for o1 collapses to one entry.
            participant("p4", "o1", "Kim"),
            participant("p5", "o2", "Lee"),
        ];

        let attended =
            opportunities_for_participant_name("Kim", &events, &opportunities, &participants);
        let ids: Vec<&str> = attended.iter().map(|v| v.opportunity.id.as_str()).collect();
        assert_eq!(ids, ["o2", "o3", "o1"]);
        assert!(attended[1].event.is_none());
    }

    #[test]
    fn name_matching_is_exact_string_equality() {
        let opportunities = vec![opportunity("o1", "e1", "2024-01-11")];
        let participants = vec![participant("p1", "o1", "Kim")];

        let attended =
            opportunities_for_participant_name("kim", &[], &opportunities, &participants);
        assert!(attended.is_empty());
    }
}
