use super::{
    newtypes::{EventId, UserId},
    user::UserRef,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(alias = "_id")]
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub organizer: UserRef,
    #[serde(default)]
    pub participants: Vec<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub status: EventStatus,
    /// Points awarded to participants once the organizer completes the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eco_points: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// Reasons for refusing a participation change before contacting the backend.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EventRuleViolation {
    #[error("This event has already taken place")]
    Past,
    #[error("This event was cancelled")]
    Cancelled,
    #[error("This event is full")]
    Full,
    #[error("You already joined this event")]
    AlreadyJoined,
    #[error("You are not participating in this event")]
    NotJoined,
    #[error("The organizer cannot leave their own event")]
    Organizer,
    #[error("Only the organizer can complete this event")]
    NotOrganizer,
    #[error("Only upcoming or ongoing events can be completed")]
    NotCompletable,
}

impl Event {
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.status == EventStatus::Completed || self.end_date.unwrap_or(self.start_date) < now
    }

    pub fn is_full(&self) -> bool {
        self.max_participants
            .is_some_and(|max| self.participants.len() >= max as usize)
    }

    pub fn is_organizer(&self, user: &UserId) -> bool {
        &self.organizer.id == user
    }

    pub fn is_participant(&self, user: &UserId) -> bool {
        self.participants.iter().any(|p| &p.id == user)
    }

    pub fn can_join(&self, user: &UserId, now: DateTime<Utc>) -> Result<(), EventRuleViolation> {
        if self.status == EventStatus::Cancelled {
            return Err(EventRuleViolation::Cancelled);
        }
        if self.is_past(now) {
            return Err(EventRuleViolation::Past);
        }
        if self.is_participant(user) {
            return Err(EventRuleViolation::AlreadyJoined);
        }
        if self.is_full() {
            return Err(EventRuleViolation::Full);
        }
        Ok(())
    }

    pub fn can_leave(&self, user: &UserId, now: DateTime<Utc>) -> Result<(), EventRuleViolation> {
        if self.is_organizer(user) {
            return Err(EventRuleViolation::Organizer);
        }
        if self.is_past(now) {
            return Err(EventRuleViolation::Past);
        }
        if !self.is_participant(user) {
            return Err(EventRuleViolation::NotJoined);
        }
        Ok(())
    }

    pub fn can_complete(&self, user: &UserId) -> Result<(), EventRuleViolation> {
        if !self.is_organizer(user) {
            return Err(EventRuleViolation::NotOrganizer);
        }
        match self.status {
            EventStatus::Upcoming | EventStatus::Ongoing => Ok(()),
            EventStatus::Completed | EventStatus::Cancelled => {
                Err(EventRuleViolation::NotCompletable)
            }
        }
    }
}

/// Body for creating or updating an event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eco_points: Option<u32>,
}
