use super::event::EventForm;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub const MAX_TITLE_LENGTH: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Title must be at most {} characters", MAX_TITLE_LENGTH)]
    TitleTooLong,
    #[error("Start date must be in the future")]
    StartInPast,
    #[error("End date must be after the start date")]
    EndBeforeStart,
    #[error("Maximum participants must be at least 1")]
    NoCapacity,
}

/// Checks an event form before it is sent to the backend.
///
/// `is_new` enables the check for a start date in the future, existing events may be edited
/// while they are running.
pub fn validate_event_form(
    form: &EventForm,
    now: DateTime<Utc>,
    is_new: bool,
) -> Result<(), FormError> {
    if form.title.trim().is_empty() {
        return Err(FormError::Missing("Title"));
    }
    if form.title.chars().count() > MAX_TITLE_LENGTH {
        return Err(FormError::TitleTooLong);
    }
    if form.description.trim().is_empty() {
        return Err(FormError::Missing("Description"));
    }
    if form.location.trim().is_empty() {
        return Err(FormError::Missing("Location"));
    }
    if is_new && form.start_date <= now {
        return Err(FormError::StartInPast);
    }
    if form.end_date.is_some_and(|end| end <= form.start_date) {
        return Err(FormError::EndBeforeStart);
    }
    if form.max_participants == Some(0) {
        return Err(FormError::NoCapacity);
    }
    Ok(())
}
